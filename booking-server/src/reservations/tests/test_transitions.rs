use super::*;
use shared::error::ErrorCode;

#[tokio::test]
async fn test_accept_succeeds_exactly_once() {
    let h = harness_with_capacity(15).await;
    let r = h.service.submit(draft("Mario Rossi", "20:00", 2)).await.unwrap();

    let accepted = h
        .service
        .transition(&r.key(), ReservationStatus::Accepted)
        .await
        .unwrap();
    assert_eq!(accepted.status, ReservationStatus::Accepted);

    // Accepting again fails, and so does flipping the decision
    let err = h
        .service
        .transition(&r.key(), ReservationStatus::Accepted)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);

    let err = h
        .service
        .transition(&r.key(), ReservationStatus::Rejected)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn test_reject_is_terminal() {
    let h = harness_with_capacity(15).await;
    let r = h.service.submit(draft("Anna Bianchi", "20:00", 2)).await.unwrap();

    let rejected = h
        .service
        .transition(&r.key(), ReservationStatus::Rejected)
        .await
        .unwrap();
    assert_eq!(rejected.status, ReservationStatus::Rejected);

    let err = h
        .service
        .transition(&r.key(), ReservationStatus::Accepted)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn test_transition_to_pending_rejected() {
    let h = harness_with_capacity(15).await;
    let r = h.service.submit(draft("Bruno Verdi", "20:00", 2)).await.unwrap();

    let err = h
        .service
        .transition(&r.key(), ReservationStatus::Pending)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn test_transition_unknown_reservation() {
    let h = harness_with_capacity(15).await;

    let err = h
        .service
        .transition("reservation:doesnotexist", ReservationStatus::Accepted)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationNotFound);
}

#[tokio::test]
async fn test_delete_allowed_from_any_status() {
    let h = harness_with_capacity(15).await;

    let r = h.service.submit(draft("Mario Rossi", "20:00", 2)).await.unwrap();
    h.service
        .transition(&r.key(), ReservationStatus::Accepted)
        .await
        .unwrap();

    let removed = h.service.remove(&r.key()).await.unwrap();
    assert_eq!(removed.status, ReservationStatus::Accepted);
    assert!(h.service.list_by_date(TEST_DATE).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_unknown_reservation() {
    let h = harness_with_capacity(15).await;

    let err = h.service.remove("reservation:doesnotexist").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationNotFound);
}
