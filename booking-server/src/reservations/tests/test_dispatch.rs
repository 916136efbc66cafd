use super::*;
use shared::error::ErrorCode;

#[tokio::test]
async fn test_pending_alert_once_across_redeliveries() {
    let h = harness_with_capacity(15).await;
    let mailer = RecordingMailer::new();
    let alerts = RecordingAlerts::new();
    let dispatcher = dispatcher_with(&h.service, Arc::clone(&mailer), Arc::clone(&alerts));

    h.service.submit(draft("Mario Rossi", "20:00", 2)).await.unwrap();
    let snapshot = h.service.list_all().await.unwrap();

    // The feed may redeliver an identical snapshot on reconnect or
    // multi-subscriber fan-out; only the first sighting alerts
    dispatcher.on_snapshot(&snapshot).await;
    dispatcher.on_snapshot(&snapshot).await;
    dispatcher.on_snapshot(&snapshot).await;

    assert_eq!(alerts.count_of("New reservation"), 1);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_watcher_alerts_on_new_pending() {
    let h = harness_with_capacity(15).await;
    let mailer = RecordingMailer::new();
    let alerts = RecordingAlerts::new();
    let dispatcher = dispatcher_with(&h.service, mailer, Arc::clone(&alerts));
    let _watcher = dispatcher.watch(&h.feed, tokio_util::sync::CancellationToken::new());

    h.service.submit(draft("Anna Bianchi", "20:00", 2)).await.unwrap();

    // Feed delivery is asynchronous; poll briefly
    for _ in 0..100 {
        if alerts.count_of("New reservation") == 1 {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    panic!(
        "expected one new-reservation alert, saw {:?}",
        alerts.titles()
    );
}

#[tokio::test]
async fn test_accept_sends_one_email_and_alert() {
    let h = harness_with_capacity(15).await;
    let mailer = RecordingMailer::new();
    let alerts = RecordingAlerts::new();
    let dispatcher = dispatcher_with(&h.service, Arc::clone(&mailer), Arc::clone(&alerts));

    let r = h.service.submit(draft("Mario Rossi", "20:00", 2)).await.unwrap();

    let outcome = dispatcher.accept(&r.key()).await.unwrap();
    assert_eq!(outcome.reservation.status, ReservationStatus::Accepted);
    assert!(outcome.notified);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, MessageKind::Acceptance);
    assert_eq!(sent[0].1, "mario.rossi@example.com");
    assert_eq!(alerts.count_of("Reservation accepted"), 1);

    // Accepting again transitions nothing and dispatches nothing
    let err = dispatcher.accept(&r.key()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);
    assert_eq!(mailer.sent().len(), 1);
    assert_eq!(alerts.count_of("Reservation accepted"), 1);
}

#[tokio::test]
async fn test_reject_sends_rejection_email() {
    let h = harness_with_capacity(15).await;
    let mailer = RecordingMailer::new();
    let alerts = RecordingAlerts::new();
    let dispatcher = dispatcher_with(&h.service, Arc::clone(&mailer), Arc::clone(&alerts));

    let r = h.service.submit(draft("Anna Bianchi", "20:00", 3)).await.unwrap();

    let outcome = dispatcher.reject(&r.key()).await.unwrap();
    assert_eq!(outcome.reservation.status, ReservationStatus::Rejected);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, MessageKind::Rejection);
    assert_eq!(alerts.count_of("Reservation rejected"), 1);
}

#[tokio::test]
async fn test_email_failure_reported_not_rolled_back() {
    let h = harness_with_capacity(15).await;
    let mailer = RecordingMailer::failing();
    let alerts = RecordingAlerts::new();
    let dispatcher = dispatcher_with(&h.service, Arc::clone(&mailer), alerts);

    let r = h.service.submit(draft("Bruno Verdi", "20:00", 2)).await.unwrap();

    let outcome = dispatcher.accept(&r.key()).await.unwrap();
    assert!(!outcome.notified);

    // The committed transition is the source of truth
    let stored = h.service.get(&r.key()).await.unwrap();
    assert_eq!(stored.status, ReservationStatus::Accepted);
}

#[tokio::test]
async fn test_dedup_map_stays_bounded() {
    let h = harness_with_capacity(15).await;
    let mailer = RecordingMailer::new();
    let alerts = RecordingAlerts::new();
    let dispatcher = dispatcher_with(&h.service, mailer, alerts);

    let r = h.service.submit(draft("Carla Neri", "20:00", 2)).await.unwrap();
    dispatcher.on_snapshot(&h.service.list_all().await.unwrap()).await;
    assert_eq!(dispatcher.dedup_len(), 1);

    // Leaving pending evicts the pending-created mark, the accepted mark
    // remains until the record disappears
    dispatcher.accept(&r.key()).await.unwrap();
    dispatcher.on_snapshot(&h.service.list_all().await.unwrap()).await;
    assert_eq!(dispatcher.dedup_len(), 1);

    h.service.remove(&r.key()).await.unwrap();
    dispatcher.on_snapshot(&h.service.list_all().await.unwrap()).await;
    assert_eq!(dispatcher.dedup_len(), 0);
}
