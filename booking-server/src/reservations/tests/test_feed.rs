use super::*;
use crate::db::models::ReservationUpdate;
use std::time::Duration;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

async fn next(sub: &mut FeedSubscription) -> FeedSnapshot {
    tokio::time::timeout(RECV_TIMEOUT, sub.recv())
        .await
        .expect("feed delivery timed out")
        .expect("feed closed")
}

#[tokio::test]
async fn test_initial_snapshot_on_subscribe() {
    let h = harness_with_capacity(15).await;
    h.service.submit(draft("Mario Rossi", "20:00", 2)).await.unwrap();

    let mut sub = h.feed.subscribe().await;
    let snapshot = next(&mut sub).await;
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].full_name, "Mario Rossi");
}

#[tokio::test]
async fn test_delivery_on_every_change() {
    let h = harness_with_capacity(15).await;
    let mut sub = h.feed.subscribe().await;
    assert!(next(&mut sub).await.is_empty());

    let r = h.service.submit(draft("Anna Bianchi", "20:00", 2)).await.unwrap();
    assert_eq!(next(&mut sub).await.len(), 1);

    h.service
        .edit(
            &r.key(),
            ReservationUpdate {
                note: Some("window table".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let snapshot = next(&mut sub).await;
    assert_eq!(snapshot[0].note.as_deref(), Some("window table"));

    h.service.remove(&r.key()).await.unwrap();
    assert!(next(&mut sub).await.is_empty());
}

#[tokio::test]
async fn test_all_subscribers_receive_each_change() {
    let h = harness_with_capacity(15).await;
    let mut first = h.feed.subscribe().await;
    let mut second = h.feed.subscribe().await;
    next(&mut first).await;
    next(&mut second).await;

    h.service.submit(draft("Bruno Verdi", "20:00", 3)).await.unwrap();

    let a = next(&mut first).await;
    let b = next(&mut second).await;
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert_eq!(a[0].key(), b[0].key());
}

#[tokio::test]
async fn test_unsubscribe_detaches() {
    let h = harness_with_capacity(15).await;
    let first = h.feed.subscribe().await;
    let second = h.feed.subscribe().await;
    assert_eq!(h.feed.subscriber_count(), 2);

    drop(first);
    assert_eq!(h.feed.subscriber_count(), 1);

    second.unsubscribe();
    assert_eq!(h.feed.subscriber_count(), 0);

    // The feed keeps working for later subscribers
    let mut third = h.feed.subscribe().await;
    h.service.submit(draft("Carla Neri", "20:00", 2)).await.unwrap();
    next(&mut third).await;
    assert_eq!(next(&mut third).await.len(), 1);
}

#[tokio::test]
async fn test_snapshots_monotonically_grow_knowledge() {
    let h = harness_with_capacity(15).await;
    let mut sub = h.feed.subscribe().await;
    next(&mut sub).await;

    for i in 0..3 {
        h.service
            .submit(draft(&format!("Guest {i}"), "20:00", 1))
            .await
            .unwrap();
    }

    // Deliveries may coalesce under load, but observed sizes never shrink
    let mut last_len = 0;
    while last_len < 3 {
        let snapshot = next(&mut sub).await;
        assert!(snapshot.len() >= last_len);
        last_len = snapshot.len();
    }
}
