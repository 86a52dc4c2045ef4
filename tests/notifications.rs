use opsdesk::{NewNotification, NotificationKind, PushOutcome, NOTIFICATION_CAP};

#[path = "util.rs"]
mod util;

#[test]
fn rapid_duplicate_is_suppressed() {
    let (store, center) = util::memory_center();

    let first = center
        .push(NewNotification::new(
            "New RFQ Received",
            "Quote requested for stage lighting",
            NotificationKind::Info,
        ))
        .unwrap();
    assert!(matches!(first, PushOutcome::Stored { .. }));

    // Same title and message inside the dedup window, as when the synthetic
    // generator and the deadline monitor race within one tick.
    let second = center
        .push(NewNotification::new(
            "New RFQ Received",
            "Quote requested for stage lighting",
            NotificationKind::Info,
        ))
        .unwrap();
    assert_eq!(second, PushOutcome::Suppressed);
    assert_eq!(store.snapshot().notifications.len(), 1);
}

#[test]
fn sixty_adds_leave_fifty_newest_first() {
    let (store, center) = util::memory_center();
    for i in 0..60 {
        center
            .push(NewNotification::new(
                format!("update {i}"),
                "state changed",
                NotificationKind::Info,
            ))
            .unwrap();
    }

    let feed = store.snapshot().notifications;
    assert_eq!(feed.len(), NOTIFICATION_CAP);
    assert_eq!(feed[0].title, "update 59");
    assert_eq!(feed[NOTIFICATION_CAP - 1].title, "update 10");
    assert!(feed.iter().all(|n| !n.read));
}

#[test]
fn mark_read_then_clear_all() {
    let (store, center) = util::memory_center();
    let PushOutcome::Stored { id } = center
        .push(NewNotification::new(
            "Payment Recorded",
            "Invoice settled",
            NotificationKind::Success,
        ))
        .unwrap()
    else {
        panic!("expected stored");
    };

    center.mark_read(&id).unwrap();
    assert!(store.snapshot().notifications[0].read);

    center.clear_all().unwrap();
    assert!(store.snapshot().notifications.is_empty());
    // Operations on a cleared feed stay no-ops.
    center.mark_read(&id).unwrap();
    assert_eq!(center.view(&id), None);
}

#[test]
fn notifications_survive_the_store_round_trip() {
    let (store, center) = util::memory_center();
    center
        .push(NewNotification::new("a", "b", NotificationKind::Warning))
        .unwrap();

    let feed = store.snapshot().notifications;
    let json = serde_json::to_string(&feed).unwrap();
    assert!(json.contains("\"type\":\"warning\""));
}
