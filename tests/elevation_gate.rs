use opsdesk::{ChallengeOutcome, ElevationGate, NotificationKind, SwitchOutcome};

#[path = "util.rs"]
mod util;

#[tokio::test]
async fn the_documented_happy_path_commits_the_switch() {
    let (store, center) = util::memory_center();
    let (admin_id, staff_id) = util::seed_users(&store);
    store
        .mutate({
            let staff_id = staff_id.clone();
            move |state| state.current_user_id = Some(staff_id)
        })
        .unwrap();

    let mut gate = ElevationGate::new();
    assert_eq!(
        gate.request_switch(&store, &admin_id).unwrap(),
        SwitchOutcome::ChallengeOpened
    );

    let mut last = ChallengeOutcome::Pending;
    for d in ['1', '2', '3', '4'] {
        last = gate.submit_digit(&store, &center, d).await.unwrap();
    }
    assert_eq!(last, ChallengeOutcome::Verified);
    assert!(!gate.is_open());
    assert_eq!(
        store.snapshot().current_user_id.as_deref(),
        Some(admin_id.as_str())
    );

    let ack = &store.snapshot().notifications[0];
    assert_eq!(ack.kind, NotificationKind::Success);
    assert!(ack.message.contains("Dana"));
}

#[tokio::test]
async fn any_other_sequence_leaves_the_identity_alone() {
    let (store, center) = util::memory_center();
    let (admin_id, staff_id) = util::seed_users(&store);
    store
        .mutate({
            let staff_id = staff_id.clone();
            move |state| state.current_user_id = Some(staff_id)
        })
        .unwrap();

    let mut gate = ElevationGate::new();
    gate.request_switch(&store, &admin_id).unwrap();

    let mut last = ChallengeOutcome::Pending;
    for d in ['1', '2', '3', '5'] {
        last = gate.submit_digit(&store, &center, d).await.unwrap();
    }
    assert_eq!(last, ChallengeOutcome::Rejected);
    assert!(gate.is_open());
    assert_eq!(gate.input_len(), 0);
    assert!(gate.error_message().is_some());
    assert_eq!(
        store.snapshot().current_user_id.as_deref(),
        Some(staff_id.as_str())
    );
}

#[tokio::test]
async fn explicit_verify_matches_auto_submit() {
    let (store, center) = util::memory_center();
    let (admin_id, _) = util::seed_users(&store);
    store
        .mutate(|state| state.settings.admin_pin = Some("2468".into()))
        .unwrap();

    let mut gate = ElevationGate::new();
    gate.request_switch(&store, &admin_id).unwrap();
    // Three digits entered, then a confirm action instead of a fourth digit:
    // same comparison, so a short input is a rejection.
    for d in ['2', '4', '6'] {
        gate.submit_digit(&store, &center, d).await.unwrap();
    }
    assert_eq!(
        gate.verify(&store, &center).await.unwrap(),
        ChallengeOutcome::Rejected
    );

    for d in ['2', '4', '6', '8'] {
        gate.submit_digit(&store, &center, d).await.unwrap();
    }
    assert!(!gate.is_open());
    assert_eq!(
        store.snapshot().current_user_id.as_deref(),
        Some(admin_id.as_str())
    );
}

#[tokio::test]
async fn cancel_discards_the_pending_switch() {
    let (store, center) = util::memory_center();
    let (admin_id, _) = util::seed_users(&store);

    let mut gate = ElevationGate::new();
    gate.request_switch(&store, &admin_id).unwrap();
    gate.submit_digit(&store, &center, '1').await.unwrap();
    gate.cancel();

    assert!(!gate.is_open());
    assert!(gate.pending_user_id().is_none());
    assert!(store.snapshot().current_user_id.is_none());
}
