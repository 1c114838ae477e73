use super::*;

#[tokio::test]
async fn test_call_then_recall_until_limit() {
    let h = Harness::new();
    let hall = h.open().await;
    let id = h.register(&hall, 2).await.unwrap().ticket.id;

    let called = h.engine.call(&id).await.unwrap();
    assert_eq!(called.status, WaitingStatus::Called);
    assert_eq!(called.called_count, 1);
    assert_eq!(called.called_at, Some(START));
    assert_eq!(called.call_expire_at, Some(START + 3 * MIN));

    h.clock.advance_secs(60);
    let recalled = h.engine.recall(&id).await.unwrap();
    assert_eq!(recalled.called_count, 2);
    assert_eq!(recalled.call_expire_at, Some(START + 4 * MIN));

    let err = h.engine.recall(&id).await.unwrap_err();
    assert!(matches!(
        err,
        QueueError::CallLimitReached {
            called_count: 2,
            max_call_count: 2
        }
    ));
    assert_eq!(h.ticket(&id).await.called_count, 2);
}

#[tokio::test]
async fn test_invalid_transitions_leave_ticket_unchanged() {
    let h = Harness::new();
    let hall = h.open().await;
    let id = h.register(&hall, 2).await.unwrap().ticket.id;

    // WAITING: recall and restore are not edges
    let before = h.ticket(&id).await;
    for command in [TicketCommand::Recall, TicketCommand::Restore] {
        let err = h.engine.execute(&id, command).await.unwrap_err();
        assert!(matches!(err, QueueError::InvalidTransition { .. }), "{command:?}");
    }
    assert_eq!(h.ticket(&id).await, before);

    // SEATED: nothing but restore
    h.engine.seat(&id).await.unwrap();
    let seated = h.ticket(&id).await;
    for command in [
        TicketCommand::Call,
        TicketCommand::Recall,
        TicketCommand::Seat,
        TicketCommand::Cancel(CancelReason::StoreReason),
    ] {
        let err = h.engine.execute(&id, command).await.unwrap_err();
        assert!(matches!(err, QueueError::InvalidTransition { .. }), "{command:?}");
    }
    assert_eq!(h.ticket(&id).await, seated);
}

#[tokio::test]
async fn test_seat_from_waiting_and_called() {
    let h = Harness::new();
    let hall = h.open().await;
    let walk_up = h.register(&hall, 2).await.unwrap().ticket.id;
    let called = h.register(&hall, 2).await.unwrap().ticket.id;

    h.engine.call(&called).await.unwrap();
    h.clock.advance_secs(30);

    let seated = h.engine.seat(&walk_up).await.unwrap();
    assert_eq!(seated.status, WaitingStatus::Seated);
    assert_eq!(seated.seated_at, Some(START + 30 * SEC));

    let seated = h.engine.seat(&called).await.unwrap();
    assert_eq!(seated.call_expire_at, None);
    assert_eq!(seated.called_count, 1);
}

#[tokio::test]
async fn test_cancel_requires_selectable_reason() {
    let h = Harness::new();
    let hall = h.open().await;
    let id = h.register(&hall, 2).await.unwrap().ticket.id;

    let err = h
        .engine
        .cancel(&id, CancelReason::AutoCancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, QueueError::InvalidCancelReason(_)));

    let cancelled = h.engine.cancel(&id, CancelReason::OutOfStock).await.unwrap();
    assert_eq!(cancelled.status, WaitingStatus::Cancelled);
    assert_eq!(cancelled.cancel_reason, Some(CancelReason::OutOfStock));
    assert_eq!(cancelled.cancelled_at, Some(START));
}

#[tokio::test]
async fn test_restore_window_boundaries() {
    let h = Harness::new();
    let hall = h.open().await;
    let inside = h.register(&hall, 2).await.unwrap().ticket;
    let outside = h.register(&hall, 2).await.unwrap().ticket;
    h.engine.cancel(&inside.id, CancelReason::CustomerRequest).await.unwrap();
    h.engine.cancel(&outside.id, CancelReason::CustomerRequest).await.unwrap();

    h.clock.set(START + 29 * MIN + 59 * SEC);
    let restored = h.engine.restore(&inside.id).await.unwrap();
    assert_eq!(restored.status, WaitingStatus::Waiting);
    assert_eq!(restored.sequence_number, inside.sequence_number);
    assert_eq!(restored.cancelled_at, None);
    assert_eq!(restored.cancel_reason, None);

    h.clock.set(START + 30 * MIN + SEC);
    let err = h.engine.restore(&outside.id).await.unwrap_err();
    assert!(matches!(err, QueueError::RestoreWindowExpired { .. }));
    assert_eq!(h.ticket(&outside.id).await.status, WaitingStatus::Cancelled);
}

#[tokio::test]
async fn test_restored_ticket_regains_its_place() {
    let h = Harness::new();
    let hall = h.open().await;
    let first = h.register(&hall, 2).await.unwrap().ticket.id;
    let second = h.register(&hall, 2).await.unwrap().ticket.id;

    h.engine.seat(&first).await.unwrap();
    h.clock.advance_secs(60);
    h.engine.restore(&first).await.unwrap();

    let snapshot = h.engine.snapshot(VENUE, None).await.unwrap();
    let order: Vec<(&str, Option<u32>)> = snapshot
        .tickets
        .iter()
        .map(|v| (v.ticket.id.as_str(), v.position))
        .collect();
    assert_eq!(order, vec![(first.as_str(), Some(1)), (second.as_str(), Some(2))]);
}

#[tokio::test]
async fn test_restored_ticket_call_count_keeps_growing() {
    let h = Harness::new();
    let hall = h.open().await;
    let id = h.register(&hall, 2).await.unwrap().ticket.id;

    h.engine.call(&id).await.unwrap();
    h.engine.cancel(&id, CancelReason::StoreReason).await.unwrap();
    h.engine.restore(&id).await.unwrap();

    let called = h.engine.call(&id).await.unwrap();
    assert_eq!(called.called_count, 2);
}

#[tokio::test]
async fn test_unknown_ticket_and_foreign_venue() {
    let h = Harness::new();
    let hall = h.open().await;
    let id = h.register(&hall, 2).await.unwrap().ticket.id;

    let err = h.engine.call("missing").await.unwrap_err();
    assert!(matches!(err, QueueError::TicketNotFound(_)));

    let err = h
        .engine
        .execute_in_venue("venue-2", &id, TicketCommand::Call)
        .await
        .unwrap_err();
    assert!(matches!(err, QueueError::TicketNotFound(_)));
    assert_eq!(h.ticket(&id).await.status, WaitingStatus::Waiting);

    assert!(
        h.engine
            .execute_in_venue(VENUE, &id, TicketCommand::Call)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_stale_version_is_optimistic_conflict() {
    let h = Harness::new();
    let hall = h.open().await;
    let stale = h.register(&hall, 2).await.unwrap().ticket;

    // Someone else calls first
    h.engine.call(&stale.id).await.unwrap();

    let settings = h.engine.gate().settings(VENUE).await.unwrap();
    let patch = crate::queue::actions::CallAction
        .plan(&TransitionContext::new(&stale, &settings, START))
        .unwrap();
    let err = h
        .store
        .update_status(&stale.id, stale.status, stale.version, &patch)
        .await
        .unwrap_err();
    assert!(matches!(QueueError::from(err), QueueError::OptimisticConflict(_)));
    assert_eq!(h.ticket(&stale.id).await.called_count, 1);
}

#[tokio::test]
async fn test_events_flag_membership_changes() {
    let mut h = Harness::new();
    let hall = h.open().await;
    let id = h.register(&hall, 2).await.unwrap().ticket.id;
    h.engine.call(&id).await.unwrap();
    h.engine.recall(&id).await.unwrap();
    h.engine.seat(&id).await.unwrap();
    h.engine.restore(&id).await.unwrap();

    let events = h.drain_events();
    let flags: Vec<(TransitionKind, bool)> = events
        .iter()
        .map(|e| (e.kind, e.membership_changed))
        .collect();
    assert_eq!(
        flags,
        vec![
            (TransitionKind::Register, true),
            (TransitionKind::Call, true),
            (TransitionKind::Recall, false),
            (TransitionKind::Seat, false),
            (TransitionKind::Restore, true),
        ]
    );
    assert_eq!(events[1].from, Some(WaitingStatus::Waiting));
    assert_eq!(events[1].to, WaitingStatus::Called);
    assert_eq!(events[2].called_count, 2);
}

#[tokio::test]
async fn test_memo_in_any_status_without_event() {
    let mut h = Harness::new();
    let hall = h.open().await;
    let id = h.register(&hall, 2).await.unwrap().ticket.id;
    h.engine.seat(&id).await.unwrap();
    h.drain_events();

    let updated = h
        .engine
        .update_memo(VENUE, &id, Some("  window seat ".into()))
        .await
        .unwrap();
    assert_eq!(updated.memo.as_deref(), Some("window seat"));
    assert_eq!(updated.status, WaitingStatus::Seated);
    assert!(h.drain_events().is_empty());

    let cleared = h.engine.update_memo(VENUE, &id, Some(String::new())).await.unwrap();
    assert_eq!(cleared.memo, None);
}
