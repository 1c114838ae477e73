//! 存储后端一致性 - 同一场景分别跑在 MemoryStore 与 RedbStore 上

mod common;

use std::sync::Arc;

use common::{MIN, VENUE, open_venue, state_with, walk_in};
use shared::waiting::{CancelReason, WaitingStatus};
use waiting_server::ServerState;
use waiting_server::queue::ManualClock;
use waiting_server::store::{MemoryStore, RedbStore};

/// register 3 → call/seat #1 → cancel #2 → #3 called and expired
async fn run_scenario(state: &ServerState, clock: &ManualClock) {
    let type_id = open_venue(state).await;
    let engine = &state.engine;

    let mut ids = Vec::new();
    for name in ["A", "B", "C"] {
        let view = engine.register(VENUE, walk_in(&type_id, 2, name)).await.unwrap();
        ids.push(view.ticket.id);
    }

    engine.call(&ids[0]).await.unwrap();
    clock.advance_millis(MIN);
    let seated = engine.seat(&ids[0]).await.unwrap();
    assert_eq!(seated.status, WaitingStatus::Seated);
    assert_eq!(seated.version, 2);

    engine.cancel(&ids[1], CancelReason::CustomerRequest).await.unwrap();

    engine.call(&ids[2]).await.unwrap();
    engine.recall(&ids[2]).await.unwrap();
    // default timeout 3 min, max 2 calls
    clock.advance_millis(3 * MIN + 1_000);

    let snapshot = engine.snapshot(VENUE, None).await.unwrap();
    assert!(snapshot.tickets.is_empty());
    assert_eq!(snapshot.counts.seated, 1);
    assert_eq!(snapshot.counts.cancelled, 1);
    assert_eq!(snapshot.counts.no_show, 1);

    let today = engine.today_stats(VENUE).await.unwrap();
    assert_eq!(today.registered, 3);
    assert_eq!(today.avg_wait_minutes, 1);
}

#[tokio::test]
async fn memory_store_scenario() {
    let store = Arc::new(MemoryStore::new());
    let (state, clock) = state_with(store.clone(), store);
    run_scenario(&state, &clock).await;
}

#[tokio::test]
async fn redb_store_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(RedbStore::open(dir.path().join("waiting.redb")).unwrap());
    let (state, clock) = state_with(store.clone(), store);
    run_scenario(&state, &clock).await;
}

#[tokio::test]
async fn redb_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("waiting.redb");

    let (called_id, type_id) = {
        let store = Arc::new(RedbStore::open(&path).unwrap());
        let (state, _clock) = state_with(store.clone(), store);
        let type_id = open_venue(&state).await;
        let first = state
            .engine
            .register(VENUE, walk_in(&type_id, 2, "A"))
            .await
            .unwrap();
        state.engine.call(&first.ticket.id).await.unwrap();
        (first.ticket.id, type_id)
    };

    let store = Arc::new(RedbStore::open(&path).unwrap());
    let (state, _clock) = state_with(store.clone(), store);

    let snapshot = state.engine.snapshot(VENUE, None).await.unwrap();
    assert_eq!(snapshot.tickets.len(), 1);
    assert_eq!(snapshot.tickets[0].ticket.id, called_id);
    assert_eq!(snapshot.tickets[0].ticket.status, WaitingStatus::Called);

    // settings, types and the sequence counter were persisted too
    let next = state
        .engine
        .register(VENUE, walk_in(&type_id, 2, "B"))
        .await
        .unwrap();
    assert_eq!(next.ticket.sequence_number, 2);
}
