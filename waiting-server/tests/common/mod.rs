//! 集成测试公共工具

#![allow(dead_code)]

use std::sync::Arc;

use shared::models::OperationStatusUpdate;
use shared::waiting::{Contact, OperationStatus, RegisterTicket, WaitingSource};
use waiting_server::queue::ManualClock;
use waiting_server::store::{CatalogStore, MemoryStore, TicketStore};
use waiting_server::{Config, ServerState};

/// 2024-03-10 12:00 KST
pub const START: i64 = 1_710_039_600_000;
pub const MIN: i64 = 60_000;
pub const VENUE: &str = "venue-1";

pub fn memory_state() -> (ServerState, Arc<ManualClock>) {
    let store = Arc::new(MemoryStore::new());
    state_with(store.clone(), store)
}

pub fn state_with(
    tickets: Arc<dyn TicketStore>,
    catalog: Arc<dyn CatalogStore>,
) -> (ServerState, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START));
    let mut config = Config::default();
    config.business_timezone = chrono_tz::Asia::Seoul;
    let state = ServerState::from_parts(config, tickets, catalog, clock.clone());
    (state, clock)
}

/// ACCEPTING with the default type; returns its id
pub async fn open_venue(state: &ServerState) -> String {
    state
        .engine
        .set_operation_status(
            VENUE,
            OperationStatusUpdate {
                operation_status: OperationStatus::Accepting,
                pause_message: None,
                pause_end_time: None,
            },
        )
        .await
        .unwrap();
    state.engine.catalog().list(VENUE, false).await.unwrap()[0]
        .id
        .clone()
}

pub fn walk_in(type_id: &str, party_size: u32, name: &str) -> RegisterTicket {
    RegisterTicket {
        waiting_type_id: type_id.to_string(),
        party_size,
        contact: Contact {
            phone: None,
            name: Some(name.to_string()),
        },
        source: WaitingSource::Manual,
        memo: None,
    }
}
