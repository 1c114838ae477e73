use super::*;
use crate::notify::BroadcastGateway;
use crate::queue::clock::ManualClock;
use crate::store::MemoryStore;
use shared::models::WaitingTypeCreate;
use tokio::sync::broadcast;

/// 2024-03-10 12:00 KST
const START: i64 = 1_710_039_600_000;
const SEC: i64 = 1_000;
const MIN: i64 = 60 * SEC;

struct Harness {
    engine: QueueEngine,
    clock: Arc<ManualClock>,
    store: Arc<MemoryStore>,
    events: broadcast::Receiver<TicketTransitioned>,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(START));
        let gateway = BroadcastGateway::new(256);
        let events = gateway.subscribe();
        let engine = QueueEngine::new(
            store.clone(),
            store.clone(),
            Arc::new(gateway),
            clock.clone(),
            EngineConfig {
                cache_ttl: Duration::ZERO,
                timezone: chrono_tz::Asia::Seoul,
            },
        );
        Self {
            engine,
            clock,
            store,
            events,
        }
    }

    /// ACCEPTING with the default "Hall" type (1-10 people, 10 min/team)
    async fn open(&self) -> String {
        self.set_status(OperationStatus::Accepting).await;
        self.engine.catalog().list(VENUE, false).await.unwrap()[0].id.clone()
    }

    async fn set_status(&self, status: OperationStatus) {
        self.engine
            .set_operation_status(
                VENUE,
                OperationStatusUpdate {
                    operation_status: status,
                    pause_message: None,
                    pause_end_time: None,
                },
            )
            .await
            .unwrap();
    }

    async fn add_type(&self, name: &str, min: u32, max: u32, avg: u32) -> String {
        self.engine
            .catalog()
            .create(
                VENUE,
                WaitingTypeCreate {
                    name: name.to_string(),
                    description: None,
                    avg_wait_minutes_per_team: Some(avg),
                    min_party_size: Some(min),
                    max_party_size: Some(max),
                },
            )
            .await
            .unwrap()
            .id
    }

    async fn register(&self, type_id: &str, party_size: u32) -> QueueResult<TicketView> {
        self.engine
            .register(VENUE, registration(type_id, party_size, None))
            .await
    }

    async fn register_phone(&self, type_id: &str, phone: &str) -> QueueResult<TicketView> {
        self.engine
            .register(VENUE, registration(type_id, 2, Some(phone)))
            .await
    }

    async fn ticket(&self, id: &str) -> WaitingTicket {
        self.store.get_by_id(id).await.unwrap().unwrap()
    }

    async fn set_settings(&self, update: shared::models::WaitingSettingUpdate) {
        self.engine.gate().update_settings(VENUE, update).await.unwrap();
    }

    /// Drain published events
    fn drain_events(&mut self) -> Vec<TicketTransitioned> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

const VENUE: &str = "venue-1";

fn registration(type_id: &str, party_size: u32, phone: Option<&str>) -> RegisterTicket {
    RegisterTicket {
        waiting_type_id: type_id.to_string(),
        party_size,
        contact: Contact {
            phone: phone.map(str::to_string),
            name: Some("Kim".to_string()),
        },
        source: WaitingSource::Manual,
        memo: None,
    }
}

mod test_transitions;
