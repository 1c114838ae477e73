//! Operational gate
//!
//! Venue settings and the registration gate. `operation_status` gates new
//! registrations only: tickets already in line keep being called, seated and
//! cancelled whatever the status.

use std::sync::Arc;
use std::time::Duration;

use shared::models::{OperationStatusUpdate, WaitingSetting, WaitingSettingUpdate};
use shared::waiting::OperationStatus;

use crate::queue::cache::TtlCache;
use crate::queue::clock::Clock;
use crate::queue::error::{QueueError, QueueResult};
use crate::store::CatalogStore;

const MAX_WAITING_COUNT_RANGE: (u32, u32) = (1, 999);
const CALL_TIMEOUT_MINUTES_RANGE: (u32, u32) = (1, 30);
const MAX_CALL_COUNT_RANGE: (u32, u32) = (1, 5);

pub struct OperationalGate {
    store: Arc<dyn CatalogStore>,
    clock: Arc<dyn Clock>,
    cache: TtlCache<WaitingSetting>,
}

impl std::fmt::Debug for OperationalGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationalGate").finish_non_exhaustive()
    }
}

impl OperationalGate {
    pub fn new(store: Arc<dyn CatalogStore>, clock: Arc<dyn Clock>, cache_ttl: Duration) -> Self {
        Self {
            store,
            clock,
            cache: TtlCache::new(cache_ttl),
        }
    }

    /// Stored settings, or the defaults for a venue that never saved any
    /// (defaults are not written back)
    pub async fn settings(&self, venue_id: &str) -> QueueResult<WaitingSetting> {
        if let Some(settings) = self.cache.get(venue_id) {
            return Ok(settings);
        }
        let settings = match self.store.get_settings(venue_id).await? {
            Some(settings) => settings,
            None => WaitingSetting::defaults_for(venue_id, self.clock.now_millis()),
        };
        self.cache.insert(venue_id, settings.clone());
        Ok(settings)
    }

    /// Registration gate: status first, then capacity
    pub fn check_registration(settings: &WaitingSetting, active_count: usize) -> QueueResult<()> {
        if !settings.operation_status.accepts_registration() {
            return Err(QueueError::VenueNotAccepting {
                status: settings.operation_status,
                pause_message: settings.pause_message.clone(),
                pause_end_time: settings.pause_end_time,
            });
        }
        let active = u32::try_from(active_count).unwrap_or(u32::MAX);
        if active >= settings.max_waiting_count {
            return Err(QueueError::QueueFull {
                active,
                max: settings.max_waiting_count,
            });
        }
        Ok(())
    }

    pub async fn update_settings(
        &self,
        venue_id: &str,
        update: WaitingSettingUpdate,
    ) -> QueueResult<WaitingSetting> {
        let mut settings = self.load(venue_id).await?;

        if let Some(value) = update.max_waiting_count {
            settings.max_waiting_count = in_range("max_waiting_count", value, MAX_WAITING_COUNT_RANGE)?;
        }
        if let Some(value) = update.call_timeout_minutes {
            settings.call_timeout_minutes =
                in_range("call_timeout_minutes", value, CALL_TIMEOUT_MINUTES_RANGE)?;
        }
        if let Some(value) = update.max_call_count {
            settings.max_call_count = in_range("max_call_count", value, MAX_CALL_COUNT_RANGE)?;
        }
        if let Some(value) = update.auto_cancel_on_expiry {
            settings.auto_cancel_on_expiry = value;
        }
        if let Some(value) = update.show_estimated_time {
            settings.show_estimated_time = value;
        }
        if update.waiting_note.is_some() {
            settings.waiting_note = non_blank(update.waiting_note);
        }
        if update.waiting_call_note.is_some() {
            settings.waiting_call_note = non_blank(update.waiting_call_note);
        }

        self.save(settings).await
    }

    /// Pause message and end time only survive while PAUSED
    pub async fn set_operation_status(
        &self,
        venue_id: &str,
        update: OperationStatusUpdate,
    ) -> QueueResult<WaitingSetting> {
        let mut settings = self.load(venue_id).await?;
        let previous = settings.operation_status;

        settings.operation_status = update.operation_status;
        if update.operation_status == OperationStatus::Paused {
            settings.pause_message = non_blank(update.pause_message);
            settings.pause_end_time = update.pause_end_time;
        } else {
            settings.pause_message = None;
            settings.pause_end_time = None;
        }

        let settings = self.save(settings).await?;
        tracing::info!(
            venue_id,
            from = %previous,
            to = %settings.operation_status,
            "Operation status changed"
        );
        Ok(settings)
    }

    pub fn invalidate(&self, venue_id: &str) {
        self.cache.invalidate(venue_id);
    }

    async fn load(&self, venue_id: &str) -> QueueResult<WaitingSetting> {
        self.invalidate(venue_id);
        self.settings(venue_id).await
    }

    async fn save(&self, mut settings: WaitingSetting) -> QueueResult<WaitingSetting> {
        settings.updated_at = self.clock.now_millis();
        self.store.put_settings(&settings).await?;
        self.invalidate(&settings.venue_id);
        Ok(settings)
    }
}

fn in_range(field: &'static str, value: u32, (min, max): (u32, u32)) -> QueueResult<u32> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(QueueError::SettingOutOfRange { field, min, max })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
