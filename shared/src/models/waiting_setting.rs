//! Venue waiting settings

use serde::{Deserialize, Serialize};

use crate::waiting::OperationStatus;

pub const DEFAULT_MAX_WAITING_COUNT: u32 = 50;
pub const DEFAULT_CALL_TIMEOUT_MINUTES: u32 = 3;
pub const DEFAULT_MAX_CALL_COUNT: u32 = 2;

/// Per-venue queue settings (operational gate + call policy)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingSetting {
    pub venue_id: String,
    pub operation_status: OperationStatus,
    pub max_waiting_count: u32,
    pub call_timeout_minutes: u32,
    pub max_call_count: u32,
    pub auto_cancel_on_expiry: bool,
    pub show_estimated_time: bool,
    /// Only kept while `operation_status` is PAUSED
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_end_time: Option<i64>,
    /// Shown to customers on the registration page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_note: Option<String>,
    /// Attached to call notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_call_note: Option<String>,
    pub updated_at: i64,
}

impl WaitingSetting {
    /// Settings a venue gets before staff ever touch them: closed, 50 teams, 3 min / 2 calls.
    pub fn defaults_for(venue_id: impl Into<String>, now: i64) -> Self {
        Self {
            venue_id: venue_id.into(),
            operation_status: OperationStatus::Closed,
            max_waiting_count: DEFAULT_MAX_WAITING_COUNT,
            call_timeout_minutes: DEFAULT_CALL_TIMEOUT_MINUTES,
            max_call_count: DEFAULT_MAX_CALL_COUNT,
            auto_cancel_on_expiry: true,
            show_estimated_time: true,
            pause_message: None,
            pause_end_time: None,
            waiting_note: None,
            waiting_call_note: None,
            updated_at: now,
        }
    }

    /// Call timeout in milliseconds
    pub fn call_timeout_millis(&self) -> i64 {
        i64::from(self.call_timeout_minutes) * 60_000
    }
}

/// Update settings payload (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaitingSettingUpdate {
    pub max_waiting_count: Option<u32>,
    pub call_timeout_minutes: Option<u32>,
    pub max_call_count: Option<u32>,
    pub auto_cancel_on_expiry: Option<bool>,
    pub show_estimated_time: Option<bool>,
    pub waiting_note: Option<String>,
    pub waiting_call_note: Option<String>,
}

/// Change operation status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationStatusUpdate {
    pub operation_status: OperationStatus,
    pub pause_message: Option<String>,
    pub pause_end_time: Option<i64>,
}
