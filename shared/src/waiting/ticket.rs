//! Waiting ticket

use serde::{Deserialize, Serialize};

use super::types::{CancelReason, WaitingSource, WaitingStatus};

/// One party's entry in a venue's waiting queue
///
/// Tickets are never deleted. Terminal tickets stay for history and can be
/// restored to WAITING within a short window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingTicket {
    pub id: String,
    pub venue_id: String,
    pub waiting_type_id: String,
    /// Monotonic per venue, assigned once at creation
    pub sequence_number: u64,
    pub party_size: u32,
    pub status: WaitingStatus,
    /// Digits only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub source: WaitingSource,
    pub called_count: u32,
    pub created_at: i64,
    pub called_at: Option<i64>,
    /// Non-null only while CALLED
    pub call_expire_at: Option<i64>,
    pub seated_at: Option<i64>,
    pub cancelled_at: Option<i64>,
    pub cancel_reason: Option<CancelReason>,
    pub updated_at: i64,
    /// Optimistic lock, bumped on every write
    pub version: u64,
}

impl WaitingTicket {
    /// Timestamp the restore window is measured from
    pub fn terminal_at(&self) -> Option<i64> {
        match self.status {
            WaitingStatus::Seated => self.seated_at,
            WaitingStatus::Cancelled | WaitingStatus::NoShow => self.cancelled_at,
            WaitingStatus::Waiting | WaitingStatus::Called => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
