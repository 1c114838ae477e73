//! Read models

use serde::{Deserialize, Serialize};

use super::ticket::WaitingTicket;
use super::types::{OperationStatus, WaitingStatus};

/// Countdown shown to staff for a CALLED ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallCountdown {
    pub elapsed_seconds: i64,
    pub remaining_seconds: i64,
    pub overdue_seconds: i64,
    /// Overdue but recalls remain (staff attention, not terminal)
    pub overdue: bool,
}

/// A ticket with its read-time computed fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketView {
    #[serde(flatten)]
    pub ticket: WaitingTicket,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Position within the ticket's type line (WAITING only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    /// Position across all types of the venue (WAITING only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_wait_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<CallCountdown>,
}

/// Ticket counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub waiting: u32,
    pub called: u32,
    pub seated: u32,
    pub cancelled: u32,
    pub no_show: u32,
}

impl StatusCounts {
    pub fn record(&mut self, status: WaitingStatus) {
        match status {
            WaitingStatus::Waiting => self.waiting += 1,
            WaitingStatus::Called => self.called += 1,
            WaitingStatus::Seated => self.seated += 1,
            WaitingStatus::Cancelled => self.cancelled += 1,
            WaitingStatus::NoShow => self.no_show += 1,
        }
    }

    pub fn active(&self) -> u32 {
        self.waiting + self.called
    }
}

/// Staff view of a venue queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub venue_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_type_id: Option<String>,
    pub operation_status: OperationStatus,
    pub generated_at: i64,
    /// CALLED first (by call time), then WAITING by sequence
    pub tickets: Vec<TicketView>,
    /// Active counts are live; terminal counts cover the business day
    pub counts: StatusCounts,
}

/// Per-type live statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeStats {
    pub waiting_type_id: String,
    pub name: String,
    pub waiting_count: u32,
    pub called_count: u32,
    pub party_size: u32,
    /// What a party registering now would be told
    pub estimated_wait_minutes: u32,
}

/// Live queue statistics for a venue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingStats {
    pub total_waiting: u32,
    pub total_called: u32,
    pub total_party_size: u32,
    pub estimated_wait_minutes: u32,
    pub by_type: Vec<TypeStats>,
}

/// Business-day statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TodayStats {
    pub registered: u32,
    pub seated: u32,
    pub cancelled: u32,
    pub no_show: u32,
    /// Average created → seated minutes for seated tickets
    pub avg_wait_minutes: u32,
}

/// Public type listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicTypeInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub min_party_size: u32,
    pub max_party_size: u32,
    pub waiting_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_wait_minutes: Option<u32>,
}

/// Public registration page info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicWaitingInfo {
    pub venue_id: String,
    pub operation_status: OperationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_end_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting_note: Option<String>,
    pub total_waiting: u32,
    pub types: Vec<PublicTypeInfo>,
}

/// Customer-facing ticket status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicTicketStatus {
    pub ticket_id: String,
    pub sequence_number: u64,
    pub status: WaitingStatus,
    pub party_size: u32,
    pub type_name: Option<String>,
    pub position: Option<u32>,
    pub estimated_wait_minutes: Option<u32>,
    pub call_expire_at: Option<i64>,
    pub created_at: i64,
}
