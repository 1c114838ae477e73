//! Transition events

use serde::{Deserialize, Serialize};

use super::ticket::WaitingTicket;
use super::types::{TransitionKind, WaitingStatus};

/// Emitted once per accepted transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketTransitioned {
    pub ticket_id: String,
    pub venue_id: String,
    pub waiting_type_id: String,
    pub kind: TransitionKind,
    /// None for registration
    pub from: Option<WaitingStatus>,
    pub to: WaitingStatus,
    pub at: i64,
    pub sequence_number: u64,
    pub called_count: u32,
    /// WAITING membership changed: positions behind this ticket moved
    pub membership_changed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl TicketTransitioned {
    pub fn new(
        kind: TransitionKind,
        from: Option<WaitingStatus>,
        ticket: &WaitingTicket,
        at: i64,
    ) -> Self {
        Self {
            ticket_id: ticket.id.clone(),
            venue_id: ticket.venue_id.clone(),
            waiting_type_id: ticket.waiting_type_id.clone(),
            kind,
            from,
            to: ticket.status,
            at,
            sequence_number: ticket.sequence_number,
            called_count: ticket.called_count,
            membership_changed: false,
            phone: ticket.phone.clone(),
        }
    }

    pub fn with_membership_changed(mut self, changed: bool) -> Self {
        self.membership_changed = changed;
        self
    }
}
