//! Transition trait shared by all ticket commands

use enum_dispatch::enum_dispatch;
use shared::models::WaitingSetting;
use shared::waiting::{TransitionKind, WaitingTicket};

use crate::queue::actions::{
    CallAction, CancelAction, ExpireAction, RecallAction, RestoreAction, SeatAction,
    TransitionAction,
};
use crate::queue::error::{QueueError, QueueResult};
use crate::store::TicketPatch;

/// Everything a transition needs to decide: the ticket as loaded, the
/// venue's settings and the instant of the command
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    pub ticket: &'a WaitingTicket,
    pub settings: &'a WaitingSetting,
    pub now: i64,
}

impl<'a> TransitionContext<'a> {
    pub fn new(ticket: &'a WaitingTicket, settings: &'a WaitingSetting, now: i64) -> Self {
        Self {
            ticket,
            settings,
            now,
        }
    }

    /// Patch pre-filled with the ticket's current values
    pub fn patch(&self) -> TicketPatch {
        TicketPatch::from_ticket(self.ticket, self.now)
    }

    /// The command is not an edge from the ticket's current status
    pub fn invalid(&self, kind: TransitionKind) -> QueueError {
        QueueError::InvalidTransition {
            ticket_id: self.ticket.id.clone(),
            from: self.ticket.status,
            kind,
        }
    }
}

/// One edge (or family of edges) of the ticket state machine
///
/// Handlers are PURE: they validate and compute the new fields, the engine
/// commits them with a compare-and-swap on status and version.
#[enum_dispatch]
pub trait TransitionHandler {
    fn kind(&self) -> TransitionKind;

    fn plan(&self, ctx: &TransitionContext<'_>) -> QueueResult<TicketPatch>;
}
