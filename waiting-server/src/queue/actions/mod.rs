//! Ticket transition implementations
//!
//! Each action implements [`TransitionHandler`] for one command.

use enum_dispatch::enum_dispatch;
use shared::waiting::CancelReason;

use crate::queue::traits::TransitionHandler;

mod call;
mod cancel;
mod expire;
mod recall;
mod restore;
mod seat;

pub use call::CallAction;
pub use cancel::CancelAction;
pub use expire::ExpireAction;
pub use recall::RecallAction;
pub use restore::{RESTORE_WINDOW_MS, RestoreAction};
pub use seat::SeatAction;

/// Staff/customer commands on an existing ticket
///
/// Expire is not here: only the engine issues it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketCommand {
    Call,
    Recall,
    Seat,
    Cancel(CancelReason),
    Restore,
}

/// TransitionAction enum - dispatches to concrete action implementations
///
/// Uses enum_dispatch for zero-cost static dispatch.
#[enum_dispatch(TransitionHandler)]
#[derive(Debug, Clone)]
pub enum TransitionAction {
    Call(CallAction),
    Recall(RecallAction),
    Seat(SeatAction),
    Cancel(CancelAction),
    Expire(ExpireAction),
    Restore(RestoreAction),
}

/// This is the ONLY place with a match on TicketCommand.
impl From<&TicketCommand> for TransitionAction {
    fn from(command: &TicketCommand) -> Self {
        match command {
            TicketCommand::Call => TransitionAction::Call(CallAction),
            TicketCommand::Recall => TransitionAction::Recall(RecallAction),
            TicketCommand::Seat => TransitionAction::Seat(SeatAction),
            TicketCommand::Cancel(reason) => {
                TransitionAction::Cancel(CancelAction { reason: *reason })
            }
            TicketCommand::Restore => TransitionAction::Restore(RestoreAction),
        }
    }
}
