//! Seat command handler

use shared::waiting::{TransitionKind, WaitingStatus};

use crate::queue::error::QueueResult;
use crate::queue::traits::{TransitionContext, TransitionHandler};
use crate::store::TicketPatch;

/// Seat action - WAITING or CALLED ticket is seated (walk-up seating skips the call)
#[derive(Debug, Clone, Copy, Default)]
pub struct SeatAction;

impl TransitionHandler for SeatAction {
    fn kind(&self) -> TransitionKind {
        TransitionKind::Seat
    }

    fn plan(&self, ctx: &TransitionContext<'_>) -> QueueResult<TicketPatch> {
        if !ctx.ticket.status.is_active() {
            return Err(ctx.invalid(self.kind()));
        }

        let mut patch = ctx.patch();
        patch.status = WaitingStatus::Seated;
        patch.seated_at = Some(ctx.now);
        patch.call_expire_at = None;
        Ok(patch)
    }
}
