//! Cancel command handler
//!
//! Cancels a WAITING or CALLED ticket with a caller-selected reason.
//! `AUTO_CANCELLED` is reserved for expiry and rejected here. The status is
//! checked first, so a terminal ticket always reports `InvalidTransition`.

use shared::waiting::{CancelReason, TransitionKind, WaitingStatus};

use crate::queue::error::{QueueError, QueueResult};
use crate::queue::traits::{TransitionContext, TransitionHandler};
use crate::store::TicketPatch;

/// Cancel action
#[derive(Debug, Clone, Copy)]
pub struct CancelAction {
    pub reason: CancelReason,
}

impl TransitionHandler for CancelAction {
    fn kind(&self) -> TransitionKind {
        TransitionKind::Cancel
    }

    fn plan(&self, ctx: &TransitionContext<'_>) -> QueueResult<TicketPatch> {
        if !ctx.ticket.status.is_active() {
            return Err(ctx.invalid(self.kind()));
        }
        if !self.reason.is_caller_selectable() {
            return Err(QueueError::InvalidCancelReason(self.reason));
        }

        let mut patch = ctx.patch();
        patch.status = WaitingStatus::Cancelled;
        patch.cancelled_at = Some(ctx.now);
        patch.cancel_reason = Some(self.reason);
        patch.call_expire_at = None;
        Ok(patch)
    }
}
