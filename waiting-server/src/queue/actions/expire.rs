//! Expire handler
//!
//! Engine-issued only: an overdue CALLED ticket whose recalls are used up
//! becomes NO_SHOW. The cancellation instant is the expiry instant, not
//! the moment somebody happened to look.

use shared::waiting::{CancelReason, TransitionKind, WaitingStatus};

use crate::queue::error::QueueResult;
use crate::queue::expiry::{self, ExpiryPolicy};
use crate::queue::traits::{TransitionContext, TransitionHandler};
use crate::store::TicketPatch;

/// Expire action
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpireAction;

impl TransitionHandler for ExpireAction {
    fn kind(&self) -> TransitionKind {
        TransitionKind::Expire
    }

    fn plan(&self, ctx: &TransitionContext<'_>) -> QueueResult<TicketPatch> {
        let evaluation = expiry::evaluate(ctx.ticket, ExpiryPolicy::from(ctx.settings), ctx.now);
        if !evaluation.should_auto_cancel {
            return Err(ctx.invalid(self.kind()));
        }

        let mut patch = ctx.patch();
        patch.status = WaitingStatus::NoShow;
        patch.cancel_reason = Some(CancelReason::AutoCancelled);
        patch.cancelled_at = ctx.ticket.call_expire_at.or(Some(ctx.now));
        patch.call_expire_at = None;
        Ok(patch)
    }
}
