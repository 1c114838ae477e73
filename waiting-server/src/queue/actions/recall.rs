//! Recall command handler
//!
//! Re-notifies a CALLED ticket and restarts the timer, bounded by
//! `max_call_count`.

use shared::waiting::{TransitionKind, WaitingStatus};

use crate::queue::error::{QueueError, QueueResult};
use crate::queue::traits::{TransitionContext, TransitionHandler};
use crate::store::TicketPatch;

/// Recall action
#[derive(Debug, Clone, Copy, Default)]
pub struct RecallAction;

impl TransitionHandler for RecallAction {
    fn kind(&self) -> TransitionKind {
        TransitionKind::Recall
    }

    fn plan(&self, ctx: &TransitionContext<'_>) -> QueueResult<TicketPatch> {
        if ctx.ticket.status != WaitingStatus::Called {
            return Err(ctx.invalid(self.kind()));
        }
        if ctx.ticket.called_count >= ctx.settings.max_call_count {
            return Err(QueueError::CallLimitReached {
                called_count: ctx.ticket.called_count,
                max_call_count: ctx.settings.max_call_count,
            });
        }

        let mut patch = ctx.patch();
        patch.called_count = ctx.ticket.called_count + 1;
        patch.called_at = Some(ctx.now);
        patch.call_expire_at = Some(ctx.now + ctx.settings.call_timeout_millis());
        Ok(patch)
    }
}
