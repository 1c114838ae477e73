//! Call command handler
//!
//! Calls a WAITING ticket to the entrance and starts its call timer.

use shared::waiting::{TransitionKind, WaitingStatus};

use crate::queue::error::QueueResult;
use crate::queue::traits::{TransitionContext, TransitionHandler};
use crate::store::TicketPatch;

/// Call action
#[derive(Debug, Clone, Copy, Default)]
pub struct CallAction;

impl TransitionHandler for CallAction {
    fn kind(&self) -> TransitionKind {
        TransitionKind::Call
    }

    fn plan(&self, ctx: &TransitionContext<'_>) -> QueueResult<TicketPatch> {
        if ctx.ticket.status != WaitingStatus::Waiting {
            return Err(ctx.invalid(self.kind()));
        }

        let mut patch = ctx.patch();
        patch.status = WaitingStatus::Called;
        // A restored ticket keeps its history, so the counter only ever grows
        patch.called_count = ctx.ticket.called_count + 1;
        patch.called_at = Some(ctx.now);
        patch.call_expire_at = Some(ctx.now + ctx.settings.call_timeout_millis());
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::actions::test_support::{MIN, NOW, settings, ticket_in};

    #[test]
    fn test_call_waiting_ticket() {
        let ticket = ticket_in(WaitingStatus::Waiting);
        let settings = settings();
        let patch = CallAction
            .plan(&TransitionContext::new(&ticket, &settings, NOW))
            .unwrap();

        assert_eq!(patch.status, WaitingStatus::Called);
        assert_eq!(patch.called_count, 1);
        assert_eq!(patch.called_at, Some(NOW));
        assert_eq!(patch.call_expire_at, Some(NOW + 3 * MIN));
        assert_eq!(patch.updated_at, NOW);
    }

    #[test]
    fn test_call_uses_venue_timeout() {
        let ticket = ticket_in(WaitingStatus::Waiting);
        let mut settings = settings();
        settings.call_timeout_minutes = 10;
        let patch = CallAction
            .plan(&TransitionContext::new(&ticket, &settings, NOW))
            .unwrap();
        assert_eq!(patch.call_expire_at, Some(NOW + 10 * MIN));
    }

    #[test]
    fn test_call_restored_ticket_keeps_counting() {
        let mut ticket = ticket_in(WaitingStatus::Waiting);
        ticket.called_count = 2;
        let settings = settings();
        let patch = CallAction
            .plan(&TransitionContext::new(&ticket, &settings, NOW))
            .unwrap();
        assert_eq!(patch.called_count, 3);
    }
}
