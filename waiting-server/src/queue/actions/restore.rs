//! Restore command handler
//!
//! Returns a SEATED, CANCELLED or NO_SHOW ticket to WAITING within
//! [`RESTORE_WINDOW_MS`] of its terminal timestamp. The ticket keeps its
//! sequence number and therefore its original place in line.

use shared::waiting::{TransitionKind, WaitingStatus};

use crate::queue::error::{QueueError, QueueResult};
use crate::queue::traits::{TransitionContext, TransitionHandler};
use crate::store::TicketPatch;

/// 30 minutes, inclusive
pub const RESTORE_WINDOW_MS: i64 = 30 * 60_000;

/// Restore action
#[derive(Debug, Clone, Copy, Default)]
pub struct RestoreAction;

impl TransitionHandler for RestoreAction {
    fn kind(&self) -> TransitionKind {
        TransitionKind::Restore
    }

    fn plan(&self, ctx: &TransitionContext<'_>) -> QueueResult<TicketPatch> {
        if !ctx.ticket.status.is_terminal() {
            return Err(ctx.invalid(self.kind()));
        }
        // A terminal ticket without its timestamp is treated as outside the window
        let terminal_at = ctx.ticket.terminal_at().unwrap_or(i64::MIN / 2);
        let elapsed = ctx.now - terminal_at;
        if elapsed > RESTORE_WINDOW_MS {
            return Err(QueueError::RestoreWindowExpired {
                elapsed_seconds: elapsed / 1_000,
                window_seconds: RESTORE_WINDOW_MS / 1_000,
            });
        }

        let mut patch = ctx.patch();
        patch.status = WaitingStatus::Waiting;
        patch.seated_at = None;
        patch.cancelled_at = None;
        patch.cancel_reason = None;
        patch.call_expire_at = None;
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::actions::test_support::{MIN, NOW, settings, ticket_in};
    use shared::waiting::CancelReason;

    #[test]
    fn test_restore_cancelled_within_window() {
        let mut ticket = ticket_in(WaitingStatus::Cancelled);
        ticket.cancelled_at = Some(NOW - 29 * MIN);
        ticket.cancel_reason = Some(CancelReason::CustomerRequest);
        let settings = settings();
        let patch = RestoreAction
            .plan(&TransitionContext::new(&ticket, &settings, NOW))
            .unwrap();

        assert_eq!(patch.status, WaitingStatus::Waiting);
        assert_eq!(patch.cancelled_at, None);
        assert_eq!(patch.cancel_reason, None);
    }

    #[test]
    fn test_restore_window_boundary_inclusive() {
        let mut ticket = ticket_in(WaitingStatus::Seated);
        ticket.seated_at = Some(NOW - RESTORE_WINDOW_MS);
        let settings = settings();
        assert!(
            RestoreAction
                .plan(&TransitionContext::new(&ticket, &settings, NOW))
                .is_ok()
        );

        let err = RestoreAction
            .plan(&TransitionContext::new(&ticket, &settings, NOW + 1))
            .unwrap_err();
        assert!(matches!(
            err,
            QueueError::RestoreWindowExpired {
                window_seconds: 1800,
                ..
            }
        ));
    }

    #[test]
    fn test_restore_no_show_keeps_call_history() {
        let mut ticket = ticket_in(WaitingStatus::NoShow);
        ticket.called_count = 2;
        ticket.called_at = Some(NOW - 10 * MIN);
        ticket.cancelled_at = Some(NOW - 7 * MIN);
        ticket.cancel_reason = Some(CancelReason::AutoCancelled);
        let settings = settings();
        let patch = RestoreAction
            .plan(&TransitionContext::new(&ticket, &settings, NOW))
            .unwrap();
        assert_eq!(patch.called_count, 2);
        assert_eq!(patch.called_at, Some(NOW - 10 * MIN));
    }

    #[test]
    fn test_restore_active_ticket_rejected() {
        let ticket = ticket_in(WaitingStatus::Waiting);
        let settings = settings();
        let err = RestoreAction
            .plan(&TransitionContext::new(&ticket, &settings, NOW))
            .unwrap_err();
        assert!(matches!(err, QueueError::InvalidTransition { .. }));
    }
}
