//! Call expiry evaluation
//!
//! Pure, on-demand replacement for a cancellation timer. Any replica can
//! evaluate a CALLED ticket at any instant and reach the same verdict:
//!
//! 1. Non-CALLED tickets (or a missing `call_expire_at`) → not overdue.
//! 2. `overdue_seconds = max(0, now - call_expire_at)`, rounded up to whole
//!    seconds so any elapsed millisecond counts as overdue.
//! 3. `should_auto_cancel = overdue && called_count >= max_call_count && auto_cancel_on_expiry`.
//!
//! An overdue ticket that still has recalls left stays CALLED; staff see it
//! flagged and decide.

use shared::models::WaitingSetting;
use shared::waiting::{CallCountdown, WaitingStatus, WaitingTicket};

/// The part of the venue settings that decides auto-cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    pub max_call_count: u32,
    pub auto_cancel_on_expiry: bool,
}

impl From<&WaitingSetting> for ExpiryPolicy {
    fn from(settings: &WaitingSetting) -> Self {
        Self {
            max_call_count: settings.max_call_count,
            auto_cancel_on_expiry: settings.auto_cancel_on_expiry,
        }
    }
}

/// Verdict for one ticket at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiryEvaluation {
    pub overdue_seconds: i64,
    pub should_auto_cancel: bool,
}

impl ExpiryEvaluation {
    pub fn is_overdue(&self) -> bool {
        self.overdue_seconds > 0
    }
}

pub fn evaluate(ticket: &WaitingTicket, policy: ExpiryPolicy, now_ms: i64) -> ExpiryEvaluation {
    let expire_at = match (ticket.status, ticket.call_expire_at) {
        (WaitingStatus::Called, Some(at)) => at,
        _ => return ExpiryEvaluation::default(),
    };

    let overdue_ms = (now_ms - expire_at).max(0);
    let overdue_seconds = (overdue_ms + 999) / 1_000;
    let should_auto_cancel = overdue_seconds > 0
        && ticket.called_count >= policy.max_call_count
        && policy.auto_cancel_on_expiry;

    ExpiryEvaluation {
        overdue_seconds,
        should_auto_cancel,
    }
}

/// Staff countdown for a CALLED ticket; `None` for any other status
pub fn countdown(ticket: &WaitingTicket, policy: ExpiryPolicy, now_ms: i64) -> Option<CallCountdown> {
    if ticket.status != WaitingStatus::Called {
        return None;
    }
    let evaluation = evaluate(ticket, policy, now_ms);
    let elapsed_seconds = ticket
        .called_at
        .map(|at| (now_ms - at).max(0) / 1_000)
        .unwrap_or(0);
    let remaining_seconds = ticket
        .call_expire_at
        .map(|at| (at - now_ms).max(0) / 1_000)
        .unwrap_or(0);

    Some(CallCountdown {
        elapsed_seconds,
        remaining_seconds,
        overdue_seconds: evaluation.overdue_seconds,
        overdue: evaluation.is_overdue() && !evaluation.should_auto_cancel,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support;

    const MIN: i64 = 60_000;

    fn policy() -> ExpiryPolicy {
        ExpiryPolicy {
            max_call_count: 2,
            auto_cancel_on_expiry: true,
        }
    }

    fn called(called_count: u32, called_at: i64) -> WaitingTicket {
        let mut t = test_support::ticket("t1", "v1", 1, 0);
        t.status = WaitingStatus::Called;
        t.called_count = called_count;
        t.called_at = Some(called_at);
        t.call_expire_at = Some(called_at + 3 * MIN);
        t
    }

    #[test]
    fn test_waiting_ticket_is_never_overdue() {
        let t = test_support::ticket("t1", "v1", 1, 0);
        assert_eq!(evaluate(&t, policy(), i64::MAX / 2), ExpiryEvaluation::default());
    }

    #[test]
    fn test_before_and_at_deadline() {
        let t = called(2, 0);
        assert!(!evaluate(&t, policy(), 3 * MIN - 1).is_overdue());
        assert!(!evaluate(&t, policy(), 3 * MIN).is_overdue());
    }

    #[test]
    fn test_first_millisecond_past_deadline_counts() {
        let t = called(2, 0);
        let eval = evaluate(&t, policy(), 3 * MIN + 1);
        assert_eq!(eval.overdue_seconds, 1);
        assert!(eval.should_auto_cancel);
    }

    #[test]
    fn test_overdue_with_recalls_left_is_informational() {
        let t = called(1, 0);
        let eval = evaluate(&t, policy(), 3 * MIN + 90_000);
        assert_eq!(eval.overdue_seconds, 90);
        assert!(!eval.should_auto_cancel);
    }

    #[test]
    fn test_auto_cancel_disabled() {
        let t = called(2, 0);
        let p = ExpiryPolicy {
            auto_cancel_on_expiry: false,
            ..policy()
        };
        let eval = evaluate(&t, p, 10 * MIN);
        assert!(eval.is_overdue());
        assert!(!eval.should_auto_cancel);
    }

    #[test]
    fn test_called_count_above_limit_still_cancels() {
        // Limit lowered by staff after the ticket was recalled
        let t = called(3, 0);
        assert!(evaluate(&t, policy(), 4 * MIN).should_auto_cancel);
    }

    #[test]
    fn test_countdown() {
        let t = called(1, 1_000);
        let c = countdown(&t, policy(), 1_000 + 60_000).unwrap();
        assert_eq!(c.elapsed_seconds, 60);
        assert_eq!(c.remaining_seconds, 120);
        assert_eq!(c.overdue_seconds, 0);
        assert!(!c.overdue);

        let c = countdown(&t, policy(), 1_000 + 4 * MIN).unwrap();
        assert_eq!(c.remaining_seconds, 0);
        assert_eq!(c.overdue_seconds, 60);
        assert!(c.overdue);

        let waiting = test_support::ticket("t2", "v1", 2, 0);
        assert!(countdown(&waiting, policy(), 0).is_none());
    }
}
