//! Waiting status and related enums

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaitingStatus {
    Waiting,
    Called,
    Seated,
    Cancelled,
    NoShow,
}

impl WaitingStatus {
    /// WAITING or CALLED: counts against `max_waiting_count`
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Waiting | Self::Called)
    }

    /// Terminal unless restored
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Called => "CALLED",
            Self::Seated => "SEATED",
            Self::Cancelled => "CANCELLED",
            Self::NoShow => "NO_SHOW",
        }
    }
}

impl fmt::Display for WaitingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a ticket left the queue without being seated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelReason {
    CustomerRequest,
    StoreReason,
    OutOfStock,
    NoShow,
    /// Set by the system when a call expires; never accepted from callers
    AutoCancelled,
}

impl CancelReason {
    pub fn is_caller_selectable(&self) -> bool {
        !matches!(self, Self::AutoCancelled)
    }
}

/// Where the registration came from (informational)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaitingSource {
    Qr,
    Tablet,
    #[default]
    Manual,
}

/// Venue operational status; gates registration only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Accepting,
    WalkIn,
    Paused,
    Closed,
}

impl OperationStatus {
    pub fn accepts_registration(&self) -> bool {
        matches!(self, Self::Accepting)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepting => "ACCEPTING",
            Self::WalkIn => "WALK_IN",
            Self::Paused => "PAUSED",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which edge of the state machine produced a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionKind {
    Register,
    Call,
    Recall,
    Seat,
    Cancel,
    Expire,
    Restore,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Call => "call",
            Self::Recall => "recall",
            Self::Seat => "seat",
            Self::Cancel => "cancel",
            Self::Expire => "expire",
            Self::Restore => "restore",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_activity() {
        assert!(WaitingStatus::Waiting.is_active());
        assert!(WaitingStatus::Called.is_active());
        assert!(WaitingStatus::Seated.is_terminal());
        assert!(WaitingStatus::Cancelled.is_terminal());
        assert!(WaitingStatus::NoShow.is_terminal());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&WaitingStatus::NoShow).unwrap(),
            "\"NO_SHOW\""
        );
        assert_eq!(
            serde_json::to_string(&OperationStatus::WalkIn).unwrap(),
            "\"WALK_IN\""
        );
        let reason: CancelReason = serde_json::from_str("\"CUSTOMER_REQUEST\"").unwrap();
        assert_eq!(reason, CancelReason::CustomerRequest);
        assert_eq!(serde_json::to_string(&WaitingSource::Qr).unwrap(), "\"QR\"");
    }

    #[test]
    fn test_only_accepting_allows_registration() {
        assert!(OperationStatus::Accepting.accepts_registration());
        assert!(!OperationStatus::WalkIn.accepts_registration());
        assert!(!OperationStatus::Paused.accepts_registration());
        assert!(!OperationStatus::Closed.accepts_registration());
    }

    #[test]
    fn test_auto_cancelled_is_system_only() {
        assert!(!CancelReason::AutoCancelled.is_caller_selectable());
        assert!(CancelReason::NoShow.is_caller_selectable());
        assert!(CancelReason::StoreReason.is_caller_selectable());
    }
}
