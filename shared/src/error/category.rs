//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// - 0xxx: General errors
/// - 4xxx: Ticket errors
/// - 5xxx: Registration errors
/// - 6xxx: Waiting type errors
/// - 7xxx: Settings errors
/// - 9xxx: System errors (anything unassigned falls here too)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Ticket errors (4xxx)
    Ticket,
    /// Registration errors (5xxx)
    Registration,
    /// Waiting type errors (6xxx)
    WaitingType,
    /// Settings errors (7xxx)
    Setting,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            4000..5000 => Self::Ticket,
            5000..6000 => Self::Registration,
            6000..7000 => Self::WaitingType,
            7000..8000 => Self::Setting,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Ticket => "ticket",
            Self::Registration => "registration",
            Self::WaitingType => "waiting_type",
            Self::Setting => "setting",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
