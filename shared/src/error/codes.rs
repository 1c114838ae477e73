//! Unified error codes for the waiting service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Ticket (state machine) errors
//! - 5xxx: Registration errors
//! - 6xxx: Waiting type errors
//! - 7xxx: Settings errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so staff tablets and the
/// public web page can switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 4xxx: Ticket ====================
    /// Ticket not found
    TicketNotFound = 4001,
    /// Command not allowed from the ticket's current status
    InvalidTransition = 4002,
    /// Ticket has been called the maximum number of times
    CallLimitReached = 4003,
    /// Restore attempted outside the grace window
    RestoreWindowExpired = 4004,
    /// Ticket was modified concurrently
    OptimisticConflict = 4005,
    /// Cancel reason is not allowed for this caller
    InvalidCancelReason = 4006,

    // ==================== 5xxx: Registration ====================
    /// Venue is not accepting registrations
    VenueNotAccepting = 5001,
    /// Waiting queue is full
    QueueFull = 5002,
    /// Party size outside the type's bounds
    PartySizeOutOfBounds = 5003,
    /// Phone or name is required
    ContactRequired = 5004,
    /// Phone number is malformed
    InvalidPhone = 5005,
    /// Phone number already has an active ticket
    AlreadyWaiting = 5006,

    // ==================== 6xxx: Waiting Type ====================
    /// Waiting type not found or inactive
    UnknownType = 6001,
    /// Waiting type name already exists
    WaitingTypeNameExists = 6002,
    /// Venue must keep at least one active type
    LastActiveType = 6003,
    /// Waiting type has active tickets
    WaitingTypeInUse = 6004,

    // ==================== 7xxx: Settings ====================
    /// Setting value out of the allowed range
    SettingOutOfRange = 7001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Storage corrupted (data file damaged)
    StorageCorrupted = 9403,
    /// System busy (IO error, retry later)
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidRequest => "Invalid request",

            // Ticket
            ErrorCode::TicketNotFound => "Waiting ticket not found",
            ErrorCode::InvalidTransition => "Command not allowed in the ticket's current status",
            ErrorCode::CallLimitReached => "Ticket has reached the maximum call count",
            ErrorCode::RestoreWindowExpired => "Ticket can no longer be restored",
            ErrorCode::OptimisticConflict => "Ticket was modified concurrently, refresh and retry",
            ErrorCode::InvalidCancelReason => "Cancel reason is not allowed",

            // Registration
            ErrorCode::VenueNotAccepting => "Venue is not accepting waiting registrations",
            ErrorCode::QueueFull => "Waiting queue is full",
            ErrorCode::PartySizeOutOfBounds => "Party size is outside the allowed range",
            ErrorCode::ContactRequired => "Phone number or name is required",
            ErrorCode::InvalidPhone => "Phone number is invalid",
            ErrorCode::AlreadyWaiting => "Phone number is already waiting",

            // Waiting type
            ErrorCode::UnknownType => "Waiting type not found",
            ErrorCode::WaitingTypeNameExists => "Waiting type name already exists",
            ErrorCode::LastActiveType => "At least one active waiting type is required",
            ErrorCode::WaitingTypeInUse => "Waiting type has active tickets",

            // Settings
            ErrorCode::SettingOutOfRange => "Setting value is out of range",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageCorrupted => "Storage corrupted (data file damaged)",
            ErrorCode::SystemBusy => "System busy, please retry later",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            5 => Ok(ErrorCode::InvalidRequest),

            // Ticket
            4001 => Ok(ErrorCode::TicketNotFound),
            4002 => Ok(ErrorCode::InvalidTransition),
            4003 => Ok(ErrorCode::CallLimitReached),
            4004 => Ok(ErrorCode::RestoreWindowExpired),
            4005 => Ok(ErrorCode::OptimisticConflict),
            4006 => Ok(ErrorCode::InvalidCancelReason),

            // Registration
            5001 => Ok(ErrorCode::VenueNotAccepting),
            5002 => Ok(ErrorCode::QueueFull),
            5003 => Ok(ErrorCode::PartySizeOutOfBounds),
            5004 => Ok(ErrorCode::ContactRequired),
            5005 => Ok(ErrorCode::InvalidPhone),
            5006 => Ok(ErrorCode::AlreadyWaiting),

            // Waiting type
            6001 => Ok(ErrorCode::UnknownType),
            6002 => Ok(ErrorCode::WaitingTypeNameExists),
            6003 => Ok(ErrorCode::LastActiveType),
            6004 => Ok(ErrorCode::WaitingTypeInUse),

            // Settings
            7001 => Ok(ErrorCode::SettingOutOfRange),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9403 => Ok(ErrorCode::StorageCorrupted),
            9404 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
