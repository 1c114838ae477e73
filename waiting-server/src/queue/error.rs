use crate::store::StoreError;
use shared::error::{AppError, ErrorCode};
use shared::waiting::{CancelReason, OperationStatus, TransitionKind, WaitingStatus};
use thiserror::Error;

/// How a caller should react to a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fix the input and resubmit
    Validation,
    /// Refresh state, then retry
    StateConflict,
    /// Show the message to the user, do not retry automatically
    Capacity,
    NotFound,
    Internal,
}

/// Queue engine errors
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Storage error: {0}")]
    Storage(#[source] StoreError),

    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    #[error("Cannot {kind} ticket {ticket_id} from {from}")]
    InvalidTransition {
        ticket_id: String,
        from: WaitingStatus,
        kind: TransitionKind,
    },

    #[error("Call limit reached ({called_count}/{max_call_count})")]
    CallLimitReached {
        called_count: u32,
        max_call_count: u32,
    },

    #[error("Restore window expired ({elapsed_seconds}s elapsed, window {window_seconds}s)")]
    RestoreWindowExpired {
        elapsed_seconds: i64,
        window_seconds: i64,
    },

    #[error("Ticket {0} was modified concurrently")]
    OptimisticConflict(String),

    #[error("Cancel reason not allowed: {0:?}")]
    InvalidCancelReason(CancelReason),

    #[error("Venue is not accepting registrations ({status})")]
    VenueNotAccepting {
        status: OperationStatus,
        pause_message: Option<String>,
        pause_end_time: Option<i64>,
    },

    #[error("Queue is full ({active}/{max})")]
    QueueFull { active: u32, max: u32 },

    #[error("Party size {party_size} outside {min}..={max}")]
    PartySizeOutOfBounds { party_size: u32, min: u32, max: u32 },

    #[error("Phone number or name is required")]
    ContactRequired,

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Phone number already has active ticket {0}")]
    AlreadyWaiting(String),

    #[error("Unknown waiting type: {0}")]
    UnknownType(String),

    #[error("Waiting type name already exists: {0}")]
    TypeNameExists(String),

    #[error("At least one active waiting type is required")]
    LastActiveType,

    #[error("Waiting type has {0} active ticket(s)")]
    TypeInUse(usize),

    #[error("{field} must be between {min} and {max}")]
    SettingOutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
    },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl QueueError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PartySizeOutOfBounds { .. }
            | Self::UnknownType(_)
            | Self::ContactRequired
            | Self::InvalidPhone(_)
            | Self::InvalidCancelReason(_)
            | Self::TypeNameExists(_)
            | Self::LastActiveType
            | Self::TypeInUse(_)
            | Self::SettingOutOfRange { .. }
            | Self::Validation(_) => ErrorKind::Validation,
            Self::InvalidTransition { .. }
            | Self::CallLimitReached { .. }
            | Self::RestoreWindowExpired { .. }
            | Self::OptimisticConflict(_)
            | Self::AlreadyWaiting(_) => ErrorKind::StateConflict,
            Self::QueueFull { .. } | Self::VenueNotAccepting { .. } => ErrorKind::Capacity,
            Self::TicketNotFound(_) => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for QueueError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { ticket_id, .. } => QueueError::OptimisticConflict(ticket_id),
            StoreError::TicketNotFound(id) => QueueError::TicketNotFound(id),
            other => QueueError::Storage(other),
        }
    }
}

pub type QueueResult<T> = Result<T, QueueError>;

/// 将存储错误转换为错误码
fn classify_storage_error(e: &StoreError) -> ErrorCode {
    if let StoreError::Serialization(_) = e {
        return ErrorCode::InternalError;
    }

    // redb 错误通过字符串匹配分类
    let err_str = e.to_string().to_lowercase();
    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::StorageCorrupted;
    }

    ErrorCode::SystemBusy
}

impl From<QueueError> for AppError {
    fn from(err: QueueError) -> Self {
        let message = err.to_string();
        match err {
            QueueError::Storage(e) => {
                let code = classify_storage_error(&e);
                tracing::error!(error = %e, error_code = %code, "Storage error occurred");
                AppError::with_message(code, message)
            }
            QueueError::TicketNotFound(id) => {
                AppError::with_message(ErrorCode::TicketNotFound, message).with_detail("ticket_id", id)
            }
            QueueError::InvalidTransition {
                ticket_id,
                from,
                kind,
            } => AppError::with_message(ErrorCode::InvalidTransition, message)
                .with_detail("ticket_id", ticket_id)
                .with_detail("status", from.as_str())
                .with_detail("command", kind.as_str()),
            QueueError::CallLimitReached {
                called_count,
                max_call_count,
            } => AppError::with_message(ErrorCode::CallLimitReached, message)
                .with_detail("called_count", called_count)
                .with_detail("max_call_count", max_call_count),
            QueueError::RestoreWindowExpired {
                elapsed_seconds,
                window_seconds,
            } => AppError::with_message(ErrorCode::RestoreWindowExpired, message)
                .with_detail("elapsed_seconds", elapsed_seconds)
                .with_detail("window_seconds", window_seconds),
            QueueError::OptimisticConflict(id) => {
                AppError::with_message(ErrorCode::OptimisticConflict, message)
                    .with_detail("ticket_id", id)
            }
            QueueError::InvalidCancelReason(_) => {
                AppError::with_message(ErrorCode::InvalidCancelReason, message)
            }
            QueueError::VenueNotAccepting {
                status,
                pause_message,
                pause_end_time,
            } => {
                let text = match status {
                    OperationStatus::WalkIn => {
                        "Walk-in only, please come to the counter directly".to_string()
                    }
                    OperationStatus::Paused => pause_message
                        .unwrap_or_else(|| "Waiting registration is paused".to_string()),
                    _ => ErrorCode::VenueNotAccepting.message().to_string(),
                };
                let mut app = AppError::with_message(ErrorCode::VenueNotAccepting, text)
                    .with_detail("operation_status", status.as_str());
                if let Some(end) = pause_end_time {
                    app = app.with_detail("pause_end_time", end);
                }
                app
            }
            QueueError::QueueFull { active, max } => {
                AppError::with_message(ErrorCode::QueueFull, message)
                    .with_detail("active", active)
                    .with_detail("max_waiting_count", max)
            }
            QueueError::PartySizeOutOfBounds { min, max, .. } => {
                AppError::with_message(ErrorCode::PartySizeOutOfBounds, message)
                    .with_detail("min_party_size", min)
                    .with_detail("max_party_size", max)
            }
            QueueError::ContactRequired => AppError::new(ErrorCode::ContactRequired),
            QueueError::InvalidPhone(_) => AppError::with_message(ErrorCode::InvalidPhone, message),
            QueueError::AlreadyWaiting(id) => {
                AppError::with_message(ErrorCode::AlreadyWaiting, ErrorCode::AlreadyWaiting.message())
                    .with_detail("ticket_id", id)
            }
            QueueError::UnknownType(id) => {
                AppError::with_message(ErrorCode::UnknownType, message)
                    .with_detail("waiting_type_id", id)
            }
            QueueError::TypeNameExists(_) => {
                AppError::with_message(ErrorCode::WaitingTypeNameExists, message)
            }
            QueueError::LastActiveType => AppError::new(ErrorCode::LastActiveType),
            QueueError::TypeInUse(count) => {
                AppError::with_message(ErrorCode::WaitingTypeInUse, message)
                    .with_detail("active_tickets", count)
            }
            QueueError::SettingOutOfRange { field, .. } => {
                AppError::with_message(ErrorCode::SettingOutOfRange, message)
                    .with_detail("field", field)
            }
            QueueError::Validation(_) => AppError::with_message(ErrorCode::ValidationFailed, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_follow_caller_reaction() {
        assert_eq!(
            QueueError::PartySizeOutOfBounds {
                party_size: 9,
                min: 1,
                max: 4
            }
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(QueueError::UnknownType("x".into()).kind(), ErrorKind::Validation);
        assert_eq!(
            QueueError::OptimisticConflict("t".into()).kind(),
            ErrorKind::StateConflict
        );
        assert_eq!(
            QueueError::CallLimitReached {
                called_count: 2,
                max_call_count: 2
            }
            .kind(),
            ErrorKind::StateConflict
        );
        assert_eq!(QueueError::QueueFull { active: 5, max: 5 }.kind(), ErrorKind::Capacity);
    }

    #[test]
    fn test_store_conflict_becomes_optimistic_conflict() {
        let err: QueueError = StoreError::Conflict {
            ticket_id: "t1".into(),
            expected: WaitingStatus::Waiting,
            expected_version: 0,
            actual: WaitingStatus::Called,
            actual_version: 1,
        }
        .into();
        assert!(matches!(err, QueueError::OptimisticConflict(id) if id == "t1"));

        let err: QueueError = StoreError::TicketNotFound("t2".into()).into();
        assert!(matches!(err, QueueError::TicketNotFound(id) if id == "t2"));
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = QueueError::InvalidTransition {
            ticket_id: "t1".into(),
            from: WaitingStatus::Seated,
            kind: TransitionKind::Call,
        }
        .into();
        assert_eq!(app.code, ErrorCode::InvalidTransition);
        let details = app.details.unwrap();
        assert_eq!(details.get("status").unwrap(), "SEATED");
        assert_eq!(details.get("command").unwrap(), "call");

        let app: AppError = QueueError::VenueNotAccepting {
            status: OperationStatus::Paused,
            pause_message: Some("Back at 6pm".into()),
            pause_end_time: Some(1_000),
        }
        .into();
        assert_eq!(app.code, ErrorCode::VenueNotAccepting);
        assert_eq!(app.message, "Back at 6pm");

        let app: AppError = QueueError::QueueFull { active: 3, max: 3 }.into();
        assert_eq!(app.code, ErrorCode::QueueFull);
    }
}
