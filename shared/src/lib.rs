//! Shared types for the waiting service
//!
//! Domain types used by the server and its clients: tickets, waiting types,
//! venue settings, transition events, read models, and the unified error system.

pub mod error;
pub mod models;
pub mod util;
pub mod waiting;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
