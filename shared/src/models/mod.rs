//! Data models
//!
//! Shared between waiting-server and its clients (via API).
//! All IDs are `String`; timestamps are Unix milliseconds.

pub mod waiting_setting;
pub mod waiting_type;

// Re-exports
pub use waiting_setting::*;
pub use waiting_type::*;
