//! Waiting queue domain types
//!
//! - [`WaitingTicket`]: one party's entry in a venue queue
//! - [`TicketTransitioned`]: event emitted for every accepted transition
//! - [`QueueSnapshot`] / [`TicketView`]: read models with position and estimate
//! - request payloads used by staff and public endpoints

pub mod command;
pub mod event;
pub mod snapshot;
pub mod ticket;
pub mod types;

pub use command::*;
pub use event::*;
pub use snapshot::*;
pub use ticket::*;
pub use types::*;
