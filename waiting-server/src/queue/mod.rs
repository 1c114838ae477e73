//! Waiting queue domain
//!
//! # 模块结构
//!
//! ```text
//! queue/
//! ├── engine/       # QueueEngine: registration, transitions, reads
//! ├── actions/      # one TransitionHandler per command (enum_dispatch)
//! ├── traits.rs     # TransitionHandler + TransitionContext
//! ├── catalog.rs    # waiting types
//! ├── gate.rs       # settings + registration gate
//! ├── estimation.rs # positions / wait estimates (pure)
//! ├── expiry.rs     # call expiry evaluation (pure)
//! ├── stats.rs      # statistics (pure)
//! ├── cache.rs      # per-venue TTL cache
//! ├── clock.rs      # injectable time source
//! └── error.rs      # QueueError → AppError
//! ```

pub mod actions;
pub mod cache;
pub mod catalog;
pub mod clock;
pub mod engine;
pub mod error;
pub mod estimation;
pub mod expiry;
pub mod gate;
pub mod stats;
pub mod traits;

pub use actions::{TicketCommand, TransitionAction};
pub use catalog::TypeCatalog;
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{EngineConfig, QueueEngine};
pub use error::{ErrorKind, QueueError, QueueResult};
pub use gate::OperationalGate;
pub use traits::{TransitionContext, TransitionHandler};
