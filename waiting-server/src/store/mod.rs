//! Ticket and catalog persistence
//!
//! The engine only talks to the [`TicketStore`] and [`CatalogStore`] traits.
//! Two implementations ship with the server:
//!
//! | Backend | Type | Use |
//! |---------|------|-----|
//! | redb | [`RedbStore`] | durable single-node deployment |
//! | memory | [`MemoryStore`] | tests, demos |

pub mod memory;
pub mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use async_trait::async_trait;
use shared::models::{WaitingSetting, WaitingType};
use shared::waiting::{CancelReason, WaitingStatus, WaitingTicket};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    #[error("Ticket already exists: {0}")]
    DuplicateTicket(String),

    #[error(
        "Ticket {ticket_id} changed concurrently: expected {expected} v{expected_version}, found {actual} v{actual_version}"
    )]
    Conflict {
        ticket_id: String,
        expected: WaitingStatus,
        expected_version: u64,
        actual: WaitingStatus,
        actual_version: u64,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fields a transition writes. Everything else on the ticket is immutable
/// after creation (memo has its own write path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketPatch {
    pub status: WaitingStatus,
    pub called_count: u32,
    pub called_at: Option<i64>,
    pub call_expire_at: Option<i64>,
    pub seated_at: Option<i64>,
    pub cancelled_at: Option<i64>,
    pub cancel_reason: Option<CancelReason>,
    pub updated_at: i64,
}

impl TicketPatch {
    /// Start from the ticket's current values
    pub fn from_ticket(ticket: &WaitingTicket, now: i64) -> Self {
        Self {
            status: ticket.status,
            called_count: ticket.called_count,
            called_at: ticket.called_at,
            call_expire_at: ticket.call_expire_at,
            seated_at: ticket.seated_at,
            cancelled_at: ticket.cancelled_at,
            cancel_reason: ticket.cancel_reason,
            updated_at: now,
        }
    }

    pub fn apply_to(&self, ticket: &mut WaitingTicket) {
        ticket.status = self.status;
        ticket.called_count = self.called_count;
        ticket.called_at = self.called_at;
        ticket.call_expire_at = self.call_expire_at;
        ticket.seated_at = self.seated_at;
        ticket.cancelled_at = self.cancelled_at;
        ticket.cancel_reason = self.cancel_reason;
        ticket.updated_at = self.updated_at;
        ticket.version += 1;
    }
}

/// Compare-and-swap shared by both backends
pub(crate) fn apply_checked(
    ticket: &mut WaitingTicket,
    expected: WaitingStatus,
    expected_version: u64,
    patch: &TicketPatch,
) -> StoreResult<()> {
    if ticket.status != expected || ticket.version != expected_version {
        return Err(StoreError::Conflict {
            ticket_id: ticket.id.clone(),
            expected,
            expected_version,
            actual: ticket.status,
            actual_version: ticket.version,
        });
    }
    patch.apply_to(ticket);
    Ok(())
}

/// Durable per-venue ticket collection
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Increment and return the venue's sequence counter (first value is 1)
    async fn next_sequence(&self, venue_id: &str) -> StoreResult<u64>;

    async fn create(&self, ticket: &WaitingTicket) -> StoreResult<()>;

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<WaitingTicket>>;

    /// WAITING and CALLED tickets ordered by sequence number
    async fn list_active_by_venue(&self, venue_id: &str) -> StoreResult<Vec<WaitingTicket>>;

    /// Tickets created at or after `since`, ordered by sequence number
    async fn list_by_venue_since(
        &self,
        venue_id: &str,
        since: i64,
    ) -> StoreResult<Vec<WaitingTicket>>;

    /// Active (WAITING/CALLED) tickets of the type
    async fn count_by_type(&self, venue_id: &str, type_id: &str) -> StoreResult<usize>;

    /// Whether any ticket (any status, any time) references the type
    async fn has_tickets_for_type(&self, venue_id: &str, type_id: &str) -> StoreResult<bool>;

    /// Apply `patch` only if the ticket is still `expected` at `expected_version`
    async fn update_status(
        &self,
        id: &str,
        expected: WaitingStatus,
        expected_version: u64,
        patch: &TicketPatch,
    ) -> StoreResult<WaitingTicket>;

    async fn update_memo(
        &self,
        id: &str,
        memo: Option<String>,
        now: i64,
    ) -> StoreResult<WaitingTicket>;
}

/// Waiting types and venue settings
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All types of the venue (active and inactive) ordered by sort order
    async fn list_types(&self, venue_id: &str) -> StoreResult<Vec<WaitingType>>;

    /// Insert or replace several types in one write
    async fn put_types(&self, types: &[WaitingType]) -> StoreResult<()>;

    /// Returns false when nothing was removed
    async fn delete_type(&self, venue_id: &str, type_id: &str) -> StoreResult<bool>;

    async fn get_settings(&self, venue_id: &str) -> StoreResult<Option<WaitingSetting>>;

    async fn put_settings(&self, settings: &WaitingSetting) -> StoreResult<()>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_checked_bumps_version() {
        let mut t = test_support::ticket("t1", "v1", 1, 0);
        let mut patch = TicketPatch::from_ticket(&t, 10);
        patch.status = WaitingStatus::Called;
        patch.called_count = 1;

        apply_checked(&mut t, WaitingStatus::Waiting, 0, &patch).unwrap();
        assert_eq!(t.status, WaitingStatus::Called);
        assert_eq!(t.version, 1);
        assert_eq!(t.updated_at, 10);
    }

    #[test]
    fn test_apply_checked_rejects_stale_version() {
        let mut t = test_support::ticket("t1", "v1", 1, 0);
        t.version = 3;
        let patch = TicketPatch::from_ticket(&t, 10);

        let err = apply_checked(&mut t, WaitingStatus::Waiting, 2, &patch).unwrap_err();
        assert!(matches!(err, StoreError::Conflict { actual_version: 3, .. }));
        assert_eq!(t.version, 3);
    }

    #[test]
    fn test_apply_checked_rejects_status_mismatch() {
        let mut t = test_support::ticket("t1", "v1", 1, 0);
        let patch = TicketPatch::from_ticket(&t, 10);

        let err = apply_checked(&mut t, WaitingStatus::Called, 0, &patch).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Conflict {
                actual: WaitingStatus::Waiting,
                ..
            }
        ));
    }
}
