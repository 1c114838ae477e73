//! redb-based store for tickets, waiting types and venue settings
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `tickets` | `ticket_id` | `WaitingTicket` | Ticket rows (never deleted) |
//! | `venue_tickets` | `(venue_id, sequence)` | `ticket_id` | Per-venue history in queue order |
//! | `active_tickets` | `(venue_id, sequence)` | `ticket_id` | WAITING/CALLED index |
//! | `venue_sequence` | `venue_id` | `u64` | Per-venue sequence counter |
//! | `waiting_types` | `(venue_id, type_id)` | `WaitingType` | Type catalog |
//! | `waiting_settings` | `venue_id` | `WaitingSetting` | Queue settings |
//!
//! Values are JSON. redb serializes write transactions, so the sequence
//! increment and the status compare-and-swap are atomic without extra locks.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::{WaitingSetting, WaitingType};
use shared::waiting::{WaitingStatus, WaitingTicket};

use super::{
    CatalogStore, StoreError, StoreResult, TicketPatch, TicketStore, apply_checked,
};

type IndexTable = TableDefinition<'static, (&'static str, u64), &'static str>;

/// Ticket rows: key = ticket_id, value = JSON-serialized WaitingTicket
const TICKETS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("tickets");

/// All tickets of a venue in sequence order
const VENUE_TICKETS_TABLE: IndexTable = TableDefinition::new("venue_tickets");

/// Active (WAITING/CALLED) tickets of a venue in sequence order
const ACTIVE_TICKETS_TABLE: IndexTable = TableDefinition::new("active_tickets");

/// Per-venue sequence counter: key = venue_id, value = last assigned sequence
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("venue_sequence");

const TYPES_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("waiting_types");

const SETTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("waiting_settings");

/// Store backed by redb
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database at the given path
    ///
    /// redb commits are durable as soon as `commit()` returns and the file
    /// stays consistent across power loss (copy-on-write pages).
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init_tables(&db)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init_tables(&db)?;
        Ok(Self { db: Arc::new(db) })
    }

    fn init_tables(db: &Database) -> StoreResult<()> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TICKETS_TABLE)?;
            let _ = write_txn.open_table(VENUE_TICKETS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_TICKETS_TABLE)?;
            let _ = write_txn.open_table(SEQUENCE_TABLE)?;
            let _ = write_txn.open_table(TYPES_TABLE)?;
            let _ = write_txn.open_table(SETTINGS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    // ========== Ticket Operations ==========

    /// Load tickets referenced by an index range, keeping those `keep` accepts
    fn load_indexed<F>(
        &self,
        index: IndexTable,
        venue_id: &str,
        keep: F,
    ) -> StoreResult<Vec<WaitingTicket>>
    where
        F: Fn(&WaitingTicket) -> bool,
    {
        let read_txn = self.db.begin_read()?;
        let index_table = read_txn.open_table(index)?;
        let tickets_table = read_txn.open_table(TICKETS_TABLE)?;

        let mut tickets = Vec::new();
        for result in index_table.range((venue_id, 0u64)..=(venue_id, u64::MAX))? {
            let (_key, id) = result?;
            if let Some(value) = tickets_table.get(id.value())? {
                let ticket: WaitingTicket = serde_json::from_slice(value.value())?;
                if keep(&ticket) {
                    tickets.push(ticket);
                }
            }
        }
        Ok(tickets)
    }

    fn next_sequence_sync(&self, venue_id: &str) -> StoreResult<u64> {
        let txn = self.db.begin_write()?;
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table.get(venue_id)?.map(|g| g.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(venue_id, next)?;
        drop(table);
        txn.commit()?;
        Ok(next)
    }

    fn create_sync(&self, ticket: &WaitingTicket) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut tickets = txn.open_table(TICKETS_TABLE)?;
            if tickets.get(ticket.id.as_str())?.is_some() {
                return Err(StoreError::DuplicateTicket(ticket.id.clone()));
            }
            let value = serde_json::to_vec(ticket)?;
            tickets.insert(ticket.id.as_str(), value.as_slice())?;

            let key = (ticket.venue_id.as_str(), ticket.sequence_number);
            let mut venue_index = txn.open_table(VENUE_TICKETS_TABLE)?;
            venue_index.insert(key, ticket.id.as_str())?;
            if ticket.is_active() {
                let mut active_index = txn.open_table(ACTIVE_TICKETS_TABLE)?;
                active_index.insert(key, ticket.id.as_str())?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    fn get_sync(&self, id: &str) -> StoreResult<Option<WaitingTicket>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TICKETS_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Read-modify-write of one ticket inside a single write transaction
    fn modify_ticket<F>(&self, id: &str, modify: F) -> StoreResult<WaitingTicket>
    where
        F: FnOnce(&mut WaitingTicket) -> StoreResult<()>,
    {
        let txn = self.db.begin_write()?;
        let ticket = {
            let mut tickets = txn.open_table(TICKETS_TABLE)?;
            let bytes = tickets
                .get(id)?
                .map(|g| g.value().to_vec())
                .ok_or_else(|| StoreError::TicketNotFound(id.to_string()))?;
            let mut ticket: WaitingTicket = serde_json::from_slice(&bytes)?;
            let was_active = ticket.is_active();

            modify(&mut ticket)?;

            let value = serde_json::to_vec(&ticket)?;
            tickets.insert(id, value.as_slice())?;

            if was_active != ticket.is_active() {
                let mut active_index = txn.open_table(ACTIVE_TICKETS_TABLE)?;
                let key = (ticket.venue_id.as_str(), ticket.sequence_number);
                if ticket.is_active() {
                    active_index.insert(key, ticket.id.as_str())?;
                } else {
                    active_index.remove(key)?;
                }
            }
            ticket
        };
        txn.commit()?;
        Ok(ticket)
    }

    // ========== Catalog Operations ==========

    fn list_types_sync(&self, venue_id: &str) -> StoreResult<Vec<WaitingType>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TYPES_TABLE)?;

        let mut types = Vec::new();
        for result in table.range((venue_id, "")..)? {
            let (key, value) = result?;
            if key.value().0 != venue_id {
                break;
            }
            let waiting_type: WaitingType = serde_json::from_slice(value.value())?;
            types.push(waiting_type);
        }
        types.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.created_at.cmp(&b.created_at)));
        Ok(types)
    }

    fn put_types_sync(&self, types: &[WaitingType]) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TYPES_TABLE)?;
            for t in types {
                let value = serde_json::to_vec(t)?;
                table.insert((t.venue_id.as_str(), t.id.as_str()), value.as_slice())?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    fn delete_type_sync(&self, venue_id: &str, type_id: &str) -> StoreResult<bool> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(TYPES_TABLE)?;
            let removed = table.remove((venue_id, type_id))?.is_some();
            removed
        };
        txn.commit()?;
        Ok(removed)
    }

    fn get_settings_sync(&self, venue_id: &str) -> StoreResult<Option<WaitingSetting>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SETTINGS_TABLE)?;
        match table.get(venue_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn put_settings_sync(&self, settings: &WaitingSetting) -> StoreResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SETTINGS_TABLE)?;
            let value = serde_json::to_vec(settings)?;
            table.insert(settings.venue_id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }
}

#[async_trait]
impl TicketStore for RedbStore {
    async fn next_sequence(&self, venue_id: &str) -> StoreResult<u64> {
        self.next_sequence_sync(venue_id)
    }

    async fn create(&self, ticket: &WaitingTicket) -> StoreResult<()> {
        self.create_sync(ticket)
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<WaitingTicket>> {
        self.get_sync(id)
    }

    async fn list_active_by_venue(&self, venue_id: &str) -> StoreResult<Vec<WaitingTicket>> {
        self.load_indexed(ACTIVE_TICKETS_TABLE, venue_id, |_| true)
    }

    async fn list_by_venue_since(
        &self,
        venue_id: &str,
        since: i64,
    ) -> StoreResult<Vec<WaitingTicket>> {
        self.load_indexed(VENUE_TICKETS_TABLE, venue_id, |t| t.created_at >= since)
    }

    async fn count_by_type(&self, venue_id: &str, type_id: &str) -> StoreResult<usize> {
        let active = self.load_indexed(ACTIVE_TICKETS_TABLE, venue_id, |t| {
            t.waiting_type_id == type_id
        })?;
        Ok(active.len())
    }

    async fn has_tickets_for_type(&self, venue_id: &str, type_id: &str) -> StoreResult<bool> {
        let found = self.load_indexed(VENUE_TICKETS_TABLE, venue_id, |t| {
            t.waiting_type_id == type_id
        })?;
        Ok(!found.is_empty())
    }

    async fn update_status(
        &self,
        id: &str,
        expected: WaitingStatus,
        expected_version: u64,
        patch: &TicketPatch,
    ) -> StoreResult<WaitingTicket> {
        self.modify_ticket(id, |ticket| {
            apply_checked(ticket, expected, expected_version, patch)
        })
    }

    async fn update_memo(
        &self,
        id: &str,
        memo: Option<String>,
        now: i64,
    ) -> StoreResult<WaitingTicket> {
        self.modify_ticket(id, |ticket| {
            ticket.memo = memo;
            ticket.updated_at = now;
            ticket.version += 1;
            Ok(())
        })
    }
}

#[async_trait]
impl CatalogStore for RedbStore {
    async fn list_types(&self, venue_id: &str) -> StoreResult<Vec<WaitingType>> {
        self.list_types_sync(venue_id)
    }

    async fn put_types(&self, types: &[WaitingType]) -> StoreResult<()> {
        self.put_types_sync(types)
    }

    async fn delete_type(&self, venue_id: &str, type_id: &str) -> StoreResult<bool> {
        self.delete_type_sync(venue_id, type_id)
    }

    async fn get_settings(&self, venue_id: &str) -> StoreResult<Option<WaitingSetting>> {
        self.get_settings_sync(venue_id)
    }

    async fn put_settings(&self, settings: &WaitingSetting) -> StoreResult<()> {
        self.put_settings_sync(settings)
    }
}
