//! In-memory store
//!
//! Tickets live in a [`DashMap`]; each shard lock makes the compare-and-swap in
//! `update_status` atomic per ticket. The per-venue sequence counter uses the
//! entry API, which holds the shard lock across read-increment-write.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;
use shared::models::{WaitingSetting, WaitingType};
use shared::waiting::{WaitingStatus, WaitingTicket};

use super::{
    CatalogStore, StoreError, StoreResult, TicketPatch, TicketStore, apply_checked,
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    tickets: DashMap<String, WaitingTicket>,
    sequences: DashMap<String, u64>,
    types: RwLock<HashMap<String, WaitingType>>,
    settings: RwLock<HashMap<String, WaitingSetting>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_venue<F>(&self, venue_id: &str, keep: F) -> Vec<WaitingTicket>
    where
        F: Fn(&WaitingTicket) -> bool,
    {
        let mut tickets: Vec<WaitingTicket> = self
            .tickets
            .iter()
            .filter(|entry| entry.venue_id == venue_id && keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        tickets.sort_by_key(|t| t.sequence_number);
        tickets
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn next_sequence(&self, venue_id: &str) -> StoreResult<u64> {
        let mut entry = self.sequences.entry(venue_id.to_string()).or_insert(0);
        *entry += 1;
        Ok(*entry)
    }

    async fn create(&self, ticket: &WaitingTicket) -> StoreResult<()> {
        match self.tickets.entry(ticket.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateTicket(ticket.id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(ticket.clone());
                Ok(())
            }
        }
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<WaitingTicket>> {
        Ok(self.tickets.get(id).map(|t| t.value().clone()))
    }

    async fn list_active_by_venue(&self, venue_id: &str) -> StoreResult<Vec<WaitingTicket>> {
        Ok(self.collect_venue(venue_id, |t| t.status.is_active()))
    }

    async fn list_by_venue_since(
        &self,
        venue_id: &str,
        since: i64,
    ) -> StoreResult<Vec<WaitingTicket>> {
        Ok(self.collect_venue(venue_id, |t| t.created_at >= since))
    }

    async fn count_by_type(&self, venue_id: &str, type_id: &str) -> StoreResult<usize> {
        Ok(self
            .tickets
            .iter()
            .filter(|t| {
                t.venue_id == venue_id && t.waiting_type_id == type_id && t.status.is_active()
            })
            .count())
    }

    async fn has_tickets_for_type(&self, venue_id: &str, type_id: &str) -> StoreResult<bool> {
        Ok(self
            .tickets
            .iter()
            .any(|t| t.venue_id == venue_id && t.waiting_type_id == type_id))
    }

    async fn update_status(
        &self,
        id: &str,
        expected: WaitingStatus,
        expected_version: u64,
        patch: &TicketPatch,
    ) -> StoreResult<WaitingTicket> {
        let mut ticket = self
            .tickets
            .get_mut(id)
            .ok_or_else(|| StoreError::TicketNotFound(id.to_string()))?;
        apply_checked(&mut ticket, expected, expected_version, patch)?;
        Ok(ticket.clone())
    }

    async fn update_memo(
        &self,
        id: &str,
        memo: Option<String>,
        now: i64,
    ) -> StoreResult<WaitingTicket> {
        let mut ticket = self
            .tickets
            .get_mut(id)
            .ok_or_else(|| StoreError::TicketNotFound(id.to_string()))?;
        ticket.memo = memo;
        ticket.updated_at = now;
        ticket.version += 1;
        Ok(ticket.clone())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_types(&self, venue_id: &str) -> StoreResult<Vec<WaitingType>> {
        let mut types: Vec<WaitingType> = self
            .types
            .read()
            .values()
            .filter(|t| t.venue_id == venue_id)
            .cloned()
            .collect();
        types.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.created_at.cmp(&b.created_at)));
        Ok(types)
    }

    async fn put_types(&self, types: &[WaitingType]) -> StoreResult<()> {
        let mut guard = self.types.write();
        for t in types {
            guard.insert(t.id.clone(), t.clone());
        }
        Ok(())
    }

    async fn delete_type(&self, venue_id: &str, type_id: &str) -> StoreResult<bool> {
        let mut guard = self.types.write();
        let owned = guard.get(type_id).is_some_and(|t| t.venue_id == venue_id);
        if owned {
            guard.remove(type_id);
        }
        Ok(owned)
    }

    async fn get_settings(&self, venue_id: &str) -> StoreResult<Option<WaitingSetting>> {
        Ok(self.settings.read().get(venue_id).cloned())
    }

    async fn put_settings(&self, settings: &WaitingSetting) -> StoreResult<()> {
        self.settings
            .write()
            .insert(settings.venue_id.clone(), settings.clone());
        Ok(())
    }
}
