//! Waiting type catalog
//!
//! Owns the venue's waiting types: validation, ordering, soft deletion and
//! the invariant that a venue accepting registrations has an active type.

use std::sync::Arc;
use std::time::Duration;

use shared::models::{
    DEFAULT_AVG_WAIT_MINUTES, PARTY_SIZE_LIMIT, TypeDeletion, WaitingType, WaitingTypeCreate,
    WaitingTypeUpdate,
};

use crate::queue::cache::TtlCache;
use crate::queue::clock::Clock;
use crate::queue::error::{QueueError, QueueResult};
use crate::store::{CatalogStore, TicketStore};

/// Type created when a venue opens without any active type
const DEFAULT_TYPE_NAME: &str = "Hall";
const DEFAULT_TYPE_MIN_PARTY: u32 = 1;
const DEFAULT_TYPE_MAX_PARTY: u32 = 10;
const DEFAULT_TYPE_AVG_WAIT: u32 = 10;

pub struct TypeCatalog {
    store: Arc<dyn CatalogStore>,
    tickets: Arc<dyn TicketStore>,
    clock: Arc<dyn Clock>,
    cache: TtlCache<Vec<WaitingType>>,
}

impl std::fmt::Debug for TypeCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeCatalog").finish_non_exhaustive()
    }
}

impl TypeCatalog {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        tickets: Arc<dyn TicketStore>,
        clock: Arc<dyn Clock>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            store,
            tickets,
            clock,
            cache: TtlCache::new(cache_ttl),
        }
    }

    // ========== Reads ==========

    /// Every type of the venue, active or not, ordered by sort order
    pub async fn all(&self, venue_id: &str) -> QueueResult<Vec<WaitingType>> {
        if let Some(types) = self.cache.get(venue_id) {
            return Ok(types);
        }
        let mut types = self.store.list_types(venue_id).await?;
        types.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then(a.created_at.cmp(&b.created_at)));
        self.cache.insert(venue_id, types.clone());
        Ok(types)
    }

    pub async fn list(&self, venue_id: &str, include_inactive: bool) -> QueueResult<Vec<WaitingType>> {
        let types = self.all(venue_id).await?;
        Ok(types
            .into_iter()
            .filter(|t| include_inactive || t.is_active)
            .collect())
    }

    /// Active type by id, `UnknownType` otherwise
    pub async fn get_active(&self, venue_id: &str, type_id: &str) -> QueueResult<WaitingType> {
        self.all(venue_id)
            .await?
            .into_iter()
            .find(|t| t.id == type_id && t.is_active)
            .ok_or_else(|| QueueError::UnknownType(type_id.to_string()))
    }

    pub fn invalidate(&self, venue_id: &str) {
        self.cache.invalidate(venue_id);
    }

    // ========== Writes ==========

    pub async fn create(&self, venue_id: &str, data: WaitingTypeCreate) -> QueueResult<WaitingType> {
        let types = self.fresh(venue_id).await?;
        let name = validate_name(&data.name)?;
        ensure_unique_name(&types, &name, None)?;

        let min = data.min_party_size.unwrap_or(1);
        let max = data.max_party_size.unwrap_or(PARTY_SIZE_LIMIT);
        validate_party_bounds(min, max)?;
        let avg = data.avg_wait_minutes_per_team.unwrap_or(DEFAULT_AVG_WAIT_MINUTES);
        validate_pace(avg)?;

        let now = self.clock.now_millis();
        let waiting_type = WaitingType {
            id: shared::util::new_id(),
            venue_id: venue_id.to_string(),
            name,
            description: normalize_text(data.description),
            avg_wait_minutes_per_team: avg,
            min_party_size: min,
            max_party_size: max,
            sort_order: next_sort_order(&types),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.store.put_types(std::slice::from_ref(&waiting_type)).await?;
        self.invalidate(venue_id);

        tracing::info!(venue_id, type_id = %waiting_type.id, name = %waiting_type.name, "Waiting type created");
        Ok(waiting_type)
    }

    pub async fn update(
        &self,
        venue_id: &str,
        type_id: &str,
        data: WaitingTypeUpdate,
    ) -> QueueResult<WaitingType> {
        let types = self.fresh(venue_id).await?;
        let mut waiting_type = find(&types, type_id)?.clone();

        if let Some(name) = data.name.as_deref() {
            let name = validate_name(name)?;
            ensure_unique_name(&types, &name, Some(type_id))?;
            waiting_type.name = name;
        }
        if data.description.is_some() {
            waiting_type.description = normalize_text(data.description);
        }
        if let Some(avg) = data.avg_wait_minutes_per_team {
            validate_pace(avg)?;
            waiting_type.avg_wait_minutes_per_team = avg;
        }
        let min = data.min_party_size.unwrap_or(waiting_type.min_party_size);
        let max = data.max_party_size.unwrap_or(waiting_type.max_party_size);
        validate_party_bounds(min, max)?;
        waiting_type.min_party_size = min;
        waiting_type.max_party_size = max;

        if let Some(active) = data.is_active {
            if !active && waiting_type.is_active && active_count(&types) <= 1 {
                return Err(QueueError::LastActiveType);
            }
            waiting_type.is_active = active;
        }
        waiting_type.updated_at = self.clock.now_millis();

        self.store.put_types(std::slice::from_ref(&waiting_type)).await?;
        self.invalidate(venue_id);

        tracing::info!(venue_id, type_id, "Waiting type updated");
        Ok(waiting_type)
    }

    /// Hard-deletes a type without history, deactivates one with history
    pub async fn delete(&self, venue_id: &str, type_id: &str) -> QueueResult<TypeDeletion> {
        let types = self.fresh(venue_id).await?;
        let waiting_type = find(&types, type_id)?;

        if waiting_type.is_active && active_count(&types) <= 1 {
            return Err(QueueError::LastActiveType);
        }

        let in_line = self.tickets.count_by_type(venue_id, type_id).await?;
        if in_line > 0 {
            return Err(QueueError::TypeInUse(in_line));
        }

        let deletion = if self.tickets.has_tickets_for_type(venue_id, type_id).await? {
            let mut deactivated = waiting_type.clone();
            deactivated.is_active = false;
            deactivated.updated_at = self.clock.now_millis();
            self.store.put_types(std::slice::from_ref(&deactivated)).await?;
            TypeDeletion::Deactivated
        } else {
            self.store.delete_type(venue_id, type_id).await?;
            TypeDeletion::Deleted
        };
        self.invalidate(venue_id);

        tracing::info!(venue_id, type_id, result = ?deletion, "Waiting type deleted");
        Ok(deletion)
    }

    /// Assign `sort_order = index` following `ids`
    pub async fn reorder(&self, venue_id: &str, ids: &[String]) -> QueueResult<Vec<WaitingType>> {
        let types = self.fresh(venue_id).await?;
        let now = self.clock.now_millis();

        let mut changed = Vec::with_capacity(ids.len());
        for (index, id) in ids.iter().enumerate() {
            let mut waiting_type = find(&types, id)?.clone();
            waiting_type.sort_order = index as i32;
            waiting_type.updated_at = now;
            changed.push(waiting_type);
        }
        self.store.put_types(&changed).await?;
        self.invalidate(venue_id);

        tracing::debug!(venue_id, count = changed.len(), "Waiting types reordered");
        self.all(venue_id).await
    }

    /// Creates the default type when the venue has no active one.
    /// Returns the created type, if any.
    pub async fn ensure_default(&self, venue_id: &str) -> QueueResult<Option<WaitingType>> {
        let types = self.fresh(venue_id).await?;
        if active_count(&types) > 0 {
            return Ok(None);
        }

        let now = self.clock.now_millis();
        let waiting_type = WaitingType {
            id: shared::util::new_id(),
            venue_id: venue_id.to_string(),
            name: DEFAULT_TYPE_NAME.to_string(),
            description: None,
            avg_wait_minutes_per_team: DEFAULT_TYPE_AVG_WAIT,
            min_party_size: DEFAULT_TYPE_MIN_PARTY,
            max_party_size: DEFAULT_TYPE_MAX_PARTY,
            sort_order: next_sort_order(&types),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.store.put_types(std::slice::from_ref(&waiting_type)).await?;
        self.invalidate(venue_id);

        tracing::info!(venue_id, type_id = %waiting_type.id, "Default waiting type created");
        Ok(Some(waiting_type))
    }

    /// Writes validate against the store, never against a cached copy
    async fn fresh(&self, venue_id: &str) -> QueueResult<Vec<WaitingType>> {
        self.invalidate(venue_id);
        self.all(venue_id).await
    }
}

// ========== Validation ==========

fn find<'a>(types: &'a [WaitingType], type_id: &str) -> QueueResult<&'a WaitingType> {
    types
        .iter()
        .find(|t| t.id == type_id)
        .ok_or_else(|| QueueError::UnknownType(type_id.to_string()))
}

fn active_count(types: &[WaitingType]) -> usize {
    types.iter().filter(|t| t.is_active).count()
}

fn next_sort_order(types: &[WaitingType]) -> i32 {
    types.iter().map(|t| t.sort_order).max().map_or(0, |max| max + 1)
}

fn validate_name(name: &str) -> QueueResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(QueueError::Validation("name must not be empty".to_string()));
    }
    Ok(name.to_string())
}

fn ensure_unique_name(types: &[WaitingType], name: &str, except_id: Option<&str>) -> QueueResult<()> {
    let taken = types
        .iter()
        .any(|t| t.name == name && Some(t.id.as_str()) != except_id);
    if taken {
        return Err(QueueError::TypeNameExists(name.to_string()));
    }
    Ok(())
}

fn validate_party_bounds(min: u32, max: u32) -> QueueResult<()> {
    if min > PARTY_SIZE_LIMIT {
        return Err(QueueError::Validation(format!(
            "min_party_size must be between 0 and {PARTY_SIZE_LIMIT}"
        )));
    }
    if !(1..=PARTY_SIZE_LIMIT).contains(&max) {
        return Err(QueueError::Validation(format!(
            "max_party_size must be between 1 and {PARTY_SIZE_LIMIT}"
        )));
    }
    if min > max {
        return Err(QueueError::Validation(
            "min_party_size must not exceed max_party_size".to_string(),
        ));
    }
    Ok(())
}

fn validate_pace(avg: u32) -> QueueResult<()> {
    if avg == 0 {
        return Err(QueueError::Validation(
            "avg_wait_minutes_per_team must be positive".to_string(),
        ));
    }
    Ok(())
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
