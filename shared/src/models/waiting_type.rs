//! Waiting Type Model

use serde::{Deserialize, Serialize};

/// Default per-team pace for a newly created type (minutes)
pub const DEFAULT_AVG_WAIT_MINUTES: u32 = 5;
/// Upper bound accepted for `min_party_size` / `max_party_size`
pub const PARTY_SIZE_LIMIT: u32 = 100;

/// Waiting type entity (queue category, e.g. "Hall", "Terrace", "4+ people")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingType {
    pub id: String,
    pub venue_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Minutes each team ahead adds to the estimate (> 0)
    pub avg_wait_minutes_per_team: u32,
    pub min_party_size: u32,
    pub max_party_size: u32,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl WaitingType {
    /// Whether `party_size` fits this type. A party is never smaller than one person.
    pub fn accepts_party_size(&self, party_size: u32) -> bool {
        party_size >= self.min_party_size.max(1) && party_size <= self.max_party_size
    }
}

/// Create waiting type payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaitingTypeCreate {
    pub name: String,
    pub description: Option<String>,
    pub avg_wait_minutes_per_team: Option<u32>,
    pub min_party_size: Option<u32>,
    pub max_party_size: Option<u32>,
}

/// Update waiting type payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaitingTypeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub avg_wait_minutes_per_team: Option<u32>,
    pub min_party_size: Option<u32>,
    pub max_party_size: Option<u32>,
    pub is_active: Option<bool>,
}

/// Reorder payload: type ids in their new display order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitingTypeReorder {
    pub ids: Vec<String>,
}

/// Result of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDeletion {
    /// Row removed (type had no tickets)
    Deleted,
    /// Kept for history, marked inactive
    Deactivated,
}
