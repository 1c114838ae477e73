//! Queue position and estimated wait
//!
//! Computed at read time from the active set, never stored:
//!
//! - position = WAITING tickets ahead (smaller sequence, optionally same type) + 1
//! - estimate = (position - 1) × type pace
//!
//! CALLED tickets are not "ahead" of anyone. Restored tickets keep their
//! original sequence and therefore their original place.

use std::collections::HashMap;

use shared::waiting::{WaitingStatus, WaitingTicket};

/// Which tickets count as "ahead"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionScope {
    /// Every WAITING ticket of the venue
    Venue,
    /// Only WAITING tickets of the same waiting type
    Type,
}

/// Read-time estimate for one WAITING ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Estimate {
    /// Position within the ticket's type line
    pub position: u32,
    /// Position across the whole venue
    pub venue_position: u32,
    /// None when the ticket's type is unknown to the catalog
    pub estimated_wait_minutes: Option<u32>,
}

/// 1-based position of `ticket` among `tickets`; None unless it is WAITING
pub fn position(ticket: &WaitingTicket, tickets: &[WaitingTicket], scope: PositionScope) -> Option<u32> {
    if ticket.status != WaitingStatus::Waiting {
        return None;
    }
    let ahead = tickets
        .iter()
        .filter(|other| {
            other.status == WaitingStatus::Waiting
                && other.sequence_number < ticket.sequence_number
                && (scope == PositionScope::Venue || other.waiting_type_id == ticket.waiting_type_id)
        })
        .count();
    Some(ahead as u32 + 1)
}

/// Teams strictly ahead times the per-team pace; the front of the line waits 0
pub fn estimated_wait_minutes(position: u32, avg_wait_minutes_per_team: u32) -> u32 {
    position
        .saturating_sub(1)
        .saturating_mul(avg_wait_minutes_per_team)
}

/// What a party registering now would be told: everyone WAITING is ahead
pub fn new_arrival_wait_minutes(waiting_count: u32, avg_wait_minutes_per_team: u32) -> u32 {
    waiting_count.saturating_mul(avg_wait_minutes_per_team)
}

/// Estimates for every WAITING ticket in one pass, keyed by ticket id
///
/// `pace` maps a waiting type id to its `avg_wait_minutes_per_team`.
pub fn estimate_all(
    tickets: &[WaitingTicket],
    pace: &HashMap<String, u32>,
) -> HashMap<String, Estimate> {
    let mut waiting: Vec<&WaitingTicket> = tickets
        .iter()
        .filter(|t| t.status == WaitingStatus::Waiting)
        .collect();
    waiting.sort_by_key(|t| t.sequence_number);

    let mut per_type: HashMap<&str, u32> = HashMap::new();
    let mut estimates = HashMap::with_capacity(waiting.len());
    for (index, ticket) in waiting.into_iter().enumerate() {
        let line = per_type.entry(ticket.waiting_type_id.as_str()).or_insert(0);
        *line += 1;
        let position = *line;
        estimates.insert(
            ticket.id.clone(),
            Estimate {
                position,
                venue_position: index as u32 + 1,
                estimated_wait_minutes: pace
                    .get(&ticket.waiting_type_id)
                    .map(|avg| estimated_wait_minutes(position, *avg)),
            },
        );
    }
    estimates
}

/// Whether a transition changes WAITING membership (and so everyone's estimate)
///
/// Register, Call, Seat, Cancel (from WAITING) and Restore do; Recall and
/// CALLED → SEATED/CANCELLED/NO_SHOW do not.
pub fn changes_membership(from: Option<WaitingStatus>, to: WaitingStatus) -> bool {
    let was_waiting = from == Some(WaitingStatus::Waiting);
    let is_waiting = to == WaitingStatus::Waiting;
    was_waiting != is_waiting
}
