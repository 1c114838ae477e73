//! Queue statistics (pure)

use std::collections::HashSet;

use shared::models::WaitingType;
use shared::waiting::{TodayStats, TypeStats, WaitingStats, WaitingStatus, WaitingTicket};

use crate::queue::estimation::new_arrival_wait_minutes;

/// Live statistics over the venue's active tickets
///
/// Active types are always listed; an inactive type only shows up while it
/// still has tickets in line.
pub fn waiting_stats(active: &[WaitingTicket], types: &[WaitingType]) -> WaitingStats {
    let in_line: HashSet<&str> = active.iter().map(|t| t.waiting_type_id.as_str()).collect();

    let by_type: Vec<TypeStats> = types
        .iter()
        .filter(|t| t.is_active || in_line.contains(t.id.as_str()))
        .map(|waiting_type| {
            let of_type = active.iter().filter(|t| t.waiting_type_id == waiting_type.id);
            let mut stats = TypeStats {
                waiting_type_id: waiting_type.id.clone(),
                name: waiting_type.name.clone(),
                waiting_count: 0,
                called_count: 0,
                party_size: 0,
                estimated_wait_minutes: 0,
            };
            for ticket in of_type {
                match ticket.status {
                    WaitingStatus::Waiting => {
                        stats.waiting_count += 1;
                        stats.party_size += ticket.party_size;
                    }
                    WaitingStatus::Called => stats.called_count += 1,
                    _ => {}
                }
            }
            stats.estimated_wait_minutes = new_arrival_wait_minutes(
                stats.waiting_count,
                waiting_type.avg_wait_minutes_per_team,
            );
            stats
        })
        .collect();

    let waiting = active.iter().filter(|t| t.status == WaitingStatus::Waiting);
    WaitingStats {
        total_waiting: waiting.clone().count() as u32,
        total_called: active
            .iter()
            .filter(|t| t.status == WaitingStatus::Called)
            .count() as u32,
        total_party_size: waiting.map(|t| t.party_size).sum(),
        estimated_wait_minutes: by_type
            .iter()
            .map(|t| t.estimated_wait_minutes)
            .max()
            .unwrap_or(0),
        by_type,
    }
}

/// Business-day statistics over every ticket created since the day started
pub fn today_stats(tickets: &[WaitingTicket]) -> TodayStats {
    let mut stats = TodayStats {
        registered: tickets.len() as u32,
        ..Default::default()
    };
    let mut waited_ms: i64 = 0;

    for ticket in tickets {
        match ticket.status {
            WaitingStatus::Seated => {
                stats.seated += 1;
                if let Some(seated_at) = ticket.seated_at {
                    waited_ms += (seated_at - ticket.created_at).max(0);
                }
            }
            WaitingStatus::Cancelled => stats.cancelled += 1,
            WaitingStatus::NoShow => stats.no_show += 1,
            WaitingStatus::Waiting | WaitingStatus::Called => {}
        }
    }

    if stats.seated > 0 {
        let avg_ms = waited_ms as f64 / f64::from(stats.seated);
        stats.avg_wait_minutes = (avg_ms / 60_000.0).round() as u32;
    }
    stats
}
