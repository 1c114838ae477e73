//! Read side of the engine
//!
//! Every read runs the lazy expiry pass first, then derives positions and
//! estimates from the current tickets. Nothing computed here is stored.

use std::collections::HashMap;

use shared::models::WaitingType;
use shared::waiting::{
    PublicTicketStatus, PublicTypeInfo, PublicWaitingInfo, QueueSnapshot, StatusCounts,
    TicketView, TodayStats, WaitingStats, WaitingStatus, WaitingTicket,
};

use super::{QueueEngine, validated_phone};
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::estimation::{self, Estimate};
use crate::queue::expiry::{self, ExpiryPolicy};
use crate::queue::stats;
use crate::utils::time::business_day_start;

impl QueueEngine {
    /// Staff queue view, optionally narrowed to one waiting type
    pub async fn snapshot(&self, venue_id: &str, type_id: Option<&str>) -> QueueResult<QueueSnapshot> {
        let now = self.now();
        let settings = self.gate.settings(venue_id).await?;
        let active = self.active_tickets(venue_id, &settings, now).await?;
        let types = self.catalog.all(venue_id).await?;

        let estimates = estimation::estimate_all(&active, &pace_of(&types));
        let names = names_of(&types);
        let policy = ExpiryPolicy::from(&settings);
        let in_scope = |t: &WaitingTicket| type_id.is_none_or(|id| t.waiting_type_id == id);

        let (mut called, mut waiting): (Vec<WaitingTicket>, Vec<WaitingTicket>) = active
            .into_iter()
            .filter(|t| in_scope(t))
            .partition(|t| t.status == WaitingStatus::Called);
        called.sort_by_key(|t| (t.called_at, t.sequence_number));
        waiting.sort_by_key(|t| t.sequence_number);

        let mut counts = StatusCounts::default();
        let tickets: Vec<TicketView> = called
            .into_iter()
            .chain(waiting)
            .map(|ticket| {
                counts.record(ticket.status);
                let estimate = estimates.get(&ticket.id).copied();
                let call = expiry::countdown(&ticket, policy, now);
                view(ticket, &names, estimate, call)
            })
            .collect();

        let day_start = business_day_start(now, self.timezone);
        for ticket in self.tickets.list_by_venue_since(venue_id, day_start).await? {
            if ticket.status.is_terminal() && in_scope(&ticket) {
                counts.record(ticket.status);
            }
        }

        Ok(QueueSnapshot {
            venue_id: venue_id.to_string(),
            waiting_type_id: type_id.map(str::to_string),
            operation_status: settings.operation_status,
            generated_at: now,
            tickets,
            counts,
        })
    }

    pub async fn waiting_stats(&self, venue_id: &str) -> QueueResult<WaitingStats> {
        let active = self.apply_expiry(venue_id).await?;
        let types = self.catalog.all(venue_id).await?;
        Ok(stats::waiting_stats(&active, &types))
    }

    pub async fn today_stats(&self, venue_id: &str) -> QueueResult<TodayStats> {
        self.apply_expiry(venue_id).await?;
        let tickets = self.today_tickets(venue_id).await?;
        Ok(stats::today_stats(&tickets))
    }

    /// Most recent ticket of the business day for this phone, any status
    pub async fn find_today_by_phone(
        &self,
        venue_id: &str,
        phone: &str,
    ) -> QueueResult<Option<WaitingTicket>> {
        let phone = validated_phone(phone)?;
        let tickets = self.today_tickets(venue_id).await?;
        Ok(tickets
            .into_iter()
            .filter(|t| t.phone.as_deref() == Some(phone.as_str()))
            .max_by_key(|t| t.sequence_number))
    }

    /// Customer status page
    pub async fn public_status(&self, venue_id: &str, phone: &str) -> QueueResult<PublicTicketStatus> {
        let now = self.now();
        let settings = self.gate.settings(venue_id).await?;
        let active = self.active_tickets(venue_id, &settings, now).await?;

        let ticket = self
            .find_today_by_phone(venue_id, phone)
            .await?
            .ok_or_else(|| QueueError::TicketNotFound(format!("phone {phone}")))?;

        let types = self.catalog.all(venue_id).await?;
        let estimate = estimation::estimate_all(&active, &pace_of(&types))
            .get(&ticket.id)
            .copied();
        let type_name = types
            .iter()
            .find(|t| t.id == ticket.waiting_type_id)
            .map(|t| t.name.clone());

        Ok(PublicTicketStatus {
            ticket_id: ticket.id,
            sequence_number: ticket.sequence_number,
            status: ticket.status,
            party_size: ticket.party_size,
            type_name,
            position: estimate.map(|e| e.position),
            estimated_wait_minutes: estimate
                .and_then(|e| e.estimated_wait_minutes)
                .filter(|_| settings.show_estimated_time),
            call_expire_at: ticket.call_expire_at,
            created_at: ticket.created_at,
        })
    }

    /// Registration page: status, notes and the line per active type
    pub async fn public_info(&self, venue_id: &str) -> QueueResult<PublicWaitingInfo> {
        let now = self.now();
        let settings = self.gate.settings(venue_id).await?;
        let active = self.active_tickets(venue_id, &settings, now).await?;
        let types = self.catalog.list(venue_id, false).await?;

        let waiting_count = |type_id: &str| {
            active
                .iter()
                .filter(|t| t.status == WaitingStatus::Waiting && t.waiting_type_id == type_id)
                .count() as u32
        };

        let types = types
            .into_iter()
            .map(|t| {
                let count = waiting_count(&t.id);
                PublicTypeInfo {
                    estimated_wait_minutes: settings.show_estimated_time.then(|| {
                        estimation::new_arrival_wait_minutes(count, t.avg_wait_minutes_per_team)
                    }),
                    id: t.id,
                    name: t.name,
                    description: t.description,
                    min_party_size: t.min_party_size.max(1),
                    max_party_size: t.max_party_size,
                    waiting_count: count,
                }
            })
            .collect();

        Ok(PublicWaitingInfo {
            venue_id: venue_id.to_string(),
            operation_status: settings.operation_status,
            pause_message: settings.pause_message,
            pause_end_time: settings.pause_end_time,
            waiting_note: settings.waiting_note,
            total_waiting: active
                .iter()
                .filter(|t| t.status == WaitingStatus::Waiting)
                .count() as u32,
            types,
        })
    }

    async fn today_tickets(&self, venue_id: &str) -> QueueResult<Vec<WaitingTicket>> {
        let day_start = business_day_start(self.now(), self.timezone);
        Ok(self.tickets.list_by_venue_since(venue_id, day_start).await?)
    }
}

fn pace_of(types: &[WaitingType]) -> HashMap<String, u32> {
    types
        .iter()
        .map(|t| (t.id.clone(), t.avg_wait_minutes_per_team))
        .collect()
}

fn names_of(types: &[WaitingType]) -> HashMap<String, String> {
    types.iter().map(|t| (t.id.clone(), t.name.clone())).collect()
}

fn view(
    ticket: WaitingTicket,
    names: &HashMap<String, String>,
    estimate: Option<Estimate>,
    call: Option<shared::waiting::CallCountdown>,
) -> TicketView {
    TicketView {
        type_name: names.get(&ticket.waiting_type_id).cloned(),
        position: estimate.map(|e| e.position),
        venue_position: estimate.map(|e| e.venue_position),
        estimated_wait_minutes: estimate.and_then(|e| e.estimated_wait_minutes),
        call,
        ticket,
    }
}
