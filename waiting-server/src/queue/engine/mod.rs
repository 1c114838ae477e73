//! QueueEngine - 排队引擎
//!
//! # 命令流程
//!
//! ```text
//! call/recall/seat/cancel/restore(ticket_id)
//!     │
//!     ├─ 1. load ticket + venue settings
//!     ├─ 2. lazy expiry (CALLED + overdue + calls used up → NO_SHOW)
//!     ├─ 3. TransitionAction::plan()       (pure validation)
//!     ├─ 4. store.update_status(expected status + version)
//!     └─ 5. publish TicketTransitioned
//! ```
//!
//! Registration takes a per-venue async lock across the capacity check and
//! the insert so concurrent registrations cannot overshoot
//! `max_waiting_count`. Ticket transitions take no lock: the store's
//! compare-and-swap lets exactly one of two racing commands win.

mod queries;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use dashmap::DashMap;
use shared::models::{OperationStatusUpdate, WaitingSetting};
use shared::util::{is_valid_phone, normalize_phone};
use shared::waiting::{
    CancelReason, Contact, OperationStatus, PublicCancelRequest, PublicRegisterRequest,
    RegisterTicket, TicketTransitioned, TicketView, TransitionKind, WaitingSource, WaitingStatus,
    WaitingTicket,
};
use tokio::sync::Mutex;

use crate::notify::NotificationGateway;
use crate::queue::actions::{ExpireAction, TicketCommand, TransitionAction};
use crate::queue::catalog::TypeCatalog;
use crate::queue::clock::Clock;
use crate::queue::error::{QueueError, QueueResult};
use crate::queue::estimation::{self, changes_membership};
use crate::queue::expiry::{self, ExpiryPolicy};
use crate::queue::gate::OperationalGate;
use crate::queue::traits::{TransitionContext, TransitionHandler};
use crate::store::{CatalogStore, TicketStore};

/// Engine tuning
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// TTL of the waiting type / settings read cache (zero disables it)
    pub cache_ttl: Duration,
    /// Zone that defines the business day
    pub timezone: Tz,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(5),
            timezone: chrono_tz::Asia::Seoul,
        }
    }
}

pub struct QueueEngine {
    tickets: Arc<dyn TicketStore>,
    catalog: TypeCatalog,
    gate: OperationalGate,
    notifier: Arc<dyn NotificationGateway>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    /// Serializes capacity check + insert per venue
    venue_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl std::fmt::Debug for QueueEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueEngine")
            .field("timezone", &self.timezone)
            .field("venues", &self.venue_locks.len())
            .finish_non_exhaustive()
    }
}

impl QueueEngine {
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        catalog_store: Arc<dyn CatalogStore>,
        notifier: Arc<dyn NotificationGateway>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog: TypeCatalog::new(
                catalog_store.clone(),
                tickets.clone(),
                clock.clone(),
                config.cache_ttl,
            ),
            gate: OperationalGate::new(catalog_store, clock.clone(), config.cache_ttl),
            tickets,
            notifier,
            clock,
            timezone: config.timezone,
            venue_locks: DashMap::new(),
        }
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn gate(&self) -> &OperationalGate {
        &self.gate
    }

    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }

    // ========== Registration ==========

    /// Register a party. Checks run in order: contact, gate, capacity, type,
    /// party size, duplicate phone. Nothing is written unless all pass.
    pub async fn register(&self, venue_id: &str, request: RegisterTicket) -> QueueResult<TicketView> {
        let (phone, customer_name) = validate_contact(&request.contact)?;

        let lock = self.venue_lock(venue_id);
        let guard = lock.lock().await;

        let now = self.now();
        let settings = self.gate.settings(venue_id).await?;
        let active = self.active_tickets(venue_id, &settings, now).await?;
        OperationalGate::check_registration(&settings, active.len())?;

        let waiting_type = self
            .catalog
            .get_active(venue_id, &request.waiting_type_id)
            .await?;
        if !waiting_type.accepts_party_size(request.party_size) {
            return Err(QueueError::PartySizeOutOfBounds {
                party_size: request.party_size,
                min: waiting_type.min_party_size.max(1),
                max: waiting_type.max_party_size,
            });
        }
        if let Some(phone) = phone.as_deref()
            && let Some(existing) = active.iter().find(|t| t.phone.as_deref() == Some(phone))
        {
            return Err(QueueError::AlreadyWaiting(existing.id.clone()));
        }

        let sequence_number = self.tickets.next_sequence(venue_id).await?;
        let ticket = WaitingTicket {
            id: shared::util::new_id(),
            venue_id: venue_id.to_string(),
            waiting_type_id: waiting_type.id.clone(),
            sequence_number,
            party_size: request.party_size,
            status: WaitingStatus::Waiting,
            phone,
            customer_name,
            memo: non_blank(request.memo),
            source: request.source,
            called_count: 0,
            created_at: now,
            called_at: None,
            call_expire_at: None,
            seated_at: None,
            cancelled_at: None,
            cancel_reason: None,
            updated_at: now,
            version: 0,
        };
        self.tickets.create(&ticket).await?;
        drop(guard);

        tracing::info!(
            venue_id,
            ticket_id = %ticket.id,
            sequence = sequence_number,
            waiting_type_id = %ticket.waiting_type_id,
            party_size = ticket.party_size,
            source = ?ticket.source,
            "Ticket registered"
        );
        self.publish(TransitionKind::Register, None, &ticket, now);

        let mut line = active;
        line.push(ticket.clone());
        let pace = HashMap::from([(
            waiting_type.id.clone(),
            waiting_type.avg_wait_minutes_per_team,
        )]);
        let estimate = estimation::estimate_all(&line, &pace).remove(&ticket.id);
        Ok(TicketView {
            ticket,
            type_name: Some(waiting_type.name),
            position: estimate.map(|e| e.position),
            venue_position: estimate.map(|e| e.venue_position),
            estimated_wait_minutes: estimate.and_then(|e| e.estimated_wait_minutes),
            call: None,
        })
    }

    /// QR registration: phone is mandatory
    pub async fn register_public(
        &self,
        venue_id: &str,
        request: PublicRegisterRequest,
    ) -> QueueResult<TicketView> {
        if request.phone.trim().is_empty() {
            return Err(QueueError::ContactRequired);
        }
        self.register(
            venue_id,
            RegisterTicket {
                waiting_type_id: request.waiting_type_id,
                party_size: request.party_size,
                contact: Contact {
                    phone: Some(request.phone),
                    name: request.name,
                },
                source: WaitingSource::Qr,
                memo: None,
            },
        )
        .await
    }

    // ========== Transitions ==========

    pub async fn call(&self, ticket_id: &str) -> QueueResult<WaitingTicket> {
        self.execute(ticket_id, TicketCommand::Call).await
    }

    pub async fn recall(&self, ticket_id: &str) -> QueueResult<WaitingTicket> {
        self.execute(ticket_id, TicketCommand::Recall).await
    }

    pub async fn seat(&self, ticket_id: &str) -> QueueResult<WaitingTicket> {
        self.execute(ticket_id, TicketCommand::Seat).await
    }

    pub async fn cancel(&self, ticket_id: &str, reason: CancelReason) -> QueueResult<WaitingTicket> {
        self.execute(ticket_id, TicketCommand::Cancel(reason)).await
    }

    pub async fn restore(&self, ticket_id: &str) -> QueueResult<WaitingTicket> {
        self.execute(ticket_id, TicketCommand::Restore).await
    }

    /// Run a command against any ticket
    pub async fn execute(&self, ticket_id: &str, command: TicketCommand) -> QueueResult<WaitingTicket> {
        let ticket = self.load(ticket_id).await?;
        self.run(ticket, command).await
    }

    /// Run a command against a ticket that must belong to `venue_id`
    pub async fn execute_in_venue(
        &self,
        venue_id: &str,
        ticket_id: &str,
        command: TicketCommand,
    ) -> QueueResult<WaitingTicket> {
        let ticket = self.load_in_venue(venue_id, ticket_id).await?;
        self.run(ticket, command).await
    }

    async fn run(&self, ticket: WaitingTicket, command: TicketCommand) -> QueueResult<WaitingTicket> {
        let now = self.now();
        let settings = self.gate.settings(&ticket.venue_id).await?;
        let ticket = self.expire_if_due(ticket, &settings, now).await?;

        let action = TransitionAction::from(&command);
        let ctx = TransitionContext::new(&ticket, &settings, now);
        let patch = match action.plan(&ctx) {
            Ok(patch) => patch,
            Err(e) => {
                tracing::debug!(
                    ticket_id = %ticket.id,
                    status = %ticket.status,
                    command = action.kind().as_str(),
                    error = %e,
                    "Command rejected"
                );
                return Err(e);
            }
        };

        let from = ticket.status;
        let updated = match self
            .tickets
            .update_status(&ticket.id, from, ticket.version, &patch)
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                let e = QueueError::from(e);
                if matches!(e, QueueError::OptimisticConflict(_)) {
                    tracing::warn!(ticket_id = %ticket.id, command = action.kind().as_str(), "Lost concurrent update");
                }
                return Err(e);
            }
        };

        tracing::info!(
            venue_id = %updated.venue_id,
            ticket_id = %updated.id,
            sequence = updated.sequence_number,
            command = action.kind().as_str(),
            from = %from,
            to = %updated.status,
            called_count = updated.called_count,
            "Ticket transitioned"
        );
        self.publish(action.kind(), Some(from), &updated, now);
        Ok(updated)
    }

    // ========== Expiry ==========

    /// Commit Expire if the ticket is due; otherwise return it unchanged.
    ///
    /// Idempotent: a ticket already moved on (by another request or replica)
    /// is reloaded and returned as found.
    pub(crate) async fn expire_if_due(
        &self,
        ticket: WaitingTicket,
        settings: &WaitingSetting,
        now: i64,
    ) -> QueueResult<WaitingTicket> {
        if !expiry::evaluate(&ticket, ExpiryPolicy::from(settings), now).should_auto_cancel {
            return Ok(ticket);
        }

        let patch = ExpireAction.plan(&TransitionContext::new(&ticket, settings, now))?;
        match self
            .tickets
            .update_status(&ticket.id, ticket.status, ticket.version, &patch)
            .await
        {
            Ok(expired) => {
                tracing::info!(
                    venue_id = %expired.venue_id,
                    ticket_id = %expired.id,
                    sequence = expired.sequence_number,
                    called_count = expired.called_count,
                    "Ticket auto-cancelled after final call expired"
                );
                self.publish(TransitionKind::Expire, Some(ticket.status), &expired, now);
                Ok(expired)
            }
            Err(crate::store::StoreError::Conflict { .. }) => self.load(&ticket.id).await,
            Err(e) => Err(e.into()),
        }
    }

    /// Lazy expiry pass over the venue. Returns the tickets still active.
    pub async fn apply_expiry(&self, venue_id: &str) -> QueueResult<Vec<WaitingTicket>> {
        let settings = self.gate.settings(venue_id).await?;
        self.active_tickets(venue_id, &settings, self.now()).await
    }

    /// Active tickets ordered by sequence, after expiring the ones due
    async fn active_tickets(
        &self,
        venue_id: &str,
        settings: &WaitingSetting,
        now: i64,
    ) -> QueueResult<Vec<WaitingTicket>> {
        let listed = self.tickets.list_active_by_venue(venue_id).await?;
        let mut active = Vec::with_capacity(listed.len());
        for ticket in listed {
            let ticket = self.expire_if_due(ticket, settings, now).await?;
            if ticket.is_active() {
                active.push(ticket);
            }
        }
        Ok(active)
    }

    // ========== Other writes ==========

    /// Staff note, any status, no event
    pub async fn update_memo(
        &self,
        venue_id: &str,
        ticket_id: &str,
        memo: Option<String>,
    ) -> QueueResult<WaitingTicket> {
        self.load_in_venue(venue_id, ticket_id).await?;
        let updated = self
            .tickets
            .update_memo(ticket_id, non_blank(memo), self.now())
            .await?;
        tracing::debug!(venue_id, ticket_id, "Memo updated");
        Ok(updated)
    }

    /// Customer cancel by ticket id and/or phone (both must match when both given)
    pub async fn cancel_by_customer(
        &self,
        venue_id: &str,
        request: PublicCancelRequest,
    ) -> QueueResult<WaitingTicket> {
        let phone = match request.phone.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(validated_phone(raw)?),
            _ => None,
        };

        let ticket = match (request.ticket_id.as_deref(), phone.as_deref()) {
            (Some(ticket_id), phone) => {
                let ticket = self.load_in_venue(venue_id, ticket_id).await?;
                if phone.is_some() && ticket.phone.as_deref() != phone {
                    return Err(QueueError::TicketNotFound(ticket_id.to_string()));
                }
                ticket
            }
            (None, Some(phone)) => self
                .apply_expiry(venue_id)
                .await?
                .into_iter()
                .find(|t| t.phone.as_deref() == Some(phone))
                .ok_or_else(|| QueueError::TicketNotFound(format!("phone {phone}")))?,
            (None, None) => return Err(QueueError::ContactRequired),
        };

        self.run(ticket, TicketCommand::Cancel(CancelReason::CustomerRequest))
            .await
    }

    /// Switching to ACCEPTING guarantees the venue has an active type
    pub async fn set_operation_status(
        &self,
        venue_id: &str,
        update: OperationStatusUpdate,
    ) -> QueueResult<WaitingSetting> {
        if update.operation_status == OperationStatus::Accepting {
            self.catalog.ensure_default(venue_id).await?;
        }
        self.gate.set_operation_status(venue_id, update).await
    }

    // ========== Helpers ==========

    async fn load(&self, ticket_id: &str) -> QueueResult<WaitingTicket> {
        self.tickets
            .get_by_id(ticket_id)
            .await?
            .ok_or_else(|| QueueError::TicketNotFound(ticket_id.to_string()))
    }

    /// Tickets of another venue are reported as not found
    async fn load_in_venue(&self, venue_id: &str, ticket_id: &str) -> QueueResult<WaitingTicket> {
        let ticket = self.load(ticket_id).await?;
        if ticket.venue_id != venue_id {
            return Err(QueueError::TicketNotFound(ticket_id.to_string()));
        }
        Ok(ticket)
    }

    fn venue_lock(&self, venue_id: &str) -> Arc<Mutex<()>> {
        self.venue_locks
            .entry(venue_id.to_string())
            .or_default()
            .clone()
    }

    fn publish(
        &self,
        kind: TransitionKind,
        from: Option<WaitingStatus>,
        ticket: &WaitingTicket,
        at: i64,
    ) {
        let event = TicketTransitioned::new(kind, from, ticket, at)
            .with_membership_changed(changes_membership(from, ticket.status));
        self.notifier.publish(&event);
    }
}

/// Normalized phone and trimmed name; at least one is required
fn validate_contact(contact: &Contact) -> QueueResult<(Option<String>, Option<String>)> {
    let phone = match contact.phone.as_deref() {
        Some(raw) if !raw.trim().is_empty() => Some(validated_phone(raw)?),
        _ => None,
    };
    let name = non_blank(contact.name.clone());
    if phone.is_none() && name.is_none() {
        return Err(QueueError::ContactRequired);
    }
    Ok((phone, name))
}

fn validated_phone(raw: &str) -> QueueResult<String> {
    let phone = normalize_phone(raw);
    if !is_valid_phone(&phone) {
        return Err(QueueError::InvalidPhone(raw.to_string()));
    }
    Ok(phone)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
