//! 通知网关
//!
//! 每次状态变更提交后，引擎发布一个 [`TicketTransitioned`] 事件。
//!
//! ```text
//! QueueEngine ──commit──▶ publish() ──▶ broadcast::Sender<TicketTransitioned>
//!                                               │
//!                              ┌────────────────┼────────────────┐
//!                              ▼                ▼                ▼
//!                       notification      staff screens      (tests)
//!                         listener
//! ```
//!
//! Publishing never blocks and never fails the command: a lagging subscriber
//! drops events, it does not slow the engine down.

use shared::waiting::TicketTransitioned;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

/// Sink for transition events
pub trait NotificationGateway: Send + Sync + std::fmt::Debug {
    fn publish(&self, event: &TicketTransitioned);
}

/// tokio broadcast 实现
#[derive(Debug, Clone)]
pub struct BroadcastGateway {
    tx: broadcast::Sender<TicketTransitioned>,
}

impl BroadcastGateway {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TicketTransitioned> {
        self.tx.subscribe()
    }
}

impl NotificationGateway for BroadcastGateway {
    fn publish(&self, event: &TicketTransitioned) {
        // Err only means nobody is subscribed right now
        if self.tx.send(event.clone()).is_err() {
            tracing::trace!(ticket_id = %event.ticket_id, "No notification subscribers");
        }
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopGateway;

impl NotificationGateway for NoopGateway {
    fn publish(&self, _event: &TicketTransitioned) {}
}

/// 通知监听器 - 记录每个事件 (target: notification)
///
/// Message delivery (SMS etc.) would hang off this loop.
pub async fn run_notification_listener(
    mut rx: broadcast::Receiver<TicketTransitioned>,
    shutdown: CancellationToken,
) {
    tracing::info!("Notification listener started");
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("Notification listener shutting down");
                break;
            }
            result = rx.recv() => match result {
                Ok(event) => {
                    tracing::info!(
                        target: "notification",
                        venue_id = %event.venue_id,
                        ticket_id = %event.ticket_id,
                        sequence = event.sequence_number,
                        kind = %event.kind.as_str(),
                        from = ?event.from,
                        to = %event.to,
                        called_count = event.called_count,
                        membership_changed = event.membership_changed,
                        "Ticket transitioned"
                    );
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(target: "notification", skipped, "Notification listener lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Notification channel closed");
                    break;
                }
            }
        }
    }
}
