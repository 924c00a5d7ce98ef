//! Outbox Relay
//!
//! Moves committed events from the outbox onto the event bus.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::domain::DomainEvent;
use crate::event_bus::EventSender;
use crate::repository::{OutboxRepository, RepoResult};

/// Records fetched per round trip
const DEFAULT_BATCH_SIZE: usize = 100;

/// Destination for relayed events
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &DomainEvent) -> anyhow::Result<()>;
}

#[async_trait]
impl EventPublisher for EventSender {
    async fn publish(&self, event: &DomainEvent) -> anyhow::Result<()> {
        self.emit(event.clone());
        Ok(())
    }
}

/// Publishes pending outbox records in creation order.
///
/// A record is marked delivered only after its publish succeeded, so a crash
/// or a failed publish leads to redelivery on the next flush (at-least-once).
pub struct OutboxRelay {
    outbox: Arc<dyn OutboxRepository>,
    publisher: Arc<dyn EventPublisher>,
    batch_size: usize,
    /// One flush at a time, or two flushes could publish the same record
    flushing: Mutex<()>,
}

impl OutboxRelay {
    pub fn new(outbox: Arc<dyn OutboxRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            outbox,
            publisher,
            batch_size: DEFAULT_BATCH_SIZE,
            flushing: Mutex::new(()),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Publish everything pending; returns the number of records delivered.
    ///
    /// Stops at the first failed publish so later events are not delivered
    /// ahead of it. Undecodable records can never succeed and are quarantined.
    pub async fn flush(&self) -> RepoResult<usize> {
        let _guard = self.flushing.lock().await;
        let mut delivered = 0;

        loop {
            let batch = self.outbox.pending(self.batch_size).await?;
            let fetched = batch.len();
            let mut settled_in_batch = 0;

            for record in batch {
                let event = match record.decode() {
                    Ok(event) => event,
                    Err(e) => {
                        error!(
                            outbox_id = %record.id,
                            event_type = %record.event_type,
                            error = %e,
                            "[OutboxRelay] Undecodable record quarantined"
                        );
                        self.outbox.quarantine(&record.id, &format!("{:#}", e)).await?;
                        settled_in_batch += 1;
                        continue;
                    }
                };

                if let Err(e) = self.publisher.publish(&event).await {
                    warn!(
                        outbox_id = %record.id,
                        event_type = %record.event_type,
                        error = %e,
                        "[OutboxRelay] Publish failed, will retry on next flush"
                    );
                    return Ok(delivered);
                }

                self.outbox.mark_delivered(&record.id).await?;
                delivered += 1;
                settled_in_batch += 1;
            }

            if fetched < self.batch_size || settled_in_batch == 0 {
                break;
            }
        }

        if delivered > 0 {
            debug!(delivered, "[OutboxRelay] Flushed outbox");
        }
        Ok(delivered)
    }

    /// Flush after a commit; the commit already succeeded so failures are only logged
    pub(crate) async fn flush_after_commit(&self) {
        if let Err(e) = self.flush().await {
            warn!(error = %e, "[OutboxRelay] Flush after commit failed, events stay pending");
        }
    }
}
