//! Audit Logger - Consumes reservation events
//!
//! Writes one `audit` target line per relayed event so the rolling log file
//! doubles as an audit trail.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rsvp_core::{DomainEvent, EventReceiver};
use tracing::info;

/// Audit log consumer
#[derive(Default)]
pub struct EventAuditLogger {
    handled: AtomicU64,
}

impl EventAuditLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events handled so far
    pub fn handled(&self) -> u64 {
        self.handled.load(Ordering::Relaxed)
    }

    /// Start listening to domain events
    ///
    /// Spawns a background task that runs until the event bus is dropped.
    pub fn start(self: Arc<Self>, mut events: EventReceiver) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!("[AuditLog] Started listening for reservation events");

            while let Some(event) = events.recv().await {
                self.handle_event(&event);
            }

            info!("[AuditLog] Event channel closed, stopping");
        })
    }

    /// Record a single event
    pub fn handle_event(&self, event: &DomainEvent) {
        match event {
            DomainEvent::ReservationBooked {
                reservation_id,
                user_id,
                store_id,
            } => info!(
                target: "audit",
                event = event.type_name(),
                %reservation_id,
                user_id = %user_id,
                store_id = %store_id,
                "reservation booked"
            ),
            DomainEvent::ReservationCancelled {
                reservation_id,
                cancelled_by,
                role,
            } => info!(
                target: "audit",
                event = event.type_name(),
                %reservation_id,
                cancelled_by = %cancelled_by,
                %role,
                "reservation cancelled"
            ),
            DomainEvent::ReservationCompleted { reservation_id } => info!(
                target: "audit",
                event = event.type_name(),
                %reservation_id,
                "reservation completed"
            ),
        }
        self.handled.fetch_add(1, Ordering::Relaxed);
    }
}
