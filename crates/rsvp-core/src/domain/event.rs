//! Domain Events - Unified event system for RSVP
//!
//! All reservation state changes are represented as events in this module.
//! Events are recorded in the outbox in the same transaction as the state
//! change, then published to the event bus by the `OutboxRelay` and consumed
//! by downstream services (notification, analytics, audit log).
//!
//! # Design Principles
//!
//! - **Single Source of Truth**: One enum for all domain events
//! - **Immutable**: Events are facts that happened, never mutated
//! - **Serializable**: All events round-trip through the outbox as JSON

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;

// ============================================================================
// DOMAIN EVENT ENUM
// ============================================================================

/// Unified domain events for the reservation core
///
/// Events serialize with a `type` field containing the snake_case variant name:
/// ```json
/// { "type": "reservation_cancelled", "reservation_id": "...", "cancelled_by": "...", "role": "OWNER" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A reservation was booked
    ReservationBooked {
        reservation_id: Uuid,
        user_id: String,
        store_id: String,
    },

    /// A reservation was cancelled by an authorized requester
    ReservationCancelled {
        reservation_id: Uuid,
        cancelled_by: String,
        role: Role,
    },

    /// A reservation was fulfilled
    ReservationCompleted { reservation_id: Uuid },
}

impl DomainEvent {
    /// Get the event type name (for logging/debugging)
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ReservationBooked { .. } => "reservation_booked",
            Self::ReservationCancelled { .. } => "reservation_cancelled",
            Self::ReservationCompleted { .. } => "reservation_completed",
        }
    }

    /// Reservation this event is about
    pub fn reservation_id(&self) -> Uuid {
        match self {
            Self::ReservationBooked { reservation_id, .. }
            | Self::ReservationCancelled { reservation_id, .. }
            | Self::ReservationCompleted { reservation_id } => *reservation_id,
        }
    }
}

// ============================================================================
// OUTBOX RECORD
// ============================================================================

/// An event waiting in (or delivered from) the transactional outbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxRecord {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub event_type: String,
    /// JSON-encoded `DomainEvent`
    pub payload: String,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    /// Set when the relay gave up on the record
    pub quarantined_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl OutboxRecord {
    /// Encode an event into a pending outbox record
    pub fn for_event(event: &DomainEvent) -> anyhow::Result<Self> {
        let payload = serde_json::to_string(event)
            .with_context(|| format!("Failed to encode {} event", event.type_name()))?;
        Ok(Self {
            id: Uuid::new_v4(),
            reservation_id: event.reservation_id(),
            event_type: event.type_name().to_string(),
            payload,
            created_at: Utc::now(),
            delivered_at: None,
            quarantined_at: None,
            last_error: None,
        })
    }

    /// Decode the stored payload back into an event
    pub fn decode(&self) -> anyhow::Result<DomainEvent> {
        serde_json::from_str(&self.payload)
            .with_context(|| format!("Failed to decode outbox record {}", self.id))
    }

    pub fn is_pending(&self) -> bool {
        self.delivered_at.is_none() && self.quarantined_at.is_none()
    }

    pub fn is_quarantined(&self) -> bool {
        self.quarantined_at.is_some()
    }
}
