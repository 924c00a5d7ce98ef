//! Reservation entity and its status lifecycle

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{DomainEvent, OutboxRecord, Role};
use crate::error::{ReservationError, ReservationResult};

/// Reservation lifecycle status
///
/// `Booked` is the only non-terminal state. Values match database storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Booked,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "BOOKED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        }
    }

    /// Parse a stored status value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BOOKED" => Some(Self::Booked),
            "CANCELLED" => Some(Self::Cancelled),
            "COMPLETED" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Booked)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booking of a store slot.
///
/// Never deleted; only moved through its status lifecycle. `version` is bumped
/// on every persisted transition and guards concurrent writers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: String,
    pub store_id: String,
    /// Store-local wall-clock time of the booking
    pub reserved_at: NaiveDateTime,
    pub headcount: u32,
    /// Deposit in minor currency units
    pub deposit: i64,
    pub status: ReservationStatus,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Create a freshly booked reservation
    pub fn new(
        user_id: impl Into<String>,
        store_id: impl Into<String>,
        reserved_at: NaiveDateTime,
        headcount: u32,
        deposit: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            store_id: store_id.into(),
            reserved_at,
            headcount,
            deposit,
            status: ReservationStatus::Booked,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether `user_id` is the user who booked this reservation
    pub fn is_booked_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Plan the cancellation of this reservation on behalf of an authorized requester.
    ///
    /// Cancelling a cancelled reservation is a no-op; a completed one cannot be cancelled.
    pub fn plan_cancellation(&self, cancelled_by: &str, role: Role) -> ReservationResult<TransitionPlan> {
        match self.status {
            ReservationStatus::Booked => {
                let event = DomainEvent::ReservationCancelled {
                    reservation_id: self.id,
                    cancelled_by: cancelled_by.to_string(),
                    role,
                };
                self.transition_to(ReservationStatus::Cancelled, &event)
                    .map(TransitionPlan::Apply)
            }
            ReservationStatus::Cancelled => Ok(TransitionPlan::NoOp),
            ReservationStatus::Completed => Err(self.invalid_state("cancel")),
        }
    }

    /// Plan the completion of this reservation.
    ///
    /// Completing a completed reservation is a no-op; a cancelled one cannot be completed.
    pub fn plan_completion(&self) -> ReservationResult<TransitionPlan> {
        match self.status {
            ReservationStatus::Booked => {
                let event = DomainEvent::ReservationCompleted {
                    reservation_id: self.id,
                };
                self.transition_to(ReservationStatus::Completed, &event)
                    .map(TransitionPlan::Apply)
            }
            ReservationStatus::Completed => Ok(TransitionPlan::NoOp),
            ReservationStatus::Cancelled => Err(self.invalid_state("complete")),
        }
    }

    /// The reservation as it looks after `transition` is persisted
    pub fn with_transition(&self, transition: &StatusTransition) -> Self {
        Self {
            status: transition.to,
            version: transition.expected_version + 1,
            updated_at: transition.at,
            ..self.clone()
        }
    }

    fn transition_to(
        &self,
        to: ReservationStatus,
        event: &DomainEvent,
    ) -> ReservationResult<StatusTransition> {
        Ok(StatusTransition {
            reservation_id: self.id,
            expected_version: self.version,
            from: self.status,
            to,
            outbox: OutboxRecord::for_event(event)?,
            at: Utc::now(),
        })
    }

    fn invalid_state(&self, action: &'static str) -> ReservationError {
        ReservationError::InvalidState {
            id: self.id,
            status: self.status,
            action,
        }
    }
}

/// A status change to persist atomically together with its outbox record.
///
/// Applies only if the stored reservation still has `expected_version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub reservation_id: Uuid,
    pub expected_version: i64,
    pub from: ReservationStatus,
    pub to: ReservationStatus,
    pub outbox: OutboxRecord,
    pub at: DateTime<Utc>,
}

/// Outcome of planning a transition against the current reservation state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionPlan {
    /// Persist this transition
    Apply(StatusTransition),
    /// Already in the target state; nothing to persist or emit
    NoOp,
}
