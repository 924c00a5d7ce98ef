//! Repository traits for data access
//!
//! These traits define the interface for data storage without specifying
//! the implementation (SQLite, in-memory, etc.)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{OutboxRecord, Reservation, StatusTransition};

/// Result type for repository operations
pub type RepoResult<T> = anyhow::Result<T>;

/// Outcome of an optimistic status transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// The transition and its outbox record were committed
    Applied(Reservation),
    /// The stored version no longer matches; nothing was written
    VersionConflict,
}

/// Reservation repository trait
///
/// Reservations are never deleted. Every write also records the matching
/// outbox event in the same transaction.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Get a reservation by ID
    async fn get(&self, id: &Uuid) -> RepoResult<Option<Reservation>>;

    /// Persist a new reservation together with its booking event
    async fn create(&self, reservation: &Reservation, event: &OutboxRecord) -> RepoResult<()>;

    /// Apply a status transition if the stored version still matches
    async fn apply_transition(&self, transition: &StatusTransition) -> RepoResult<TransitionResult>;

    /// Reservations booked by a user, newest first
    async fn list_for_user(&self, user_id: &str) -> RepoResult<Vec<Reservation>>;

    /// Reservations at a store, newest first
    async fn list_for_store(&self, store_id: &str) -> RepoResult<Vec<Reservation>>;
}

/// Outbox repository trait
///
/// Read side of the transactional outbox written by `ReservationRepository`.
#[async_trait]
pub trait OutboxRepository: Send + Sync {
    /// Undelivered, unquarantined records in creation order
    async fn pending(&self, limit: usize) -> RepoResult<Vec<OutboxRecord>>;

    /// Mark a record delivered
    async fn mark_delivered(&self, id: &Uuid) -> RepoResult<()>;

    /// Take a record out of the pending set, keeping it with the reason
    async fn quarantine(&self, id: &Uuid, reason: &str) -> RepoResult<()>;

    /// Quarantined records in creation order
    async fn quarantined(&self, limit: usize) -> RepoResult<Vec<OutboxRecord>>;
}
