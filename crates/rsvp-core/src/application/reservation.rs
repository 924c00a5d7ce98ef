//! Reservation Application Service
//!
//! Booking, lookup and completion. Cancellation lives in the coordinator.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::outbox_relay::OutboxRelay;
use super::transition;
use crate::domain::{DomainEvent, OutboxRecord, Reservation, ReservationPolicy, StoreOwnershipFact};
use crate::error::{ReservationError, ReservationResult};
use crate::repository::ReservationRepository;
use crate::service::{PolicySource, StoreDirectory, UpstreamError, UpstreamPolicy};

/// Largest party a single reservation can seat
pub const MAX_HEADCOUNT: u32 = 500;

/// Input for [`ReservationAppService::book`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub user_id: String,
    pub store_id: String,
    pub reserved_at: NaiveDateTime,
    pub headcount: u32,
}

/// What a successful complete did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompleteOutcome {
    Completed,
    AlreadyCompleted,
}

/// Application service for reservations
pub struct ReservationAppService {
    reservations: Arc<dyn ReservationRepository>,
    directory: Arc<dyn StoreDirectory>,
    policies: Arc<dyn PolicySource>,
    upstream: UpstreamPolicy,
    relay: Arc<OutboxRelay>,
}

impl ReservationAppService {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        directory: Arc<dyn StoreDirectory>,
        policies: Arc<dyn PolicySource>,
        upstream: UpstreamPolicy,
        relay: Arc<OutboxRelay>,
    ) -> Self {
        Self {
            reservations,
            directory,
            policies,
            upstream,
            relay,
        }
    }

    /// Book a reservation
    ///
    /// Emits: `ReservationBooked` (via the outbox)
    pub async fn book(&self, request: BookingRequest) -> ReservationResult<Reservation> {
        let user_id = request.user_id.trim();
        let store_id = request.store_id.trim();

        if user_id.is_empty() {
            return Err(ReservationError::InvalidRequest("userId is required".into()));
        }
        if store_id.is_empty() {
            return Err(ReservationError::InvalidRequest("storeId is required".into()));
        }
        if request.headcount == 0 {
            return Err(ReservationError::InvalidRequest(
                "headcount must be at least 1".into(),
            ));
        }
        if request.headcount > MAX_HEADCOUNT {
            return Err(ReservationError::InvalidRequest(format!(
                "headcount must be at most {}",
                MAX_HEADCOUNT
            )));
        }

        let store = self.store_details(store_id).await?;
        if !store.operating_hours.contains(request.reserved_at.time()) {
            return Err(ReservationError::InvalidRequest(format!(
                "store {} is closed at {}",
                store_id,
                request.reserved_at.time()
            )));
        }

        let policy = self.policy(store_id).await?;
        let deposit = policy.required_deposit(request.headcount).ok_or_else(|| {
            warn!(
                store_id,
                rule = ?policy.deposit_rule,
                headcount = request.headcount,
                "[ReservationAppService] Policy yields no usable deposit"
            );
            ReservationError::UpstreamUnavailable(format!(
                "deposit policy for store {} is invalid",
                store_id
            ))
        })?;

        let reservation = Reservation::new(
            user_id,
            store_id,
            request.reserved_at,
            request.headcount,
            deposit,
        );
        let event = OutboxRecord::for_event(&DomainEvent::ReservationBooked {
            reservation_id: reservation.id,
            user_id: reservation.user_id.clone(),
            store_id: reservation.store_id.clone(),
        })?;

        self.reservations.create(&reservation, &event).await?;

        info!(
            reservation_id = %reservation.id,
            user_id,
            store_id,
            headcount = reservation.headcount,
            deposit,
            "[ReservationAppService] Booked reservation"
        );

        self.relay.flush_after_commit().await;
        Ok(reservation)
    }

    /// Get a reservation by ID
    pub async fn get(&self, id: Uuid) -> ReservationResult<Reservation> {
        transition::load(self.reservations.as_ref(), id).await
    }

    pub async fn list_for_user(&self, user_id: &str) -> ReservationResult<Vec<Reservation>> {
        Ok(self.reservations.list_for_user(user_id).await?)
    }

    pub async fn list_for_store(&self, store_id: &str) -> ReservationResult<Vec<Reservation>> {
        Ok(self.reservations.list_for_store(store_id).await?)
    }

    /// Mark a reservation fulfilled
    ///
    /// Emits: `ReservationCompleted` (via the outbox)
    pub async fn complete(&self, id: Uuid) -> ReservationResult<CompleteOutcome> {
        let reservation = transition::load(self.reservations.as_ref(), id).await?;
        let plan = reservation.plan_completion()?;

        let applied = transition::commit(self.reservations.as_ref(), id, plan, |current| {
            current.plan_completion()
        })
        .await?;

        match applied {
            Some(_) => {
                info!(reservation_id = %id, "[ReservationAppService] Completed reservation");
                self.relay.flush_after_commit().await;
                Ok(CompleteOutcome::Completed)
            }
            None => Ok(CompleteOutcome::AlreadyCompleted),
        }
    }

    async fn store_details(&self, store_id: &str) -> ReservationResult<StoreOwnershipFact> {
        self.upstream
            .call("get_store_details", || self.directory.get_store_details(store_id))
            .await
            .map_err(|e| match e {
                UpstreamError::NotFound => {
                    ReservationError::NotFound(format!("store {}", store_id))
                }
                e => ReservationError::UpstreamUnavailable(format!("store directory: {}", e)),
            })
    }

    async fn policy(&self, store_id: &str) -> ReservationResult<ReservationPolicy> {
        match self
            .upstream
            .call("get_policy", || self.policies.get_policy(store_id))
            .await
        {
            Ok(policy) => Ok(policy),
            Err(UpstreamError::NotFound) => Ok(ReservationPolicy::no_deposit(store_id)),
            Err(e) => Err(ReservationError::UpstreamUnavailable(format!(
                "policy service: {}",
                e
            ))),
        }
    }
}
