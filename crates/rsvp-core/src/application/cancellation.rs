//! Cancellation Coordinator
//!
//! Entry point for "cancel this reservation as this user acting in this role".

use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::outbox_relay::OutboxRelay;
use super::transition;
use crate::domain::Role;
use crate::error::ReservationResult;
use crate::repository::ReservationRepository;
use crate::strategy::{Requester, StrategyRegistry};

/// What a successful cancel did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancelOutcome {
    /// This call performed the transition and recorded the event
    Cancelled,
    /// The reservation was already cancelled; nothing changed
    AlreadyCancelled,
}

impl CancelOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cancelled => "CANCELLED",
            Self::AlreadyCancelled => "ALREADY_CANCELLED",
        }
    }
}

/// Orchestrates load, role dispatch, authorization, commit and relay.
///
/// Emits: `ReservationCancelled` (via the outbox)
pub struct CancellationCoordinator {
    reservations: Arc<dyn ReservationRepository>,
    strategies: Arc<StrategyRegistry>,
    relay: Arc<OutboxRelay>,
}

impl CancellationCoordinator {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        strategies: Arc<StrategyRegistry>,
        relay: Arc<OutboxRelay>,
    ) -> Self {
        Self {
            reservations,
            strategies,
            relay,
        }
    }

    /// Cancel `reservation_id` on behalf of `user_id` acting as `role`
    pub async fn cancel(
        &self,
        user_id: &str,
        reservation_id: Uuid,
        role: &str,
    ) -> ReservationResult<CancelOutcome> {
        let reservation = transition::load(self.reservations.as_ref(), reservation_id).await?;

        let role: Role = role.parse()?;
        let strategy = self.strategies.resolve_role(role)?;
        let requester = Requester::new(user_id, role);

        let plan = strategy.cancel_reservation(&requester, &reservation).await?;

        let applied = transition::commit(
            self.reservations.as_ref(),
            reservation_id,
            plan,
            |current| current.plan_cancellation(&requester.user_id, role),
        )
        .await?;

        match applied {
            Some(updated) => {
                info!(
                    reservation_id = %reservation_id,
                    user_id,
                    %role,
                    version = updated.version,
                    "[CancellationCoordinator] Cancelled reservation"
                );
                self.relay.flush_after_commit().await;
                Ok(CancelOutcome::Cancelled)
            }
            None => {
                info!(
                    reservation_id = %reservation_id,
                    user_id,
                    %role,
                    "[CancellationCoordinator] Already cancelled, nothing to do"
                );
                Ok(CancelOutcome::AlreadyCancelled)
            }
        }
    }
}
