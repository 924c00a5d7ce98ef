//! Role-based cancellation strategies
//!
//! Each strategy decides whether a requester acting under a given role may
//! cancel a reservation, then produces the cancellation transition. The
//! registry picks the strategy for a role by asking each one whether it
//! `supports` it; exactly one must answer yes.
//!
//! ```text
//! "OWNER" ──parse──▶ Role::Owner ──registry──▶ OwnerStrategy
//!                                                 │ authorize (store directory, retried)
//!                                                 ▼
//!                                        Reservation::plan_cancellation
//! ```

mod admin;
mod customer;
mod owner;

pub use admin::AdminStrategy;
pub use customer::CustomerStrategy;
pub use owner::OwnerStrategy;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::domain::{Reservation, Role, TransitionPlan};
use crate::error::{ReservationError, ReservationResult};
use crate::service::{StoreDirectory, UpstreamPolicy};

/// Who is asking, and under which role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub user_id: String,
    pub role: Role,
}

impl Requester {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}

/// Authorization and cancellation policy for one or more roles
#[async_trait]
pub trait CancellationStrategy: Send + Sync {
    /// Name for logs
    fn name(&self) -> &'static str;

    /// Whether this strategy handles `role`
    fn supports(&self, role: Role) -> bool;

    /// Fail with `Forbidden` (or `UpstreamUnavailable`) unless the requester may cancel
    async fn authorize(&self, requester: &Requester, reservation: &Reservation) -> ReservationResult<()>;

    /// Authorize, then plan the cancellation.
    ///
    /// Authorization runs before the idempotency check, so an unauthorized
    /// requester is refused even on an already-cancelled reservation.
    async fn cancel_reservation(
        &self,
        requester: &Requester,
        reservation: &Reservation,
    ) -> ReservationResult<TransitionPlan> {
        self.authorize(requester, reservation).await?;
        reservation.plan_cancellation(&requester.user_id, requester.role)
    }
}

/// Immutable set of strategies, checked for ambiguity when built
pub struct StrategyRegistry {
    strategies: Vec<Arc<dyn CancellationStrategy>>,
}

impl StrategyRegistry {
    pub fn builder() -> StrategyRegistryBuilder {
        StrategyRegistryBuilder::new()
    }

    /// Customer, owner and admin strategies
    pub fn standard(
        directory: Arc<dyn StoreDirectory>,
        upstream: UpstreamPolicy,
    ) -> ReservationResult<Self> {
        Self::builder()
            .register(Arc::new(CustomerStrategy))
            .register(Arc::new(OwnerStrategy::new(directory, upstream)))
            .register(Arc::new(AdminStrategy))
            .build()
    }

    /// Resolve a role string from the authentication context
    pub fn resolve(&self, role: &str) -> ReservationResult<Arc<dyn CancellationStrategy>> {
        let role: Role = role.parse()?;
        self.resolve_role(role)
    }

    /// Resolve a parsed role
    pub fn resolve_role(&self, role: Role) -> ReservationResult<Arc<dyn CancellationStrategy>> {
        let strategy = self
            .strategies
            .iter()
            .find(|s| s.supports(role))
            .cloned()
            .ok_or_else(|| ReservationError::UnsupportedRole(role.to_string()))?;

        debug!(%role, strategy = strategy.name(), "[StrategyRegistry] Resolved strategy");
        Ok(strategy)
    }

    /// Roles with a registered strategy
    pub fn supported_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.strategies.iter().any(|s| s.supports(*role)))
            .collect()
    }
}

/// Builder for [`StrategyRegistry`]
#[derive(Default)]
pub struct StrategyRegistryBuilder {
    strategies: Vec<Arc<dyn CancellationStrategy>>,
}

impl StrategyRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, strategy: Arc<dyn CancellationStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Build the registry, failing if any role is claimed twice
    pub fn build(self) -> ReservationResult<StrategyRegistry> {
        for role in Role::ALL {
            let claimants = self.strategies.iter().filter(|s| s.supports(role)).count();
            if claimants > 1 {
                return Err(ReservationError::AmbiguousRole(role));
            }
        }

        Ok(StrategyRegistry {
            strategies: self.strategies,
        })
    }
}
