//! Application Services - Orchestration layer with outbox-backed events
//!
//! Application services sit between the presentation layer (HTTP handlers)
//! and the domain layer (repositories, strategies, outbound clients). They:
//!
//! 1. **Orchestrate** business operations across repositories and upstreams
//! 2. **Record events** in the outbox in the same transaction as the change
//! 3. **Relay** committed events to the event bus
//! 4. **Validate** inputs and enforce business rules
//!
//! # Architecture
//!
//! ```text
//! Presentation Layer (axum handlers)
//!         │
//!         ▼
//! ┌──────────────────────────────────────┐
//! │      Application Services            │
//! │  ┌──────────────────────────────┐    │
//! │  │ CancellationCoordinator      │    │
//! │  │ ReservationAppService        │    │
//! │  └──────────────┬───────────────┘    │
//! │                 │ commit + outbox    │
//! │                 ▼                    │
//! │          ┌────────────┐   ┌────────┐ │
//! │          │OutboxRelay │──▶│EventBus│ │
//! │          └────────────┘   └────────┘ │
//! └──────────────────────────────────────┘
//!         │
//!         ▼
//! Domain Layer (Repositories, Strategies)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let services = ApplicationServicesBuilder::new()
//!     .with_event_bus(event_bus)
//!     .with_reservation_repo(reservations)
//!     .with_outbox_repo(outbox)
//!     .with_store_directory(directory)
//!     .with_policy_source(policies)
//!     .build()?;
//!
//! let outcome = services.cancellation.cancel("u-1", id, "CUSTOMER").await?;
//! // -> Emits ReservationCancelled once committed
//! ```

mod cancellation;
mod outbox_relay;
mod reservation;
mod transition;

pub use cancellation::{CancelOutcome, CancellationCoordinator};
pub use outbox_relay::{EventPublisher, OutboxRelay};
pub use reservation::{BookingRequest, CompleteOutcome, ReservationAppService, MAX_HEADCOUNT};

use anyhow::anyhow;
use std::sync::Arc;

use crate::event_bus::EventBus;
use crate::repository::{OutboxRepository, ReservationRepository};
use crate::service::{PolicySource, StoreDirectory, UpstreamPolicy};
use crate::strategy::StrategyRegistry;

/// Builder for creating all application services with shared dependencies
pub struct ApplicationServicesBuilder {
    event_bus: Option<Arc<EventBus>>,
    reservation_repo: Option<Arc<dyn ReservationRepository>>,
    outbox_repo: Option<Arc<dyn OutboxRepository>>,
    store_directory: Option<Arc<dyn StoreDirectory>>,
    policy_source: Option<Arc<dyn PolicySource>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    strategies: Option<Arc<StrategyRegistry>>,
    upstream: UpstreamPolicy,
}

impl ApplicationServicesBuilder {
    pub fn new() -> Self {
        Self {
            event_bus: None,
            reservation_repo: None,
            outbox_repo: None,
            store_directory: None,
            policy_source: None,
            publisher: None,
            strategies: None,
            upstream: UpstreamPolicy::default(),
        }
    }

    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(bus);
        self
    }

    pub fn with_reservation_repo(mut self, repo: Arc<dyn ReservationRepository>) -> Self {
        self.reservation_repo = Some(repo);
        self
    }

    pub fn with_outbox_repo(mut self, repo: Arc<dyn OutboxRepository>) -> Self {
        self.outbox_repo = Some(repo);
        self
    }

    pub fn with_store_directory(mut self, directory: Arc<dyn StoreDirectory>) -> Self {
        self.store_directory = Some(directory);
        self
    }

    pub fn with_policy_source(mut self, source: Arc<dyn PolicySource>) -> Self {
        self.policy_source = Some(source);
        self
    }

    /// Publish relayed events somewhere other than the event bus
    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Use a custom registry instead of the standard customer/owner/admin set
    pub fn with_strategies(mut self, registry: Arc<StrategyRegistry>) -> Self {
        self.strategies = Some(registry);
        self
    }

    pub fn with_upstream_policy(mut self, policy: UpstreamPolicy) -> Self {
        self.upstream = policy;
        self
    }

    /// Build all application services
    pub fn build(self) -> anyhow::Result<ApplicationServices> {
        let event_bus = self.event_bus.ok_or_else(|| anyhow!("Event bus required"))?;
        let reservations = self
            .reservation_repo
            .ok_or_else(|| anyhow!("Reservation repository required"))?;
        let outbox = self
            .outbox_repo
            .ok_or_else(|| anyhow!("Outbox repository required"))?;
        let directory = self
            .store_directory
            .ok_or_else(|| anyhow!("Store directory required"))?;
        let policies = self
            .policy_source
            .ok_or_else(|| anyhow!("Policy source required"))?;

        let publisher = self
            .publisher
            .unwrap_or_else(|| Arc::new(event_bus.sender()) as Arc<dyn EventPublisher>);

        let strategies = match self.strategies {
            Some(registry) => registry,
            None => Arc::new(StrategyRegistry::standard(
                directory.clone(),
                self.upstream.clone(),
            )?),
        };

        let relay = Arc::new(OutboxRelay::new(outbox, publisher));

        Ok(ApplicationServices {
            event_bus,
            strategies: strategies.clone(),
            cancellation: CancellationCoordinator::new(
                reservations.clone(),
                strategies,
                relay.clone(),
            ),
            reservations: ReservationAppService::new(
                reservations,
                directory,
                policies,
                self.upstream,
                relay.clone(),
            ),
            relay,
        })
    }
}

impl Default for ApplicationServicesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for all application services
pub struct ApplicationServices {
    /// Shared event bus
    pub event_bus: Arc<EventBus>,
    /// Role dispatch
    pub strategies: Arc<StrategyRegistry>,
    /// Cancellation entry point
    pub cancellation: CancellationCoordinator,
    /// Booking, lookup and completion
    pub reservations: ReservationAppService,
    /// Outbox to event bus
    pub relay: Arc<OutboxRelay>,
}

impl ApplicationServices {
    /// Subscribe to relayed events
    pub fn subscribe(&self) -> crate::event_bus::EventReceiver {
        self.event_bus.subscribe()
    }
}
