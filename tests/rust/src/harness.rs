//! Wires `ApplicationServices` over in-memory mocks

use std::sync::Arc;

use rsvp_core::{
    ApplicationServices, ApplicationServicesBuilder, EventBus, EventPublisher, EventReceiver,
    StrategyRegistry, UpstreamPolicy,
};

use crate::async_helpers::fast_upstream;
use crate::fixtures;
use crate::mocks::{MockPolicySource, MockReservationStore, MockStoreDirectory};

/// Application services over mocks, with a subscriber attached before any event flows
pub struct ReservationTestHarness {
    pub services: ApplicationServices,
    pub store: Arc<MockReservationStore>,
    pub directory: Arc<MockStoreDirectory>,
    pub policies: Arc<MockPolicySource>,
    pub events: EventReceiver,
}

impl ReservationTestHarness {
    /// Standard stores, no policies, fast upstream retries
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }
}

impl Default for ReservationTestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
pub struct HarnessBuilder {
    store: Option<MockReservationStore>,
    directory: Option<MockStoreDirectory>,
    policies: Option<MockPolicySource>,
    publisher: Option<Arc<dyn EventPublisher>>,
    strategies: Option<Arc<StrategyRegistry>>,
    upstream: Option<UpstreamPolicy>,
    bus: Option<Arc<EventBus>>,
}

impl HarnessBuilder {
    pub fn store(mut self, store: MockReservationStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn directory(mut self, directory: MockStoreDirectory) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn policies(mut self, policies: MockPolicySource) -> Self {
        self.policies = Some(policies);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn strategies(mut self, strategies: Arc<StrategyRegistry>) -> Self {
        self.strategies = Some(strategies);
        self
    }

    pub fn upstream(mut self, upstream: UpstreamPolicy) -> Self {
        self.upstream = Some(upstream);
        self
    }

    /// Share a bus created by the test, e.g. to feed a `FlakyPublisher`
    pub fn bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn build(self) -> ReservationTestHarness {
        let store = Arc::new(self.store.unwrap_or_default());
        let directory = Arc::new(self.directory.unwrap_or_else(fixtures::standard_directory));
        let policies = Arc::new(self.policies.unwrap_or_default());
        let bus = self.bus.unwrap_or_else(|| Arc::new(EventBus::new()));
        let events = bus.subscribe();

        let mut builder = ApplicationServicesBuilder::new()
            .with_event_bus(bus)
            .with_reservation_repo(store.clone())
            .with_outbox_repo(store.clone())
            .with_store_directory(directory.clone())
            .with_policy_source(policies.clone())
            .with_upstream_policy(self.upstream.unwrap_or_else(fast_upstream));

        if let Some(publisher) = self.publisher {
            builder = builder.with_publisher(publisher);
        }
        if let Some(strategies) = self.strategies {
            builder = builder.with_strategies(strategies);
        }

        ReservationTestHarness {
            services: builder.build().expect("Failed to build application services"),
            store,
            directory,
            policies,
            events,
        }
    }
}
