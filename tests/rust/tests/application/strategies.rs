//! Strategy registry dispatch and extension

use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use rsvp_core::{
    AdminStrategy, ApplicationServicesBuilder, CancelOutcome, CancellationStrategy,
    CustomerStrategy, EventBus, Requester, ReservationResult, StrategyRegistry,
};
use tests::async_helpers::fast_upstream;
use tests::fixtures::*;
use tests::*;

/// Lets customers cancel anything; stands in for a custom rule set
struct LenientCustomer;

#[async_trait]
impl CancellationStrategy for LenientCustomer {
    fn name(&self) -> &'static str {
        "lenient-customer"
    }

    fn supports(&self, role: Role) -> bool {
        role == Role::Customer
    }

    async fn authorize(&self, _: &Requester, _: &Reservation) -> ReservationResult<()> {
        Ok(())
    }
}

#[test]
fn test_standard_registry_covers_every_role() {
    let registry =
        StrategyRegistry::standard(Arc::new(standard_directory()), fast_upstream()).unwrap();

    assert_eq!(registry.supported_roles(), Role::ALL.to_vec());
    assert_eq!(registry.resolve("customer").unwrap().name(), CustomerStrategy.name());
    assert_eq!(registry.resolve("ADMIN").unwrap().name(), AdminStrategy.name());
    assert!(matches!(
        registry.resolve("GUEST"),
        Err(ReservationError::UnsupportedRole(_))
    ));
}

#[test]
fn test_two_strategies_for_one_role_is_ambiguous() {
    let result = StrategyRegistry::builder()
        .register(Arc::new(CustomerStrategy))
        .register(Arc::new(LenientCustomer))
        .build();

    assert!(matches!(
        result,
        Err(ReservationError::AmbiguousRole(Role::Customer))
    ));
}

#[test]
fn test_ambiguous_registry_fails_service_construction() {
    let store = Arc::new(MockReservationStore::new());
    let registry = StrategyRegistry::builder()
        .register(Arc::new(AdminStrategy))
        .register(Arc::new(AdminStrategy))
        .build();
    assert!(registry.is_err());

    // The standard registry is built from the directory at build time
    let built = ApplicationServicesBuilder::new()
        .with_event_bus(Arc::new(EventBus::new()))
        .with_reservation_repo(store.clone())
        .with_outbox_repo(store)
        .with_store_directory(Arc::new(standard_directory()))
        .with_policy_source(Arc::new(MockPolicySource::new()))
        .build();
    assert!(built.is_ok());
}

#[tokio::test]
async fn test_custom_strategy_replaces_default_rules() {
    let registry = StrategyRegistry::builder()
        .register(Arc::new(LenientCustomer))
        .build()
        .unwrap();

    let reservation = booked_reservation(CUSTOMER, STORE);
    let id = reservation.id;
    let h = ReservationTestHarness::builder()
        .store(MockReservationStore::new().with_reservation(reservation))
        .strategies(Arc::new(registry))
        .build();

    let outcome = h
        .services
        .cancellation
        .cancel(OTHER_CUSTOMER, id, "CUSTOMER")
        .await
        .unwrap();
    assert_eq!(outcome, CancelOutcome::Cancelled);

    // Roles without a registered strategy are unsupported
    let err = h
        .services
        .cancellation
        .cancel(ADMIN, id, "ADMIN")
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::UnsupportedRole(r) if r == "ADMIN"));
}
