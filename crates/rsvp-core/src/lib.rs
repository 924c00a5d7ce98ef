//! # RSVP Core Library
//!
//! Domain logic, entities, and business rules for RSVP.
//!
//! ## Modules
//!
//! - `branding` - Centralized product constants (ports, env prefix, user agent)
//! - `domain` - Core entities (Reservation, Role, StoreOwnershipFact, ReservationPolicy)
//! - `error` - Domain error taxonomy shared by every service boundary
//! - `repository` - Data access traits
//! - `service` - Outbound collaborators (store directory, policy lookup, retry wrapper)
//! - `strategy` - Role-based cancellation strategies and their registry
//! - `application` - Application services with outbox-backed event emission
//! - `event_bus` - Central event distribution system

pub mod application;
pub mod branding;
pub mod domain;
pub mod error;
pub mod event_bus;
pub mod repository;
pub mod service;
pub mod strategy;

// Re-export commonly used types
pub use domain::*;
pub use error::{ErrorCode, ReservationError, ReservationResult};
pub use repository::*;
pub use service::*;
pub use strategy::{
    AdminStrategy, CancellationStrategy, CustomerStrategy, OwnerStrategy, Requester,
    StrategyRegistry, StrategyRegistryBuilder,
};

// Event-driven architecture exports
pub use application::{
    ApplicationServices, ApplicationServicesBuilder, BookingRequest, CancelOutcome,
    CancellationCoordinator, CompleteOutcome, EventPublisher, OutboxRelay, ReservationAppService,
    MAX_HEADCOUNT,
};
pub use event_bus::{EventBus, EventReceiver, EventSender};
