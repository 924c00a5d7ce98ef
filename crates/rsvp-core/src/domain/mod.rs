//! Domain entities, value objects, and events
//!
//! This module contains all domain-level types for RSVP:
//! - Entities (Reservation)
//! - Value Objects (ReservationStatus, Role, OperatingHours, DepositRule)
//! - External projections (StoreOwnershipFact, ReservationPolicy)
//! - Domain Events (DomainEvent) and their outbox records

mod event;
mod policy;
mod reservation;
mod role;
mod store;

pub use event::{DomainEvent, OutboxRecord};
pub use policy::{DepositRule, ReservationPolicy};
pub use reservation::{Reservation, ReservationStatus, StatusTransition, TransitionPlan};
pub use role::Role;
pub use store::{OperatingHours, StoreOwnershipFact};
