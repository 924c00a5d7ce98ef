//! RSVP Gateway
//!
//! HTTP server that provides:
//! - Role-dispatched reservation cancellation
//! - Booking, lookup and listing of reservations
//! - A uniform error envelope with correlation IDs
//! - Dependency Injection for clean architecture
//! - Event-driven architecture via DomainEvent consumers

pub mod config;
pub mod consumers;
pub mod logging;
pub mod server;

pub use config::{ConfigError, GatewayConfig};
pub use server::logging_middleware::MAX_REQUEST_BODY_SIZE;
pub use server::{
    build_router, error_response, AppState, DependenciesBuilder, GatewayDependencies,
    GatewayServer, StartupOrchestrator,
};

// Event-driven architecture consumers
pub use consumers::EventAuditLogger;
