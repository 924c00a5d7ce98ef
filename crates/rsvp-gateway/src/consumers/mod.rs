//! Event Consumers - Domain event handlers
//!
//! Consumers subscribe to DomainEvents from the EventBus once the outbox
//! relay has published them:
//!
//! - **EventAuditLogger**: Writes one structured audit line per event
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     EventBus (DomainEvent)                      │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!         ┌────────────────────┼────────────────────┐
//!         │                    │                    │
//!         ▼                    ▼                    ▼
//!   ┌─────────────┐     ┌──────────────┐     ┌───────────┐
//!   │ AuditLogger │     │ Notification │     │ Analytics │
//!   │             │     │   (future)   │     │ (future)  │
//!   └─────────────┘     └──────────────┘     └───────────┘
//! ```
//!
//! Delivery is at-least-once, so consumers must tolerate duplicates.

mod audit_log;

pub use audit_log::EventAuditLogger;
