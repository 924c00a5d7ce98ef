//! RSVP Storage Layer
//!
//! SQLite persistence for reservations and the transactional outbox.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    Application                       │
//! ├──────────────────────────────────────────────────────┤
//! │               Repository Traits                      │
//! │     (ReservationRepository, OutboxRepository)        │
//! ├──────────────────────────────────────────────────────┤
//! │            SQLite Implementations                    │
//! │ (SqliteReservationRepository, SqliteOutboxRepository)│
//! ├──────────────────────────────────────────────────────┤
//! │                   Database                           │
//! │          (SQLite, WAL, numbered migrations)          │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use rsvp_storage::{Database, SqliteOutboxRepository, SqliteReservationRepository};
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! let db = Arc::new(Mutex::new(Database::open(&path)?));
//!
//! let reservations = SqliteReservationRepository::new(db.clone());
//! let outbox = SqliteOutboxRepository::new(db);
//! ```

mod database;
mod repositories;

pub use database::Database;
pub use repositories::*;

/// Default database file name.
pub const DATABASE_FILE: &str = "rsvp.db";

/// Get the default database path for the current platform.
pub fn default_database_path() -> Option<std::path::PathBuf> {
    dirs::data_local_dir().map(|p| p.join(rsvp_core::branding::IDENTIFIER).join(DATABASE_FILE))
}
