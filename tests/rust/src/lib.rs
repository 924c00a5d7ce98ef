//! Shared test utilities and fixtures for RSVP integration tests.

pub use rsvp_core::domain::{
    DepositRule, OperatingHours, Reservation, ReservationPolicy, ReservationStatus, Role,
    StoreOwnershipFact,
};
pub use rsvp_core::{DomainEvent, ReservationError};

pub use mocks::{FlakyPublisher, MockPolicySource, MockReservationStore, MockStoreDirectory, Scripted};

/// Application service harness over the mocks
pub mod harness;
pub use harness::ReservationTestHarness;

/// Event testing utilities
pub mod events {
    use rsvp_core::{DomainEvent, EventReceiver};
    use std::time::Duration;

    /// Collect events from a receiver until it goes quiet for `timeout`
    pub async fn collect_events(rx: &mut EventReceiver, timeout: Duration) -> Vec<DomainEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = tokio::time::timeout(timeout, rx.recv()).await {
            events.push(event);
        }
        events
    }

    /// Drain whatever is already buffered without waiting
    pub fn drain(rx: &mut EventReceiver) -> Vec<DomainEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Count cancellation events in a batch
    pub fn cancellations(events: &[DomainEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, DomainEvent::ReservationCancelled { .. }))
            .count()
    }
}

/// Test fixture utilities
pub mod fixtures {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    pub const CUSTOMER: &str = "cust-1";
    pub const OTHER_CUSTOMER: &str = "cust-2";
    pub const OWNER: &str = "owner-1";
    pub const OTHER_OWNER: &str = "owner-2";
    pub const ADMIN: &str = "admin-1";
    pub const STORE: &str = "store-1";
    pub const OTHER_STORE: &str = "store-2";

    /// Christmas Eve at `h:m`, store-local
    pub fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 12, 24)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    /// Store open 10:00 to 22:00
    pub fn test_store(store_id: &str, owner_id: &str) -> StoreOwnershipFact {
        StoreOwnershipFact {
            store_id: store_id.to_string(),
            owner_id: owner_id.to_string(),
            store_name: format!("Test store {}", store_id),
            operating_hours: OperatingHours::new(
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            ),
        }
    }

    /// A booked dinner for two
    pub fn booked_reservation(user_id: &str, store_id: &str) -> Reservation {
        Reservation::new(user_id, store_id, at(19, 0), 2, 0)
    }

    pub fn reservation_in(status: ReservationStatus) -> Reservation {
        let mut r = booked_reservation(CUSTOMER, STORE);
        r.status = status;
        r
    }

    pub fn per_person_policy(store_id: &str, amount: i64) -> ReservationPolicy {
        ReservationPolicy {
            store_id: store_id.to_string(),
            deposit_rule: DepositRule::PerPerson { amount },
        }
    }

    /// Store directory knowing STORE (owned by OWNER) and OTHER_STORE (owned by OTHER_OWNER)
    pub fn standard_directory() -> MockStoreDirectory {
        MockStoreDirectory::new()
            .with_store(test_store(STORE, OWNER))
            .with_store(test_store(OTHER_STORE, OTHER_OWNER))
    }
}

/// Database test helpers
pub mod db {
    use rsvp_storage::{Database, SqliteOutboxRepository, SqliteReservationRepository};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    /// Create a temporary database for testing
    pub struct TestDatabase {
        pub db: Arc<Mutex<Database>>,
        temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestDatabase {
        /// Create a new test database in a temporary directory
        pub fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let db_path = temp_dir.path().join(rsvp_storage::DATABASE_FILE);
            let db = Database::open(&db_path).expect("Failed to open test database");
            Self {
                db: Arc::new(Mutex::new(db)),
                db_path,
                temp_dir,
            }
        }

        /// Create an in-memory database for fast tests
        pub fn in_memory() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let db = Database::open_in_memory().expect("Failed to open in-memory database");
            Self {
                db: Arc::new(Mutex::new(db)),
                db_path: PathBuf::new(),
                temp_dir,
            }
        }

        pub fn reservations(&self) -> SqliteReservationRepository {
            SqliteReservationRepository::new(self.db.clone())
        }

        pub fn outbox(&self) -> SqliteOutboxRepository {
            SqliteOutboxRepository::new(self.db.clone())
        }

        /// Get the database directory path
        pub fn path(&self) -> &Path {
            self.temp_dir.path()
        }

        /// Get the full database file path
        pub fn db_path(&self) -> &Path {
            &self.db_path
        }
    }

    impl Default for TestDatabase {
        fn default() -> Self {
            Self::new()
        }
    }
}

/// Test log output, filtered by `RUST_LOG`
pub mod logging {
    use tracing_subscriber::EnvFilter;

    /// Route tracing to the test harness' captured output; safe to call repeatedly
    pub fn init() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

/// Async test helpers
pub mod async_helpers {
    use std::time::Duration;
    use tokio::time::timeout;

    /// Run an async operation with a timeout
    pub async fn with_timeout<F, T>(duration: Duration, f: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        timeout(duration, f).await.expect("Operation timed out")
    }

    /// Default test timeout (5 seconds)
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Fast retries so upstream failure tests don't crawl
    pub fn fast_upstream() -> rsvp_core::UpstreamPolicy {
        rsvp_core::UpstreamPolicy {
            timeout: Duration::from_millis(200),
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(5),
        }
    }
}
