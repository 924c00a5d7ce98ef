//! Repository implementations using SQLite.

mod outbox_repository;
mod reservation_repository;

pub use outbox_repository::SqliteOutboxRepository;
pub use reservation_repository::SqliteReservationRepository;

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::Type;

/// Format for `reserved_at`, a store-local wall-clock time
const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a stored UTC timestamp.
/// Handles both RFC3339 format and SQLite's `datetime('now')` format.
fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}

fn format_local(dt: &NaiveDateTime) -> String {
    dt.format(LOCAL_DATETIME_FORMAT).to_string()
}

fn parse_local(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, LOCAL_DATETIME_FORMAT).ok()
}

/// Column conversion failure for values rusqlite reads fine but we can't interpret
fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, message.into())
}

fn timestamp_column(row: &rusqlite::Row<'_>, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    parse_datetime(&raw).ok_or_else(|| conversion_error(column, format!("bad timestamp '{}'", raw)))
}

fn uuid_column(row: &rusqlite::Row<'_>, column: usize) -> rusqlite::Result<uuid::Uuid> {
    let raw: String = row.get(column)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}
