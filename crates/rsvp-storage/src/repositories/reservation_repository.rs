//! SQLite implementation of ReservationRepository.
//!
//! Every write commits the row change and its outbox record in one
//! transaction. Status transitions are compare-and-set on `version`.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rsvp_core::{
    OutboxRecord, Reservation, ReservationRepository, ReservationStatus, StatusTransition,
    TransitionResult,
};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::outbox_repository::insert_record;
use super::{conversion_error, format_local, parse_local, timestamp_column, uuid_column};
use crate::Database;

const SELECT_COLUMNS: &str = "SELECT id, user_id, store_id, reserved_at, headcount, deposit, status, version, created_at, updated_at
     FROM reservations";

fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let reserved_at: String = row.get(3)?;
    let status: String = row.get(6)?;

    Ok(Reservation {
        id: uuid_column(row, 0)?,
        user_id: row.get(1)?,
        store_id: row.get(2)?,
        reserved_at: parse_local(&reserved_at)
            .ok_or_else(|| conversion_error(3, format!("bad reserved_at '{}'", reserved_at)))?,
        headcount: row.get(4)?,
        deposit: row.get(5)?,
        status: ReservationStatus::parse(&status)
            .ok_or_else(|| conversion_error(6, format!("unknown status '{}'", status)))?,
        version: row.get(7)?,
        created_at: timestamp_column(row, 8)?,
        updated_at: timestamp_column(row, 9)?,
    })
}

fn fetch(conn: &Connection, id: &Uuid) -> Result<Option<Reservation>> {
    let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
    conn.query_row(&sql, params![id.to_string()], row_to_reservation)
        .optional()
        .with_context(|| format!("Failed to load reservation {}", id))
}

fn list_where(conn: &Connection, column: &str, value: &str) -> Result<Vec<Reservation>> {
    let sql = format!(
        "{} WHERE {} = ?1 ORDER BY created_at DESC, reserved_at DESC",
        SELECT_COLUMNS, column
    );
    let mut stmt = conn.prepare(&sql)?;
    let reservations = stmt
        .query_map(params![value], row_to_reservation)?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to list reservations by {}", column))?;
    Ok(reservations)
}

/// SQLite-backed implementation of ReservationRepository.
pub struct SqliteReservationRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteReservationRepository {
    /// Create a new SQLite reservation repository.
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReservationRepository for SqliteReservationRepository {
    async fn get(&self, id: &Uuid) -> Result<Option<Reservation>> {
        let db = self.db.lock().await;
        fetch(db.connection(), id)
    }

    async fn create(&self, reservation: &Reservation, event: &OutboxRecord) -> Result<()> {
        let db = self.db.lock().await;

        db.transaction(|conn| {
            conn.execute(
                "INSERT INTO reservations (id, user_id, store_id, reserved_at, headcount, deposit, status, version, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    reservation.id.to_string(),
                    reservation.user_id,
                    reservation.store_id,
                    format_local(&reservation.reserved_at),
                    reservation.headcount,
                    reservation.deposit,
                    reservation.status.as_str(),
                    reservation.version,
                    reservation.created_at.to_rfc3339(),
                    reservation.updated_at.to_rfc3339(),
                ],
            )
            .with_context(|| format!("Failed to insert reservation {}", reservation.id))?;

            insert_record(conn, event)
        })
    }

    async fn apply_transition(&self, transition: &StatusTransition) -> Result<TransitionResult> {
        let db = self.db.lock().await;

        db.transaction(|conn| {
            let rows = conn.execute(
                "UPDATE reservations
                 SET status = ?3, version = version + 1, updated_at = ?4
                 WHERE id = ?1 AND version = ?2",
                params![
                    transition.reservation_id.to_string(),
                    transition.expected_version,
                    transition.to.as_str(),
                    transition.at.to_rfc3339(),
                ],
            )?;

            if rows == 0 {
                debug!(
                    reservation_id = %transition.reservation_id,
                    expected_version = transition.expected_version,
                    "[ReservationRepository] Version conflict"
                );
                return Ok(TransitionResult::VersionConflict);
            }

            insert_record(conn, &transition.outbox)?;

            let updated = fetch(conn, &transition.reservation_id)?.with_context(|| {
                format!("Reservation {} vanished mid-transaction", transition.reservation_id)
            })?;
            Ok(TransitionResult::Applied(updated))
        })
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Reservation>> {
        let db = self.db.lock().await;
        list_where(db.connection(), "user_id", user_id)
    }

    async fn list_for_store(&self, store_id: &str) -> Result<Vec<Reservation>> {
        let db = self.db.lock().await;
        list_where(db.connection(), "store_id", store_id)
    }
}
