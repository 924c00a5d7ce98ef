//! SQLite implementation of OutboxRepository.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rsvp_core::{OutboxRecord, OutboxRepository};
use rusqlite::{params, Connection};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{timestamp_column, uuid_column};
use crate::Database;

/// Insert an outbox record on an open connection (inside the caller's transaction)
pub(crate) fn insert_record(conn: &Connection, record: &OutboxRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO outbox (id, reservation_id, event_type, payload, created_at, delivered_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.id.to_string(),
            record.reservation_id.to_string(),
            record.event_type,
            record.payload,
            record.created_at.to_rfc3339(),
            record.delivered_at.map(|at| at.to_rfc3339()),
        ],
    )
    .with_context(|| format!("Failed to record {} event", record.event_type))?;
    Ok(())
}

const RECORD_COLUMNS: &str =
    "id, reservation_id, event_type, payload, created_at, delivered_at, quarantined_at, last_error";

fn optional_timestamp(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<chrono::DateTime<chrono::Utc>>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(_) => Ok(Some(timestamp_column(row, idx)?)),
        None => Ok(None),
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<OutboxRecord> {
    Ok(OutboxRecord {
        id: uuid_column(row, 0)?,
        reservation_id: uuid_column(row, 1)?,
        event_type: row.get(2)?,
        payload: row.get(3)?,
        created_at: timestamp_column(row, 4)?,
        delivered_at: optional_timestamp(row, 5)?,
        quarantined_at: optional_timestamp(row, 6)?,
        last_error: row.get(7)?,
    })
}

fn query_records(conn: &Connection, filter: &str, limit: usize) -> Result<Vec<OutboxRecord>> {
    let sql = format!(
        "SELECT {} FROM outbox WHERE {} ORDER BY seq ASC LIMIT ?1",
        RECORD_COLUMNS, filter
    );
    let mut stmt = conn.prepare(&sql)?;

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let records = stmt
        .query_map(params![limit], row_to_record)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// SQLite-backed read side of the transactional outbox.
pub struct SqliteOutboxRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteOutboxRepository {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OutboxRepository for SqliteOutboxRepository {
    async fn pending(&self, limit: usize) -> Result<Vec<OutboxRecord>> {
        let db = self.db.lock().await;
        query_records(
            db.connection(),
            "delivered_at IS NULL AND quarantined_at IS NULL",
            limit,
        )
        .context("Failed to read pending outbox records")
    }

    async fn mark_delivered(&self, id: &Uuid) -> Result<()> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let rows = conn.execute(
            "UPDATE outbox SET delivered_at = ?2 WHERE id = ?1 AND delivered_at IS NULL",
            params![id.to_string(), chrono::Utc::now().to_rfc3339()],
        )?;

        if rows == 0 {
            tracing::debug!(outbox_id = %id, "[OutboxRepository] Record already delivered or missing");
        }

        Ok(())
    }

    async fn quarantine(&self, id: &Uuid, reason: &str) -> Result<()> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let rows = conn
            .execute(
                "UPDATE outbox SET quarantined_at = ?2, last_error = ?3
                 WHERE id = ?1 AND delivered_at IS NULL AND quarantined_at IS NULL",
                params![id.to_string(), chrono::Utc::now().to_rfc3339(), reason],
            )
            .with_context(|| format!("Failed to quarantine outbox record {}", id))?;

        if rows == 0 {
            tracing::debug!(outbox_id = %id, "[OutboxRepository] Record not pending, nothing to quarantine");
        }

        Ok(())
    }

    async fn quarantined(&self, limit: usize) -> Result<Vec<OutboxRecord>> {
        let db = self.db.lock().await;
        query_records(db.connection(), "quarantined_at IS NOT NULL", limit)
            .context("Failed to read quarantined outbox records")
    }
}
