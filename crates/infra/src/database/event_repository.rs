//! SQLite-backed implementation of the `EventRepository` port.
//!
//! Inserts use `ON CONFLICT(id) DO NOTHING`; the deterministic instance id
//! makes re-running a month a no-op.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use clubsched_core::EventRepository as EventRepositoryPort;
use clubsched_domain::{ClubSchedError, GeneratedEventInstance, Result as DomainResult, TimeOfDay};
use rusqlite::{params, Row};
use tokio::task;
use tracing::debug;
use uuid::Uuid;

use super::manager::{map_sql_error, DbManager};
use super::{format_date, map_join_error, parse_date, parse_enum};

/// SQLite-backed store of generated events
pub struct SqliteEventRepository {
    db: Arc<DbManager>,
}

impl SqliteEventRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventRepositoryPort for SqliteEventRepository {
    async fn upsert_events(&self, events: &[GeneratedEventInstance]) -> DomainResult<usize> {
        if events.is_empty() {
            return Ok(0);
        }
        let db = Arc::clone(&self.db);
        let events = events.to_vec();
        task::spawn_blocking(move || -> DomainResult<usize> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_sql_error)?;
            let mut inserted = 0;
            {
                let mut stmt = tx.prepare(EVENT_INSERT_SQL).map_err(map_sql_error)?;
                for event in &events {
                    inserted += stmt
                        .execute(params![
                            event.id.to_string(),
                            event.recurring_pattern_id,
                            event.title,
                            event.event_type.as_str(),
                            format_date(event.date),
                            event.start_time.to_string(),
                            event.end_time.to_string(),
                            event.location,
                            event.description,
                            event.is_recurring,
                        ])
                        .map_err(map_sql_error)?;
                }
            }
            tx.commit().map_err(map_sql_error)?;
            debug!(offered = events.len(), inserted, "events upserted");
            Ok(inserted)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_events_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<GeneratedEventInstance>> {
        if end < start {
            return Err(ClubSchedError::InvalidInput(format!(
                "range end {end} is before start {start}"
            )));
        }
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<Vec<GeneratedEventInstance>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(EVENT_RANGE_QUERY).map_err(map_sql_error)?;
            let mut rows = stmt
                .query(params![format_date(start), format_date(end)])
                .map_err(map_sql_error)?;
            let mut events = Vec::new();
            while let Some(row) = rows.next().map_err(map_sql_error)? {
                events.push(event_from_row(row)?);
            }
            Ok(events)
        })
        .await
        .map_err(map_join_error)?
    }
}

const EVENT_INSERT_SQL: &str = "INSERT INTO events (
        id, recurring_pattern_id, title, event_type, date, start_time, end_time, location,
        description, is_recurring, created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, CAST(strftime('%s','now') AS INTEGER))
    ON CONFLICT(id) DO NOTHING";

const EVENT_RANGE_QUERY: &str = "SELECT id, recurring_pattern_id, title, event_type, date,
        start_time, end_time, location, description, is_recurring
    FROM events
    WHERE date >= ?1 AND date <= ?2
    ORDER BY date, start_time, id";

fn event_from_row(row: &Row<'_>) -> DomainResult<GeneratedEventInstance> {
    let id: String = row.get(0).map_err(map_sql_error)?;
    let event_type: String = row.get(3).map_err(map_sql_error)?;
    let date: String = row.get(4).map_err(map_sql_error)?;
    let start_time: String = row.get(5).map_err(map_sql_error)?;
    let end_time: String = row.get(6).map_err(map_sql_error)?;

    Ok(GeneratedEventInstance {
        id: Uuid::parse_str(&id)
            .map_err(|e| ClubSchedError::Database(format!("invalid event id {id}: {e}")))?,
        recurring_pattern_id: row.get(1).map_err(map_sql_error)?,
        title: row.get(2).map_err(map_sql_error)?,
        event_type: parse_enum(&event_type)?,
        date: parse_date(&date)?,
        start_time: parse_time(&start_time)?,
        end_time: parse_time(&end_time)?,
        location: row.get(7).map_err(map_sql_error)?,
        description: row.get(8).map_err(map_sql_error)?,
        is_recurring: row.get(9).map_err(map_sql_error)?,
    })
}

fn parse_time(raw: &str) -> DomainResult<TimeOfDay> {
    TimeOfDay::parse(raw).map_err(|e| ClubSchedError::Database(format!("invalid stored time: {e}")))
}
