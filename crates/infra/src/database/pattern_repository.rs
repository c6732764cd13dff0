//! SQLite-backed implementation of the `PatternRepository` port.
//!
//! Patterns are stored column by column in their record shape and
//! re-validated on the way out, so a row edited by hand into an invalid
//! state surfaces as a database error instead of reaching the generator.

use std::sync::Arc;

use async_trait::async_trait;
use clubsched_core::PatternRepository as PatternRepositoryPort;
use clubsched_domain::{ClubSchedError, PatternRecord, RecurrencePattern, Result as DomainResult};
use rusqlite::{params, Connection, Row};
use tokio::task;
use tracing::debug;

use super::manager::{map_sql_error, DbManager};
use super::{format_date, map_join_error, parse_date, parse_enum};

/// SQLite-backed pattern store
pub struct SqlitePatternRepository {
    db: Arc<DbManager>,
}

impl SqlitePatternRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PatternRepositoryPort for SqlitePatternRepository {
    async fn list_active_patterns(&self) -> DomainResult<Vec<RecurrencePattern>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<Vec<RecurrencePattern>> {
            let conn = db.get_connection()?;
            query_patterns(&conn, PATTERN_ACTIVE_QUERY)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_patterns(&self) -> DomainResult<Vec<RecurrencePattern>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> DomainResult<Vec<RecurrencePattern>> {
            let conn = db.get_connection()?;
            query_patterns(&conn, PATTERN_ALL_QUERY)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get_pattern(&self, id: &str) -> DomainResult<Option<RecurrencePattern>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();
        task::spawn_blocking(move || -> DomainResult<Option<RecurrencePattern>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(PATTERN_BY_ID_QUERY).map_err(map_sql_error)?;
            let mut rows = stmt.query(params![id]).map_err(map_sql_error)?;
            match rows.next().map_err(map_sql_error)? {
                Some(row) => Ok(Some(pattern_from_row(row)?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn save_pattern(&self, pattern: &RecurrencePattern) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let record = pattern.to_record();
        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            upsert_pattern(&conn, &record)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Insert a batch of new patterns in one transaction; any existing id
    /// rolls the whole batch back.
    async fn insert_patterns(&self, patterns: &[RecurrencePattern]) -> DomainResult<()> {
        if patterns.is_empty() {
            return Ok(());
        }
        let db = Arc::clone(&self.db);
        let records: Vec<PatternRecord> = patterns.iter().map(RecurrencePattern::to_record).collect();
        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_sql_error)?;
            for record in &records {
                let id = record.id.as_deref().unwrap_or_default();
                if pattern_exists(&tx, id)? {
                    return Err(ClubSchedError::InvalidInput(format!("pattern {id} already exists")));
                }
                write_pattern(&tx, &insert_sql(), record)?;
            }
            tx.commit().map_err(map_sql_error)?;
            debug!(count = records.len(), "patterns inserted");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn deactivate_pattern(&self, id: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();
        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            deactivate(&conn, &id)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Store the new version and retire the old one in a single transaction.
    async fn replace_pattern(&self, revised: &RecurrencePattern) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let record = revised.to_record();
        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_sql_error)?;
            upsert_pattern(&tx, &record)?;
            if let Some(previous) = record.supersedes.as_deref() {
                deactivate(&tx, previous)?;
            }
            tx.commit().map_err(map_sql_error)?;
            debug!(id = ?record.id, supersedes = ?record.supersedes, "pattern replaced");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

const PATTERN_COLUMNS: &str = "id, title, location, description, start_time, end_time, event_type,
        kind, day_of_week, week_of_month, skip_holidays, valid_from, valid_until, is_active,
        supersedes";

const PATTERN_ALL_QUERY: &str = "SELECT id, title, location, description, start_time, end_time,
        event_type, kind, day_of_week, week_of_month, skip_holidays, valid_from, valid_until,
        is_active, supersedes
    FROM recurring_patterns
    ORDER BY id";

const PATTERN_ACTIVE_QUERY: &str = "SELECT id, title, location, description, start_time, end_time,
        event_type, kind, day_of_week, week_of_month, skip_holidays, valid_from, valid_until,
        is_active, supersedes
    FROM recurring_patterns
    WHERE is_active = 1
    ORDER BY id";

const PATTERN_BY_ID_QUERY: &str = "SELECT id, title, location, description, start_time, end_time,
        event_type, kind, day_of_week, week_of_month, skip_holidays, valid_from, valid_until,
        is_active, supersedes
    FROM recurring_patterns
    WHERE id = ?1";

const PATTERN_DEACTIVATE_SQL: &str =
    "UPDATE recurring_patterns SET is_active = 0, updated_at = CAST(strftime('%s','now') AS INTEGER) WHERE id = ?1";

const PATTERN_EXISTS_QUERY: &str = "SELECT EXISTS(SELECT 1 FROM recurring_patterns WHERE id = ?1)";

fn insert_sql() -> String {
    format!(
        "INSERT INTO recurring_patterns ({PATTERN_COLUMNS}, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                 CAST(strftime('%s','now') AS INTEGER))"
    )
}

fn upsert_sql() -> String {
    format!(
        "{}
         ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            location = excluded.location,
            description = excluded.description,
            start_time = excluded.start_time,
            end_time = excluded.end_time,
            event_type = excluded.event_type,
            kind = excluded.kind,
            day_of_week = excluded.day_of_week,
            week_of_month = excluded.week_of_month,
            skip_holidays = excluded.skip_holidays,
            valid_from = excluded.valid_from,
            valid_until = excluded.valid_until,
            is_active = excluded.is_active,
            supersedes = excluded.supersedes,
            updated_at = excluded.updated_at",
        insert_sql()
    )
}

fn upsert_pattern(conn: &Connection, record: &PatternRecord) -> DomainResult<()> {
    write_pattern(conn, &upsert_sql(), record)
}

fn write_pattern(conn: &Connection, sql: &str, record: &PatternRecord) -> DomainResult<()> {
    conn.execute(
        sql,
        params![
            record.id,
            record.title,
            record.location,
            record.description,
            record.start_time,
            record.end_time,
            record.event_type.as_str(),
            record.kind.as_str(),
            record.day_of_week,
            record.week_of_month,
            record.skip_holidays,
            format_date(record.valid_from),
            record.valid_until.map(format_date),
            record.is_active,
            record.supersedes,
        ],
    )
    .map_err(map_sql_error)?;
    Ok(())
}

fn pattern_exists(conn: &Connection, id: &str) -> DomainResult<bool> {
    conn.query_row(PATTERN_EXISTS_QUERY, params![id], |row| row.get(0)).map_err(map_sql_error)
}

fn deactivate(conn: &Connection, id: &str) -> DomainResult<()> {
    let updated = conn.execute(PATTERN_DEACTIVATE_SQL, params![id]).map_err(map_sql_error)?;
    if updated == 0 {
        return Err(ClubSchedError::NotFound(format!("pattern {id}")));
    }
    Ok(())
}

fn query_patterns(conn: &Connection, sql: &str) -> DomainResult<Vec<RecurrencePattern>> {
    let mut stmt = conn.prepare(sql).map_err(map_sql_error)?;
    let mut rows = stmt.query([]).map_err(map_sql_error)?;
    let mut patterns = Vec::new();
    while let Some(row) = rows.next().map_err(map_sql_error)? {
        patterns.push(pattern_from_row(row)?);
    }
    Ok(patterns)
}

fn pattern_from_row(row: &Row<'_>) -> DomainResult<RecurrencePattern> {
    let id: String = row.get(0).map_err(map_sql_error)?;
    let event_type: String = row.get(6).map_err(map_sql_error)?;
    let kind: String = row.get(7).map_err(map_sql_error)?;
    let valid_from: String = row.get(11).map_err(map_sql_error)?;
    let valid_until: Option<String> = row.get(12).map_err(map_sql_error)?;

    let record = PatternRecord {
        id: Some(id.clone()),
        title: row.get(1).map_err(map_sql_error)?,
        location: row.get(2).map_err(map_sql_error)?,
        description: row.get(3).map_err(map_sql_error)?,
        start_time: row.get(4).map_err(map_sql_error)?,
        end_time: row.get(5).map_err(map_sql_error)?,
        event_type: parse_enum(&event_type)?,
        kind: parse_enum(&kind)?,
        day_of_week: row.get(8).map_err(map_sql_error)?,
        week_of_month: row.get(9).map_err(map_sql_error)?,
        skip_holidays: row.get(10).map_err(map_sql_error)?,
        valid_from: parse_date(&valid_from)?,
        valid_until: valid_until.as_deref().map(parse_date).transpose()?,
        is_active: row.get(13).map_err(map_sql_error)?,
        supersedes: row.get(14).map_err(map_sql_error)?,
    };

    RecurrencePattern::new(record)
        .map_err(|err| ClubSchedError::Database(format!("stored pattern {id} is invalid: {err}")))
}
