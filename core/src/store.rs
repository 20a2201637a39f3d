//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The desk calls store methods. It never executes SQL directly.
//!
//! Timestamps are stored as RFC 3339 UTC text with fixed microsecond
//! precision, so lexical order in SQL equals chronological order.

use crate::{
    complaint::Complaint,
    error::{DeskError, DeskResult},
    tracking::LookupQuery,
    types::ComplaintStatus,
};
use chrono::{DateTime, Duration, DurationRound, SecondsFormat, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use std::str::FromStr;

const COMPLAINT_COLUMNS: &str =
    "id, tracking_id, title, description, category, urgency, status, location,
     citizen_name, citizen_email, citizen_phone, predicted_resolution_days,
     sentiment_score, ai_urgency_reason, ai_suggested_department, ai_keywords,
     created_at, updated_at, resolved_at";

pub struct ComplaintStore {
    conn: Connection,
}

impl ComplaintStore {
    /// Open (or create) the complaint database at `path`.
    pub fn open(path: &str) -> DeskResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DeskResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DeskResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_complaints.sql"))?;
        Ok(())
    }

    // ── Create ─────────────────────────────────────────────────

    pub fn insert_complaint(&self, c: &Complaint) -> DeskResult<()> {
        let keywords = serde_json::to_string(&c.ai_keywords)?;
        self.conn.execute(
            "INSERT INTO complaint (
                id, tracking_id, title, description, category, urgency, status, location,
                citizen_name, citizen_email, citizen_phone, predicted_resolution_days,
                sentiment_score, ai_urgency_reason, ai_suggested_department, ai_keywords,
                created_at, updated_at, resolved_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                       ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
            params![
                &c.id,
                &c.tracking_id,
                &c.title,
                &c.description,
                c.category.as_str(),
                c.urgency.as_str(),
                c.status.as_str(),
                c.location.as_deref(),
                &c.citizen_name,
                &c.citizen_email,
                c.citizen_phone.as_deref(),
                c.predicted_resolution_days,
                c.sentiment_score,
                c.ai_urgency_reason.as_deref(),
                c.ai_suggested_department.as_deref(),
                keywords,
                timestamp(&c.created_at),
                timestamp(&c.updated_at),
                c.resolved_at.as_ref().map(timestamp),
            ],
        )?;
        Ok(())
    }

    // ── Read ───────────────────────────────────────────────────

    /// Every complaint, newest first.
    pub fn fetch_all(&self) -> DeskResult<Vec<Complaint>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaint ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt.query_map([], complaint_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn get_complaint(&self, id: &str) -> DeskResult<Option<Complaint>> {
        self.conn
            .query_row(
                &format!("SELECT {COMPLAINT_COLUMNS} FROM complaint WHERE id = ?1"),
                params![id],
                complaint_row_mapper,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Tracking-page lookup: exact id when the query is a UUID, otherwise
    /// (or failing that) the newest complaint whose tracking code contains
    /// the query text, case-insensitively.
    pub fn find_by_tracking_or_id(&self, query: &LookupQuery) -> DeskResult<Option<Complaint>> {
        if let Some(id) = query.id() {
            if let Some(found) = self.get_complaint(&id)? {
                return Ok(Some(found));
            }
        }
        let pattern = format!("%{}%", escape_like(query.fragment()));
        self.conn
            .query_row(
                &format!(
                    "SELECT {COMPLAINT_COLUMNS} FROM complaint
                     WHERE lower(tracking_id) LIKE ?1 ESCAPE '\\'
                     ORDER BY created_at DESC LIMIT 1"
                ),
                params![pattern],
                complaint_row_mapper,
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn tracking_id_exists(&self, tracking_id: &str) -> DeskResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM complaint WHERE tracking_id = ?1)",
            params![tracking_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn complaint_count(&self) -> DeskResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM complaint", [], |row| row.get(0))
            .map_err(Into::into)
    }

    // ── Update ─────────────────────────────────────────────────

    /// Move a complaint forward in its lifecycle. Returns the updated row.
    ///
    /// `resolved_at` is written exactly once, on the step into resolved.
    pub fn update_status(
        &self,
        id: &str,
        status: ComplaintStatus,
        now: DateTime<Utc>,
    ) -> DeskResult<Complaint> {
        let current = self
            .get_complaint(id)?
            .ok_or_else(|| DeskError::ComplaintNotFound { id: id.to_string() })?;

        if !current.status.can_advance_to(status) {
            return Err(DeskError::InvalidTransition {
                complaint_id: id.to_string(),
                from: current.status,
                to: status,
            });
        }

        // Never stamp a resolution earlier than creation.
        let now = now.max(current.created_at);
        let resolved_at = (status == ComplaintStatus::Resolved).then(|| timestamp(&now));
        self.conn.execute(
            "UPDATE complaint SET status = ?1, updated_at = ?2, resolved_at = ?3 WHERE id = ?4",
            params![status.as_str(), timestamp(&now), resolved_at, id],
        )?;

        self.get_complaint(id)?
            .ok_or_else(|| DeskError::ComplaintNotFound { id: id.to_string() })
    }
}

// ── Row mapping ────────────────────────────────────────────────

fn complaint_row_mapper(row: &Row<'_>) -> rusqlite::Result<Complaint> {
    let keywords: String = row.get(15)?;
    Ok(Complaint {
        id: row.get(0)?,
        tracking_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        category: enum_column(row, 4)?,
        urgency: enum_column(row, 5)?,
        status: enum_column(row, 6)?,
        location: row.get(7)?,
        citizen_name: row.get(8)?,
        citizen_email: row.get(9)?,
        citizen_phone: row.get(10)?,
        predicted_resolution_days: row.get(11)?,
        sentiment_score: row.get(12)?,
        ai_urgency_reason: row.get(13)?,
        ai_suggested_department: row.get(14)?,
        ai_keywords: serde_json::from_str(&keywords)
            .map_err(|e| conversion_error(15, e.into()))?,
        created_at: timestamp_column(row, 16)?,
        updated_at: timestamp_column(row, 17)?,
        resolved_at: row
            .get::<_, Option<String>>(18)?
            .map(|raw| parse_timestamp(&raw).map_err(|e| conversion_error(18, e)))
            .transpose()?,
    })
}

fn enum_column<T: FromStr<Err = DeskError>>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| conversion_error(idx, e))
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_timestamp(&raw).map_err(|e| conversion_error(idx, e))
}

fn conversion_error(idx: usize, e: DeskError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

/// Drop sub-microsecond precision, so a record built in memory equals
/// the row read back for it.
pub fn storage_precision(at: DateTime<Utc>) -> DeskResult<DateTime<Utc>> {
    at.duration_trunc(Duration::microseconds(1))
        .map_err(|e| DeskError::Other(e.into()))
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> DeskResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| DeskError::Timestamp {
            value: raw.to_string(),
            source,
        })
}

fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
