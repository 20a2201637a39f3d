//! The complaint desk: wires the classifier, query engine and
//! aggregator to the store.
//!
//! RULES:
//!   - Classification happens once, at submission. Nothing here ever
//!     reclassifies a stored complaint.
//!   - Dashboard and analytics read one fresh snapshot per call.
//!   - A store failure surfaces as an error; no partial results.

use crate::{
    analytics::{self, Stats},
    classifier::classify,
    complaint::{Complaint, ComplaintDraft},
    config::DeskConfig,
    error::{DeskError, DeskResult},
    query::{self, QueryParams},
    store::{self, ComplaintStore},
    tracking::{LookupQuery, TrackingCodeGenerator},
    types::{ComplaintStatus, TrackingCode},
};
use chrono::{DateTime, Local, Utc};
use uuid::Uuid;

/// Draws before giving up on a collision-free tracking code.
const MAX_TRACKING_ATTEMPTS: u32 = 8;

pub struct ComplaintDesk {
    pub config: DeskConfig,
    store:      ComplaintStore,
    codes:      TrackingCodeGenerator,
}

impl ComplaintDesk {
    pub fn new(store: ComplaintStore, config: DeskConfig) -> Self {
        let codes = TrackingCodeGenerator::new(&config.tracking);
        Self { config, store, codes }
    }

    /// Open the configured database, migrate it and build a desk.
    pub fn open(config: DeskConfig) -> DeskResult<Self> {
        let store = if config.database_path == ":memory:" {
            ComplaintStore::in_memory()?
        } else {
            ComplaintStore::open(&config.database_path)?
        };
        store.migrate()?;
        Ok(Self::new(store, config))
    }

    /// In-memory desk with deterministic tracking codes.
    pub fn build_test() -> DeskResult<Self> {
        Self::open(DeskConfig::default_test())
    }

    pub fn store(&self) -> &ComplaintStore {
        &self.store
    }

    // ── Submission ─────────────────────────────────────────────

    pub fn submit(&mut self, draft: ComplaintDraft) -> DeskResult<Complaint> {
        self.submit_at(draft, Utc::now())
    }

    /// Validate, classify and persist a new complaint created at `now`.
    pub fn submit_at(&mut self, draft: ComplaintDraft, now: DateTime<Utc>) -> DeskResult<Complaint> {
        let draft = draft.validate()?;
        let now = store::storage_precision(now)?;
        let classification = classify(&draft.description);
        let tracking_id = self.allocate_tracking_code()?;
        let id = Uuid::new_v4().to_string();

        let complaint = Complaint::from_draft(id, tracking_id, draft, classification, now);
        self.store.insert_complaint(&complaint)?;

        log::info!(
            "submitted {} urgency={} department={} predicted_days={}",
            complaint.tracking_id,
            complaint.urgency,
            complaint.ai_suggested_department.as_deref().unwrap_or("-"),
            complaint.predicted_resolution_days,
        );
        Ok(complaint)
    }

    fn allocate_tracking_code(&mut self) -> DeskResult<TrackingCode> {
        for attempt in 1..=MAX_TRACKING_ATTEMPTS {
            let code = self.codes.next_code();
            if !self.store.tracking_id_exists(&code)? {
                return Ok(code);
            }
            log::warn!("tracking code collision on {code} (attempt {attempt})");
        }
        Err(DeskError::TrackingCodeExhausted {
            attempts: MAX_TRACKING_ATTEMPTS,
        })
    }

    // ── Views ──────────────────────────────────────────────────

    pub fn all_complaints(&self) -> DeskResult<Vec<Complaint>> {
        self.store.fetch_all()
    }

    pub fn dashboard(&self, params: &QueryParams) -> DeskResult<Vec<Complaint>> {
        let all = self.store.fetch_all()?;
        Ok(query::query(&all, params))
    }

    pub fn analytics(&self) -> DeskResult<Stats> {
        self.analytics_at(&Local::now())
    }

    pub fn analytics_at<Tz: chrono::TimeZone>(&self, now: &DateTime<Tz>) -> DeskResult<Stats> {
        let all = self.store.fetch_all()?;
        Ok(analytics::aggregate_at(&all, now, &self.config.analytics))
    }

    /// Tracking-page lookup. Blank input and misses are both `None`.
    pub fn track(&self, raw: &str) -> DeskResult<Option<Complaint>> {
        match LookupQuery::parse(raw) {
            Some(query) => self.store.find_by_tracking_or_id(&query),
            None => Ok(None),
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────

    pub fn update_status(&self, id: &str, status: ComplaintStatus) -> DeskResult<Complaint> {
        self.update_status_at(id, status, Utc::now())
    }

    pub fn update_status_at(
        &self,
        id: &str,
        status: ComplaintStatus,
        now: DateTime<Utc>,
    ) -> DeskResult<Complaint> {
        let updated = self.store.update_status(id, status, store::storage_precision(now)?)?;
        log::info!("{} status -> {}", updated.tracking_id, updated.status);
        Ok(updated)
    }
}
