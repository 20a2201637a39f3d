//! Dashboard query engine: search, filter and sort.
//!
//! Pipeline order is fixed:
//!   1. free-text search (title, description, tracking code)
//!   2. urgency filter
//!   3. status filter
//!   4. category filter
//!   5. stable sort
//!
//! The input slice is never mutated; the view is a fresh Vec.

use crate::{
    complaint::Complaint,
    error::{DeskError, DeskResult},
    types::{Category, ComplaintStatus, Urgency},
};
use serde::Deserialize;
use std::str::FromStr;

/// A filter over a closed enum: either every value or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String", bound(deserialize = "T: FromStr<Err = DeskError>"))]
pub enum Filter<T> {
    All,
    Only(T),
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Filter::All
    }
}

impl<T: PartialEq + Copy> Filter<T> {
    pub fn admits(&self, value: T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => *wanted == value,
        }
    }
}

impl<T: FromStr<Err = DeskError>> FromStr for Filter<T> {
    type Err = DeskError;

    fn from_str(s: &str) -> DeskResult<Self> {
        if s == "all" {
            return Ok(Filter::All);
        }
        s.parse().map(Filter::Only)
    }
}

impl<T: FromStr<Err = DeskError>> TryFrom<String> for Filter<T> {
    type Error = DeskError;

    fn try_from(s: String) -> DeskResult<Self> {
        s.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Severity rank, critical first.
    #[default]
    Urgency,
    /// Newest first.
    Date,
    /// Shortest predicted resolution first.
    Predicted,
}

impl FromStr for SortBy {
    type Err = DeskError;

    fn from_str(s: &str) -> DeskResult<Self> {
        match s {
            "urgency"   => Ok(SortBy::Urgency),
            "date"      => Ok(SortBy::Date),
            "predicted" => Ok(SortBy::Predicted),
            _ => Err(DeskError::InvalidEnum {
                kind: "sort order",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    pub search:   String,
    pub urgency:  Filter<Urgency>,
    pub status:   Filter<ComplaintStatus>,
    pub category: Filter<Category>,
    #[serde(alias = "sortBy")]
    pub sort_by:  SortBy,
}

impl QueryParams {
    fn matches(&self, c: &Complaint, needle: Option<&str>) -> bool {
        if let Some(needle) = needle {
            let hit = c.title.to_lowercase().contains(needle)
                || c.description.to_lowercase().contains(needle)
                || c.tracking_id.to_lowercase().contains(needle);
            if !hit {
                return false;
            }
        }
        self.urgency.admits(c.urgency)
            && self.status.admits(c.status)
            && self.category.admits(c.category)
    }
}

/// Apply `params` to `all` and return the dashboard view.
pub fn query(all: &[Complaint], params: &QueryParams) -> Vec<Complaint> {
    let lowered = params.search.to_lowercase();
    let needle = (!lowered.is_empty()).then_some(lowered.as_str());

    let mut view: Vec<Complaint> = all
        .iter()
        .filter(|c| params.matches(c, needle))
        .cloned()
        .collect();

    // sort_by_key is stable: equal keys keep their input order.
    match params.sort_by {
        SortBy::Urgency   => view.sort_by_key(|c| c.urgency.rank()),
        SortBy::Date      => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortBy::Predicted => view.sort_by_key(|c| c.predicted_resolution_days),
    }

    log::debug!(
        "query: {} of {} complaints match (sort={:?})",
        view.len(),
        all.len(),
        params.sort_by
    );
    view
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_parses_all_and_enum_values() {
        assert_eq!("all".parse::<Filter<Urgency>>().unwrap(), Filter::All);
        assert_eq!(
            "in_progress".parse::<Filter<ComplaintStatus>>().unwrap(),
            Filter::Only(ComplaintStatus::InProgress)
        );
        assert!("everything".parse::<Filter<Category>>().is_err());
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let p: QueryParams =
            serde_json::from_str(r#"{"urgency":"high","sort_by":"predicted"}"#).unwrap();
        assert_eq!(p.urgency, Filter::Only(Urgency::High));
        assert_eq!(p.status, Filter::All);
        assert_eq!(p.sort_by, SortBy::Predicted);
        assert!(p.search.is_empty());
    }

    #[test]
    fn params_reject_unknown_filter_values() {
        let res: Result<QueryParams, _> = serde_json::from_str(r#"{"status":"closed"}"#);
        assert!(res.is_err());
    }
}
