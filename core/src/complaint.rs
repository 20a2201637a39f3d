//! The complaint record and the citizen-submitted draft it is built from.

use crate::{
    classifier::Classification,
    error::{DeskError, DeskResult},
    types::{Category, ComplaintId, ComplaintStatus, TrackingCode, Urgency},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id:          ComplaintId,
    pub tracking_id: TrackingCode,
    pub title:       String,
    pub description: String,
    pub category:    Category,
    pub urgency:     Urgency,
    pub status:      ComplaintStatus,
    pub location:    Option<String>,

    pub citizen_name:  String,
    pub citizen_email: String,
    pub citizen_phone: Option<String>,

    pub predicted_resolution_days: u32,
    /// Supplied externally, if at all. Never computed here.
    pub sentiment_score:         Option<f64>,
    pub ai_urgency_reason:       Option<String>,
    pub ai_suggested_department: Option<String>,
    #[serde(default)]
    pub ai_keywords:             Vec<String>,

    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Complaint {
    /// Merge a validated draft with its classification into a fresh,
    /// pending complaint.
    pub fn from_draft(
        id: ComplaintId,
        tracking_id: TrackingCode,
        draft: ComplaintDraft,
        classification: Classification,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            tracking_id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            urgency: classification.urgency,
            status: ComplaintStatus::Pending,
            location: draft.location,
            citizen_name: draft.citizen_name,
            citizen_email: draft.citizen_email,
            citizen_phone: draft.citizen_phone,
            predicted_resolution_days: classification.predicted_days,
            sentiment_score: None,
            ai_urgency_reason: Some(classification.reason),
            ai_suggested_department: Some(classification.department),
            ai_keywords: classification.keywords,
            created_at: now,
            updated_at: now,
            resolved_at: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == ComplaintStatus::Resolved
    }

    /// Elapsed time from creation to resolution in fractional days.
    pub fn resolution_days(&self) -> Option<f64> {
        let resolved = self.resolved_at?;
        let millis = (resolved - self.created_at).num_milliseconds();
        Some(millis as f64 / (1000.0 * 60.0 * 60.0 * 24.0))
    }
}

/// Citizen-submitted fields, before classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplaintDraft {
    pub title:       String,
    pub description: String,
    #[serde(default)]
    pub category:    Category,
    #[serde(default)]
    pub location:    Option<String>,

    pub citizen_name:  String,
    pub citizen_email: String,
    #[serde(default)]
    pub citizen_phone: Option<String>,
}

impl ComplaintDraft {
    /// Check required fields and normalize optional ones.
    /// Blank optional strings become `None`.
    pub fn validate(mut self) -> DeskResult<Self> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        require("citizen_name", &self.citizen_name)?;
        require("citizen_email", &self.citizen_email)?;
        if !self.citizen_email.contains('@') {
            return Err(DeskError::Validation {
                field: "citizen_email",
                reason: format!("'{}' is not an email address", self.citizen_email),
            });
        }

        self.location = non_blank(self.location);
        self.citizen_phone = non_blank(self.citizen_phone);
        Ok(self)
    }
}

fn require(field: &'static str, value: &str) -> DeskResult<()> {
    if value.trim().is_empty() {
        return Err(DeskError::Validation {
            field,
            reason: "required".into(),
        });
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn draft() -> ComplaintDraft {
        ComplaintDraft {
            title: "Pothole on Main St".into(),
            description: "Large pothole needs repair".into(),
            category: Category::Infrastructure,
            location: Some("  ".into()),
            citizen_name: "Sam Rivera".into(),
            citizen_email: "sam@example.org".into(),
            citizen_phone: Some(String::new()),
        }
    }

    #[test]
    fn validate_blanks_empty_optionals() {
        let d = draft().validate().unwrap();
        assert_eq!(d.location, None);
        assert_eq!(d.citizen_phone, None);
    }

    #[test]
    fn validate_names_the_missing_field() {
        let mut d = draft();
        d.description = "   ".into();
        match d.validate() {
            Err(DeskError::Validation { field, .. }) => assert_eq!(field, "description"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_email_without_at_sign() {
        let mut d = draft();
        d.citizen_email = "sam.example.org".into();
        assert!(matches!(
            d.validate(),
            Err(DeskError::Validation { field: "citizen_email", .. })
        ));
    }

    #[test]
    fn resolution_days_uses_full_precision() {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut c = Complaint::from_draft(
            "id".into(),
            "CMP-TEST0001".into(),
            draft().validate().unwrap(),
            crate::classifier::classify("needs repair"),
            created,
        );
        assert_eq!(c.resolution_days(), None);

        c.resolved_at = Some(created + Duration::hours(36));
        assert_eq!(c.resolution_days(), Some(1.5));
    }
}
