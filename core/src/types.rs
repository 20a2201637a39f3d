//! Shared primitive types used across the entire desk.
//!
//! Every enum here is closed. Matches over them are exhaustive so a new
//! variant fails to compile until every table (labels, ranks, tiers)
//! learns about it.

use crate::error::{DeskError, DeskResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Internal, opaque complaint identifier (UUID v4, hyphenated).
pub type ComplaintId = String;

/// Human-facing tracking code, e.g. `CMP-7KQ2M9XD`.
pub type TrackingCode = String;

// ── Urgency ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
}

impl Urgency {
    pub const ALL: [Urgency; 4] = [
        Urgency::Critical,
        Urgency::High,
        Urgency::Medium,
        Urgency::Low,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Critical => "critical",
            Urgency::High     => "high",
            Urgency::Medium   => "medium",
            Urgency::Low      => "low",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Urgency::Critical => "Critical",
            Urgency::High     => "High",
            Urgency::Medium   => "Medium",
            Urgency::Low      => "Low",
        }
    }

    /// Severity rank used by the dashboard sort. Lower sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Urgency::Critical => 0,
            Urgency::High     => 1,
            Urgency::Medium   => 2,
            Urgency::Low      => 3,
        }
    }

    /// Predicted resolution time for a complaint classified at this tier.
    pub fn predicted_days(self) -> u32 {
        match self {
            Urgency::Critical => 1,
            Urgency::High     => 3,
            Urgency::Medium   => 7,
            Urgency::Low      => 14,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = DeskError;

    fn from_str(s: &str) -> DeskResult<Self> {
        Urgency::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| DeskError::InvalidEnum {
                kind: "urgency",
                value: s.to_string(),
            })
    }
}

// ── Status ─────────────────────────────────────────────────────

/// Lifecycle state. Progression is forward only:
/// pending → in_progress → resolved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 3] = [
        ComplaintStatus::Pending,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComplaintStatus::Pending    => "pending",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Resolved   => "resolved",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComplaintStatus::Pending    => "Pending",
            ComplaintStatus::InProgress => "In Progress",
            ComplaintStatus::Resolved   => "Resolved",
        }
    }

    fn order(self) -> u8 {
        match self {
            ComplaintStatus::Pending    => 0,
            ComplaintStatus::InProgress => 1,
            ComplaintStatus::Resolved   => 2,
        }
    }

    /// True if moving from `self` to `next` is a forward step.
    pub fn can_advance_to(self, next: ComplaintStatus) -> bool {
        next.order() > self.order()
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> DeskResult<Self> {
        ComplaintStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| DeskError::InvalidEnum {
                kind: "status",
                value: s.to_string(),
            })
    }
}

// ── Category ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Infrastructure,
    PublicSafety,
    Utilities,
    Sanitation,
    Transportation,
    Health,
    Education,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Infrastructure,
        Category::PublicSafety,
        Category::Utilities,
        Category::Sanitation,
        Category::Transportation,
        Category::Health,
        Category::Education,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Infrastructure => "infrastructure",
            Category::PublicSafety   => "public_safety",
            Category::Utilities      => "utilities",
            Category::Sanitation     => "sanitation",
            Category::Transportation => "transportation",
            Category::Health         => "health",
            Category::Education      => "education",
            Category::Other          => "other",
        }
    }

    /// Short label used on badges and chart axes.
    pub fn label(self) -> &'static str {
        match self {
            Category::Infrastructure => "Infrastructure",
            Category::PublicSafety   => "Public Safety",
            Category::Utilities      => "Utilities",
            Category::Sanitation     => "Sanitation",
            Category::Transportation => "Transportation",
            Category::Health         => "Health",
            Category::Education      => "Education",
            Category::Other          => "Other",
        }
    }

    /// Longer label shown on the submission form.
    pub fn description(self) -> &'static str {
        match self {
            Category::Infrastructure => "Infrastructure (Roads, Buildings, etc.)",
            Category::PublicSafety   => "Public Safety & Security",
            Category::Utilities      => "Utilities (Water, Electricity, Gas)",
            Category::Sanitation     => "Sanitation & Waste Management",
            Category::Transportation => "Transportation & Traffic",
            Category::Health         => "Health Services",
            Category::Education      => "Education",
            Category::Other          => "Other",
        }
    }

    fn index(self) -> usize {
        match self {
            Category::Infrastructure => 0,
            Category::PublicSafety   => 1,
            Category::Utilities      => 2,
            Category::Sanitation     => 3,
            Category::Transportation => 4,
            Category::Health         => 5,
            Category::Education      => 6,
            Category::Other          => 7,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DeskError;

    fn from_str(s: &str) -> DeskResult<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DeskError::InvalidEnum {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Per-category counters, one slot per variant (zeros retained).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCounts([usize; 8]);

impl CategoryCounts {
    pub fn increment(&mut self, category: Category) {
        self.0[category.index()] += 1;
    }

    pub fn get(&self, category: Category) -> usize {
        self.0[category.index()]
    }

    /// (category, count) pairs in declaration order, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_strings_round_trip_through_from_str() {
        for u in Urgency::ALL {
            assert_eq!(u.as_str().parse::<Urgency>().unwrap(), u);
        }
        for s in ComplaintStatus::ALL {
            assert_eq!(s.as_str().parse::<ComplaintStatus>().unwrap(), s);
        }
        for c in Category::ALL {
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        }
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        let err = "urgent".parse::<Urgency>().unwrap_err();
        assert!(matches!(err, DeskError::InvalidEnum { kind: "urgency", .. }));
        assert!("Pending".parse::<ComplaintStatus>().is_err());
        assert!("roads".parse::<Category>().is_err());
    }

    #[test]
    fn status_only_advances_forward() {
        use ComplaintStatus::*;
        assert!(Pending.can_advance_to(InProgress));
        assert!(Pending.can_advance_to(Resolved));
        assert!(InProgress.can_advance_to(Resolved));
        assert!(!Resolved.can_advance_to(Pending));
        assert!(!InProgress.can_advance_to(InProgress));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Category::PublicSafety).unwrap();
        assert_eq!(json, "\"public_safety\"");
        let status: ComplaintStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, ComplaintStatus::InProgress);
    }
}
