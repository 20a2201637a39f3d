//! Keyword classifier: urgency tier, routing and resolution estimate.
//!
//! RULE: Tiers are evaluated top-down and the first tier with any
//! matching term wins. The low tier has no terms and always matches.
//!
//! The reason string and keyword tags belong to the tier, not to the
//! term that matched.

use crate::types::Urgency;
use serde::{Deserialize, Serialize};

/// Everything the classifier derives from a description.
/// Written onto the complaint once at submission, never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub urgency:        Urgency,
    pub reason:         String,
    pub department:     String,
    pub keywords:       Vec<String>,
    pub predicted_days: u32,
}

struct UrgencyTier {
    urgency:    Urgency,
    terms:      &'static [&'static str],
    reason:     &'static str,
    department: &'static str,
    keywords:   &'static [&'static str],
}

// Evaluation order is fixed. Never reorder.
static TIERS: [UrgencyTier; 4] = [
    UrgencyTier {
        urgency:    Urgency::Critical,
        terms:      &["emergency", "dangerous", "life-threatening", "flood", "fire"],
        reason:     "Contains emergency or life-threatening keywords requiring immediate attention",
        department: "Emergency Response",
        keywords:   &["emergency", "urgent", "critical"],
    },
    UrgencyTier {
        urgency:    Urgency::High,
        terms:      &["safety", "broken", "hazard", "leak"],
        reason:     "Safety concern or infrastructure damage requiring prompt attention",
        department: "Public Works",
        keywords:   &["safety", "hazard", "damage"],
    },
    UrgencyTier {
        urgency:    Urgency::Medium,
        terms:      &["maintenance", "repair", "issue"],
        reason:     "Standard maintenance or repair request",
        department: "Maintenance",
        keywords:   &["maintenance", "repair", "service"],
    },
    UrgencyTier {
        urgency:    Urgency::Low,
        terms:      &[],
        reason:     "General inquiry or non-urgent request",
        department: "General Services",
        keywords:   &["general", "inquiry"],
    },
];

impl UrgencyTier {
    fn matches(&self, lowered: &str) -> bool {
        self.terms.is_empty() || self.terms.iter().any(|t| lowered.contains(t))
    }

    fn to_classification(&self) -> Classification {
        Classification {
            urgency:        self.urgency,
            reason:         self.reason.to_string(),
            department:     self.department.to_string(),
            keywords:       self.keywords.iter().map(|k| k.to_string()).collect(),
            predicted_days: self.urgency.predicted_days(),
        }
    }
}

/// Classify a complaint description. Pure and total.
pub fn classify(description: &str) -> Classification {
    let lowered = description.to_lowercase();
    let tier = TIERS
        .iter()
        .find(|tier| tier.matches(&lowered))
        .unwrap_or(&TIERS[TIERS.len() - 1]);
    tier.to_classification()
}
