//! Keyword classifier tests.

use complaint_desk_core::{classifier::classify, types::Urgency};

/// "fire" wins over every lower-tier keyword in the same text.
#[test]
fn critical_tier_takes_precedence() {
    for text in [
        "Fire in the building",
        "broken hydrant, there is a FIRE and a leak",
        "repair issue near the fire station",
        "safety hazard: wildfire smoke",
    ] {
        let c = classify(text);
        assert_eq!(c.urgency, Urgency::Critical, "{text}");
        assert_eq!(c.predicted_days, 1, "{text}");
        assert_eq!(c.department, "Emergency Response", "{text}");
    }
}

#[test]
fn each_critical_term_triggers_critical() {
    for term in ["emergency", "dangerous", "life-threatening", "flood", "fire"] {
        assert_eq!(classify(&format!("there is {term} here")).urgency, Urgency::Critical);
    }
}

#[test]
fn high_tier_routes_to_public_works() {
    for term in ["safety", "broken", "hazard", "leak"] {
        let c = classify(&format!("Report: {term} at the corner"));
        assert_eq!(c.urgency, Urgency::High, "{term}");
        assert_eq!(c.department, "Public Works");
        assert_eq!(c.predicted_days, 3);
        assert_eq!(c.keywords, vec!["safety", "hazard", "damage"]);
    }
}

#[test]
fn repair_alone_is_medium() {
    let c = classify("The park bench needs a Repair");
    assert_eq!(c.urgency, Urgency::Medium);
    assert_eq!(c.predicted_days, 7);
    assert_eq!(c.department, "Maintenance");
    assert_eq!(c.reason, "Standard maintenance or repair request");
}

#[test]
fn unmatched_text_falls_through_to_low() {
    for text in ["", "Please add more benches in the library", "Question about opening hours"] {
        let c = classify(text);
        assert_eq!(c.urgency, Urgency::Low, "{text:?}");
        assert_eq!(c.predicted_days, 14);
        assert_eq!(c.department, "General Services");
        assert_eq!(c.keywords, vec!["general", "inquiry"]);
    }
}

/// Substring, not word, matching: "issue" inside "tissue" counts.
#[test]
fn matching_is_substring_containment() {
    assert_eq!(classify("tissue paper dispenser empty").urgency, Urgency::Medium);
    assert_eq!(classify("unbroken streak").urgency, Urgency::High);
}

#[test]
fn classification_is_deterministic() {
    let text = "Street light flickering, maintenance please";
    assert_eq!(classify(text), classify(text));
}

#[test]
fn predicted_days_follow_urgency() {
    for text in ["flood", "leak", "issue", "hello"] {
        let c = classify(text);
        assert_eq!(c.predicted_days, c.urgency.predicted_days());
        assert!(c.predicted_days > 0);
    }
}
