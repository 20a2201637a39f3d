//! Dashboard query engine tests: search, filters, stable sorting.

use chrono::{DateTime, Duration, TimeZone, Utc};
use complaint_desk_core::{
    query::{query, Filter, QueryParams, SortBy},
    types::{Category, ComplaintStatus, Urgency},
    Complaint,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap()
}

fn complaint(n: u32, title: &str, urgency: Urgency, status: ComplaintStatus, category: Category) -> Complaint {
    let created = base_time() + Duration::hours(i64::from(n));
    Complaint {
        id: format!("00000000-0000-4000-8000-{n:012}"),
        tracking_id: format!("CMP-TEST{n:04}"),
        title: title.into(),
        description: format!("{title} (details)"),
        category,
        urgency,
        status,
        location: None,
        citizen_name: "Ada".into(),
        citizen_email: "ada@example.org".into(),
        citizen_phone: None,
        predicted_resolution_days: urgency.predicted_days(),
        sentiment_score: None,
        ai_urgency_reason: None,
        ai_suggested_department: None,
        ai_keywords: Vec::new(),
        created_at: created,
        updated_at: created,
        resolved_at: (status == ComplaintStatus::Resolved).then(|| created + Duration::days(1)),
    }
}

fn fixture() -> Vec<Complaint> {
    use Category::*;
    use ComplaintStatus::*;
    vec![
        complaint(1, "Streetlight out", Urgency::Low, Pending, Infrastructure),
        complaint(2, "Water main leak", Urgency::High, InProgress, Utilities),
        complaint(3, "Garbage not collected", Urgency::Medium, Pending, Sanitation),
        complaint(4, "House fire", Urgency::Critical, Resolved, PublicSafety),
        complaint(5, "Broken traffic signal", Urgency::High, Pending, Transportation),
        complaint(6, "Library hours", Urgency::Low, Resolved, Education),
    ]
}

fn titles(view: &[Complaint]) -> Vec<&str> {
    view.iter().map(|c| c.title.as_str()).collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn no_op_filters_keep_every_complaint() {
    let all = fixture();
    for sort_by in [SortBy::Urgency, SortBy::Date, SortBy::Predicted] {
        let params = QueryParams { sort_by, ..QueryParams::default() };
        assert_eq!(query(&all, &params).len(), all.len());
    }
}

#[test]
fn input_is_not_mutated() {
    let all = fixture();
    let before = all.clone();
    let _ = query(&all, &QueryParams { sort_by: SortBy::Date, ..QueryParams::default() });
    assert_eq!(all, before);
}

#[test]
fn urgency_sort_is_stable() {
    let view = query(&fixture(), &QueryParams::default());
    assert_eq!(
        titles(&view),
        vec![
            "House fire",
            "Water main leak",
            "Broken traffic signal",
            "Garbage not collected",
            "Streetlight out",
            "Library hours",
        ]
    );
}

#[test]
fn date_sort_is_newest_first() {
    let view = query(&fixture(), &QueryParams { sort_by: SortBy::Date, ..QueryParams::default() });
    assert!(view.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    assert_eq!(view[0].title, "Library hours");
}

#[test]
fn predicted_sort_is_shortest_first() {
    let view = query(&fixture(), &QueryParams { sort_by: SortBy::Predicted, ..QueryParams::default() });
    let days: Vec<u32> = view.iter().map(|c| c.predicted_resolution_days).collect();
    assert_eq!(days, vec![1, 3, 3, 7, 14, 14]);
    // Ties keep input order.
    assert_eq!(view[1].title, "Water main leak");
    assert_eq!(view[4].title, "Streetlight out");
}

#[test]
fn search_is_case_insensitive_over_title_description_and_tracking_code() {
    let all = fixture();
    let by_title = query(&all, &QueryParams { search: "GARBAGE".into(), ..QueryParams::default() });
    assert_eq!(titles(&by_title), vec!["Garbage not collected"]);

    let by_description = query(&all, &QueryParams { search: "(DETAILS)".into(), ..QueryParams::default() });
    assert_eq!(by_description.len(), all.len());

    let by_code = query(&all, &QueryParams { search: "cmp-test0005".into(), ..QueryParams::default() });
    assert_eq!(titles(&by_code), vec!["Broken traffic signal"]);
}

#[test]
fn search_with_no_hits_is_empty() {
    let view = query(&fixture(), &QueryParams { search: "snow plough".into(), ..QueryParams::default() });
    assert!(view.is_empty());
}

#[test]
fn filters_combine() {
    let all = fixture();
    let high = query(&all, &QueryParams { urgency: Filter::Only(Urgency::High), ..QueryParams::default() });
    assert_eq!(high.len(), 2);

    let high_pending = query(
        &all,
        &QueryParams {
            urgency: Filter::Only(Urgency::High),
            status: Filter::Only(ComplaintStatus::Pending),
            ..QueryParams::default()
        },
    );
    assert_eq!(titles(&high_pending), vec!["Broken traffic signal"]);

    let education = query(&all, &QueryParams { category: Filter::Only(Category::Education), ..QueryParams::default() });
    assert_eq!(titles(&education), vec!["Library hours"]);
}

#[test]
fn empty_input_yields_empty_view() {
    assert!(query(&[], &QueryParams::default()).is_empty());
}
