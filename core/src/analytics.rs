//! Analytics aggregator: counts, rates, histograms and daily activity.
//!
//! This module:
//!   1. Counts complaints by status, plus the critical count
//!   2. Computes resolution rate and mean resolution time
//!   3. Builds chart-ready histograms (zero entries dropped)
//!   4. Buckets submissions and resolutions into local calendar days
//!   5. Lists the most recently resolved complaints
//!
//! Everything is computed from one immutable snapshot. Nothing is cached.

use crate::{
    complaint::Complaint,
    config::AnalyticsConfig,
    types::{CategoryCounts, ComplaintStatus, Urgency},
};
use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};
use serde::{Serialize, Serializer};
use std::fmt;

// ── Public types ─────────────────────────────────────────────────────────────

/// Mean time from submission to resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AvgResolution {
    /// No complaint has been resolved yet.
    NotApplicable,
    Days(f64),
}

impl fmt::Display for AvgResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvgResolution::NotApplicable => f.write_str("N/A"),
            AvgResolution::Days(d) => write!(f, "{d:.1}"),
        }
    }
}

impl Serialize for AvgResolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AvgResolution::NotApplicable => serializer.serialize_str("N/A"),
            AvgResolution::Days(d) => serializer.serialize_f64(*d),
        }
    }
}

/// One bar or slice of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartEntry {
    pub name:  &'static str,
    pub value: usize,
}

/// Activity on a single local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyActivity {
    pub date:      NaiveDate,
    /// Short display form, e.g. "Oct 18".
    pub label:     String,
    pub submitted: usize,
    pub resolved:  usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub total:       usize,
    pub pending:     usize,
    pub in_progress: usize,
    pub resolved:    usize,
    pub critical:    usize,

    /// Percentage of complaints resolved, rounded to one decimal.
    pub resolution_rate:     f64,
    pub avg_resolution_days: AvgResolution,

    /// Raw per-category counts, zeros retained.
    pub category_counts: CategoryCounts,
    pub by_category:     Vec<ChartEntry>,
    pub by_urgency:      Vec<ChartEntry>,
    pub by_status:       Vec<ChartEntry>,

    pub daily:             Vec<DailyActivity>,
    pub recently_resolved: Vec<Complaint>,
}

impl Stats {
    /// Resolution rate as displayed: one decimal, or "0" with no complaints.
    pub fn resolution_rate_label(&self) -> String {
        if self.total == 0 {
            "0".to_string()
        } else {
            format!("{:.1}", self.resolution_rate)
        }
    }
}

// ── Aggregation ──────────────────────────────────────────────────────────────

/// Aggregate against the local clock with default settings.
pub fn aggregate(all: &[Complaint]) -> Stats {
    aggregate_at(all, &Local::now(), &AnalyticsConfig::default())
}

/// Aggregate as of `now`. Calendar days are taken in `now`'s time zone.
pub fn aggregate_at<Tz: TimeZone>(
    all: &[Complaint],
    now: &DateTime<Tz>,
    config: &AnalyticsConfig,
) -> Stats {
    let total = all.len();
    let count_status = |s: ComplaintStatus| all.iter().filter(|c| c.status == s).count();
    let pending = count_status(ComplaintStatus::Pending);
    let in_progress = count_status(ComplaintStatus::InProgress);
    let resolved = count_status(ComplaintStatus::Resolved);

    let mut category_counts = CategoryCounts::default();
    let mut urgency_counts = [0usize; 4];
    for c in all {
        category_counts.increment(c.category);
        urgency_counts[c.urgency.rank() as usize] += 1;
    }

    let by_category = category_counts
        .iter()
        .filter(|(_, n)| *n > 0)
        .map(|(cat, n)| ChartEntry { name: cat.label(), value: n })
        .collect();

    let by_urgency = Urgency::ALL
        .into_iter()
        .map(|u| ChartEntry { name: u.label(), value: urgency_counts[u.rank() as usize] })
        .filter(|e| e.value > 0)
        .collect();

    let by_status = [
        (ComplaintStatus::Pending, pending),
        (ComplaintStatus::InProgress, in_progress),
        (ComplaintStatus::Resolved, resolved),
    ]
    .into_iter()
    .filter(|(_, n)| *n > 0)
    .map(|(s, n)| ChartEntry { name: s.label(), value: n })
    .collect();

    let stats = Stats {
        total,
        pending,
        in_progress,
        resolved,
        critical: urgency_counts[Urgency::Critical.rank() as usize],
        resolution_rate: resolution_rate(resolved, total),
        avg_resolution_days: average_resolution(all),
        category_counts,
        by_category,
        by_urgency,
        by_status,
        daily: daily_activity(all, now, config.window_days),
        recently_resolved: recently_resolved(all, config.recent_resolved_limit),
    };

    log::debug!(
        "aggregate: total={} resolved={} rate={} avg={}",
        stats.total,
        stats.resolved,
        stats.resolution_rate_label(),
        stats.avg_resolution_days,
    );
    stats
}

fn resolution_rate(resolved: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = resolved as f64 / total as f64 * 100.0;
    (pct * 10.0).round() / 10.0
}

fn average_resolution(all: &[Complaint]) -> AvgResolution {
    let durations: Vec<f64> = all.iter().filter_map(Complaint::resolution_days).collect();
    if durations.is_empty() {
        return AvgResolution::NotApplicable;
    }
    AvgResolution::Days(durations.iter().sum::<f64>() / durations.len() as f64)
}

fn daily_activity<Tz: TimeZone>(
    all: &[Complaint],
    now: &DateTime<Tz>,
    window_days: u32,
) -> Vec<DailyActivity> {
    let tz = now.timezone();
    let today = now.date_naive();

    let mut days: Vec<DailyActivity> = (0..window_days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(u64::from(back))))
        .map(|date| DailyActivity {
            date,
            label: date.format("%b %-d").to_string(),
            submitted: 0,
            resolved: 0,
        })
        .collect();

    let Some(first) = days.first().map(|d| d.date) else {
        return days;
    };
    let len = days.len() as i64;
    let slot = |date: NaiveDate| {
        let offset = (date - first).num_days();
        (0..len).contains(&offset).then_some(offset as usize)
    };

    for c in all {
        if let Some(i) = slot(c.created_at.with_timezone(&tz).date_naive()) {
            days[i].submitted += 1;
        }
        if let Some(i) = c
            .resolved_at
            .and_then(|at| slot(at.with_timezone(&tz).date_naive()))
        {
            days[i].resolved += 1;
        }
    }
    days
}

fn recently_resolved(all: &[Complaint], limit: usize) -> Vec<Complaint> {
    let mut resolved: Vec<Complaint> = all.iter().filter(|c| c.is_resolved()).cloned().collect();
    resolved.sort_by(|a, b| b.resolved_at.cmp(&a.resolved_at));
    resolved.truncate(limit);
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_rate_rounds_to_one_decimal() {
        assert_eq!(resolution_rate(1, 3), 33.3);
        assert_eq!(resolution_rate(2, 3), 66.7);
        assert_eq!(resolution_rate(0, 0), 0.0);
        assert_eq!(resolution_rate(4, 4), 100.0);
    }

    #[test]
    fn avg_resolution_displays_na_or_one_decimal() {
        assert_eq!(AvgResolution::NotApplicable.to_string(), "N/A");
        assert_eq!(AvgResolution::Days(1.5).to_string(), "1.5");
        assert_eq!(AvgResolution::Days(2.04).to_string(), "2.0");
        assert_eq!(
            serde_json::to_string(&AvgResolution::NotApplicable).unwrap(),
            "\"N/A\""
        );
    }
}
