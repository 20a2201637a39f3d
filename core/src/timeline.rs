//! Progress timeline shown on the tracking page.

use crate::types::ComplaintStatus;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Completed,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineStep {
    pub label:       &'static str,
    pub state:       StepState,
    pub description: &'static str,
}

/// The four fixed steps and where `status` sits among them.
pub fn timeline(status: ComplaintStatus) -> [TimelineStep; 4] {
    use ComplaintStatus::*;
    use StepState::*;

    let analysis = match status {
        Pending => Current,
        InProgress | Resolved => Completed,
    };
    let in_progress = match status {
        Pending => Upcoming,
        InProgress => Current,
        Resolved => Completed,
    };
    let resolved = match status {
        Resolved => Completed,
        Pending | InProgress => Upcoming,
    };

    [
        TimelineStep {
            label: "Submitted",
            state: Completed,
            description: "Complaint received and logged",
        },
        TimelineStep {
            label: "AI Analysis",
            state: analysis,
            description: "Priority and category determined",
        },
        TimelineStep {
            label: "In Progress",
            state: in_progress,
            description: "Being addressed by officials",
        },
        TimelineStep {
            label: "Resolved",
            state: resolved,
            description: "Issue has been resolved",
        },
    ]
}
