use crate::core::network::utilization_pct;
use crate::core::rounding::round_to;
use crate::domain::model::NetworkSummary;
use chrono::NaiveDate;

/// Completed-versus-scheduled comparison for one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionDelta {
    pub completed_weighted: f64,
    pub completed_utilization_pct: Option<f64>,
    pub delta_weighted: f64,
    pub delta_pct_points: Option<f64>,
}

/// A day after `today` cannot have completed exams yet.
pub fn is_evaluable(dos: NaiveDate, today: NaiveDate) -> bool {
    dos <= today
}

/// Compares completed weighted units against the scheduled baseline.
///
/// A past day with no completed rows is measured as `0.0`, not unknown.
/// Percentage figures are `None` when the network has no capacity.
pub fn compute_execution_delta(
    completed_weighted: f64,
    scheduled_weighted: f64,
    scheduled_utilization_pct: f64,
    network_capacity: f64,
) -> ExecutionDelta {
    let completed_weighted = round_to(completed_weighted, 2);

    let completed_utilization_pct =
        (network_capacity != 0.0).then(|| utilization_pct(completed_weighted, network_capacity));

    ExecutionDelta {
        completed_weighted,
        completed_utilization_pct,
        delta_weighted: round_to(completed_weighted - scheduled_weighted, 2),
        delta_pct_points: completed_utilization_pct
            .map(|completed| round_to(completed - scheduled_utilization_pct, 1)),
    }
}

impl ExecutionDelta {
    pub fn apply_to(&self, summary: &mut NetworkSummary) {
        summary.completed_weighted = Some(self.completed_weighted);
        summary.completed_utilization_pct = self.completed_utilization_pct;
        summary.execution_delta_weighted = Some(self.delta_weighted);
        summary.execution_delta_pct_points = self.delta_pct_points;
    }
}
