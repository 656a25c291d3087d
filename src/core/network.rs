use crate::core::rounding::round_to;
use crate::domain::model::{CapacityStatus, LocationResult, NetworkSummary};
use chrono::NaiveDate;

/// Reporting window and run date stamped onto a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub report_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ReportWindow {
    pub fn single_day(dos: NaiveDate, report_date: NaiveDate) -> Self {
        Self {
            report_date,
            start_date: dos,
            end_date: dos,
        }
    }
}

/// Percent of capacity with one decimal; 0.0 when there is no capacity.
pub fn utilization_pct(weighted: f64, capacity: f64) -> f64 {
    if capacity == 0.0 {
        0.0
    } else {
        round_to(weighted / capacity * 100.0, 1)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteCounts {
    pub over: usize,
    pub at: usize,
    pub under: usize,
}

impl SiteCounts {
    /// Over and at are counted; under is whatever remains, `NO CAP` sites included.
    pub fn tally(locations: &[LocationResult]) -> Self {
        let mut over = 0;
        let mut at = 0;
        for location in locations {
            match location.status {
                CapacityStatus::Over => over += 1,
                CapacityStatus::At => at += 1,
                CapacityStatus::Under | CapacityStatus::NoCap => {}
            }
        }

        Self {
            over,
            at,
            under: locations.len() - over - at,
        }
    }
}

/// Rolls location results into network totals.
///
/// `network_capacity` is the sum of every location benchmark, not only the
/// sites that appear in `locations`. Execution fields are left empty.
pub fn build_network_summary(
    window: ReportWindow,
    locations: &[LocationResult],
    network_capacity: f64,
) -> NetworkSummary {
    let total_weighted: f64 = locations.iter().map(|l| l.weighted_units).sum();
    let counts = SiteCounts::tally(locations);

    NetworkSummary {
        report_date: window.report_date,
        start_date: window.start_date,
        end_date: window.end_date,
        total_active_sites: locations.len(),
        scheduled_weighted: round_to(total_weighted, 2),
        capacity: round_to(network_capacity, 2),
        utilization_pct: utilization_pct(total_weighted, network_capacity),
        sites_over: counts.over,
        sites_at: counts.at,
        sites_under: counts.under,
        completed_weighted: None,
        completed_utilization_pct: None,
        execution_delta_weighted: None,
        execution_delta_pct_points: None,
    }
}
