//! Execution-focused projection of a daily result for the operations audience.
//!
//! Reads only the already-built summary; it never re-queries sources or
//! recomputes weights.

use crate::domain::model::DailyCapacityResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpsScheduledSummary {
    pub network_weighted: f64,
    pub network_capacity: f64,
    pub utilization_pct: f64,
    pub sites_over: usize,
    pub sites_at: usize,
    pub sites_under: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpsCompletedSummary {
    pub network_weighted: f64,
    pub utilization_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpsExecutionDelta {
    pub delta_weighted: f64,
    pub delta_pct_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpsDailyCapacityResult {
    pub report_date: NaiveDate,
    pub dos: NaiveDate,
    pub snapshot_date: Option<NaiveDate>,
    pub total_active_sites: usize,
    pub scheduled: OpsScheduledSummary,
    pub completed: OpsCompletedSummary,
    pub execution: OpsExecutionDelta,
    pub unknown_modalities: BTreeSet<String>,
}

impl OpsDailyCapacityResult {
    /// Optional execution fields project as `0.0` when absent.
    pub fn from_daily(result: &DailyCapacityResult) -> Self {
        let s = &result.summary;

        Self {
            report_date: s.report_date,
            dos: s.start_date,
            snapshot_date: result.snapshot_date,
            total_active_sites: s.total_active_sites,
            scheduled: OpsScheduledSummary {
                network_weighted: s.scheduled_weighted,
                network_capacity: s.capacity,
                utilization_pct: s.utilization_pct,
                sites_over: s.sites_over,
                sites_at: s.sites_at,
                sites_under: s.sites_under,
            },
            completed: OpsCompletedSummary {
                network_weighted: s.completed_weighted.unwrap_or(0.0),
                utilization_pct: s.completed_utilization_pct.unwrap_or(0.0),
            },
            execution: OpsExecutionDelta {
                delta_weighted: s.execution_delta_weighted.unwrap_or(0.0),
                delta_pct_points: s.execution_delta_pct_points.unwrap_or(0.0),
            },
            unknown_modalities: result.unknown_modalities.clone(),
        }
    }
}

impl From<&DailyCapacityResult> for OpsDailyCapacityResult {
    fn from(result: &DailyCapacityResult) -> Self {
        Self::from_daily(result)
    }
}
