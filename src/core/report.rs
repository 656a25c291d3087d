//! Pure report assembly. No I/O happens here; every input has already been
//! materialized by the caller.

use crate::core::aggregate::{aggregate_completed, aggregate_scheduled};
use crate::core::capacity::{location_results, modality_results, CapacityBenchmarks};
use crate::core::execution::{compute_execution_delta, is_evaluable};
use crate::core::network::{build_network_summary, utilization_pct, ReportWindow};
use crate::core::rounding::round_to;
use crate::core::weights::WeightResolver;
use crate::domain::model::{
    DailyCapacityResult, ExamRow, RangeCapacityResult, RangeSummary, ScheduledSnapshot,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Source data for one day of service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyInputs {
    pub scheduled: ScheduledSnapshot,
    /// Only fetched for days on or before today; `None` otherwise.
    pub completed: Option<Vec<ExamRow>>,
}

/// Builds the daily result for `dos`.
///
/// `today` decides whether the execution delta is evaluated and is stamped as
/// the report date.
pub fn assemble_daily(
    dos: NaiveDate,
    today: NaiveDate,
    inputs: &DailyInputs,
    resolver: &WeightResolver,
    benchmarks: &CapacityBenchmarks,
) -> DailyCapacityResult {
    let scheduled = aggregate_scheduled(&inputs.scheduled.rows, resolver, dos);

    let locations = location_results(dos, &scheduled, benchmarks);
    let modalities = modality_results(dos, &scheduled, benchmarks);

    let network_capacity = benchmarks.network_capacity();
    let mut summary = build_network_summary(
        ReportWindow::single_day(dos, today),
        &locations,
        network_capacity,
    );

    let mut unknown_modalities = scheduled.unknown_modalities;

    if is_evaluable(dos, today) {
        let completed_rows = inputs.completed.as_deref().unwrap_or_default();
        let completed = aggregate_completed(completed_rows, resolver);

        compute_execution_delta(
            completed.total_weighted(),
            summary.scheduled_weighted,
            summary.utilization_pct,
            network_capacity,
        )
        .apply_to(&mut summary);

        unknown_modalities.extend(completed.unknown_modalities);
    }

    DailyCapacityResult {
        summary,
        locations,
        modalities,
        unknown_modalities,
        snapshot_date: inputs.scheduled.snapshot_date,
    }
}

/// Repeats the daily procedure for every day in `[start, end]` and
/// accumulates range totals.
///
/// `days` pairs each day of service with its inputs; it is expected in
/// calendar order and to cover the window.
pub fn assemble_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    days: &[(NaiveDate, DailyInputs)],
    resolver: &WeightResolver,
    benchmarks: &CapacityBenchmarks,
) -> RangeCapacityResult {
    let results: Vec<DailyCapacityResult> = days
        .iter()
        .map(|(dos, inputs)| assemble_daily(*dos, today, inputs, resolver, benchmarks))
        .collect();

    let capacity = benchmarks.network_capacity() * results.len() as f64;
    let scheduled_weighted: f64 = results.iter().map(|r| r.summary.scheduled_weighted).sum();

    let evaluated: Vec<&DailyCapacityResult> = results
        .iter()
        .filter(|r| r.summary.completed_weighted.is_some())
        .collect();
    // 只比較已有完成資料的日期
    let execution = (!evaluated.is_empty()).then(|| {
        let completed: f64 = evaluated
            .iter()
            .filter_map(|r| r.summary.completed_weighted)
            .sum();
        let baseline: f64 = evaluated.iter().map(|r| r.summary.scheduled_weighted).sum();
        let evaluated_capacity = benchmarks.network_capacity() * evaluated.len() as f64;
        compute_execution_delta(
            completed,
            baseline,
            utilization_pct(baseline, evaluated_capacity),
            evaluated_capacity,
        )
    });

    let unknown_modalities: BTreeSet<String> = results
        .iter()
        .flat_map(|r| r.unknown_modalities.iter().cloned())
        .collect();

    let totals = RangeSummary {
        report_date: today,
        start_date: start,
        end_date: end,
        days: results.len(),
        site_days: results.iter().map(|r| r.summary.total_active_sites).sum(),
        scheduled_weighted: round_to(scheduled_weighted, 2),
        capacity: round_to(capacity, 2),
        utilization_pct: utilization_pct(scheduled_weighted, capacity),
        site_days_over: results.iter().map(|r| r.summary.sites_over).sum(),
        site_days_at: results.iter().map(|r| r.summary.sites_at).sum(),
        site_days_under: results.iter().map(|r| r.summary.sites_under).sum(),
        completed_weighted: execution.map(|e| e.completed_weighted),
        completed_utilization_pct: execution.and_then(|e| e.completed_utilization_pct),
        execution_delta_weighted: execution.map(|e| e.delta_weighted),
        execution_delta_pct_points: execution.and_then(|e| e.delta_pct_points),
    };

    RangeCapacityResult {
        totals,
        days: results,
        unknown_modalities,
    }
}

/// Calendar days from `start` through `end`, inclusive.
pub fn days_in_window(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}
