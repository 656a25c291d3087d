//! Capacity comparison: utilization ratio, gap and status against the
//! 90th-percentile benchmarks.

use crate::core::aggregate::Aggregation;
use crate::core::rounding::round_to;
use crate::domain::model::{
    CapacityStatus, LocationCapacity, LocationResult, ModalityCapacity, ModalityResult,
};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Above `capacity * OVER_FACTOR` a site is over capacity.
pub const OVER_FACTOR: f64 = 1.05;
/// From `capacity * AT_FACTOR` up to the over threshold a site is at capacity.
pub const AT_FACTOR: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityAssessment {
    pub weighted_units: f64,
    pub pct_of_capacity: Option<f64>,
    pub gap_units: Option<f64>,
    pub status: CapacityStatus,
}

/// Compares a weighted total to an optional benchmark.
///
/// The total is rounded to two decimals before any comparison.
pub fn assess(weighted_units: f64, capacity: Option<f64>) -> CapacityAssessment {
    let weighted = round_to(weighted_units, 2);

    let pct_of_capacity = capacity
        .filter(|cap| *cap > 0.0)
        .map(|cap| round_to(weighted / cap, 3));

    let gap_units = capacity
        .filter(|cap| weighted < *cap)
        .map(|cap| round_to(cap - weighted, 2));

    CapacityAssessment {
        weighted_units: weighted,
        pct_of_capacity,
        gap_units,
        status: classify(weighted, capacity),
    }
}

pub fn classify(weighted: f64, capacity: Option<f64>) -> CapacityStatus {
    match capacity {
        None => CapacityStatus::NoCap,
        Some(cap) if weighted > cap * OVER_FACTOR => CapacityStatus::Over,
        Some(cap) if weighted >= cap * AT_FACTOR => CapacityStatus::At,
        Some(_) => CapacityStatus::Under,
    }
}

/// Location and (location, modality) benchmark tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapacityBenchmarks {
    by_location: BTreeMap<String, f64>,
    by_modality: BTreeMap<(String, String), f64>,
}

impl CapacityBenchmarks {
    /// Later rows for the same key replace earlier ones.
    pub fn from_rows(locations: Vec<LocationCapacity>, modalities: Vec<ModalityCapacity>) -> Self {
        let by_location = locations
            .into_iter()
            .map(|row| (row.location, row.capacity))
            .collect();
        let by_modality = modalities
            .into_iter()
            .map(|row| ((row.location, row.modality), row.capacity))
            .collect();

        Self {
            by_location,
            by_modality,
        }
    }

    pub fn location(&self, location: &str) -> Option<f64> {
        self.by_location.get(location).copied()
    }

    pub fn modality(&self, location: &str, modality: &str) -> Option<f64> {
        self.by_modality
            .get(&(location.to_string(), modality.to_string()))
            .copied()
    }

    /// Sum of every location benchmark, including sites with nothing scheduled.
    pub fn network_capacity(&self) -> f64 {
        self.by_location.values().sum()
    }

    pub fn location_count(&self) -> usize {
        self.by_location.len()
    }

    pub fn modality_count(&self) -> usize {
        self.by_modality.len()
    }
}

/// Location rollup, ordered by percent of capacity descending.
///
/// Locations without a ratio sort as 0.0; ties keep alphabetical order.
pub fn location_results(
    dos: NaiveDate,
    aggregation: &Aggregation,
    benchmarks: &CapacityBenchmarks,
) -> Vec<LocationResult> {
    let mut results: Vec<LocationResult> = aggregation
        .location_totals
        .iter()
        .map(|(location, totals)| {
            let capacity = benchmarks.location(location);
            let assessment = assess(totals.weighted_units, capacity);
            LocationResult {
                dos,
                location: location.clone(),
                exams: totals.exams,
                weighted_units: assessment.weighted_units,
                capacity,
                pct_of_capacity: assessment.pct_of_capacity,
                gap_units: assessment.gap_units,
                status: assessment.status,
            }
        })
        .collect();

    results.sort_by(|a, b| {
        let a_pct = a.pct_of_capacity.unwrap_or(0.0);
        let b_pct = b.pct_of_capacity.unwrap_or(0.0);
        b_pct.partial_cmp(&a_pct).unwrap_or(Ordering::Equal)
    });

    results
}

/// Modality detail in (location, modality) order.
pub fn modality_results(
    dos: NaiveDate,
    aggregation: &Aggregation,
    benchmarks: &CapacityBenchmarks,
) -> Vec<ModalityResult> {
    aggregation
        .weighted_rows
        .iter()
        .map(|row| {
            let capacity = benchmarks.modality(&row.location, &row.modality);
            let assessment = assess(row.weighted_units, capacity);
            ModalityResult {
                dos,
                location: row.location.clone(),
                modality: row.modality.clone(),
                exams: row.volume,
                weighted_units: assessment.weighted_units,
                capacity,
                pct_of_capacity: assessment.pct_of_capacity,
                gap_units: assessment.gap_units,
                status: assessment.status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::aggregate_scheduled;
    use crate::core::weights::WeightResolver;
    use crate::domain::model::{ExamRow, GovernanceRule};

    #[test]
    fn test_boundary_at_five_percent_over_is_at_capacity() {
        let a = assess(105.0, Some(100.0));
        assert_eq!(a.pct_of_capacity, Some(1.05));
        assert_eq!(a.status, CapacityStatus::At);
        assert_eq!(a.gap_units, None);
    }

    #[test]
    fn test_just_past_threshold_is_over_capacity() {
        let a = assess(106.0, Some(100.0));
        assert_eq!(a.pct_of_capacity, Some(1.06));
        assert_eq!(a.status, CapacityStatus::Over);
    }

    #[test]
    fn test_lower_boundary_is_at_capacity() {
        let a = assess(95.0, Some(100.0));
        assert_eq!(a.status, CapacityStatus::At);
        assert_eq!(a.gap_units, Some(5.0));

        let b = assess(94.99, Some(100.0));
        assert_eq!(b.status, CapacityStatus::Under);
        assert_eq!(b.gap_units, Some(5.01));
        assert_eq!(b.pct_of_capacity, Some(0.95));
    }

    #[test]
    fn test_rounding_happens_before_comparison() {
        // 105.004 四捨五入為 105.00，仍屬 AT
        let a = assess(105.004, Some(100.0));
        assert_eq!(a.weighted_units, 105.0);
        assert_eq!(a.status, CapacityStatus::At);
    }

    #[test]
    fn test_missing_benchmark_is_no_cap() {
        let a = assess(42.0, None);
        assert_eq!(a.status, CapacityStatus::NoCap);
        assert_eq!(a.pct_of_capacity, None);
        assert_eq!(a.gap_units, None);
    }

    #[test]
    fn test_zero_capacity_has_no_ratio_and_forces_over() {
        let a = assess(1.0, Some(0.0));
        assert_eq!(a.pct_of_capacity, None);
        assert_eq!(a.gap_units, None);
        assert_eq!(a.status, CapacityStatus::Over);
    }

    #[test]
    fn test_status_is_monotonic_in_ratio() {
        let order = |s: CapacityStatus| match s {
            CapacityStatus::Under => 0,
            CapacityStatus::At => 1,
            CapacityStatus::Over => 2,
            CapacityStatus::NoCap => unreachable!(),
        };
        let mut previous = 0;
        for step in 0..=300 {
            let weighted = step as f64;
            let current = order(classify(weighted, Some(100.0)));
            assert!(current >= previous, "status regressed at {}", weighted);
            previous = current;
        }
    }

    #[test]
    fn test_location_results_sort_by_utilization_desc() {
        let dos = NaiveDate::from_ymd_opt(2026, 1, 16).unwrap();
        let resolver = WeightResolver::new(vec![GovernanceRule::new(
            "MRI",
            1.0,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            None,
        )]);
        let rows: Vec<ExamRow> = [("ALPHA", 50), ("BRAVO", 90), ("CHARLIE", 10), ("DELTA", 70)]
            .iter()
            .map(|(loc, vol)| ExamRow {
                location: loc.to_string(),
                modality: "MRI".to_string(),
                volume: *vol,
                service_date: dos,
            })
            .collect();
        let agg = aggregate_scheduled(&rows, &resolver, dos);
        let benchmarks = CapacityBenchmarks::from_rows(
            vec![
                LocationCapacity { location: "ALPHA".into(), capacity: 100.0 },
                LocationCapacity { location: "BRAVO".into(), capacity: 100.0 },
                LocationCapacity { location: "DELTA".into(), capacity: 100.0 },
            ],
            vec![],
        );

        let results = location_results(dos, &agg, &benchmarks);
        let order: Vec<&str> = results.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(order, vec!["BRAVO", "DELTA", "ALPHA", "CHARLIE"]);
        assert_eq!(results[3].status, CapacityStatus::NoCap);
        assert_eq!(results[3].capacity, None);
    }

    #[test]
    fn test_modality_results_use_pair_benchmarks() {
        let dos = NaiveDate::from_ymd_opt(2026, 1, 16).unwrap();
        let resolver = WeightResolver::new(vec![GovernanceRule::new(
            "CT",
            2.0,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            None,
        )]);
        let rows = vec![ExamRow {
            location: "ALPHA".into(),
            modality: "CT".into(),
            volume: 10,
            service_date: dos,
        }];
        let agg = aggregate_scheduled(&rows, &resolver, dos);
        let benchmarks = CapacityBenchmarks::from_rows(
            vec![],
            vec![ModalityCapacity {
                location: "ALPHA".into(),
                modality: "CT".into(),
                capacity: 25.0,
            }],
        );

        let results = modality_results(dos, &agg, &benchmarks);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].weighted_units, 20.0);
        assert_eq!(results[0].pct_of_capacity, Some(0.8));
        assert_eq!(results[0].gap_units, Some(5.0));
        assert_eq!(results[0].status, CapacityStatus::Under);
    }
}
