//! Groups exam rows by (location, modality) and rolls weighted units up to
//! per-location totals.
//!
//! Rows whose modality has no active governance rule still count toward
//! exams but contribute zero weighted units; the modality name is recorded in
//! `unknown_modalities`. Exam counts and weighted totals can therefore diverge
//! for ungoverned modalities.

use crate::core::rounding::round_to;
use crate::core::weights::WeightResolver;
use crate::domain::model::{ExamRow, WeightedRow};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Placeholder recorded when a row carries no modality name at all.
pub const NULL_MODALITY: &str = "(NULL)";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocationTotals {
    pub exams: u64,
    pub weighted_units: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// One row per (location, modality), ordered by location then modality.
    pub weighted_rows: Vec<WeightedRow>,
    pub location_totals: BTreeMap<String, LocationTotals>,
    pub unknown_modalities: BTreeSet<String>,
}

impl Aggregation {
    pub fn total_weighted(&self) -> f64 {
        round_to(
            self.location_totals.values().map(|t| t.weighted_units).sum(),
            2,
        )
    }

    pub fn total_exams(&self) -> u64 {
        self.location_totals.values().map(|t| t.exams).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.weighted_rows.is_empty()
    }
}

/// Aggregates the scheduled snapshot, resolving every weight as of `dos`.
pub fn aggregate_scheduled(rows: &[ExamRow], resolver: &WeightResolver, dos: NaiveDate) -> Aggregation {
    aggregate_with(rows, |row| resolver.weight_for_snapshot(&row.modality, dos))
}

/// Aggregates completed exams, resolving each weight as of the row's service date.
pub fn aggregate_completed(rows: &[ExamRow], resolver: &WeightResolver) -> Aggregation {
    aggregate_with(rows, |row| {
        resolver.weight_for_service_date(&row.modality, row.service_date)
    })
}

#[derive(Default)]
struct Group {
    volume: u64,
    weight: Option<f64>,
    weighted: f64,
}

fn aggregate_with<F>(rows: &[ExamRow], resolve: F) -> Aggregation
where
    F: Fn(&ExamRow) -> Option<f64>,
{
    let mut groups: BTreeMap<(String, String), Group> = BTreeMap::new();
    let mut unknown_modalities = BTreeSet::new();

    for row in rows {
        let group = groups
            .entry((row.location.clone(), row.modality.clone()))
            .or_default();
        group.volume += row.volume;

        match resolve(row) {
            Some(weight) => {
                group.weighted += row.volume as f64 * weight;
                // 同組多個權重時取最大值，與來源報表一致
                group.weight = Some(group.weight.map_or(weight, |w| w.max(weight)));
            }
            None => {
                let name = if row.modality.trim().is_empty() {
                    NULL_MODALITY.to_string()
                } else {
                    row.modality.clone()
                };
                unknown_modalities.insert(name);
            }
        }
    }

    let mut weighted_rows = Vec::with_capacity(groups.len());
    let mut running: BTreeMap<String, LocationTotals> = BTreeMap::new();

    for ((location, modality), group) in groups {
        let weighted_units = round_to(group.weighted, 2);

        let totals = running.entry(location.clone()).or_default();
        totals.exams += group.volume;
        totals.weighted_units += weighted_units;

        weighted_rows.push(WeightedRow {
            location,
            modality,
            volume: group.volume,
            weight: group.weight,
            weighted_units,
        });
    }

    let location_totals = running
        .into_iter()
        .map(|(location, totals)| {
            (
                location,
                LocationTotals {
                    exams: totals.exams,
                    weighted_units: round_to(totals.weighted_units, 2),
                },
            )
        })
        .collect();

    Aggregation {
        weighted_rows,
        location_totals,
        unknown_modalities,
    }
}
