use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One raw exam-volume row as delivered by an exam source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamRow {
    pub location: String,
    pub modality: String,
    pub volume: u64,
    pub service_date: NaiveDate,
}

/// Scheduled exams for one day of service, as captured by the morning snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSnapshot {
    pub rows: Vec<ExamRow>,
    pub snapshot_date: Option<NaiveDate>,
}

/// Effective-dated modality weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceRule {
    pub modality: String,
    pub weight: f64,
    pub effective_start: NaiveDate,
    pub effective_end: Option<NaiveDate>,
}

impl GovernanceRule {
    pub fn new(
        modality: &str,
        weight: f64,
        effective_start: NaiveDate,
        effective_end: Option<NaiveDate>,
    ) -> Self {
        Self {
            modality: normalize_modality(modality),
            weight,
            effective_start,
            effective_end,
        }
    }

    /// Inclusive on both ends; an open end never expires.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.effective_start <= date && self.effective_end.map_or(true, |end| end >= date)
    }
}

/// Governance lookups compare trimmed, upper-cased modality names.
pub fn normalize_modality(modality: &str) -> String {
    modality.trim().to_uppercase()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCapacity {
    pub location: String,
    pub capacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalityCapacity {
    pub location: String,
    pub modality: String,
    pub capacity: f64,
}

/// Utilization classification against a capacity benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapacityStatus {
    #[serde(rename = "OVER CAPACITY")]
    Over,
    #[serde(rename = "AT CAPACITY")]
    At,
    #[serde(rename = "UNDER CAPACITY (GAP)")]
    Under,
    #[serde(rename = "NO CAP")]
    NoCap,
}

impl CapacityStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CapacityStatus::Over => "OVER CAPACITY",
            CapacityStatus::At => "AT CAPACITY",
            CapacityStatus::Under => "UNDER CAPACITY (GAP)",
            CapacityStatus::NoCap => "NO CAP",
        }
    }

    /// Wording used by the modality detail table.
    pub fn modality_label(&self) -> &'static str {
        match self {
            CapacityStatus::Under => "UNDER (GAP)",
            other => other.label(),
        }
    }
}

impl fmt::Display for CapacityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weighted workload for one (location, modality) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedRow {
    pub location: String,
    pub modality: String,
    pub volume: u64,
    pub weight: Option<f64>,
    pub weighted_units: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    pub dos: NaiveDate,
    pub location: String,
    pub exams: u64,
    pub weighted_units: f64,
    pub capacity: Option<f64>,
    pub pct_of_capacity: Option<f64>,
    pub gap_units: Option<f64>,
    pub status: CapacityStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalityResult {
    pub dos: NaiveDate,
    pub location: String,
    pub modality: String,
    pub exams: u64,
    pub weighted_units: f64,
    pub capacity: Option<f64>,
    pub pct_of_capacity: Option<f64>,
    pub gap_units: Option<f64>,
    pub status: CapacityStatus,
}

/// Network-wide KPIs for a reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub report_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_active_sites: usize,

    pub scheduled_weighted: f64,
    pub capacity: f64,
    pub utilization_pct: f64,

    pub sites_over: usize,
    pub sites_at: usize,
    pub sites_under: usize,

    // 僅在 DOS <= 今日時才有值
    pub completed_weighted: Option<f64>,
    pub completed_utilization_pct: Option<f64>,
    pub execution_delta_weighted: Option<f64>,
    pub execution_delta_pct_points: Option<f64>,
}

/// The single output of a daily run; every renderer reads from this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCapacityResult {
    pub summary: NetworkSummary,
    pub locations: Vec<LocationResult>,
    pub modalities: Vec<ModalityResult>,
    pub unknown_modalities: BTreeSet<String>,
    pub snapshot_date: Option<NaiveDate>,
}

impl DailyCapacityResult {
    pub fn dos(&self) -> NaiveDate {
        self.summary.start_date
    }

    /// Highest-utilization locations, in report order.
    pub fn top_locations(&self, n: usize) -> &[LocationResult] {
        &self.locations[..n.min(self.locations.len())]
    }
}

/// Accumulated totals over an explicit date window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    pub report_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: usize,
    pub site_days: usize,
    pub scheduled_weighted: f64,
    pub capacity: f64,
    pub utilization_pct: f64,
    pub site_days_over: usize,
    pub site_days_at: usize,
    pub site_days_under: usize,
    /// Execution figures cover only the days already evaluable.
    pub completed_weighted: Option<f64>,
    pub completed_utilization_pct: Option<f64>,
    pub execution_delta_weighted: Option<f64>,
    pub execution_delta_pct_points: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeCapacityResult {
    pub totals: RangeSummary,
    pub days: Vec<DailyCapacityResult>,
    pub unknown_modalities: BTreeSet<String>,
}

/// Who an email rendering is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    /// Full location and modality detail.
    #[default]
    Scheduling,
    /// Execution delta summary only.
    Ops,
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Audience::Scheduling => f.write_str("scheduling"),
            Audience::Ops => f.write_str("ops"),
        }
    }
}
