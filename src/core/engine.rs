use crate::core::capacity::CapacityBenchmarks;
use crate::core::ops::OpsDailyCapacityResult;
use crate::core::report::{assemble_daily, assemble_range, days_in_window, DailyInputs};
use crate::core::weights::WeightResolver;
use crate::core::{CapacitySource, ExamSource, GovernanceSource};
use crate::domain::model::{DailyCapacityResult, RangeCapacityResult};
use crate::utils::error::Result;
use crate::utils::validation::validate_date_window;
use chrono::NaiveDate;

/// Fetches report inputs from the injected sources and hands them to the
/// pure assembler. Any source failure aborts the run.
pub struct CapacityEngine<E: ExamSource, G: GovernanceSource, C: CapacitySource> {
    exams: E,
    governance: G,
    capacity: C,
}

impl<E: ExamSource, G: GovernanceSource, C: CapacitySource> CapacityEngine<E, G, C> {
    pub fn new(exams: E, governance: G, capacity: C) -> Self {
        Self {
            exams,
            governance,
            capacity,
        }
    }

    pub async fn run_daily(&self, dos: NaiveDate, today: NaiveDate) -> Result<DailyCapacityResult> {
        tracing::info!("📊 Running daily capacity report | DOS={}", dos);

        let (resolver, benchmarks) = self.load_reference_data().await?;
        let inputs = self.load_day(dos, today).await?;

        let result = assemble_daily(dos, today, &inputs, &resolver, &benchmarks);
        log_result(&result);

        Ok(result)
    }

    pub async fn run_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<RangeCapacityResult> {
        validate_date_window(start, end)?;
        tracing::info!("📊 Running capacity report | {} -> {}", start, end);

        let (resolver, benchmarks) = self.load_reference_data().await?;

        let mut days = Vec::new();
        for dos in days_in_window(start, end) {
            let inputs = self.load_day(dos, today).await?;
            days.push((dos, inputs));
        }

        let range = assemble_range(start, end, today, &days, &resolver, &benchmarks);
        tracing::info!(
            "✅ Range complete: {} days, {:.2} weighted vs {:.2} capacity ({:.1}%)",
            range.totals.days,
            range.totals.scheduled_weighted,
            range.totals.capacity,
            range.totals.utilization_pct
        );
        if !range.unknown_modalities.is_empty() {
            tracing::warn!(
                "⚠️ Unknown modalities (no governance weight): {}",
                join_names(&range.unknown_modalities)
            );
        }

        Ok(range)
    }

    pub async fn run_ops(&self, dos: NaiveDate, today: NaiveDate) -> Result<OpsDailyCapacityResult> {
        let result = self.run_daily(dos, today).await?;
        Ok(OpsDailyCapacityResult::from_daily(&result))
    }

    async fn load_reference_data(&self) -> Result<(WeightResolver, CapacityBenchmarks)> {
        let rules = self.governance.governance_rules().await?;
        tracing::debug!("Loaded {} governance rules", rules.len());

        let locations = self.capacity.location_capacity().await?;
        let modalities = self.capacity.modality_capacity().await?;
        tracing::debug!(
            "Loaded {} location and {} modality capacity benchmarks",
            locations.len(),
            modalities.len()
        );

        Ok((
            WeightResolver::new(rules),
            CapacityBenchmarks::from_rows(locations, modalities),
        ))
    }

    async fn load_day(&self, dos: NaiveDate, today: NaiveDate) -> Result<DailyInputs> {
        let scheduled = self.exams.scheduled_snapshot(dos).await?;
        if scheduled.rows.is_empty() {
            tracing::warn!("No scheduled data found for DOS={}", dos);
        } else {
            tracing::debug!("Scheduled snapshot for {}: {} rows", dos, scheduled.rows.len());
        }

        // 未來日期沒有完成資料，不查詢
        let completed = if dos <= today {
            let rows = self.exams.completed_exams(dos).await?;
            tracing::debug!("Completed exams for {}: {} rows", dos, rows.len());
            Some(rows)
        } else {
            None
        };

        Ok(DailyInputs {
            scheduled,
            completed,
        })
    }
}

impl<S> CapacityEngine<S, S, S>
where
    S: ExamSource + GovernanceSource + CapacitySource + Clone,
{
    /// Uses one adapter for every port.
    pub fn from_source(source: S) -> Self {
        Self::new(source.clone(), source.clone(), source)
    }
}

fn log_result(result: &DailyCapacityResult) {
    let s = &result.summary;
    tracing::info!(
        "✅ DOS={} sites={} weighted={:.2} capacity={:.2} utilization={:.1}% over/at/under={}/{}/{}",
        s.start_date,
        s.total_active_sites,
        s.scheduled_weighted,
        s.capacity,
        s.utilization_pct,
        s.sites_over,
        s.sites_at,
        s.sites_under
    );

    if let Some(delta) = s.execution_delta_weighted {
        tracing::info!("📈 Execution delta (completed - scheduled): {:.2} weighted", delta);
    }

    if !result.unknown_modalities.is_empty() {
        tracing::warn!(
            "⚠️ Unknown modalities (no governance weight): {}",
            join_names(&result.unknown_modalities)
        );
    }
}

fn join_names<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
