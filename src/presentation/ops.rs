use super::{unknown_modalities_warning, FOOTER};
use crate::core::ops::OpsDailyCapacityResult;

/// Short plain-text execution report: plan, actual, delta. No tables.
pub fn render_ops_capacity_text(ops: &OpsDailyCapacityResult) -> String {
    let rule = "=".repeat(70);
    let snapshot = ops
        .snapshot_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let sch = &ops.scheduled;
    let comp = &ops.completed;
    let ex = &ops.execution;

    let mut lines = vec![
        rule.clone(),
        "DAILY RADIOLOGY CAPACITY – OPS (EXECUTION)".to_string(),
        rule,
        String::new(),
        format!("Report Date: {}", ops.report_date),
        format!("DOS: {}", ops.dos),
        format!("Schedule Snapshot As Of: {}", snapshot),
        format!("Total Active Sites: {}", ops.total_active_sites),
        String::new(),
        "--- SCHEDULED (PLAN) ---".to_string(),
        format!("Network Scheduled Weighted: {:.2}", sch.network_weighted),
        format!("Network Capacity (90th):   {:.2}", sch.network_capacity),
        format!("Scheduled Utilization:     {:.1}%", sch.utilization_pct),
        format!(
            "Sites OVER / AT / UNDER:   {} / {} / {}",
            sch.sites_over, sch.sites_at, sch.sites_under
        ),
        String::new(),
        "--- COMPLETED (ACTUAL) ---".to_string(),
        format!("Network Completed Weighted: {:.2}", comp.network_weighted),
        format!("Completed Utilization:      {:.1}%", comp.utilization_pct),
        String::new(),
        "--- EXECUTION DELTA ---".to_string(),
        format!(
            "Completed - Scheduled: {:.2} weighted ({:.1} pts)",
            ex.delta_weighted, ex.delta_pct_points
        ),
    ];

    let warning = unknown_modalities_warning(&ops.unknown_modalities);
    if !warning.is_empty() {
        lines.push(String::new());
        lines.extend(warning);
    }

    lines.push(String::new());
    lines.push(FOOTER.to_string());
    lines.join("\n")
}
