use super::{format_table, opt_number, pct_label, unknown_modalities_warning, with_commas};
use crate::domain::model::{DailyCapacityResult, LocationResult, ModalityResult, RangeCapacityResult};

const RULE: &str =
    "================================================================================";
const TOP_N: usize = 5;
const MAX_TABLE_ROWS: usize = 50;

/// Executive summary followed by the location and modality tables.
pub fn render_daily_capacity(result: &DailyCapacityResult) -> String {
    let s = &result.summary;
    let mut lines = vec![
        RULE.to_string(),
        "EXECUTIVE SUMMARY - RADIOLOGY CAPACITY REPORT".to_string(),
        RULE.to_string(),
        format!("Report Date:             {}", s.report_date),
        format!("Scheduled For:           {}", result.dos()),
    ];
    if let Some(snapshot) = result.snapshot_date {
        lines.push(format!("Schedule Snapshot As Of: {}", snapshot));
    }
    lines.push(format!("Total Active Sites:      {}", s.total_active_sites));
    lines.push(String::new());

    lines.push(format!("Network Scheduled Weighted: {}", with_commas(s.scheduled_weighted, 2)));
    lines.push(format!("Network Capacity (90th):    {}", with_commas(s.capacity, 2)));
    lines.push(format!("Network Utilization:        {:.1}%", s.utilization_pct));
    lines.push(String::new());

    lines.push(format!("Sites OVER capacity:  {}", s.sites_over));
    lines.push(format!("Sites AT capacity:    {}", s.sites_at));
    lines.push(format!("Sites UNDER capacity: {}", s.sites_under));

    if let Some(completed) = s.completed_weighted {
        lines.push(String::new());
        lines.push(format!("Network Completed Weighted: {}", with_commas(completed, 2)));
        lines.push(format!(
            "Completed Utilization:      {}",
            s.completed_utilization_pct
                .map(|p| format!("{:.1}%", p))
                .unwrap_or_else(|| "N/A".to_string())
        ));
        lines.push(format!(
            "Execution Delta:            {} weighted ({} pts)",
            opt_number(s.execution_delta_weighted, 2),
            opt_number(s.execution_delta_pct_points, 1)
        ));
    }

    lines.push(String::new());
    lines.push(format!("Top {} Highest Utilization Sites:", TOP_N));
    for loc in result.top_locations(TOP_N) {
        lines.push(format!(
            "  • {:<18} {:>10} weighted ({} of capacity) → {}",
            loc.location,
            with_commas(loc.weighted_units, 1),
            pct_label(loc.pct_of_capacity),
            loc.status
        ));
    }

    lines.push(String::new());
    lines.push("== Location Rollup ==".to_string());
    lines.push(location_table(&result.locations));
    lines.push(String::new());
    lines.push("== Modality Detail ==".to_string());
    lines.push(modality_table(&result.modalities));

    let warning = unknown_modalities_warning(&result.unknown_modalities);
    if !warning.is_empty() {
        lines.push(String::new());
        lines.extend(warning);
    }

    lines.join("\n")
}

/// Window totals, then a condensed per-day line for each evaluated day.
pub fn render_range_capacity(result: &RangeCapacityResult) -> String {
    let t = &result.totals;
    let mut lines = vec![
        RULE.to_string(),
        "RADIOLOGY CAPACITY REPORT - DATE RANGE".to_string(),
        RULE.to_string(),
        format!("Report Date:      {}", t.report_date),
        format!("Window:           {} to {} ({} days)", t.start_date, t.end_date, t.days),
        format!("Site-Days:        {}", t.site_days),
        String::new(),
        format!("Scheduled Weighted: {}", with_commas(t.scheduled_weighted, 2)),
        format!("Window Capacity:    {}", with_commas(t.capacity, 2)),
        format!("Utilization:        {:.1}%", t.utilization_pct),
        String::new(),
        format!("Site-days OVER:  {}", t.site_days_over),
        format!("Site-days AT:    {}", t.site_days_at),
        format!("Site-days UNDER: {}", t.site_days_under),
    ];

    if let Some(completed) = t.completed_weighted {
        lines.push(String::new());
        lines.push(format!("Completed Weighted: {}", with_commas(completed, 2)));
        lines.push(format!(
            "Completed Util:     {}",
            t.completed_utilization_pct
                .map(|p| format!("{:.1}%", p))
                .unwrap_or_else(|| "N/A".to_string())
        ));
        lines.push(format!(
            "Execution Delta:    {} weighted ({} pts)",
            opt_number(t.execution_delta_weighted, 2),
            opt_number(t.execution_delta_pct_points, 1)
        ));
    }

    lines.push(String::new());
    lines.push("== Daily Breakdown ==".to_string());
    let rows: Vec<Vec<String>> = result
        .days
        .iter()
        .map(|day| {
            let s = &day.summary;
            vec![
                day.dos().to_string(),
                s.total_active_sites.to_string(),
                format!("{:.2}", s.scheduled_weighted),
                format!("{:.1}%", s.utilization_pct),
                s.sites_over.to_string(),
                s.sites_at.to_string(),
                s.sites_under.to_string(),
                opt_number(s.execution_delta_weighted, 2),
            ]
        })
        .collect();
    lines.push(format_table(
        &["dos", "sites", "weighted", "util", "over", "at", "under", "delta"],
        &rows,
        None,
    ));

    let warning = unknown_modalities_warning(&result.unknown_modalities);
    if !warning.is_empty() {
        lines.push(String::new());
        lines.extend(warning);
    }

    lines.join("\n")
}

fn location_table(locations: &[LocationResult]) -> String {
    let rows: Vec<Vec<String>> = locations
        .iter()
        .map(|l| {
            vec![
                l.location.clone(),
                l.exams.to_string(),
                format!("{:.2}", l.weighted_units),
                opt_number(l.capacity, 2),
                opt_number(l.pct_of_capacity, 3),
                opt_number(l.gap_units, 2),
                l.status.label().to_string(),
            ]
        })
        .collect();

    format_table(
        &["location", "exams", "weighted_units", "capacity", "pct_of_capacity", "gap_units", "status"],
        &rows,
        Some(MAX_TABLE_ROWS),
    )
}

fn modality_table(modalities: &[ModalityResult]) -> String {
    let rows: Vec<Vec<String>> = modalities
        .iter()
        .map(|m| {
            vec![
                m.location.clone(),
                m.modality.clone(),
                m.exams.to_string(),
                format!("{:.2}", m.weighted_units),
                opt_number(m.capacity, 2),
                opt_number(m.pct_of_capacity, 3),
                opt_number(m.gap_units, 2),
                m.status.modality_label().to_string(),
            ]
        })
        .collect();

    format_table(
        &["location", "modality", "exams", "weighted_units", "capacity", "pct_of_capacity", "gap_units", "status"],
        &rows,
        Some(MAX_TABLE_ROWS),
    )
}
