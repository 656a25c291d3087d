use super::console::render_daily_capacity;
use super::{escape_html, pct_label, with_commas, FOOTER};
use crate::domain::model::{Audience, CapacityStatus, DailyCapacityResult};
use serde::Serialize;

pub const OPS_SUBJECT: &str = "Daily Radiology Capacity – OPS (Execution)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

fn status_color(status: CapacityStatus) -> &'static str {
    match status {
        CapacityStatus::Over => "#e74c3c",
        CapacityStatus::At => "#27ae60",
        CapacityStatus::Under => "#3498db",
        CapacityStatus::NoCap => "#7f8c8d",
    }
}

/// Builds subject and HTML body. Delivery is the caller's business.
pub fn build_capacity_email(result: &DailyCapacityResult, audience: Audience) -> EmailContent {
    match audience {
        Audience::Scheduling => scheduling_email(result),
        Audience::Ops => ops_email(result),
    }
}

fn scheduling_email(result: &DailyCapacityResult) -> EmailContent {
    let s = &result.summary;
    let subject = format!(
        "Capacity Alert – {} Sites Over ({:.1}%)",
        s.sites_over, s.utilization_pct
    );

    let mut html = open_document("Daily Radiology Capacity Report");
    html.push_str(&format!(
        "  <p><strong>Forecast for {}:</strong></p>\n",
        result.dos()
    ));
    html.push_str(&format!(
        r#"  <div style="background: #f8f9fa; padding: 15px; border-left: 6px solid #3498db; margin: 20px 0;">
    <p><strong>Network Utilization:</strong> <span style="font-size: 1.2em;">{:.1}%</span></p>
    <p><strong>Status:</strong>
      <span style="color: #e74c3c;"><strong>{} OVER CAPACITY</strong></span> •
      <span style="color: #27ae60;">{} AT CAPACITY</span> •
      <span style="color: #3498db;">{} UNDER</span>
    </p>
  </div>
"#,
        s.utilization_pct, s.sites_over, s.sites_at, s.sites_under
    ));

    html.push_str("  <p><strong>Top 5 Hot Spots – Action Required</strong></p>\n");
    html.push_str(
        r#"  <table style="width: 100%; max-width: 650px; border-collapse: collapse; margin: 15px 0;">
    <tr style="background: #2c3e50; color: white;">
      <th align="left" style="padding: 10px;">Site</th>
      <th align="right" style="padding: 10px;">Utilization</th>
      <th align="right" style="padding: 10px;">Weighted</th>
      <th align="center" style="padding: 10px;">Status</th>
    </tr>
"#,
    );
    for loc in result.top_locations(5) {
        let color = status_color(loc.status);
        let background = if loc.status == CapacityStatus::Over {
            "#fdf2f2"
        } else {
            "#f2fdf2"
        };
        html.push_str(&format!(
            r#"    <tr style="background: {background};">
      <td style="padding: 10px;"><strong>{}</strong></td>
      <td align="right" style="padding: 10px; color: {color};"><strong>{}</strong></td>
      <td align="right" style="padding: 10px;">{}</td>
      <td align="center" style="padding: 10px; color: {color};"><strong>{}</strong></td>
    </tr>
"#,
            escape_html(&loc.location),
            pct_label(loc.pct_of_capacity),
            with_commas(loc.weighted_units, 1),
            loc.status.label(),
        ));
    }
    html.push_str("  </table>\n");

    html.push_str(&unknown_modalities_html(result));

    html.push_str(
        "  <p style=\"color: #7f8c8d; font-size: 90%;\"><em>Full location and modality tables below for reference.</em></p>\n",
    );
    html.push_str(&format!(
        "  <pre style=\"background: #f5f5f5; padding: 15px; border: 1px solid #eee; font-size: 10pt; font-family: Consolas; line-height: 1.3;\">\n{}\n  </pre>\n",
        escape_html(&render_daily_capacity(result))
    ));

    html.push_str(&close_document());
    EmailContent { subject, html }
}

fn ops_email(result: &DailyCapacityResult) -> EmailContent {
    let s = &result.summary;
    let subject = format!("{} – {}", OPS_SUBJECT, result.dos());

    let mut html = open_document("Daily Radiology Capacity – OPS (Execution)");
    let snapshot = result
        .snapshot_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    html.push_str(&format!(
        "  <p><strong>DOS:</strong> {} &nbsp; <strong>Schedule Snapshot As Of:</strong> {} &nbsp; <strong>Active Sites:</strong> {}</p>\n",
        result.dos(),
        snapshot,
        s.total_active_sites
    ));

    html.push_str("  <table style=\"border-collapse: collapse; margin: 15px 0;\">\n");
    let row = |label: &str, value: String| {
        format!(
            "    <tr><td style=\"padding: 6px 12px;\"><strong>{}</strong></td><td align=\"right\" style=\"padding: 6px 12px;\">{}</td></tr>\n",
            label, value
        )
    };
    html.push_str(&row("Scheduled Weighted", with_commas(s.scheduled_weighted, 2)));
    html.push_str(&row("Network Capacity (90th)", with_commas(s.capacity, 2)));
    html.push_str(&row("Scheduled Utilization", format!("{:.1}%", s.utilization_pct)));
    html.push_str(&row(
        "Sites OVER / AT / UNDER",
        format!("{} / {} / {}", s.sites_over, s.sites_at, s.sites_under),
    ));

    match (s.completed_weighted, s.execution_delta_weighted) {
        (Some(completed), Some(delta)) => {
            let delta_color = if delta < 0.0 { "#e74c3c" } else { "#27ae60" };
            html.push_str(&row("Completed Weighted", with_commas(completed, 2)));
            html.push_str(&row(
                "Completed Utilization",
                s.completed_utilization_pct
                    .map(|p| format!("{:.1}%", p))
                    .unwrap_or_else(|| "N/A".to_string()),
            ));
            html.push_str(&row(
                "Execution Delta",
                format!(
                    "<span style=\"color: {};\"><strong>{:.2}</strong></span> weighted ({} pts)",
                    delta_color,
                    delta,
                    s.execution_delta_pct_points
                        .map(|p| format!("{:.1}", p))
                        .unwrap_or_else(|| "N/A".to_string())
                ),
            ));
            html.push_str("  </table>\n");
        }
        _ => {
            html.push_str("  </table>\n");
            html.push_str(
                "  <p style=\"color: #7f8c8d;\"><em>Completed volumes are not available yet for this date of service.</em></p>\n",
            );
        }
    }

    html.push_str(&unknown_modalities_html(result));
    html.push_str(&close_document());
    EmailContent { subject, html }
}

fn open_document(title: &str) -> String {
    format!(
        "<html>\n<body style=\"font-family: Calibri, Arial, sans-serif; line-height: 1.6; color: #333;\">\n  <h2 style=\"color: #2c3e50;\">{}</h2>\n",
        title
    )
}

fn close_document() -> String {
    format!(
        "  <hr style=\"border: 0; border-top: 1px solid #eee; margin: 40px 0;\">\n  <p style=\"color: #95a5a6; font-size: 85%;\">{}</p>\n</body>\n</html>\n",
        FOOTER
    )
}

fn unknown_modalities_html(result: &DailyCapacityResult) -> String {
    if result.unknown_modalities.is_empty() {
        return String::new();
    }

    let mut html = String::from(
        "  <div style=\"background: #fff8e1; padding: 10px 15px; border-left: 6px solid #f39c12; margin: 20px 0;\">\n    <p><strong>Warning: unknown modalities</strong> (no governance weight; counted as 0 weighted units)</p>\n    <ul>\n",
    );
    for modality in &result.unknown_modalities {
        html.push_str(&format!("      <li>{}</li>\n", escape_html(modality)));
    }
    html.push_str("    </ul>\n  </div>\n");
    html
}
