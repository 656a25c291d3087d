// Presentation layer: renders already-built results. No data access, no business rules.

pub mod console;
pub mod email;
pub mod ops;

use std::collections::BTreeSet;

pub const FOOTER: &str = "Automated • Radiology Operations";

/// Formats with thousands separators, e.g. `12,345.60`.
pub fn with_commas(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Ratio as a percentage with one decimal, or `N/A`.
pub fn pct_label(ratio: Option<f64>) -> String {
    ratio
        .map(|r| format!("{:.1}%", r * 100.0))
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn opt_number(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| "-".to_string())
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Plain-text warning block listing modalities without a governance weight.
pub fn unknown_modalities_warning(unknown: &BTreeSet<String>) -> Vec<String> {
    if unknown.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![
        "WARNING: Unknown modalities (no governance weight; counted as 0 weighted units):"
            .to_string(),
    ];
    lines.extend(unknown.iter().map(|m| format!(" - '{}'", m)));
    lines
}

/// Left-aligned fixed-width table with a dashed header rule.
pub fn format_table(headers: &[&str], rows: &[Vec<String>], max_rows: Option<usize>) -> String {
    let shown = max_rows.map_or(rows.len(), |max| max.min(rows.len()));
    let omitted = rows.len() - shown;

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows[..shown] {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let fmt_row = |cells: &[String]| -> String {
        widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                format!("{:<width$}", cell, width = w)
            })
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut lines = vec![
        fmt_row(&header_cells),
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join(" "),
    ];
    lines.extend(rows[..shown].iter().map(|row| fmt_row(row)));
    if omitted > 0 {
        lines.push(format!("... ({} more rows omitted) ...", omitted));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_commas() {
        assert_eq!(with_commas(1234567.891, 2), "1,234,567.89");
        assert_eq!(with_commas(999.0, 2), "999.00");
        assert_eq!(with_commas(-20500.5, 2), "-20,500.50");
        assert_eq!(with_commas(-0.001, 2), "0.00");
        assert_eq!(with_commas(1000.0, 0), "1,000");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>A&B</b>"), "&lt;b&gt;A&amp;B&lt;/b&gt;");
        assert_eq!(escape_html("O'Neil \"MRI\""), "O&#39;Neil &quot;MRI&quot;");
    }

    #[test]
    fn test_format_table_truncates_with_notice() {
        let rows = vec![
            vec!["NORTH".to_string(), "1".to_string()],
            vec!["SOUTH".to_string(), "22".to_string()],
            vec!["EAST".to_string(), "333".to_string()],
        ];
        let table = format_table(&["location", "n"], &rows, Some(2));
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "location n");
        assert_eq!(lines[1], "-------- --");
        assert_eq!(lines[2], "NORTH    1");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[4], "... (1 more rows omitted) ...");
    }

    #[test]
    fn test_unknown_warning_is_empty_without_unknowns() {
        assert!(unknown_modalities_warning(&BTreeSet::new()).is_empty());
        let unknown: BTreeSet<String> = ["XRAY-ER".to_string()].into_iter().collect();
        let lines = unknown_modalities_warning(&unknown);
        assert_eq!(lines[1], " - 'XRAY-ER'");
    }
}
