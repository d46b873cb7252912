//! Formatted terminal output for the four query views.
//!
//! We keep formatting code in one place so:
//! - the engine stays clean and testable
//! - output changes are localized (important for future snapshot tests)
//!
//! All table headers come from the bilingual label set, so `--lang` affects
//! CLI output the same way it affects the TUI.

use crate::domain::{Dataset, MonthlyRevenue, RegionRevenue, RegionYearRevenue, SalesRecord};
use crate::labels::Labels;

/// Format the dataset summary printed by `sdash check`.
pub fn format_dataset_summary(dataset: &Dataset, labels: &Labels) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", labels.title));
    out.push_str(&format!("Rows: {}\n", dataset.len()));
    out.push_str(&format!(
        "Years: {}\n",
        dataset
            .years()
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ));
    out.push_str(&format!(
        "Months: {}\n",
        dataset
            .months()
            .iter()
            .map(|m| m.name().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ));
    out.push_str(&format!("Regions: {}\n", dataset.regions().join(", ")));

    let revenue: f64 = dataset.records().iter().map(|r| r.revenue).sum();
    let profit: f64 = dataset.records().iter().map(|r| r.profit).sum();
    out.push_str(&format!(
        "{}: {revenue:.2} | {}: {profit:.2}\n",
        labels.revenue_label, labels.profit_label
    ));

    out
}

/// Format the monthly trend table.
pub fn format_trend_table(rows: &[MonthlyRevenue], labels: &Labels) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", labels.line_chart_title));
    out.push_str(&format!(
        "{:<6} {:<10} {:>14}\n",
        labels.year_label, labels.month_label, labels.revenue_label
    ));
    out.push_str(&rule(&[6, 10, 14]));

    for row in rows {
        out.push_str(&format!(
            "{:<6} {:<10} {:>14.2}\n",
            row.year,
            row.month.name(),
            row.revenue
        ));
    }
    if rows.is_empty() {
        out.push_str("(no rows match the selection)\n");
    }

    out
}

/// Format the per-year regional breakdown table for a fixed month.
pub fn format_breakdown_table(rows: &[RegionYearRevenue], labels: &Labels, month: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", labels.bar_chart_title(month)));
    out.push_str(&format!(
        "{:<6} {:<16} {:>14}\n",
        labels.year_label, labels.region_label, labels.revenue_label
    ));
    out.push_str(&rule(&[6, 16, 14]));

    for row in rows {
        out.push_str(&format!(
            "{:<6} {:<16} {:>14.2}\n",
            row.year,
            truncate(&row.region, 16),
            row.revenue
        ));
    }
    if rows.is_empty() {
        out.push_str("(no rows match the selection)\n");
    }

    out
}

/// Format the region share table (with percent of the selected total).
pub fn format_share_table(rows: &[RegionRevenue], labels: &Labels, month: &str) -> String {
    let total: f64 = rows.iter().map(|r| r.revenue).sum();

    let mut out = String::new();
    out.push_str(&format!("{}\n", labels.pie_chart_title(month)));
    out.push_str(&format!(
        "{:<16} {:>14} {:>8}\n",
        labels.region_label, labels.revenue_label, "%"
    ));
    out.push_str(&rule(&[16, 14, 8]));

    for row in rows {
        let pct = if total > 0.0 {
            row.revenue / total * 100.0
        } else {
            0.0
        };
        out.push_str(&format!(
            "{:<16} {:>14.2} {:>7.1}%\n",
            truncate(&row.region, 16),
            row.revenue,
            pct
        ));
    }
    if rows.is_empty() {
        out.push_str("(no rows match the selection)\n");
    }

    out
}

/// Format the row-level profit/units sample table.
pub fn format_sample_table(rows: &[SalesRecord], labels: &Labels, month: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", labels.scatter_chart_title(month)));
    out.push_str(&format!(
        "{:<6} {:<16} {:>12} {:>12} {:>14}\n",
        labels.year_label,
        labels.region_label,
        labels.units_sold_label,
        labels.profit_label,
        labels.revenue_label
    ));
    out.push_str(&rule(&[6, 16, 12, 12, 14]));

    for row in rows {
        out.push_str(&format!(
            "{:<6} {:<16} {:>12.1} {:>12.2} {:>14.2}\n",
            row.year,
            truncate(&row.region, 16),
            row.units_sold,
            row.profit,
            row.revenue
        ));
    }
    if rows.is_empty() {
        out.push_str("(no rows match the selection)\n");
    }

    out
}

fn rule(widths: &[usize]) -> String {
    let parts: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut line = parts.join(" ");
    line.push('\n');
    line
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Lang, Month};
    use crate::labels::labels;

    #[test]
    fn trend_table_contains_rows_in_order() {
        let rows = vec![
            MonthlyRevenue {
                year: 2023,
                month: Month::January,
                revenue: 150.0,
            },
            MonthlyRevenue {
                year: 2023,
                month: Month::February,
                revenue: 200.0,
            },
        ];
        let text = format_trend_table(&rows, labels(Lang::En));
        assert!(text.contains("Monthly Sales Trend"));
        let jan = text.find("January").unwrap();
        let feb = text.find("February").unwrap();
        assert!(jan < feb);
        assert!(text.contains("150.00"));
    }

    #[test]
    fn share_table_reports_percentages() {
        let rows = vec![
            RegionRevenue {
                region: "East".to_string(),
                revenue: 100.0,
            },
            RegionRevenue {
                region: "West".to_string(),
                revenue: 50.0,
            },
        ];
        let text = format_share_table(&rows, labels(Lang::En), "January");
        assert!(text.contains("January"));
        assert!(text.contains("66.7%"));
        assert!(text.contains("33.3%"));
    }

    #[test]
    fn empty_tables_render_a_placeholder_not_an_error() {
        let text = format_breakdown_table(&[], labels(Lang::En), "March");
        assert!(text.contains("no rows match"));
        let text = format_share_table(&[], labels(Lang::Ar), "March");
        assert!(text.contains("no rows match"));
    }

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("East", 16), "East");
        assert_eq!(truncate("A very long region name", 8), "A very .");
    }
}
