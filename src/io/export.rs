//! Export each chart's backing table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts. This is the dashboard's "export chart" surface: chart rendering
//! itself stays in the terminal, so what we persist is the derived table a
//! chart is drawn from.
//!
//! Rows go through `csv::Writer::serialize`, so free-text regions containing
//! commas, quotes, or newlines are quoted correctly and round-trip through
//! any CSV reader.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Local;
use serde::Serialize;

use crate::domain::{MonthlyRevenue, RegionRevenue, RegionYearRevenue, SalesRecord};
use crate::error::AppError;

/// The four chart kinds the dashboard can export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Trend,
    Breakdown,
    Share,
    Scatter,
}

impl ChartKind {
    pub fn file_stem(self) -> &'static str {
        match self {
            ChartKind::Trend => "line_chart",
            ChartKind::Breakdown => "bar_chart",
            ChartKind::Share => "pie_chart",
            ChartKind::Scatter => "scatter_chart",
        }
    }
}

/// Write the monthly trend table.
pub fn write_trend_csv(path: &Path, rows: &[MonthlyRevenue]) -> Result<(), AppError> {
    write_table(path, &["year", "month", "revenue"], rows)
}

/// Write the per-year regional breakdown table.
pub fn write_breakdown_csv(path: &Path, rows: &[RegionYearRevenue]) -> Result<(), AppError> {
    write_table(path, &["year", "region", "revenue"], rows)
}

/// Write the region share table.
pub fn write_share_csv(path: &Path, rows: &[RegionRevenue]) -> Result<(), AppError> {
    write_table(path, &["region", "revenue"], rows)
}

/// Write the row-level profit/units sample table.
pub fn write_sample_csv(path: &Path, rows: &[SalesRecord]) -> Result<(), AppError> {
    write_table(
        path,
        &["month", "year", "region", "revenue", "units_sold", "profit"],
        rows,
    )
}

/// Header first, then one serialized record per row.
///
/// The header is written explicitly (headers disabled on the writer) so an
/// empty table still produces a well-formed file with its column names.
fn write_table<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<(), AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| {
            AppError::new(4, format!("failed to create export CSV '{}': {e}", path.display()))
        })?;

    writer.write_record(header).map_err(|e| write_failed(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| write_failed(path, e))?;
    }
    writer.flush().map_err(|e| write_failed(path, e))
}

/// Monotonic per-process sequence so paths stay unique even when two exports
/// of the same chart kind land on the same timestamp.
static EXPORT_SEQ: AtomicU32 = AtomicU32::new(0);

/// Resolve a unique timestamped export path for one chart kind.
///
/// Used by the TUI export key, which writes all four current views under an
/// `exports/` directory in one go, and by the query subcommands' `--export`.
pub fn export_path(dir: &Path, kind: ChartKind) -> PathBuf {
    let ts = Local::now().format("%Y%m%d_%H%M%S%3f");
    let seq = EXPORT_SEQ.fetch_add(1, Ordering::Relaxed);
    dir.join(format!("{}_{ts}_{seq:03}.csv", kind.file_stem()))
}

/// Ensure the export directory exists.
pub fn ensure_export_dir(dir: &Path) -> Result<(), AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::new(4, format!("failed to create export dir '{}': {e}", dir.display())))
}

fn write_failed(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::new(4, format!("failed to write export CSV '{}': {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Month;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn export_paths_use_chart_file_stems() {
        let dir = Path::new("exports");
        let path = export_path(dir, ChartKind::Share);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("pie_chart_"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn consecutive_export_paths_are_distinct() {
        let dir = Path::new("exports");
        let first = export_path(dir, ChartKind::Trend);
        let second = export_path(dir, ChartKind::Trend);
        assert_ne!(first, second);
    }

    #[test]
    fn trend_csv_round_trips_through_text() {
        let dir = temp_dir("sales_dash_export_test");
        let path = dir.join("trend.csv");

        let rows = vec![MonthlyRevenue {
            year: 2023,
            month: Month::January,
            revenue: 150.0,
        }];
        write_trend_csv(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "year,month,revenue\n2023,January,150.0\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn empty_table_still_writes_its_header() {
        let dir = temp_dir("sales_dash_export_empty");
        let path = dir.join("share.csv");
        write_share_csv(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "region,revenue\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn free_text_region_with_comma_round_trips() {
        let dir = temp_dir("sales_dash_export_comma");
        let path = dir.join("share.csv");

        let rows = vec![
            RegionRevenue {
                region: "North, West".to_string(),
                revenue: 10.0,
            },
            RegionRevenue {
                region: "He said \"East\"".to_string(),
                revenue: 5.0,
            },
        ];
        write_share_csv(&path, &rows).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let back: Vec<RegionRevenue> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(back, rows);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn sample_csv_serializes_full_records() {
        let dir = temp_dir("sales_dash_export_sample");
        let path = dir.join("sample.csv");

        let rows = vec![SalesRecord {
            month: Month::February,
            year: 2024,
            region: "East".to_string(),
            revenue: 200.0,
            units_sold: 15.0,
            profit: 40.0,
        }];
        write_sample_csv(&path, &rows).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let back: Vec<SalesRecord> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(back, rows);
        let _ = std::fs::remove_file(&path);
    }
}
