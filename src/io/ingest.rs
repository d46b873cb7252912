//! CSV ingest and validation — the schema validator.
//!
//! This module is responsible for turning the raw sales CSV into a validated,
//! immutable [`Dataset`] before anything else runs.
//!
//! Design goals:
//! - **Strict schema**: all six required columns must be present, exact name
//!   and case, in any order; missing columns are reported together.
//! - **Fail hard**: nulls, unparseable values, and out-of-range numbers abort
//!   the load with a row/column reference. There is no partial-load mode —
//!   bad data must never reach the engine.
//! - **No mutation**: validation reads; the returned `Dataset` is the only
//!   output.
//!
//! The permissive counterpart lives in `engine`: bad *queries* degrade to
//! empty results, bad *data* never loads.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Dataset, Month, SalesRecord};
use crate::error::LoadError;

/// Required header names, exact case, order irrelevant.
pub const REQUIRED_COLUMNS: [&str; 6] =
    ["Month", "Year", "Region", "Revenue", "Units Sold", "Profit"];

/// Load-time validation knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    /// Accept negative `Profit` values.
    ///
    /// Off by default to match the source system, but profit is a signed
    /// quantity in the domain, so the check is a knob rather than hard-coded.
    pub allow_negative_profit: bool,
}

/// Load and validate a sales CSV from disk.
pub fn load_dataset(path: &Path, options: IngestOptions) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|e| {
        LoadError::DataSource(format!("failed to open '{}': {e}", path.display()))
    })?;
    load_dataset_from_reader(file, options)
}

/// Load and validate a sales CSV from any reader.
///
/// Split out from [`load_dataset`] so tests can feed in-memory payloads.
pub fn load_dataset_from_reader<R: Read>(
    reader: R,
    options: IngestOptions,
) -> Result<Dataset, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| LoadError::DataSource(format!("failed to read CSV header: {e}")))?
        .clone();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::DataSource("the payload is empty".to_string()));
    }

    let header_map = build_header_map(&headers);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !header_map.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::Schema { missing });
    }

    let mut records = Vec::new();
    for (idx, result) in csv_reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;

        let record = result
            .map_err(|e| LoadError::Integrity(format!("row {line}: CSV parse error: {e}")))?;

        records.push(parse_row(&record, &header_map, line, options)?);
    }

    if records.is_empty() {
        return Err(LoadError::DataSource(
            "the payload contains no data rows".to_string(),
        ));
    }

    Ok(Dataset::new(records))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿Month"). If we don't strip it, schema validation
    // will incorrectly report missing columns. Case is preserved: the schema
    // requires exact header names.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    line: usize,
    options: IngestOptions,
) -> Result<SalesRecord, LoadError> {
    let month_raw = get_required(record, header_map, "Month", line)?;
    let month = Month::parse(month_raw).ok_or_else(|| {
        LoadError::Integrity(format!(
            "row {line}: unknown `Month` value '{month_raw}' (expected January..June)"
        ))
    })?;

    let year = parse_i32(get_required(record, header_map, "Year", line)?, "Year", line)?;
    let region = get_required(record, header_map, "Region", line)?.to_string();

    let revenue = parse_f64(get_required(record, header_map, "Revenue", line)?, "Revenue", line)?;
    let units_sold = parse_f64(
        get_required(record, header_map, "Units Sold", line)?,
        "Units Sold",
        line,
    )?;
    let profit = parse_f64(get_required(record, header_map, "Profit", line)?, "Profit", line)?;

    if revenue < 0.0 {
        return Err(negative_value(line, "Revenue", revenue));
    }
    if units_sold < 0.0 {
        return Err(negative_value(line, "Units Sold", units_sold));
    }
    if profit < 0.0 && !options.allow_negative_profit {
        return Err(negative_value(line, "Profit", profit));
    }

    Ok(SalesRecord {
        month,
        year,
        region,
        revenue,
        units_sold,
        profit,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
    line: usize,
) -> Result<&'a str, LoadError> {
    // Column presence was established up front; a hole here is a null cell.
    let idx = header_map[name];
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LoadError::Integrity(format!("row {line}: missing value in `{name}`")))
}

fn parse_i32(s: &str, name: &str, line: usize) -> Result<i32, LoadError> {
    s.parse::<i32>().map_err(|_| {
        LoadError::Integrity(format!("row {line}: invalid integer in `{name}`: '{s}'"))
    })
}

fn parse_f64(s: &str, name: &str, line: usize) -> Result<f64, LoadError> {
    let v = s.parse::<f64>().map_err(|_| {
        LoadError::Integrity(format!("row {line}: invalid number in `{name}`: '{s}'"))
    })?;
    if !v.is_finite() {
        return Err(LoadError::Integrity(format!(
            "row {line}: non-finite number in `{name}`: '{s}'"
        )));
    }
    Ok(v)
}

fn negative_value(line: usize, name: &str, value: f64) -> LoadError {
    LoadError::Integrity(format!("row {line}: negative `{name}` value: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(csv: &str) -> Result<Dataset, LoadError> {
        load_dataset_from_reader(csv.as_bytes(), IngestOptions::default())
    }

    const VALID: &str = "\
Month,Year,Region,Revenue,Units Sold,Profit
January,2023,East,100,10,20
January,2023,West,50,5,8
February,2023,East,200,15,40
";

    #[test]
    fn loads_valid_csv() {
        let ds = load(VALID).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records()[0].month, Month::January);
        assert_eq!(ds.records()[2].revenue, 200.0);
    }

    #[test]
    fn column_order_is_irrelevant() {
        let csv = "\
Profit,Region,Units Sold,Month,Revenue,Year
20,East,10,January,100,2023
";
        let ds = load(csv).unwrap();
        assert_eq!(ds.records()[0].region, "East");
        assert_eq!(ds.records()[0].profit, 20.0);
    }

    #[test]
    fn bom_on_first_header_is_stripped() {
        let csv = "\u{feff}Month,Year,Region,Revenue,Units Sold,Profit\nJanuary,2023,East,1,1,1\n";
        assert!(load(csv).is_ok());
    }

    #[test]
    fn rejects_missing_columns_reporting_exactly_the_missing_ones() {
        let csv = "Month,Year,Region,Revenue\nJanuary,2023,East,100\n";
        match load(csv) {
            Err(LoadError::Schema { missing }) => {
                assert_eq!(missing, vec!["Units Sold".to_string(), "Profit".to_string()]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn header_case_must_match() {
        let csv = "month,year,region,revenue,units sold,profit\nJanuary,2023,East,100,10,20\n";
        match load(csv) {
            Err(LoadError::Schema { missing }) => assert_eq!(missing.len(), 6),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_null_in_required_column() {
        let csv = "\
Month,Year,Region,Revenue,Units Sold,Profit
January,2023,,100,10,20
";
        match load(csv) {
            Err(LoadError::Integrity(msg)) => assert!(msg.contains("Region")),
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_revenue_units_and_profit() {
        for (col, row) in [
            ("Revenue", "January,2023,East,-1,10,20"),
            ("Units Sold", "January,2023,East,100,-2,20"),
            ("Profit", "January,2023,East,100,10,-3"),
        ] {
            let csv = format!("Month,Year,Region,Revenue,Units Sold,Profit\n{row}\n");
            match load(&csv) {
                Err(LoadError::Integrity(msg)) => assert!(msg.contains(col), "{msg}"),
                other => panic!("expected integrity error for {col}, got {other:?}"),
            }
        }
    }

    #[test]
    fn negative_profit_accepted_when_configured() {
        let csv = "Month,Year,Region,Revenue,Units Sold,Profit\nJanuary,2023,East,100,10,-3\n";
        let opts = IngestOptions {
            allow_negative_profit: true,
        };
        let ds = load_dataset_from_reader(csv.as_bytes(), opts).unwrap();
        assert_eq!(ds.records()[0].profit, -3.0);
    }

    #[test]
    fn rejects_unknown_month_name() {
        let csv = "Month,Year,Region,Revenue,Units Sold,Profit\nJuly,2023,East,100,10,20\n";
        match load(csv) {
            Err(LoadError::Integrity(msg)) => assert!(msg.contains("July")),
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unparseable_year() {
        let csv = "Month,Year,Region,Revenue,Units Sold,Profit\nJanuary,twenty,East,100,10,20\n";
        match load(csv) {
            Err(LoadError::Integrity(msg)) => assert!(msg.contains("Year")),
            other => panic!("expected integrity error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_payload_and_header_only_payload() {
        match load("") {
            Err(LoadError::DataSource(_)) => {}
            other => panic!("expected data source error, got {other:?}"),
        }
        match load("Month,Year,Region,Revenue,Units Sold,Profit\n") {
            Err(LoadError::DataSource(_)) => {}
            other => panic!("expected data source error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_data_source_error() {
        let err =
            load_dataset(Path::new("does/not/exist.csv"), IngestOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::DataSource(_)));
    }
}
