//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the aggregation engine
//! - exported to CSV
//! - rendered directly by the report/TUI layers

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Calendar month covered by the dataset.
///
/// The dataset spans January through June. Ordering is calendar order — a
/// naive alphabetical sort would put April before January, which is exactly
/// the bug this enum exists to prevent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
}

impl Month {
    /// All months in canonical order.
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    /// Parse an exact month name. Unknown names yield `None` — the caller
    /// decides whether that is fatal (ingest) or an empty result (queries).
    pub fn parse(name: &str) -> Option<Month> {
        match name.trim() {
            "January" => Some(Month::January),
            "February" => Some(Month::February),
            "March" => Some(Month::March),
            "April" => Some(Month::April),
            "May" => Some(Month::May),
            "June" => Some(Month::June),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
        }
    }

    /// 1-based calendar index (January = 1), used as a chart x-coordinate.
    pub fn index(self) -> usize {
        match self {
            Month::January => 1,
            Month::February => 2,
            Month::March => 3,
            Month::April => 4,
            Month::May => 5,
            Month::June => 6,
        }
    }
}

/// Dashboard UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Ar,
    En,
}

/// One validated row of the sales dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub month: Month,
    pub year: i32,
    /// Free-text category (open set).
    pub region: String,
    pub revenue: f64,
    pub units_sold: f64,
    /// Signed in the domain; load-time sign policy is configurable.
    pub profit: f64,
}

/// The full in-memory dataset after validation.
///
/// Immutable by construction: rows are only reachable by shared reference, so
/// every query is a pure function of the same data. There is no ambient
/// global — the value is handed to the engine at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<SalesRecord>,
}

impl Dataset {
    pub(crate) fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Distinct months present, in canonical order.
    pub fn months(&self) -> Vec<Month> {
        Month::ALL
            .iter()
            .copied()
            .filter(|m| self.records.iter().any(|r| r.month == *m))
            .collect()
    }

    /// Distinct regions present, ascending.
    pub fn regions(&self) -> Vec<String> {
        let mut regions: Vec<String> = self.records.iter().map(|r| r.region.clone()).collect();
        regions.sort();
        regions.dedup();
        regions
    }
}

/// One row of the memoized monthly aggregate: revenue summed over regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: Month,
    pub revenue: f64,
}

/// One row of the regional breakdown: per (year, region) revenue for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionYearRevenue {
    pub year: i32,
    pub region: String,
    pub revenue: f64,
}

/// One row of the region share: per-region revenue over the selected years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRevenue {
    pub region: String,
    pub revenue: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct DashConfig {
    /// Explicit data path; `None` falls back to `$SALES_DATA`, then `data.csv`.
    pub data_path: Option<PathBuf>,
    /// Use the built-in demo dataset instead of reading a file.
    pub demo: bool,
    pub lang: Lang,
    /// Accept negative `Profit` values at load time.
    ///
    /// The source system rejects them, but profit is a signed quantity in the
    /// domain, so the constraint is a knob rather than hard-coded.
    pub allow_negative_profit: bool,
    /// Rows per page in the raw-data table.
    pub page_size: usize,
    /// Directory for exported chart CSVs; the TUI falls back to `exports/`.
    pub export: Option<PathBuf>,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            demo: false,
            lang: Lang::Ar,
            allow_negative_profit: false,
            page_size: 10,
            export: None,
        }
    }
}
