//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the validation/aggregation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Lang;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sdash", version, about = "Bilingual sales analytics dashboard (CSV-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the monthly revenue trend for the selected years.
    Trend(QueryArgs),
    /// Print the per-year regional breakdown for one month.
    Breakdown(QueryArgs),
    /// Print the per-region revenue share for the selected years and month.
    Share(QueryArgs),
    /// Print the row-level profit/units sample for the selected years and month.
    Scatter(QueryArgs),
    /// Validate the dataset and print a summary.
    Check(DataArgs),
    /// Launch the interactive TUI dashboard.
    ///
    /// This uses the same engine as the query subcommands, but renders the
    /// four chart views and the raw-data table in a terminal UI using Ratatui.
    Tui(DataArgs),
}

/// Options shared by every subcommand: where the data comes from and how it
/// is validated and labeled.
#[derive(Debug, Parser, Clone)]
pub struct DataArgs {
    /// Path to the sales CSV. Defaults to $SALES_DATA, then `data.csv`.
    #[arg(short = 'd', long)]
    pub data: Option<PathBuf>,

    /// Use the built-in demo dataset instead of reading a file.
    #[arg(long)]
    pub demo: bool,

    /// UI language for labels and table headers.
    #[arg(short = 'l', long, value_enum, default_value_t = Lang::Ar)]
    pub lang: Lang,

    /// Accept negative `Profit` values at load time.
    #[arg(long)]
    pub allow_negative_profit: bool,

    /// Rows per page in the raw-data table.
    #[arg(long, default_value_t = 10)]
    pub page_size: usize,

    /// Directory for exported chart CSVs (timestamped filenames).
    ///
    /// Query subcommands export their printed table; the TUI export key
    /// writes all four current views here (default: `exports/`).
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Common options for the query subcommands.
#[derive(Debug, Parser, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Years to include (comma-separated). Defaults to every year present.
    #[arg(short = 'y', long, value_delimiter = ',')]
    pub years: Vec<i32>,

    /// Month name (January..June). Defaults to the first month present.
    #[arg(short = 'm', long)]
    pub month: Option<String>,
}
