//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads and validates the dataset
//! - runs the requested query and prints its table
//! - writes optional exports
//! - launches the TUI

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::{Command, DataArgs, QueryArgs};
use crate::domain::DashConfig;
use crate::error::AppError;
use crate::io::export::{ensure_export_dir, export_path, ChartKind};
use crate::labels::labels;

pub mod pipeline;

/// Entry point for the `sdash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `sdash` and `sdash -d sales.csv` to behave like `sdash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Trend(args) => handle_query(args, QueryKind::Trend),
        Command::Breakdown(args) => handle_query(args, QueryKind::Breakdown),
        Command::Share(args) => handle_query(args, QueryKind::Share),
        Command::Scatter(args) => handle_query(args, QueryKind::Scatter),
        Command::Check(args) => handle_check(args),
        Command::Tui(args) => handle_tui(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryKind {
    Trend,
    Breakdown,
    Share,
    Scatter,
}

fn handle_query(args: QueryArgs, kind: QueryKind) -> Result<(), AppError> {
    let config = dash_config_from_args(&args.data);
    let engine = pipeline::load_engine(&config)?;
    let labels = labels(config.lang);

    // Selection defaults mirror the dashboard's initial widget state: every
    // year present, first month present.
    let years = if args.years.is_empty() {
        engine.dataset().years()
    } else {
        args.years.clone()
    };
    let month = match &args.month {
        Some(m) => m.clone(),
        None => engine
            .dataset()
            .months()
            .first()
            .map(|m| m.name().to_string())
            .unwrap_or_default(),
    };

    match kind {
        QueryKind::Trend => {
            let rows = engine.monthly_trend(&years);
            print!("{}", crate::report::format_trend_table(&rows, labels));
            if let Some(dir) = &config.export {
                let path = export_target(dir, ChartKind::Trend)?;
                crate::io::export::write_trend_csv(&path, &rows)?;
                println!("Exported: {}", path.display());
            }
        }
        QueryKind::Breakdown => {
            let rows = engine.regional_breakdown(&month);
            print!(
                "{}",
                crate::report::format_breakdown_table(&rows, labels, &month)
            );
            if let Some(dir) = &config.export {
                let path = export_target(dir, ChartKind::Breakdown)?;
                crate::io::export::write_breakdown_csv(&path, &rows)?;
                println!("Exported: {}", path.display());
            }
        }
        QueryKind::Share => {
            let rows = engine.region_share(&years, &month);
            print!("{}", crate::report::format_share_table(&rows, labels, &month));
            if let Some(dir) = &config.export {
                let path = export_target(dir, ChartKind::Share)?;
                crate::io::export::write_share_csv(&path, &rows)?;
                println!("Exported: {}", path.display());
            }
        }
        QueryKind::Scatter => {
            let rows = engine.profit_volume_sample(&years, &month);
            print!("{}", crate::report::format_sample_table(&rows, labels, &month));
            if let Some(dir) = &config.export {
                let path = export_target(dir, ChartKind::Scatter)?;
                crate::io::export::write_sample_csv(&path, &rows)?;
                println!("Exported: {}", path.display());
            }
        }
    }

    Ok(())
}

fn handle_check(args: DataArgs) -> Result<(), AppError> {
    let config = dash_config_from_args(&args);
    let engine = pipeline::load_engine(&config)?;
    print!(
        "{}",
        crate::report::format_dataset_summary(engine.dataset(), labels(config.lang))
    );
    Ok(())
}

fn handle_tui(args: DataArgs) -> Result<(), AppError> {
    let config = dash_config_from_args(&args);
    crate::tui::run(config)
}

pub fn dash_config_from_args(args: &DataArgs) -> DashConfig {
    DashConfig {
        data_path: args.data.clone(),
        demo: args.demo,
        lang: args.lang,
        allow_negative_profit: args.allow_negative_profit,
        page_size: args.page_size.max(1),
        export: args.export.clone(),
    }
}

/// Resolve a timestamped export file inside the chosen directory, creating
/// the directory on first use.
fn export_target(dir: &Path, kind: ChartKind) -> Result<PathBuf, AppError> {
    ensure_export_dir(dir)?;
    Ok(export_path(dir, kind))
}

/// Rewrite argv so `sdash` defaults to `sdash tui`.
///
/// Rules:
/// - `sdash`                     -> `sdash tui`
/// - `sdash -d sales.csv ...`    -> `sdash tui -d sales.csv ...`
/// - `sdash --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "trend" | "breakdown" | "share" | "scatter" | "check" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["sdash"])), argv(&["sdash", "tui"]));
    }

    #[test]
    fn leading_flag_defaults_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["sdash", "--demo"])),
            argv(&["sdash", "tui", "--demo"])
        );
    }

    #[test]
    fn export_dir_flag_reaches_the_config() {
        let cli = crate::cli::Cli::try_parse_from(["sdash", "tui", "--export", "out"]).unwrap();
        let Command::Tui(args) = cli.command else {
            panic!("expected tui subcommand");
        };
        let config = dash_config_from_args(&args);
        assert_eq!(config.export, Some(PathBuf::from("out")));

        let cli =
            crate::cli::Cli::try_parse_from(["sdash", "trend", "-y", "2023", "--export", "out"])
                .unwrap();
        let Command::Trend(args) = cli.command else {
            panic!("expected trend subcommand");
        };
        assert_eq!(args.data.export, Some(PathBuf::from("out")));
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["sdash", "trend", "-y", "2023"])),
            argv(&["sdash", "trend", "-y", "2023"])
        );
        assert_eq!(rewrite_args(argv(&["sdash", "--help"])), argv(&["sdash", "--help"]));
    }
}
