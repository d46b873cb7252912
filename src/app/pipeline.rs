//! Shared "load pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! resolve data path -> validate CSV -> construct the engine
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::PathBuf;

use crate::data::sample::demo_dataset;
use crate::domain::DashConfig;
use crate::engine::Engine;
use crate::error::AppError;
use crate::io::ingest::{load_dataset, IngestOptions};

/// Validate the configured data source and build the query engine.
///
/// Validation is eager and fail-hard: any schema or integrity problem aborts
/// here, before a single query runs.
pub fn load_engine(config: &DashConfig) -> Result<Engine, AppError> {
    if config.demo {
        return Ok(Engine::new(demo_dataset()));
    }

    let path = resolve_data_path(config);
    let options = IngestOptions {
        allow_negative_profit: config.allow_negative_profit,
    };
    let dataset = load_dataset(&path, options)?;
    Ok(Engine::new(dataset))
}

/// Resolve the input path: explicit flag, then `$SALES_DATA`, then `data.csv`.
pub fn resolve_data_path(config: &DashConfig) -> PathBuf {
    if let Some(path) = &config.data_path {
        return path.clone();
    }

    // A missing .env file is fine; it is only a convenience for SALES_DATA.
    let _ = dotenvy::dotenv();

    match std::env::var("SALES_DATA") {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value.trim()),
        _ => PathBuf::from("data.csv"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let config = DashConfig {
            data_path: Some(PathBuf::from("custom.csv")),
            ..DashConfig::default()
        };
        assert_eq!(resolve_data_path(&config), PathBuf::from("custom.csv"));
    }

    #[test]
    fn demo_config_loads_without_a_file() {
        let config = DashConfig {
            demo: true,
            ..DashConfig::default()
        };
        let engine = load_engine(&config).unwrap();
        assert!(!engine.dataset().is_empty());
    }
}
