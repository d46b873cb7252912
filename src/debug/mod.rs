//! Debug bundle writer for inspecting the dataset and derived views.
//!
//! Bound to a TUI key: dumps the dataset stats, the full monthly aggregate,
//! and the four query outputs for the current selection into one markdown
//! file, so a surprising chart can be traced back to the numbers behind it.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

use crate::engine::Engine;
use crate::error::AppError;

pub fn write_debug_bundle(
    engine: &Engine,
    years: &[i32],
    month: &str,
) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir).map_err(|e| AppError::new(4, format!("failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("sdash_debug_{ts}.md"));

    let mut file = File::create(&path)
        .map_err(|e| AppError::new(4, format!("failed to create debug file: {e}")))?;

    let dataset = engine.dataset();
    let wr = |e: std::io::Error| AppError::new(4, format!("failed to write debug bundle: {e}"));

    writeln!(file, "# sdash debug bundle").map_err(wr)?;
    writeln!(file, "- generated: {}", Local::now().to_rfc3339()).map_err(wr)?;
    writeln!(file, "- rows: {}", dataset.len()).map_err(wr)?;
    writeln!(
        file,
        "- years: {:?} | months: {:?} | regions: {:?}",
        dataset.years(),
        dataset.months().iter().map(|m| m.name()).collect::<Vec<_>>(),
        dataset.regions()
    )
    .map_err(wr)?;
    writeln!(file, "- selection: years={years:?} month={month}").map_err(wr)?;

    writeln!(file, "\n## Monthly aggregate (all years)").map_err(wr)?;
    writeln!(file, "| year | month | revenue |").map_err(wr)?;
    writeln!(file, "| - | - | - |").map_err(wr)?;
    for row in engine.monthly_aggregate() {
        writeln!(file, "| {} | {} | {:.2} |", row.year, row.month.name(), row.revenue)
            .map_err(wr)?;
    }

    writeln!(file, "\n## Monthly trend (selection)").map_err(wr)?;
    writeln!(file, "| year | month | revenue |").map_err(wr)?;
    writeln!(file, "| - | - | - |").map_err(wr)?;
    for row in engine.monthly_trend(years) {
        writeln!(file, "| {} | {} | {:.2} |", row.year, row.month.name(), row.revenue)
            .map_err(wr)?;
    }

    writeln!(file, "\n## Regional breakdown ({month})").map_err(wr)?;
    writeln!(file, "| year | region | revenue |").map_err(wr)?;
    writeln!(file, "| - | - | - |").map_err(wr)?;
    for row in engine.regional_breakdown(month) {
        writeln!(file, "| {} | {} | {:.2} |", row.year, row.region, row.revenue).map_err(wr)?;
    }

    writeln!(file, "\n## Region share ({month}, selection)").map_err(wr)?;
    writeln!(file, "| region | revenue |").map_err(wr)?;
    writeln!(file, "| - | - |").map_err(wr)?;
    for row in engine.region_share(years, month) {
        writeln!(file, "| {} | {:.2} |", row.region, row.revenue).map_err(wr)?;
    }

    writeln!(file, "\n## Profit/volume sample ({month}, selection)").map_err(wr)?;
    writeln!(file, "| year | region | units_sold | profit | revenue |").map_err(wr)?;
    writeln!(file, "| - | - | - | - | - |").map_err(wr)?;
    for row in engine.profit_volume_sample(years, month) {
        writeln!(
            file,
            "| {} | {} | {:.1} | {:.2} | {:.2} |",
            row.year, row.region, row.units_sold, row.profit, row.revenue
        )
        .map_err(wr)?;
    }

    Ok(path)
}
