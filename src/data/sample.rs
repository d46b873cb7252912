//! Built-in demo dataset.
//!
//! Lets the dashboard run without an input file (`--demo`). The rows are
//! deterministic by design: queries must return bit-identical results across
//! runs, and the same fixture backs integration-style tests.

use crate::domain::{Dataset, Month, SalesRecord};

/// Two years of sales across three regions and all six months.
pub fn demo_dataset() -> Dataset {
    let mut records = Vec::new();

    // (region, base revenue, units factor, margin)
    let regions: [(&str, f64, f64, f64); 3] = [
        ("East", 120.0, 10.0, 0.22),
        ("West", 95.0, 8.0, 0.18),
        ("South", 70.0, 6.0, 0.15),
    ];

    for (year_idx, year) in [2023, 2024].into_iter().enumerate() {
        for month in Month::ALL {
            for (region, base, units_factor, margin) in regions {
                // Mild seasonal ramp plus year-over-year growth.
                let season = 1.0 + 0.08 * (month.index() as f64 - 1.0);
                let growth = 1.0 + 0.15 * year_idx as f64;
                let revenue = (base * season * growth * 100.0).round() / 100.0;
                let units_sold = (units_factor * season * growth).round();
                let profit = (revenue * margin * 100.0).round() / 100.0;

                records.push(SalesRecord {
                    month,
                    year,
                    region: region.to_string(),
                    revenue,
                    units_sold,
                    profit,
                });
            }
        }
    }

    Dataset::new(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_covers_both_years_and_all_months() {
        let ds = demo_dataset();
        assert_eq!(ds.years(), vec![2023, 2024]);
        assert_eq!(ds.months(), Month::ALL.to_vec());
        assert_eq!(ds.len(), 2 * 6 * 3);
    }

    #[test]
    fn demo_is_deterministic() {
        assert_eq!(demo_dataset(), demo_dataset());
    }

    #[test]
    fn demo_satisfies_load_time_invariants() {
        for r in demo_dataset().records() {
            assert!(r.revenue >= 0.0);
            assert!(r.units_sold >= 0.0);
            assert!(r.profit >= 0.0);
            assert!(!r.region.is_empty());
        }
    }
}
