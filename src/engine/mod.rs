//! The aggregation engine: four pure queries over the validated dataset.
//!
//! Every query is a stateless function of (dataset, selection) → derived
//! table. Nothing here mutates the dataset, and repeated calls with identical
//! parameters return identical output. Filter semantics are deliberately
//! permissive: an unknown month or an absent year yields an empty table,
//! never an error — the strict tier is `io::ingest`, which refuses to load
//! bad data in the first place.
//!
//! Grouping goes through `BTreeMap` so ordering is deterministic without a
//! separate sort pass: year ascending, then canonical month order (the
//! [`Month`] enum's `Ord`), then region ascending.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::domain::{Dataset, Month, MonthlyRevenue, RegionRevenue, RegionYearRevenue, SalesRecord};

/// Query engine owning the immutable dataset.
///
/// The monthly aggregate is memoized per engine. Since the engine owns the
/// dataset and the dataset never changes, the memo is keyed on the dataset's
/// identity by construction and never needs invalidation.
#[derive(Debug)]
pub struct Engine {
    dataset: Dataset,
    monthly: OnceLock<Vec<MonthlyRevenue>>,
}

impl Engine {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            monthly: OnceLock::new(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The full monthly aggregate: one row per (year, month) present, revenue
    /// summed over regions, ordered year asc then canonical month order.
    ///
    /// Computed lazily on first use; year filtering happens downstream in
    /// [`Engine::monthly_trend`], so the memo is parameter-free.
    pub fn monthly_aggregate(&self) -> &[MonthlyRevenue] {
        self.monthly.get_or_init(|| {
            let mut totals: BTreeMap<(i32, Month), f64> = BTreeMap::new();
            for r in self.dataset.records() {
                *totals.entry((r.year, r.month)).or_insert(0.0) += r.revenue;
            }
            totals
                .into_iter()
                .map(|((year, month), revenue)| MonthlyRevenue {
                    year,
                    month,
                    revenue,
                })
                .collect()
        })
    }

    /// Monthly revenue trend restricted to the selected years.
    ///
    /// An empty selection yields an empty table. A one-element slice behaves
    /// identically to a single selected year.
    pub fn monthly_trend(&self, years: &[i32]) -> Vec<MonthlyRevenue> {
        self.monthly_aggregate()
            .iter()
            .filter(|row| years.contains(&row.year))
            .cloned()
            .collect()
    }

    /// Per (year, region) revenue for the fixed month — not summed across
    /// years. Backs the grouped comparison bar chart.
    pub fn regional_breakdown(&self, month: &str) -> Vec<RegionYearRevenue> {
        let Some(month) = Month::parse(month) else {
            return Vec::new();
        };

        let mut totals: BTreeMap<(i32, String), f64> = BTreeMap::new();
        for r in self.dataset.records() {
            if r.month != month {
                continue;
            }
            *totals.entry((r.year, r.region.clone())).or_insert(0.0) += r.revenue;
        }
        totals
            .into_iter()
            .map(|((year, region), revenue)| RegionYearRevenue {
                year,
                region,
                revenue,
            })
            .collect()
    }

    /// Per-region revenue summed over the selected years for the fixed month
    /// — a distribution, not a trend. Backs the share (pie) view.
    pub fn region_share(&self, years: &[i32], month: &str) -> Vec<RegionRevenue> {
        let Some(month) = Month::parse(month) else {
            return Vec::new();
        };

        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for r in self.dataset.records() {
            if r.month != month || !years.contains(&r.year) {
                continue;
            }
            *totals.entry(r.region.clone()).or_insert(0.0) += r.revenue;
        }
        totals
            .into_iter()
            .map(|(region, revenue)| RegionRevenue { region, revenue })
            .collect()
    }

    /// Row-level records restricted to the selection, in original dataset
    /// order. Backs the profit/units scatter view and the raw-data table;
    /// revenue is simply forwarded (the scatter view uses it for sizing).
    pub fn profit_volume_sample(&self, years: &[i32], month: &str) -> Vec<SalesRecord> {
        let Some(month) = Month::parse(month) else {
            return Vec::new();
        };

        self.dataset
            .records()
            .iter()
            .filter(|r| r.month == month && years.contains(&r.year))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(month: Month, year: i32, region: &str, revenue: f64, units: f64, profit: f64) -> SalesRecord {
        SalesRecord {
            month,
            year,
            region: region.to_string(),
            revenue,
            units_sold: units,
            profit,
        }
    }

    /// The scenario dataset from the design notes.
    fn scenario() -> Dataset {
        Dataset::new(vec![
            record(Month::January, 2023, "East", 100.0, 10.0, 20.0),
            record(Month::January, 2023, "West", 50.0, 5.0, 8.0),
            record(Month::February, 2023, "East", 200.0, 15.0, 40.0),
        ])
    }

    #[test]
    fn monthly_trend_scenario() {
        let engine = Engine::new(scenario());
        let trend = engine.monthly_trend(&[2023]);
        assert_eq!(
            trend,
            vec![
                MonthlyRevenue {
                    year: 2023,
                    month: Month::January,
                    revenue: 150.0
                },
                MonthlyRevenue {
                    year: 2023,
                    month: Month::February,
                    revenue: 200.0
                },
            ]
        );
    }

    #[test]
    fn region_share_scenario() {
        let engine = Engine::new(scenario());
        let share = engine.region_share(&[2023], "January");
        assert_eq!(
            share,
            vec![
                RegionRevenue {
                    region: "East".to_string(),
                    revenue: 100.0
                },
                RegionRevenue {
                    region: "West".to_string(),
                    revenue: 50.0
                },
            ]
        );
    }

    #[test]
    fn empty_year_selection_yields_empty_trend() {
        let engine = Engine::new(scenario());
        assert!(engine.monthly_trend(&[]).is_empty());
    }

    #[test]
    fn absent_year_and_unknown_month_fail_soft() {
        let engine = Engine::new(scenario());
        assert!(engine.monthly_trend(&[1999]).is_empty());
        assert!(engine.regional_breakdown("March").is_empty());
        assert!(engine.regional_breakdown("NotAMonth").is_empty());
        assert!(engine.region_share(&[2023], "July").is_empty());
        assert!(engine.profit_volume_sample(&[2023], "Sales").is_empty());
    }

    #[test]
    fn trend_ordering_is_year_then_canonical_month() {
        let engine = Engine::new(Dataset::new(vec![
            record(Month::April, 2024, "East", 4.0, 1.0, 1.0),
            record(Month::January, 2024, "East", 1.0, 1.0, 1.0),
            record(Month::June, 2023, "East", 6.0, 1.0, 1.0),
            record(Month::February, 2023, "East", 2.0, 1.0, 1.0),
        ]));
        let trend = engine.monthly_trend(&[2023, 2024]);
        let keys: Vec<(i32, Month)> = trend.iter().map(|r| (r.year, r.month)).collect();
        assert_eq!(
            keys,
            vec![
                (2023, Month::February),
                (2023, Month::June),
                (2024, Month::January),
                (2024, Month::April),
            ]
        );
    }

    #[test]
    fn trend_is_permutation_invariant() {
        let rows = vec![
            record(Month::January, 2023, "East", 100.0, 10.0, 20.0),
            record(Month::January, 2023, "West", 50.0, 5.0, 8.0),
            record(Month::February, 2023, "East", 200.0, 15.0, 40.0),
            record(Month::January, 2024, "East", 70.0, 7.0, 9.0),
        ];
        let forward = Engine::new(Dataset::new(rows.clone()));
        let mut reversed_rows = rows;
        reversed_rows.reverse();
        let reversed = Engine::new(Dataset::new(reversed_rows));

        assert_eq!(
            forward.monthly_trend(&[2023, 2024]),
            reversed.monthly_trend(&[2023, 2024])
        );
    }

    #[test]
    fn single_year_slice_equals_scalar_selection() {
        let engine = Engine::new(scenario());
        assert_eq!(engine.monthly_trend(&[2023]), engine.monthly_trend(&vec![2023]));
    }

    #[test]
    fn breakdown_groups_by_year_and_region_jointly() {
        let engine = Engine::new(Dataset::new(vec![
            record(Month::January, 2023, "East", 100.0, 10.0, 20.0),
            record(Month::January, 2024, "East", 40.0, 4.0, 5.0),
            record(Month::January, 2023, "East", 10.0, 1.0, 1.0),
            record(Month::January, 2023, "West", 50.0, 5.0, 8.0),
        ]));
        let breakdown = engine.regional_breakdown("January");
        assert_eq!(
            breakdown,
            vec![
                RegionYearRevenue {
                    year: 2023,
                    region: "East".to_string(),
                    revenue: 110.0
                },
                RegionYearRevenue {
                    year: 2023,
                    region: "West".to_string(),
                    revenue: 50.0
                },
                RegionYearRevenue {
                    year: 2024,
                    region: "East".to_string(),
                    revenue: 40.0
                },
            ]
        );
    }

    #[test]
    fn share_is_consistent_with_breakdown() {
        let engine = Engine::new(Dataset::new(vec![
            record(Month::January, 2023, "East", 100.0, 10.0, 20.0),
            record(Month::January, 2024, "East", 40.0, 4.0, 5.0),
            record(Month::January, 2023, "West", 50.0, 5.0, 8.0),
            record(Month::February, 2023, "West", 999.0, 5.0, 8.0),
        ]));
        let years = [2023, 2024];
        let share = engine.region_share(&years, "January");
        let breakdown = engine.regional_breakdown("January");

        for row in &share {
            let summed: f64 = breakdown
                .iter()
                .filter(|b| b.region == row.region && years.contains(&b.year))
                .map(|b| b.revenue)
                .sum();
            assert!((row.revenue - summed).abs() < 1e-9, "{}", row.region);
        }
    }

    #[test]
    fn sample_preserves_row_order_and_fields() {
        let engine = Engine::new(scenario());
        let sample = engine.profit_volume_sample(&[2023], "January");
        assert_eq!(sample.len(), 2);
        assert_eq!(sample[0].region, "East");
        assert_eq!(sample[0].units_sold, 10.0);
        assert_eq!(sample[0].profit, 20.0);
        assert_eq!(sample[1].region, "West");
        assert_eq!(sample[1].revenue, 50.0);
    }

    #[test]
    fn queries_are_idempotent() {
        let engine = Engine::new(scenario());
        assert_eq!(engine.monthly_trend(&[2023]), engine.monthly_trend(&[2023]));
        assert_eq!(
            engine.regional_breakdown("January"),
            engine.regional_breakdown("January")
        );
        assert_eq!(
            engine.region_share(&[2023], "January"),
            engine.region_share(&[2023], "January")
        );
        assert_eq!(
            engine.profit_volume_sample(&[2023], "January"),
            engine.profit_volume_sample(&[2023], "January")
        );
    }
}
