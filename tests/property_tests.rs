//! Property-based tests for the forecast-to-inventory pipeline.
//!
//! These tests use proptest to check the aggregation invariants across a wide
//! range of sales histories and recipes.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use inventory_forecast::{
    ml::{Horizon, SeasonalTrendForecaster},
    models::Recipe,
    services::pipeline::ForecastPipeline,
};
use proptest::prelude::*;

const ITEMS: [&str; 4] = ["bagel", "muffin", "scone", "tea"];
const INGREDIENTS: [&str; 3] = ["flour", "sugar", "butter"];

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

// Strategies for generating test data
fn history_strategy() -> impl Strategy<Value = Vec<(usize, u64, u32)>> {
    prop::collection::vec((0..ITEMS.len(), 0u64..30, 0u32..200), 0..60)
}

fn recipes_strategy() -> impl Strategy<Value = Vec<Recipe>> {
    prop::collection::btree_map(
        0..ITEMS.len(),
        prop::collection::btree_map(0..INGREDIENTS.len(), 0u32..1000, 1..3),
        0..ITEMS.len(),
    )
    .prop_map(|recipes| {
        recipes
            .into_iter()
            .map(|(item, ingredients)| {
                Recipe::new(
                    ITEMS[item],
                    ingredients
                        .into_iter()
                        .map(|(ing, milli)| (INGREDIENTS[ing], f64::from(milli) / 1000.0)),
                )
            })
            .collect()
    })
}

fn to_csv(rows: &[(usize, u64, u32)]) -> String {
    let mut csv = String::from("date,item,qty\n");
    for (item, offset, qty) in rows {
        csv.push_str(&format!(
            "{},{},{}\n",
            start() + Days::new(*offset),
            ITEMS[*item],
            qty
        ));
    }
    csv
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn item_totals_equal_per_date_sums(rows in history_strategy(), days in 1u32..40) {
        let pipeline = ForecastPipeline::new(Arc::new(SeasonalTrendForecaster::new()));
        let report = pipeline.run_csv(&to_csv(&rows), &[], Horizon::from_days(days)).unwrap();

        for (item, total) in &report.item_totals {
            let sum: i64 = report
                .forecast
                .values()
                .filter_map(|items| items.get(item))
                .sum();
            prop_assert_eq!(*total, sum);
        }
    }

    #[test]
    fn ingredient_totals_equal_per_date_sums(
        rows in history_strategy(),
        recipes in recipes_strategy(),
    ) {
        let pipeline = ForecastPipeline::new(Arc::new(SeasonalTrendForecaster::new()));
        let report = pipeline.run_csv(&to_csv(&rows), &recipes, Horizon::default()).unwrap();

        for (ingredient, total) in &report.ingredient_totals {
            let sum: f64 = report
                .inventory
                .values()
                .filter_map(|ingredients| ingredients.get(ingredient))
                .sum();
            prop_assert!((total - sum).abs() <= 1e-6 * total.abs().max(1.0));
        }
    }

    #[test]
    fn items_with_short_histories_never_appear(rows in history_strategy()) {
        let pipeline = ForecastPipeline::new(Arc::new(SeasonalTrendForecaster::new()));
        let report = pipeline.run_csv(&to_csv(&rows), &[], Horizon::default()).unwrap();

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for (item, _, _) in &rows {
            *counts.entry(ITEMS[*item]).or_default() += 1;
        }
        for (item, count) in counts.into_iter().filter(|(_, count)| *count < 3) {
            prop_assert!(!report.item_totals.contains_key(item), "{} has only {} rows", item, count);
            prop_assert!(report.forecast.values().all(|items| !items.contains_key(item)));
        }
    }

    #[test]
    fn forecast_dates_are_after_the_cutoff(rows in history_strategy()) {
        let pipeline = ForecastPipeline::new(Arc::new(SeasonalTrendForecaster::new()));
        let report = pipeline.run_csv(&to_csv(&rows), &[], Horizon::default()).unwrap();

        if let Some(cutoff) = report.cutoff {
            prop_assert!(report.forecast.keys().all(|day| *day > cutoff));
            prop_assert!(report.inventory.keys().all(|day| *day > cutoff));
        } else {
            prop_assert!(report.forecast.is_empty());
        }
    }
}

// Property: horizon codes resolve consistently
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn day_month_year_codes_scale(n in 0u32..1000) {
        prop_assert_eq!(Horizon::parse(&format!("{n}d")).days(), n);
        prop_assert_eq!(Horizon::parse(&format!("{n}m")).days(), n * 30);
        prop_assert_eq!(Horizon::parse(&format!("{n}y")).days(), n * 365);
    }

    #[test]
    fn codes_without_a_known_suffix_fall_back_to_a_week(code in "[0-9]{0,4}[a-ce-lnz]?") {
        prop_assume!(!code.ends_with('d') && !code.ends_with('m') && !code.ends_with('y'));
        prop_assert_eq!(Horizon::parse(&code).days(), 7);
    }
}
