//! Expands forecast item demand into ingredient requirements through recipes.

use tracing::debug;

use crate::models::{IngredientAmount, IngredientTotals, InventoryIndex, ItemSegments, Recipe};

/// Ingredient amounts keyed by date and ingredient, plus horizon totals
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IngredientRequirements {
    pub inventory: InventoryIndex,
    pub totals: IngredientTotals,
}

/// First recipe whose item name matches exactly.
pub fn find_recipe<'a>(recipes: &'a [Recipe], item: &str) -> Option<&'a Recipe> {
    recipes.iter().find(|recipe| recipe.item == item)
}

/// Amount of an ingredient needed for `qty` units. Amounts that cannot be
/// read as numbers count as one per unit.
pub fn required_amount(amount: &IngredientAmount, qty: i64) -> f64 {
    let qty = qty as f64;
    match amount.multiplier() {
        Some(per_unit) => per_unit * qty,
        None => qty,
    }
}

pub fn expand_ingredients(segments: &ItemSegments, recipes: &[Recipe]) -> IngredientRequirements {
    let mut requirements = IngredientRequirements::default();

    for (item, segment) in segments {
        if segment.is_empty() {
            continue;
        }
        let Some(recipe) = find_recipe(recipes, item) else {
            debug!(item = %item, "no recipe for item; skipping ingredient expansion");
            continue;
        };

        for point in segment.points() {
            for (ingredient, amount) in &recipe.ingredients {
                let required = required_amount(amount, point.qty);
                *requirements
                    .inventory
                    .entry(point.date)
                    .or_default()
                    .entry(ingredient.clone())
                    .or_insert(0.0) += required;
                *requirements.totals.entry(ingredient.clone()).or_insert(0.0) += required;
            }
        }
    }

    requirements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastSegment, SegmentPoint};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn segments(entries: &[(&str, &[(u32, i64)])]) -> ItemSegments {
        entries
            .iter()
            .map(|(item, points)| {
                let segment: ForecastSegment = points
                    .iter()
                    .map(|(d, qty)| SegmentPoint { date: date(*d), qty: *qty })
                    .collect();
                (item.to_string(), segment)
            })
            .collect()
    }

    #[test]
    fn numeric_amounts_scale_forecast_units() {
        let recipes = vec![Recipe::new("bagel", [("flour", 0.25), ("salt", 0.01)])];
        let req = expand_ingredients(&segments(&[("bagel", &[(10, 8), (11, 4)])]), &recipes);

        assert_eq!(req.inventory[&date(10)]["flour"], 2.0);
        assert_eq!(req.inventory[&date(11)]["flour"], 1.0);
        assert_eq!(req.totals["flour"], 3.0);
        assert!((req.totals["salt"] - 0.12).abs() < 1e-12);
    }

    #[test]
    fn shared_ingredients_accumulate_across_items() {
        let recipes = vec![
            Recipe::new("bagel", [("flour", 0.5)]),
            Recipe::new("muffin", [("flour", 0.25), ("sugar", 0.1)]),
        ];
        let req = expand_ingredients(
            &segments(&[("bagel", &[(10, 2)]), ("muffin", &[(10, 4)])]),
            &recipes,
        );
        assert_eq!(req.inventory[&date(10)]["flour"], 2.0);
        assert_eq!(req.totals["flour"], 2.0);
        assert!((req.totals["sugar"] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn textual_amounts_fall_back_to_one_per_unit() {
        let recipes = vec![Recipe::new("bagel", [("sesame", "a handful")])];
        let req = expand_ingredients(&segments(&[("bagel", &[(10, 6)])]), &recipes);
        assert_eq!(req.inventory[&date(10)]["sesame"], 6.0);
    }

    #[test]
    fn items_without_recipes_contribute_nothing() {
        let recipes = vec![Recipe::new("Bagel", [("flour", 1.0)])];
        let req = expand_ingredients(&segments(&[("bagel", &[(10, 6)])]), &recipes);
        assert!(req.inventory.is_empty());
        assert!(req.totals.is_empty());
    }

    #[test]
    fn first_matching_recipe_wins() {
        let recipes = vec![
            Recipe::new("bagel", [("flour", 1.0)]),
            Recipe::new("bagel", [("rye", 1.0)]),
        ];
        assert_eq!(
            find_recipe(&recipes, "bagel").map(|r| r.ingredients.contains_key("flour")),
            Some(true)
        );
    }
}
