use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Per-unit amount of one ingredient in a recipe.
///
/// Uploaded recipes carry either bare numbers or free text such as `"2"` or
/// `"150 g"`, so the raw JSON value is kept and coerced only when needed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object, example = 0.25)]
pub struct IngredientAmount(pub Value);

impl IngredientAmount {
    /// Numeric multiplier for this amount, if one can be read from it.
    pub fn multiplier(&self) -> Option<f64> {
        let value = match &self.0 {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }
}

impl From<f64> for IngredientAmount {
    fn from(value: f64) -> Self {
        Self(serde_json::json!(value))
    }
}

impl From<Value> for IngredientAmount {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for IngredientAmount {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

/// Ingredients needed to produce one unit of `item`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recipe {
    #[schema(example = "bagel")]
    pub item: String,
    #[serde(default)]
    pub ingredients: BTreeMap<String, IngredientAmount>,
}

impl Recipe {
    pub fn new<I, K, A>(item: impl Into<String>, ingredients: I) -> Self
    where
        I: IntoIterator<Item = (K, A)>,
        K: Into<String>,
        A: Into<IngredientAmount>,
    {
        Self {
            item: item.into(),
            ingredients: ingredients
                .into_iter()
                .map(|(name, amount)| (name.into(), amount.into()))
                .collect(),
        }
    }
}
