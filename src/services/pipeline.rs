//! Forecast-to-inventory pipeline.
//!
//! preparation -> per-item forecasting -> demand aggregation -> ingredient
//! expansion. Only missing sales columns abort a run; every other problem is
//! absorbed per row, per item or per recipe and the run returns whatever
//! succeeded.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::ml::{Forecaster, Horizon};
use crate::models::{ForecastIndex, IngredientTotals, InventoryIndex, ItemTotals, Recipe, SalesTable};
use crate::services::{
    demand::aggregate_demand, forecasting::ItemForecaster, ingredients::expand_ingredients,
    sales_preparation::prepare_sales,
};

/// Result of one pipeline run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    /// date -> item -> predicted units
    #[serde(rename = "forecastedSales")]
    #[schema(value_type = Object)]
    pub forecast: ForecastIndex,
    /// date -> ingredient -> required amount
    #[serde(rename = "inventoryNeeded")]
    #[schema(value_type = Object)]
    pub inventory: InventoryIndex,
    /// item -> predicted units over the horizon
    #[serde(rename = "totalSales")]
    #[schema(value_type = Object)]
    pub item_totals: ItemTotals,
    /// ingredient -> required amount over the horizon
    #[serde(rename = "totalInventory")]
    #[schema(value_type = Object)]
    pub ingredient_totals: IngredientTotals,
    pub horizon_days: u32,
    /// Last observed sales date; forecasts start the day after
    #[schema(value_type = Option<String>, format = Date)]
    pub cutoff: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct ForecastPipeline {
    forecaster: ItemForecaster,
}

impl ForecastPipeline {
    pub fn new(forecaster: Arc<dyn Forecaster>) -> Self {
        Self {
            forecaster: ItemForecaster::new(forecaster),
        }
    }

    #[instrument(skip_all, fields(rows = sales.len(), recipes = recipes.len(), horizon = %horizon))]
    pub fn run(
        &self,
        sales: &SalesTable,
        recipes: &[Recipe],
        horizon: Horizon,
    ) -> Result<ForecastReport, ServiceError> {
        let prepared = prepare_sales(sales)?;
        let segments = self.forecaster.forecast_all(&prepared, horizon);
        let demand = aggregate_demand(&segments);
        let requirements = expand_ingredients(&segments, recipes);

        info!(
            items = prepared.items().len(),
            forecast = segments.len(),
            skipped = prepared.items().len() - segments.len(),
            dropped_rows = prepared.dropped_rows(),
            cutoff = ?prepared.cutoff(),
            "forecast pipeline finished"
        );

        Ok(ForecastReport {
            forecast: demand.forecast,
            inventory: requirements.inventory,
            item_totals: demand.totals,
            ingredient_totals: requirements.totals,
            horizon_days: horizon.days(),
            cutoff: prepared.cutoff(),
        })
    }

    /// Convenience wrapper for a raw CSV sales blob.
    pub fn run_csv(
        &self,
        sales_csv: &str,
        recipes: &[Recipe],
        horizon: Horizon,
    ) -> Result<ForecastReport, ServiceError> {
        let table = SalesTable::from_csv(sales_csv)?;
        self.run(&table, recipes, horizon)
    }
}
