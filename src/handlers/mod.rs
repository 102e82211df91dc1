pub mod defaults;
pub mod health;
pub mod predict;
pub mod recipes;
pub mod sales;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ml::Forecaster;
use crate::repositories::{RecipeStore, SalesStore};
use crate::services::{pipeline::ForecastPipeline, recipes::RecipeService, sales::SalesService};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub pipeline: Arc<ForecastPipeline>,
    pub sales: Arc<SalesService>,
    pub recipes: Arc<RecipeService>,
}

impl AppServices {
    pub fn new(
        sales_store: Arc<dyn SalesStore>,
        recipe_store: Arc<dyn RecipeStore>,
        forecaster: Arc<dyn Forecaster>,
    ) -> Self {
        Self {
            pipeline: Arc::new(ForecastPipeline::new(forecaster)),
            sales: Arc::new(SalesService::new(sales_store)),
            recipes: Arc::new(RecipeService::new(recipe_store)),
        }
    }
}

/// Acknowledgement returned by mutating endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "added")]
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl StatusResponse {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            item: None,
            count: None,
        }
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}
