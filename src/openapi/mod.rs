use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory Forecast API",
        version = "1.0.0",
        description = r#"
# Inventory Forecast API

Forecasts per-item sales from a historical sales log and expands the forecast
into ingredient requirements through recipes.

## Prediction

`POST /api/v1/predict` runs the pipeline. Inputs left out of the request are
read from the stored sales log and recipe collection. Only sales data without
`date`, `item` and `qty` columns is rejected; malformed rows, items with too
little history and items without a recipe are skipped.

## Error Handling

Failing requests return a consistent body:

```json
{
  "error": "Bad Request",
  "message": "Validation error: missing required columns",
  "request_id": "0b6f1c9e-4d1e-4a51-8d0c-8f3f2f0d6a11",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "forecast", description = "Sales forecasting and ingredient planning"),
        (name = "sales", description = "Sales log management"),
        (name = "recipes", description = "Recipe management"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::predict::predict,
        crate::handlers::defaults::load_defaults,

        crate::handlers::sales::list_sales,
        crate::handlers::sales::add_sales,
        crate::handlers::sales::add_daily_sales,
        crate::handlers::sales::update_sale,
        crate::handlers::sales::delete_sale,

        crate::handlers::recipes::list_recipes,
        crate::handlers::recipes::add_recipe,
        crate::handlers::recipes::update_recipe,
        crate::handlers::recipes::delete_recipe,

        crate::handlers::health::liveness_check,
        crate::handlers::health::readiness_check,
    ),
    components(
        schemas(
            crate::handlers::predict::PredictRequest,
            crate::services::pipeline::ForecastReport,
            crate::handlers::defaults::DefaultsResponse,

            crate::models::SalesRecord,
            crate::handlers::sales::SalesListResponse,
            crate::handlers::sales::DeleteSaleRequest,
            crate::handlers::sales::DailySalesResponse,
            crate::handlers::sales::UpdatedSaleResponse,

            crate::models::Recipe,
            crate::models::IngredientAmount,
            crate::handlers::recipes::DeleteRecipeRequest,

            crate::handlers::StatusResponse,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Serves the generated document as JSON.
pub fn openapi_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(OPENAPI_JSON_PATH, get(|| async { Json(ApiDocV1::openapi()) }))
}
