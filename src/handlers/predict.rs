use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::ml::Horizon;
use crate::models::{Recipe, SalesTable};
use crate::services::pipeline::ForecastReport;

/// Prediction request. Omitted or empty inputs are read from the configured stores.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    /// Horizon code such as `7d`, `2m` or `1y`
    #[schema(example = "7d")]
    pub horizon: Option<String>,
    /// Sales CSV with `date`, `item` and `qty` columns
    pub sales_csv: Option<String>,
    pub recipes: Option<Vec<Recipe>>,
}

/// Forecast item demand and ingredient requirements
#[utoipa::path(
    post,
    path = "/api/v1/predict",
    request_body = PredictRequest,
    responses(
        (status = 200, description = "Forecast computed", body = ForecastReport,
            headers(
                ("X-Request-Id" = String, description = "Unique request id for tracing"),
            )
        ),
        (status = 400, description = "Sales data lacks required columns or the horizon is too long", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "forecast"
)]
#[instrument(skip_all)]
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<ForecastReport>, ServiceError> {
    let horizon = request
        .horizon
        .as_deref()
        .filter(|code| !code.trim().is_empty())
        .map(Horizon::parse)
        .unwrap_or_else(|| state.config.horizon());
    let horizon = state.config.bounded_horizon(horizon)?;

    // Blank inputs count as omitted.
    let sales_csv = match request.sales_csv.filter(|csv| !csv.trim().is_empty()) {
        Some(csv) => csv,
        None => state.services.sales.raw_csv().await?,
    };
    let recipes = match request.recipes.filter(|recipes| !recipes.is_empty()) {
        Some(recipes) => recipes,
        None => state.services.recipes.list().await?,
    };

    let table = SalesTable::from_csv(&sales_csv)?;
    let pipeline = state.services.pipeline.clone();
    let report = tokio::task::spawn_blocking(move || pipeline.run(&table, &recipes, horizon))
        .await
        .map_err(|e| ServiceError::InternalError(format!("forecast task failed: {e}")))??;

    Ok(Json(report))
}
