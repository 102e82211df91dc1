use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::models::Recipe;

/// Stored inputs, used to pre-fill the prediction form
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DefaultsResponse {
    pub recipes_json: Vec<Recipe>,
    pub sales_csv: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/defaults",
    responses(
        (status = 200, description = "Stored recipes and sales log", body = DefaultsResponse),
        (status = 500, description = "Stores could not be read", body = crate::errors::ErrorResponse)
    ),
    tag = "forecast"
)]
pub async fn load_defaults(
    State(state): State<AppState>,
) -> Result<Json<DefaultsResponse>, ServiceError> {
    let (sales, recipes) = tokio::try_join!(
        state.services.sales.raw_csv(),
        state.services.recipes.list()
    )?;

    Ok(Json(DefaultsResponse {
        recipes_json: recipes,
        sales_csv: sales.trim().to_string(),
    }))
}
