use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::handlers::{AppState, StatusResponse};
use crate::models::Recipe;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteRecipeRequest {
    #[serde(default)]
    pub item: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    responses(
        (status = 200, description = "All recipes", body = Vec<Recipe>),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "recipes"
)]
pub async fn list_recipes(
    State(state): State<AppState>,
) -> Result<Json<Vec<Recipe>>, ServiceError> {
    Ok(Json(state.services.recipes.list().await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = Recipe,
    responses(
        (status = 200, description = "Recipe added", body = StatusResponse),
        (status = 400, description = "Invalid recipe format", body = crate::errors::ErrorResponse),
        (status = 409, description = "Recipe already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "recipes"
)]
pub async fn add_recipe(
    State(state): State<AppState>,
    Json(recipe): Json<Recipe>,
) -> Result<Json<StatusResponse>, ServiceError> {
    let recipe = state.services.recipes.add(recipe).await?;
    Ok(Json(StatusResponse::new("added").with_item(recipe.item)))
}

#[utoipa::path(
    put,
    path = "/api/v1/recipes",
    request_body = Recipe,
    responses(
        (status = 200, description = "Recipe replaced", body = StatusResponse),
        (status = 404, description = "Recipe not found", body = crate::errors::ErrorResponse)
    ),
    tag = "recipes"
)]
pub async fn update_recipe(
    State(state): State<AppState>,
    Json(recipe): Json<Recipe>,
) -> Result<Json<StatusResponse>, ServiceError> {
    let recipe = state.services.recipes.update(recipe).await?;
    Ok(Json(StatusResponse::new("updated").with_item(recipe.item)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/recipes",
    request_body = DeleteRecipeRequest,
    responses(
        (status = 200, description = "Recipe deleted", body = StatusResponse),
        (status = 400, description = "Item is required", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    tag = "recipes"
)]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Json(request): Json<DeleteRecipeRequest>,
) -> Result<Json<StatusResponse>, ServiceError> {
    state.services.recipes.delete(&request.item).await?;
    Ok(Json(StatusResponse::new("deleted").with_item(request.item)))
}
