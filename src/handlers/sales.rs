use std::collections::BTreeMap;

use axum::{extract::State, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::handlers::{AppState, StatusResponse};
use crate::models::SalesRecord;
use crate::services::sales::DailyOutcome;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SalesListResponse {
    pub sales: Vec<SalesRecord>,
}

/// Identifies the records to delete
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteSaleRequest {
    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub date: NaiveDate,
    pub item: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailySalesResponse {
    #[schema(example = "success")]
    pub status: String,
    pub added: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatedSaleResponse {
    pub status: String,
    pub sale: SalesRecord,
}

#[utoipa::path(
    get,
    path = "/api/v1/sales",
    responses(
        (status = 200, description = "Parsed sales log", body = SalesListResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "sales"
)]
pub async fn list_sales(
    State(state): State<AppState>,
) -> Result<Json<SalesListResponse>, ServiceError> {
    let sales = state.services.sales.list().await?;
    Ok(Json(SalesListResponse { sales }))
}

#[utoipa::path(
    post,
    path = "/api/v1/sales",
    request_body = Vec<SalesRecord>,
    responses(
        (status = 200, description = "Sales appended", body = StatusResponse),
        (status = 400, description = "Invalid sale record", body = crate::errors::ErrorResponse)
    ),
    tag = "sales"
)]
pub async fn add_sales(
    State(state): State<AppState>,
    Json(records): Json<Vec<SalesRecord>>,
) -> Result<Json<StatusResponse>, ServiceError> {
    let count = state.services.sales.add(records).await?;
    Ok(Json(StatusResponse::new("added").with_count(count)))
}

/// Record today's sales, one row per item
#[utoipa::path(
    post,
    path = "/api/v1/sales/daily",
    request_body(content = BTreeMap<String, f64>, description = "Map of item to quantity sold today"),
    responses(
        (status = 200, description = "New rows appended, or nothing new for today", body = DailySalesResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "sales"
)]
pub async fn add_daily_sales(
    State(state): State<AppState>,
    Json(sales): Json<BTreeMap<String, f64>>,
) -> Result<Json<DailySalesResponse>, ServiceError> {
    let response = match state.services.sales.add_daily(&sales).await? {
        DailyOutcome::Added(added) => DailySalesResponse {
            status: "success".to_string(),
            added,
            message: None,
        },
        DailyOutcome::Duplicate => DailySalesResponse {
            status: "duplicate".to_string(),
            added: 0,
            message: Some("No new unique sales for today".to_string()),
        },
    };
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/v1/sales",
    request_body = SalesRecord,
    responses(
        (status = 200, description = "Sale updated", body = UpdatedSaleResponse),
        (status = 404, description = "Sale not found", body = crate::errors::ErrorResponse)
    ),
    tag = "sales"
)]
pub async fn update_sale(
    State(state): State<AppState>,
    Json(record): Json<SalesRecord>,
) -> Result<Json<UpdatedSaleResponse>, ServiceError> {
    let sale = state.services.sales.update(record).await?;
    Ok(Json(UpdatedSaleResponse {
        status: "updated".to_string(),
        sale,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/sales",
    request_body = DeleteSaleRequest,
    responses(
        (status = 200, description = "Matching sales deleted", body = StatusResponse),
        (status = 404, description = "Sale not found", body = crate::errors::ErrorResponse)
    ),
    tag = "sales"
)]
pub async fn delete_sale(
    State(state): State<AppState>,
    Json(request): Json<DeleteSaleRequest>,
) -> Result<Json<StatusResponse>, ServiceError> {
    let removed = state
        .services
        .sales
        .delete(request.date, &request.item)
        .await?;
    Ok(Json(
        StatusResponse::new("deleted")
            .with_item(request.item)
            .with_count(removed),
    ))
}
