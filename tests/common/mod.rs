#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use chrono::{Days, NaiveDate};
use inventory_forecast::{
    config::AppConfig,
    ml::{ForecastError, Forecaster, SeasonalTrendForecaster},
    models::{ForecastPoint, Recipe, SalesSeries},
    repositories::{InMemoryRecipeStore, InMemorySalesStore},
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

/// Helper harness for driving the full router over in-memory stores.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub sales_store: Arc<InMemorySalesStore>,
    pub recipe_store: Arc<InMemoryRecipeStore>,
}

impl TestApp {
    /// Empty stores and the default forecaster.
    pub fn new() -> Self {
        Self::with_data("date,item,qty\n", Vec::new())
    }

    pub fn with_data(sales_csv: &str, recipes: Vec<Recipe>) -> Self {
        Self::build(
            sales_csv,
            recipes,
            Arc::new(SeasonalTrendForecaster::new()),
        )
    }

    pub fn build(sales_csv: &str, recipes: Vec<Recipe>, forecaster: Arc<dyn Forecaster>) -> Self {
        let sales_store = Arc::new(InMemorySalesStore::new(sales_csv));
        let recipe_store = Arc::new(InMemoryRecipeStore::new(recipes));
        let state = AppState::new(
            AppConfig::default(),
            sales_store.clone(),
            recipe_store.clone(),
            forecaster,
        );
        let router = inventory_forecast::app_router(state.clone());

        Self {
            router,
            state,
            sales_store,
            recipe_store,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        self.request_with_headers(method, uri, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// Forecasts a constant value and fails for any series whose first
/// observation equals `fail_on_first_qty`.
pub struct FlatForecaster {
    pub value: f64,
    pub fail_on_first_qty: Option<f64>,
}

impl Forecaster for FlatForecaster {
    fn fit_and_extrapolate(
        &self,
        series: &SalesSeries,
        horizon_days: u32,
    ) -> Result<Vec<ForecastPoint>, ForecastError> {
        let first = series.points().first().ok_or(ForecastError::InsufficientData {
            required: 1,
            actual: 0,
        })?;
        if Some(first.qty) == self.fail_on_first_qty {
            return Err(ForecastError::Model("forced failure".into()));
        }
        let last = series.last_date().unwrap_or(first.date);
        Ok((1..=u64::from(horizon_days))
            .map(|i| ForecastPoint {
                date: last + Days::new(i),
                value: self.value,
            })
            .collect())
    }
}

/// Consecutive daily rows for `item` starting at `start`, one per quantity.
pub fn daily_rows(item: &str, start: NaiveDate, qtys: &[f64]) -> String {
    qtys.iter()
        .enumerate()
        .map(|(i, qty)| format!("{},{},{}\n", start + Days::new(i as u64), item, qty))
        .collect()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
