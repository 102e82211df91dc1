//! Inventory forecasting service.
//!
//! Forecasts per-item sales from a historical sales log and turns the forecast
//! into ingredient requirements through recipes. The library exposes the
//! pipeline, its record stores and the HTTP router; the binaries wire them to
//! a server, an offline CLI and an OpenAPI exporter.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ml;
pub mod models;
pub mod openapi;
pub mod repositories;
pub mod services;
pub mod tracing;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, Any, CorsLayer},
    timeout::TimeoutLayer,
};

use crate::ml::{Forecaster, SeasonalTrendForecaster};
use crate::repositories::{FileRecipeStore, FileSalesStore, RecipeStore, SalesStore};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(
        config: config::AppConfig,
        sales_store: Arc<dyn SalesStore>,
        recipe_store: Arc<dyn RecipeStore>,
        forecaster: Arc<dyn Forecaster>,
    ) -> Self {
        Self {
            config,
            services: handlers::AppServices::new(sales_store, recipe_store, forecaster),
        }
    }

    /// File-backed stores at the configured paths and the default forecaster.
    pub fn from_config(config: config::AppConfig) -> Self {
        let sales: Arc<dyn SalesStore> = Arc::new(FileSalesStore::new(config.sales_path()));
        let recipes: Arc<dyn RecipeStore> =
            Arc::new(FileRecipeStore::new(config.recipes_path()));
        Self::new(
            config,
            sales,
            recipes,
            Arc::new(SeasonalTrendForecaster::new()),
        )
    }
}

/// API v1 routes
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/predict", post(handlers::predict::predict))
        .route("/defaults", get(handlers::defaults::load_defaults))
        .route(
            "/sales",
            get(handlers::sales::list_sales)
                .post(handlers::sales::add_sales)
                .put(handlers::sales::update_sale)
                .delete(handlers::sales::delete_sale),
        )
        .route("/sales/daily", post(handlers::sales::add_daily_sales))
        .route(
            "/recipes",
            get(handlers::recipes::list_recipes)
                .post(handlers::recipes::add_recipe)
                .put(handlers::recipes::update_recipe)
                .delete(handlers::recipes::delete_recipe),
        )
}

/// CORS policy from configuration. Without configured origins the layer is
/// permissive in development (or when explicitly allowed) and same-origin only
/// otherwise.
pub fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        let layer = CorsLayer::new().allow_origin(origins);
        // Wildcards are not allowed together with credentials.
        if cfg.cors_allow_credentials {
            layer
                .allow_methods(AllowMethods::mirror_request())
                .allow_headers(AllowHeaders::mirror_request())
                .allow_credentials(true)
        } else {
            layer.allow_methods(Any).allow_headers(Any)
        }
    } else if cfg.should_allow_permissive_cors() {
        CorsLayer::permissive()
    } else {
        ::tracing::warn!("no CORS origins configured; cross-origin requests will be refused");
        CorsLayer::new()
    }
}

/// Full application router with every cross-cutting layer applied.
pub fn app_router(state: AppState) -> Router {
    let cfg = state.config.clone();

    let mut router = Router::new()
        .route("/", get(|| async { "inventory-forecast up" }))
        .route("/health", get(handlers::health::liveness_check))
        .route("/health/ready", get(handlers::health::readiness_check))
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::openapi_routes());

    if let Some(timeout) = cfg.request_timeout() {
        router = router.layer(TimeoutLayer::new(timeout));
    }

    router
        .layer(DefaultBodyLimit::max(cfg.max_body_size))
        .layer(cors_layer(&cfg))
        // HTTP tracing layer for consistent request/response telemetry
        .layer(tracing::configure_http_tracing())
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(tracing::request_id_middleware))
        .with_state(state)
}

pub mod prelude {
    pub use crate::errors::*;
    pub use crate::ml::{Forecaster, Horizon, SeasonalTrendForecaster};
    pub use crate::models::*;
    pub use crate::repositories::*;
    pub use crate::services::pipeline::{ForecastPipeline, ForecastReport};
}
