use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::ServiceError;
use crate::ml::Horizon;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SALES_PATH: &str = "data/sales.csv";
const DEFAULT_RECIPES_PATH: &str = "data/recipes.json";
const DEFAULT_HORIZON: &str = "7d";
const DEFAULT_MAX_HORIZON_DAYS: u32 = 3650;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;
const CONFIG_DIR: &str = "config";

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Server host address
    pub host: String,

    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,

    /// Application environment
    pub environment: String,

    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// CSV sales log
    #[serde(default = "default_sales_path")]
    #[validate(length(min = 1))]
    pub sales_path: String,

    /// JSON recipe collection
    #[serde(default = "default_recipes_path")]
    #[validate(length(min = 1))]
    pub recipes_path: String,

    /// Horizon code used when a prediction request names none
    #[serde(default = "default_horizon")]
    pub default_horizon: String,

    /// Longest horizon a prediction may request, in days
    #[serde(default = "default_max_horizon_days")]
    #[validate(range(min = 1, max = 36500))]
    pub max_horizon_days: u32,

    /// Per-request timeout in seconds, 0 = disabled
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// CORS: comma-separated list of allowed origins (production)
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Allow permissive CORS fallback
    #[serde(default)]
    pub cors_allow_any_origin: bool,

    /// CORS: allow credentials
    #[serde(default)]
    pub cors_allow_credentials: bool,

    /// Request body limit in bytes
    #[serde(default = "default_max_body_size")]
    #[validate(range(min = 1024))]
    pub max_body_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: DEFAULT_ENV.to_string(),
            log_level: default_log_level(),
            log_json: false,
            sales_path: default_sales_path(),
            recipes_path: default_recipes_path(),
            default_horizon: default_horizon(),
            max_horizon_days: default_max_horizon_days(),
            request_timeout_secs: default_request_timeout_secs(),
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
            cors_allow_credentials: false,
            max_body_size: default_max_body_size(),
        }
    }
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    pub fn has_cors_allowed_origins(&self) -> bool {
        !self.cors_origins().is_empty()
    }

    /// Trimmed, non-empty entries of `cors_allowed_origins`.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn should_allow_permissive_cors(&self) -> bool {
        self.is_development() || self.cors_allow_any_origin
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn horizon(&self) -> Horizon {
        Horizon::parse(&self.default_horizon)
    }

    /// Rejects horizons longer than `max_horizon_days`.
    pub fn bounded_horizon(&self, horizon: Horizon) -> Result<Horizon, ServiceError> {
        if horizon.days() > self.max_horizon_days {
            return Err(ServiceError::ValidationError(format!(
                "horizon of {} days exceeds the maximum of {} days",
                horizon.days(),
                self.max_horizon_days
            )));
        }
        Ok(horizon)
    }

    pub fn sales_path(&self) -> PathBuf {
        PathBuf::from(&self.sales_path)
    }

    pub fn recipes_path(&self) -> PathBuf {
        PathBuf::from(&self.recipes_path)
    }

    fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.should_allow_permissive_cors() && !self.has_cors_allowed_origins() {
            let mut err = ValidationError::new("cors_allowed_origins_required");
            err.message = Some(
                "Set APP__CORS_ALLOWED_ORIGINS for non-development environments or explicitly opt-in via APP__CORS_ALLOW_ANY_ORIGIN=true".into(),
            );
            errors.add("cors_allowed_origins", err);
        }

        if self.horizon().days() > self.max_horizon_days {
            let mut err = ValidationError::new("default_horizon_too_long");
            err.message = Some("default_horizon must not exceed max_horizon_days".into());
            errors.add("default_horizon", err);
        }

        if self.sales_path.trim().is_empty() {
            errors.add("sales_path", ValidationError::new("blank_path"));
        }
        if self.recipes_path.trim().is_empty() {
            errors.add("recipes_path", ValidationError::new("blank_path"));
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Runs both the derived and the cross-field checks.
    pub fn validate_all(&self) -> Result<(), AppConfigError> {
        self.validate()?;
        self.validate_additional_constraints()?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_sales_path() -> String {
    DEFAULT_SALES_PATH.to_string()
}

fn default_recipes_path() -> String {
    DEFAULT_RECIPES_PATH.to_string()
}

fn default_horizon() -> String {
    DEFAULT_HORIZON.to_string()
}

fn default_max_horizon_days() -> u32 {
    DEFAULT_MAX_HORIZON_DAYS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `level`.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("inventory_forecast={level},tower_http=debug");
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let filter = EnvFilter::new(filter_directive);
    if json {
        let _ = fmt().with_env_filter(filter).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter).try_init();
    }
}

pub fn load_config() -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    load_config_from(Path::new(CONFIG_DIR), &run_env)
}

/// Layers built-in defaults, `<dir>/default`, `<dir>/<run_env>` and `APP__*`
/// environment variables, then validates the result.
pub fn load_config_from(dir: &Path, run_env: &str) -> Result<AppConfig, AppConfigError> {
    info!("Loading configuration for environment: {}", run_env);

    if !dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            dir.display()
        );
    }

    let config = Config::builder()
        .set_default("host", DEFAULT_HOST)?
        .set_default("port", i64::from(DEFAULT_PORT))?
        .set_default("environment", run_env)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&dir.join("default").to_string_lossy()).required(false))
        .add_source(File::with_name(&dir.join(run_env).to_string_lossy()).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate_all().map_err(|e| {
        error!("Configuration validation failed: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}
