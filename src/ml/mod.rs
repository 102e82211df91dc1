/*!
 * # Machine Learning Module
 *
 * Forecasting capabilities used by the demand pipeline. The pipeline only
 * depends on the [`forecasting::Forecaster`] trait; the statistical method
 * behind it can be swapped without touching pipeline code.
 */

/// Pluggable per-item demand forecasting
pub mod forecasting;

pub use forecasting::{ForecastError, Forecaster, Horizon, SeasonalTrendForecaster};
