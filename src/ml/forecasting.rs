use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ForecastPoint, SalesSeries};

/// Days forecast when a horizon code cannot be interpreted.
pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// History must span at least this many days before weekday effects are fitted.
pub const MIN_SEASONAL_SPAN_DAYS: i64 = 14;

/// Errors raised while fitting or extrapolating a single item's series
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("insufficient data: need at least {required} distinct dates, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("numerical error: {0}")]
    NumericalError(String),

    #[error("forecast date out of range: {0} days after {1}")]
    DateOutOfRange(u64, NaiveDate),

    #[error("model error: {0}")]
    Model(String),
}

/// A time-series forecasting capability.
///
/// Implementations fit a fresh model on `series` and return one point per day
/// for `horizon_days` consecutive days, starting the day after the series'
/// last date. Model state never outlives the call.
#[cfg_attr(test, mockall::automock)]
pub trait Forecaster: Send + Sync {
    fn fit_and_extrapolate(
        &self,
        series: &SalesSeries,
        horizon_days: u32,
    ) -> Result<Vec<ForecastPoint>, ForecastError>;
}

/// Forecast horizon resolved from a code such as `7d`, `2m` or `1y`.
///
/// Months count as 30 days and years as 365. This coarse calendar is
/// intentional and matches what callers have always received; it is not
/// calendar arithmetic. Anything unrecognised resolves to 7 days.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    days: u32,
}

impl Horizon {
    pub fn from_days(days: u32) -> Self {
        Self { days }
    }

    pub fn parse(code: &str) -> Self {
        let days = code
            .char_indices()
            .last()
            .and_then(|(idx, suffix)| {
                let factor = match suffix {
                    'd' => 1,
                    'm' => 30,
                    'y' => 365,
                    _ => return None,
                };
                code[..idx].parse::<u32>().ok()?.checked_mul(factor)
            })
            .unwrap_or(DEFAULT_HORIZON_DAYS);
        Self { days }
    }

    pub fn days(&self) -> u32 {
        self.days
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self::from_days(DEFAULT_HORIZON_DAYS)
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.days)
    }
}

/// Linear trend plus additive day-of-week effects.
///
/// The trend is an ordinary least squares fit over the day offset from the
/// first observation, so gaps in the history are respected. Quantities sold
/// on the same date are summed before fitting. Weekday factors are the mean
/// residual per weekday, centred to sum to zero, and are only fitted once the
/// history spans [`MIN_SEASONAL_SPAN_DAYS`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalTrendForecaster {
    weekly_seasonality: bool,
}

impl Default for SeasonalTrendForecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonalTrendForecaster {
    pub fn new() -> Self {
        Self {
            weekly_seasonality: true,
        }
    }

    /// Fits the trend only.
    pub fn trend_only() -> Self {
        Self {
            weekly_seasonality: false,
        }
    }
}

struct FittedModel {
    origin: NaiveDate,
    intercept: f64,
    slope: f64,
    weekday_factors: [f64; 7],
}

impl FittedModel {
    fn predict(&self, date: NaiveDate) -> f64 {
        let t = (date - self.origin).num_days() as f64;
        let weekday = date.weekday().num_days_from_monday() as usize;
        self.intercept + self.slope * t + self.weekday_factors[weekday]
    }
}

impl SeasonalTrendForecaster {
    fn fit(&self, series: &SalesSeries) -> Result<FittedModel, ForecastError> {
        let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for point in series.points() {
            *daily.entry(point.date).or_insert(0.0) += point.qty;
        }

        let (origin, last) = match (daily.keys().next(), daily.keys().next_back()) {
            (Some(first), Some(last)) if daily.len() >= 2 => (*first, *last),
            _ => {
                return Err(ForecastError::InsufficientData {
                    required: 2,
                    actual: daily.len(),
                })
            }
        };

        let observations: Vec<(f64, f64, usize)> = daily
            .iter()
            .map(|(date, qty)| {
                (
                    (*date - origin).num_days() as f64,
                    *qty,
                    date.weekday().num_days_from_monday() as usize,
                )
            })
            .collect();

        let n = observations.len() as f64;
        let sum_t: f64 = observations.iter().map(|(t, _, _)| t).sum();
        let sum_y: f64 = observations.iter().map(|(_, y, _)| y).sum();
        let sum_t2: f64 = observations.iter().map(|(t, _, _)| t * t).sum();
        let sum_ty: f64 = observations.iter().map(|(t, y, _)| t * y).sum();

        let denominator = n * sum_t2 - sum_t * sum_t;
        if denominator.abs() < 1e-10 {
            return Err(ForecastError::NumericalError(
                "singular matrix in trend regression".to_string(),
            ));
        }

        let slope = (n * sum_ty - sum_t * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_t) / n;

        let mut weekday_factors = [0.0; 7];
        if self.weekly_seasonality && (last - origin).num_days() >= MIN_SEASONAL_SPAN_DAYS {
            let mut sums = [0.0; 7];
            let mut counts = [0usize; 7];
            for (t, y, weekday) in &observations {
                sums[*weekday] += y - (intercept + slope * t);
                counts[*weekday] += 1;
            }

            let observed: Vec<usize> = (0..7).filter(|d| counts[*d] > 0).collect();
            for d in &observed {
                weekday_factors[*d] = sums[*d] / counts[*d] as f64;
            }
            let centre =
                observed.iter().map(|d| weekday_factors[*d]).sum::<f64>() / observed.len() as f64;
            for d in &observed {
                weekday_factors[*d] -= centre;
            }
        }

        Ok(FittedModel {
            origin,
            intercept,
            slope,
            weekday_factors,
        })
    }
}

impl Forecaster for SeasonalTrendForecaster {
    fn fit_and_extrapolate(
        &self,
        series: &SalesSeries,
        horizon_days: u32,
    ) -> Result<Vec<ForecastPoint>, ForecastError> {
        let model = self.fit(series)?;
        let last = series
            .last_date()
            .ok_or(ForecastError::InsufficientData {
                required: 2,
                actual: 0,
            })?;

        (1..=u64::from(horizon_days))
            .map(|offset| {
                let date = last
                    .checked_add_days(Days::new(offset))
                    .ok_or(ForecastError::DateOutOfRange(offset, last))?;
                let value = model.predict(date);
                if !value.is_finite() {
                    return Err(ForecastError::NumericalError(format!(
                        "non-finite prediction for {date}"
                    )));
                }
                Ok(ForecastPoint { date, value })
            })
            .collect()
    }
}
