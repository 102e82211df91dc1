use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::ml::{ForecastError, Forecaster, Horizon};
use crate::models::{ForecastSegment, ItemSegments, SalesSeries};
use crate::services::sales_preparation::PreparedSales;

/// Items with fewer observations than this are not forecast.
pub const MIN_HISTORY_POINTS: usize = 3;

/// What happened when one item was forecast
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Forecast(ForecastSegment),
    InsufficientHistory { points: usize },
    Failed(ForecastError),
}

/// Runs the forecasting capability once per item and isolates failures.
#[derive(Clone)]
pub struct ItemForecaster {
    forecaster: Arc<dyn Forecaster>,
}

impl ItemForecaster {
    pub fn new(forecaster: Arc<dyn Forecaster>) -> Self {
        Self { forecaster }
    }

    /// Forecasts one item. `cutoff` is the last date of the combined sales
    /// history, not of this item, so every item's segment starts on the same
    /// day; an item whose own history ends earlier is left with a gap.
    pub fn forecast_item(
        &self,
        item: &str,
        series: &SalesSeries,
        horizon: Horizon,
        cutoff: NaiveDate,
    ) -> ItemOutcome {
        if series.len() < MIN_HISTORY_POINTS {
            debug!(item, points = series.len(), "not enough history to forecast");
            return ItemOutcome::InsufficientHistory {
                points: series.len(),
            };
        }

        match self.forecaster.fit_and_extrapolate(series, horizon.days()) {
            Ok(points) => ItemOutcome::Forecast(ForecastSegment::after_cutoff(&points, cutoff)),
            Err(err) => {
                warn!(item, error = %err, "forecast failed; skipping item");
                ItemOutcome::Failed(err)
            }
        }
    }

    /// Forecasts every prepared item, keeping only the successful segments.
    pub fn forecast_all(&self, sales: &PreparedSales, horizon: Horizon) -> ItemSegments {
        let Some(cutoff) = sales.cutoff() else {
            return ItemSegments::new();
        };

        sales
            .items()
            .iter()
            .filter_map(|item| {
                match self.forecast_item(item, &sales.series_for(item), horizon, cutoff) {
                    ItemOutcome::Forecast(segment) => Some((item.clone(), segment)),
                    _ => None,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::forecasting::MockForecaster;
    use crate::models::{ForecastPoint, SalesPoint, SalesTable, SegmentPoint};
    use crate::services::sales_preparation::prepare_sales;
    use assert_matches::assert_matches;
    use chrono::Days;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn series(days: &[u32]) -> SalesSeries {
        days.iter()
            .map(|d| SalesPoint {
                date: date(*d),
                qty: 1.0,
            })
            .collect()
    }

    /// Constant forecast of `value` for every requested day.
    fn flat(series: &SalesSeries, horizon: u32, value: f64) -> Vec<ForecastPoint> {
        let last = series.last_date().unwrap();
        (1..=u64::from(horizon))
            .map(|i| ForecastPoint {
                date: last + Days::new(i),
                value,
            })
            .collect()
    }

    #[test]
    fn short_series_never_reach_the_capability() {
        let mut mock = MockForecaster::new();
        mock.expect_fit_and_extrapolate().never();
        let forecaster = ItemForecaster::new(Arc::new(mock));

        let outcome = forecaster.forecast_item("bagel", &series(&[1, 2]), Horizon::default(), date(2));
        assert_eq!(outcome, ItemOutcome::InsufficientHistory { points: 2 });
    }

    #[test]
    fn capability_failures_are_reported_not_raised() {
        let mut mock = MockForecaster::new();
        mock.expect_fit_and_extrapolate()
            .times(1)
            .returning(|_, _| Err(ForecastError::Model("diverged".into())));
        let forecaster = ItemForecaster::new(Arc::new(mock));

        let outcome =
            forecaster.forecast_item("bagel", &series(&[1, 2, 3]), Horizon::default(), date(3));
        assert_matches!(outcome, ItemOutcome::Failed(ForecastError::Model(_)));
    }

    #[test]
    fn segment_is_cut_at_the_global_cutoff_and_rounded() {
        let mut mock = MockForecaster::new();
        mock.expect_fit_and_extrapolate()
            .withf(|_, horizon| *horizon == 3)
            .returning(|s, h| Ok(flat(s, h, 4.5)));
        let forecaster = ItemForecaster::new(Arc::new(mock));

        // Item history ends on the 3rd, but other items run to the 4th.
        let outcome =
            forecaster.forecast_item("bagel", &series(&[1, 2, 3]), Horizon::from_days(3), date(4));
        let ItemOutcome::Forecast(segment) = outcome else {
            panic!("expected a forecast, got {outcome:?}");
        };
        assert_eq!(
            segment.points(),
            &[
                SegmentPoint { date: date(5), qty: 4 },
                SegmentPoint { date: date(6), qty: 4 },
            ]
        );
    }

    #[test]
    fn one_failing_item_does_not_stop_the_others() {
        let csv = "date,item,qty\n\
                   2024-03-01,bagel,1\n2024-03-02,bagel,2\n2024-03-03,bagel,3\n\
                   2024-03-01,muffin,4\n2024-03-02,muffin,5\n2024-03-03,muffin,6\n\
                   2024-03-01,scone,1\n";
        let sales = prepare_sales(&SalesTable::from_csv(csv).unwrap()).unwrap();

        let mut mock = MockForecaster::new();
        mock.expect_fit_and_extrapolate()
            .times(2)
            .returning(|s, h| {
                if s.points()[0].qty == 1.0 {
                    Err(ForecastError::NumericalError("boom".into()))
                } else {
                    Ok(flat(s, h, 10.0))
                }
            });
        let segments = ItemForecaster::new(Arc::new(mock)).forecast_all(&sales, Horizon::default());

        assert_eq!(segments.keys().collect::<Vec<_>>(), vec!["muffin"]);
        assert_eq!(segments["muffin"].len(), 7);
    }

    #[test]
    fn empty_sales_produce_no_segments() {
        let mut mock = MockForecaster::new();
        mock.expect_fit_and_extrapolate().never();
        let segments = ItemForecaster::new(Arc::new(mock))
            .forecast_all(&PreparedSales::default(), Horizon::default());
        assert!(segments.is_empty());
    }
}
