use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One extrapolated value produced by a forecasting capability.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A rounded prediction on a single day after the cutoff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentPoint {
    pub date: NaiveDate,
    pub qty: i64,
}

/// The part of one item's forecast lying strictly after the cutoff date.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastSegment {
    points: Vec<SegmentPoint>,
}

impl ForecastSegment {
    /// Keeps the points dated strictly after `cutoff` and rounds them half to even.
    pub fn after_cutoff(points: &[ForecastPoint], cutoff: NaiveDate) -> Self {
        Self {
            points: points
                .iter()
                .filter(|p| p.date > cutoff)
                .map(|p| SegmentPoint {
                    date: p.date,
                    qty: p.value.round_ties_even() as i64,
                })
                .collect(),
        }
    }

    pub fn points(&self) -> &[SegmentPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<SegmentPoint> for ForecastSegment {
    fn from_iter<I: IntoIterator<Item = SegmentPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// item -> that item's forecast segment.
pub type ItemSegments = BTreeMap<String, ForecastSegment>;

/// date -> item -> predicted units.
pub type ForecastIndex = BTreeMap<NaiveDate, BTreeMap<String, i64>>;

/// item -> predicted units over the whole horizon.
pub type ItemTotals = BTreeMap<String, i64>;

/// date -> ingredient -> required amount.
pub type InventoryIndex = BTreeMap<NaiveDate, BTreeMap<String, f64>>;

/// ingredient -> required amount over the whole horizon.
pub type IngredientTotals = BTreeMap<String, f64>;
