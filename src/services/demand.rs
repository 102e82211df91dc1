use crate::models::{ForecastIndex, ItemSegments, ItemTotals};

/// Forecast units keyed by date and item, plus per-item horizon totals
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemandAggregate {
    pub forecast: ForecastIndex,
    pub totals: ItemTotals,
}

/// Folds every item's segment into the date index and the item totals.
/// A repeated (date, item) pair overwrites the earlier value in the index.
/// Totals saturate at the `i64` bounds.
pub fn aggregate_demand(segments: &ItemSegments) -> DemandAggregate {
    let mut aggregate = DemandAggregate::default();

    for (item, segment) in segments {
        for point in segment.points() {
            aggregate
                .forecast
                .entry(point.date)
                .or_default()
                .insert(item.clone(), point.qty);
            let total = aggregate.totals.entry(item.clone()).or_insert(0);
            *total = total.saturating_add(point.qty);
        }
    }

    aggregate
}
