//! Domain models shared by the forecasting pipeline, the record stores and the
//! HTTP layer.

pub mod forecast;
pub mod recipe;
pub mod sales;

pub use forecast::{
    ForecastIndex, ForecastPoint, ForecastSegment, IngredientTotals, InventoryIndex, ItemSegments,
    ItemTotals, SegmentPoint,
};
pub use recipe::{IngredientAmount, Recipe};
pub use sales::{
    parse_sales_log, render_sales_log, SalesPoint, SalesRecord, SalesSeries, SalesTable,
    SALES_CSV_HEADER,
};
