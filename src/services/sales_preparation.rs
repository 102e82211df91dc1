//! Turns raw tabular sales data into typed per-item series.
//!
//! Column names are matched after trimming and lowercasing. The only fatal
//! condition is a table that lacks one of `date`, `item` or `qty`; rows with
//! an unreadable date, quantity or item are dropped one by one.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::errors::ServiceError;
use crate::models::{SalesPoint, SalesRecord, SalesSeries, SalesTable};

pub const DATE_COLUMN: &str = "date";
pub const ITEM_COLUMN: &str = "item";
pub const QTY_COLUMN: &str = "qty";

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Cleaned sales ready for forecasting.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreparedSales {
    records: Vec<SalesRecord>,
    items: Vec<String>,
    dropped_rows: usize,
}

impl PreparedSales {
    /// Every valid row, in input order.
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Distinct items in order of first appearance.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Last observed date across all items; forecasts start after it.
    pub fn cutoff(&self) -> Option<NaiveDate> {
        self.records.iter().map(|r| r.date).max()
    }

    pub fn series_for(&self, item: &str) -> SalesSeries {
        self.records
            .iter()
            .filter(|r| r.item == item)
            .map(|r| SalesPoint {
                date: r.date,
                qty: r.qty,
            })
            .collect()
    }
}

struct ColumnIndex {
    date: usize,
    item: usize,
    qty: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Option<Self> {
        let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |name: &str| normalized.iter().position(|h| h == name);
        Some(Self {
            date: find(DATE_COLUMN)?,
            item: find(ITEM_COLUMN)?,
            qty: find(QTY_COLUMN)?,
        })
    }
}

pub fn prepare_sales(table: &SalesTable) -> Result<PreparedSales, ServiceError> {
    let columns = ColumnIndex::resolve(&table.headers).ok_or_else(|| {
        warn!(headers = ?table.headers, "sales data is missing required columns");
        ServiceError::missing_columns()
    })?;

    let mut prepared = PreparedSales::default();
    for row in &table.rows {
        let field = |idx: usize| row.get(idx).map(String::as_str);
        let date = field(columns.date).and_then(parse_date);
        let qty = field(columns.qty).and_then(parse_qty);
        let item = field(columns.item).filter(|item| !item.is_empty());

        match (date, item, qty) {
            (Some(date), Some(item), Some(qty)) => {
                if !prepared.items.iter().any(|known| known == item) {
                    prepared.items.push(item.to_string());
                }
                prepared.records.push(SalesRecord::new(date, item, qty));
            }
            _ => prepared.dropped_rows += 1,
        }
    }

    if prepared.dropped_rows > 0 {
        debug!(
            dropped = prepared.dropped_rows,
            kept = prepared.records.len(),
            "dropped malformed sales rows"
        );
    }

    Ok(prepared)
}

/// Lenient date parsing; date-times are truncated to their date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Numeric quantity, or `None` for blanks, text, NaN and infinities.
pub fn parse_qty(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
