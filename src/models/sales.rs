use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// Header line written at the top of every sales log.
pub const SALES_CSV_HEADER: &str = "date,item,qty";

/// One row of the sales log: how many units of `item` sold on `date`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalesRecord {
    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub date: NaiveDate,
    #[schema(example = "bagel")]
    pub item: String,
    #[schema(example = 12)]
    pub qty: f64,
}

impl SalesRecord {
    pub fn new(date: NaiveDate, item: impl Into<String>, qty: f64) -> Self {
        Self {
            date,
            item: item.into(),
            qty,
        }
    }

    /// Reads one log row. Returns `None` unless it has exactly a date, a
    /// non-empty item and a finite quantity.
    pub fn from_csv_record(record: &csv::StringRecord) -> Option<Self> {
        if record.len() != 3 {
            return None;
        }
        let date = NaiveDate::parse_from_str(record.get(0)?.trim(), "%Y-%m-%d").ok()?;
        let item = record.get(1)?.to_string();
        let qty = record.get(2)?.trim().parse::<f64>().ok()?;
        if item.is_empty() || !qty.is_finite() {
            return None;
        }
        Some(Self { date, item, qty })
    }
}

/// Parses a sales log blob. The header and any row that does not read as a
/// record are skipped; quoting follows standard CSV rules.
pub fn parse_sales_log(content: &str) -> Vec<SalesRecord> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes())
        .records()
        .filter_map(Result::ok)
        .filter_map(|record| SalesRecord::from_csv_record(&record))
        .collect()
}

/// Renders records as newline-terminated CSV rows, quoting fields that need it.
pub fn render_sales_log(
    records: &[SalesRecord],
    with_header: bool,
) -> Result<String, ServiceError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    if with_header {
        writer.write_record(SALES_CSV_HEADER.split(','))?;
    }
    for record in records {
        let date = record.date.format("%Y-%m-%d").to_string();
        let qty = record.qty.to_string();
        writer.write_record([date.as_str(), record.item.as_str(), qty.as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ServiceError::SerializationError(format!("failed to flush sales CSV: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| ServiceError::SerializationError(format!("sales CSV is not UTF-8: {e}")))
}

/// Raw, untyped tabular sales data as it arrives from the store or a request.
///
/// Headers are kept exactly as written; normalisation happens during
/// preparation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SalesTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SalesTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Reads a CSV blob. Rows the CSV reader rejects are skipped rather than
    /// failing the whole table.
    pub fn from_csv(blob: &str) -> Result<Self, ServiceError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(blob.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| ServiceError::SerializationError(format!("unreadable CSV header: {e}")))?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let rows = reader
            .records()
            .filter_map(Result::ok)
            .map(|record| record.iter().map(str::to_string).collect())
            .collect();

        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A single typed observation in an item's history.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SalesPoint {
    pub date: NaiveDate,
    pub qty: f64,
}

/// Cleaned, typed history for one item. Points keep their input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SalesSeries {
    points: Vec<SalesPoint>,
}

impl SalesSeries {
    pub fn new(points: Vec<SalesPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[SalesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.iter().map(|p| p.date).min()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.iter().map(|p| p.date).max()
    }
}

impl FromIterator<SalesPoint> for SalesSeries {
    fn from_iter<I: IntoIterator<Item = SalesPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn whole_quantities_render_without_decimals() {
        let records = [SalesRecord::new(date(2024, 3, 1), "bagel", 12.0)];
        assert_eq!(
            render_sales_log(&records, true).unwrap(),
            "date,item,qty\n2024-03-01,bagel,12\n"
        );
        assert_eq!(parse_sales_log("date,item,qty\n2024-03-01,bagel,12\n"), records);
    }

    #[test]
    fn awkward_items_are_quoted_and_read_back() {
        let records = vec![
            SalesRecord::new(date(2024, 3, 1), "\"bagel", 1.0),
            SalesRecord::new(date(2024, 3, 1), "bagel, large", 2.0),
            SalesRecord::new(date(2024, 3, 2), "muffin", 3.0),
        ];
        let log = render_sales_log(&records, false).unwrap();
        assert_eq!(
            log,
            "2024-03-01,\"\"\"bagel\",1\n2024-03-01,\"bagel, large\",2\n2024-03-02,muffin,3\n"
        );
        assert_eq!(parse_sales_log(&log), records);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let log = "date,item,qty\n2024-03-01,bagel\n2024-03-01,,4\n2024-03-01,bagel,four\n\
                   2024-03-01,bagel,1,extra\n2024-03-02,muffin,2\n";
        assert_eq!(
            parse_sales_log(log),
            vec![SalesRecord::new(date(2024, 3, 2), "muffin", 2.0)]
        );
    }

    #[test]
    fn table_keeps_raw_headers_and_ragged_rows() {
        let table = SalesTable::from_csv(" Date ,ITEM,Qty\n2024-03-01,bagel,3\n2024-03-02,muffin\n")
            .unwrap();
        assert_eq!(table.headers, vec![" Date ", "ITEM", "Qty"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1], vec!["2024-03-02", "muffin"]);
    }

    #[test]
    fn empty_blob_yields_an_empty_table() {
        let table = SalesTable::from_csv("").unwrap();
        assert!(table.headers.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn series_reports_date_bounds_regardless_of_order() {
        let series: SalesSeries = vec![
            SalesPoint { date: date(2024, 3, 5), qty: 1.0 },
            SalesPoint { date: date(2024, 3, 1), qty: 2.0 },
            SalesPoint { date: date(2024, 3, 3), qty: 3.0 },
        ]
        .into_iter()
        .collect();
        assert_eq!(series.first_date(), Some(date(2024, 3, 1)));
        assert_eq!(series.last_date(), Some(date(2024, 3, 5)));
    }
}
