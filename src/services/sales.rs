use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::models::{parse_sales_log, SalesRecord};
use crate::repositories::SalesStore;

/// Result of recording a day's sales map
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DailyOutcome {
    Added(usize),
    /// Nothing new: every positive item was already recorded for the day.
    Duplicate,
}

/// Service for managing the sales log
#[derive(Clone)]
pub struct SalesService {
    store: Arc<dyn SalesStore>,
}

impl SalesService {
    pub fn new(store: Arc<dyn SalesStore>) -> Self {
        Self { store }
    }

    /// Raw log contents, header included.
    pub async fn raw_csv(&self) -> Result<String, ServiceError> {
        self.store.read_all().await
    }

    /// Parsed log. Lines that do not parse are left out.
    pub async fn list(&self) -> Result<Vec<SalesRecord>, ServiceError> {
        let content = self.store.read_all().await?;
        Ok(parse_sales_log(&content))
    }

    #[instrument(skip_all, fields(count = records.len()))]
    pub async fn add(&self, records: Vec<SalesRecord>) -> Result<usize, ServiceError> {
        for record in &records {
            validate_record(record)?;
        }
        self.store.append(&records).await?;
        info!(count = records.len(), "sales appended");
        Ok(records.len())
    }

    /// Records `sales` against today's local date.
    pub async fn add_daily(
        &self,
        sales: &BTreeMap<String, f64>,
    ) -> Result<DailyOutcome, ServiceError> {
        self.add_daily_on(chrono::Local::now().date_naive(), sales)
            .await
    }

    /// Appends one row per item with a positive quantity that has no entry
    /// for `date` yet.
    #[instrument(skip(self, sales), fields(items = sales.len()))]
    pub async fn add_daily_on(
        &self,
        date: NaiveDate,
        sales: &BTreeMap<String, f64>,
    ) -> Result<DailyOutcome, ServiceError> {
        let candidates: Vec<SalesRecord> = sales
            .iter()
            .filter(|(_, qty)| **qty > 0.0 && qty.is_finite())
            .map(|(item, qty)| SalesRecord::new(date, item.clone(), *qty))
            .collect();
        for record in &candidates {
            validate_record(record)?;
        }

        let added = self.store.append_missing(candidates).await?;
        if added.is_empty() {
            return Ok(DailyOutcome::Duplicate);
        }
        info!(added = added.len(), %date, "daily sales recorded");
        Ok(DailyOutcome::Added(added.len()))
    }

    /// Replaces the record with the same date and item.
    #[instrument(skip_all, fields(date = %record.date, item = %record.item))]
    pub async fn update(&self, record: SalesRecord) -> Result<SalesRecord, ServiceError> {
        validate_record(&record)?;
        self.store
            .modify(&mut |records: &mut Vec<SalesRecord>| {
                let slot = records
                    .iter_mut()
                    .find(|r| r.date == record.date && r.item == record.item)
                    .ok_or_else(|| ServiceError::NotFound("Sale not found".to_string()))?;
                *slot = record.clone();
                Ok(())
            })
            .await?;
        Ok(record)
    }

    /// Removes every record for `item` on `date`.
    #[instrument(skip(self))]
    pub async fn delete(&self, date: NaiveDate, item: &str) -> Result<usize, ServiceError> {
        let mut removed = 0;
        self.store
            .modify(&mut |records: &mut Vec<SalesRecord>| {
                let before = records.len();
                records.retain(|r| !(r.date == date && r.item == item));
                removed = before - records.len();
                if removed == 0 {
                    return Err(ServiceError::NotFound("Sale not found".to_string()));
                }
                Ok(())
            })
            .await?;
        Ok(removed)
    }
}

fn validate_record(record: &SalesRecord) -> Result<(), ServiceError> {
    if record.item.trim().is_empty() {
        return Err(ServiceError::ValidationError("item is required".to_string()));
    }
    if record.item.contains([',', '\n', '\r']) {
        return Err(ServiceError::ValidationError(format!(
            "item '{}' contains a reserved character",
            record.item.escape_debug()
        )));
    }
    if !record.qty.is_finite() {
        return Err(ServiceError::ValidationError("qty must be finite".to_string()));
    }
    Ok(())
}
