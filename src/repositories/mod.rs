//! Record stores behind the forecasting pipeline.
//!
//! Both stores are opened for the duration of a single call and released
//! afterwards; nothing holds a file handle between requests. The pipeline only
//! reads from them.

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::models::{Recipe, SalesRecord};

pub mod recipe_store;
pub mod sales_store;

pub use recipe_store::{FileRecipeStore, InMemoryRecipeStore};
pub use sales_store::{FileSalesStore, InMemorySalesStore};

/// In-place edit of the parsed sales log. Returning an error leaves the log untouched.
pub type SalesEdit<'a> = dyn FnMut(&mut Vec<SalesRecord>) -> Result<(), ServiceError> + Send + 'a;

/// Append-only log of sales rows, exposed as a CSV blob.
///
/// Every mutation runs under the store's own lock, so edits and appends from
/// concurrent requests never interleave.
#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Full current log, header included.
    async fn read_all(&self) -> Result<String, ServiceError>;

    async fn append(&self, records: &[SalesRecord]) -> Result<(), ServiceError>;

    /// Appends the records whose (date, item) pair is not in the log yet and
    /// returns them.
    async fn append_missing(
        &self,
        records: Vec<SalesRecord>,
    ) -> Result<Vec<SalesRecord>, ServiceError>;

    /// Parses the log, applies `edit` and writes the result back. Rows that
    /// do not parse are not carried over.
    async fn modify(&self, edit: &mut SalesEdit<'_>) -> Result<(), ServiceError>;
}

/// Records from `candidates` with no (date, item) match in `existing`.
pub(crate) fn missing_records(
    existing: &[SalesRecord],
    candidates: Vec<SalesRecord>,
) -> Vec<SalesRecord> {
    candidates
        .into_iter()
        .filter(|c| !existing.iter().any(|r| r.date == c.date && r.item == c.item))
        .collect()
}

/// Collection of recipes
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn read_all(&self) -> Result<Vec<Recipe>, ServiceError>;

    async fn append(&self, recipe: Recipe) -> Result<(), ServiceError>;

    async fn replace(&self, recipes: Vec<Recipe>) -> Result<(), ServiceError>;
}
