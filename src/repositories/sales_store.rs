use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{
    fs,
    io::AsyncWriteExt,
    sync::{Mutex, RwLock},
};
use tracing::{debug, instrument};

use super::{missing_records, SalesEdit, SalesStore};
use crate::errors::ServiceError;
use crate::models::{parse_sales_log, render_sales_log, SalesRecord, SALES_CSV_HEADER};

/// Sales log kept in a CSV file on disk
#[derive(Debug)]
pub struct FileSalesStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSalesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_existing(&self) -> Result<Option<String>, ServiceError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ServiceError::StoreError(format!(
                "failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn write(&self, content: &str) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, content).await.map_err(|e| {
            ServiceError::StoreError(format!("failed to write {}: {e}", self.path.display()))
        })
    }

    /// Appends `records`, creating the log first if needed. Callers hold
    /// `write_lock`.
    async fn append_locked(&self, records: &[SalesRecord]) -> Result<(), ServiceError> {
        let existing = match self.read_existing().await? {
            Some(content) => content,
            None => {
                debug!("sales log missing; creating it");
                let header = format!("{SALES_CSV_HEADER}\n");
                self.write(&header).await?;
                header
            }
        };
        if records.is_empty() {
            return Ok(());
        }

        let mut chunk = String::new();
        if !existing.is_empty() && !existing.ends_with('\n') {
            chunk.push('\n');
        }
        chunk.push_str(&render_sales_log(records, false)?);

        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(chunk.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn read_records(&self) -> Result<Vec<SalesRecord>, ServiceError> {
        Ok(self
            .read_existing()
            .await?
            .map(|content| parse_sales_log(&content))
            .unwrap_or_default())
    }
}

#[async_trait]
impl SalesStore for FileSalesStore {
    async fn read_all(&self) -> Result<String, ServiceError> {
        Ok(self
            .read_existing()
            .await?
            .unwrap_or_else(|| format!("{SALES_CSV_HEADER}\n")))
    }

    #[instrument(skip_all, fields(path = %self.path.display(), count = records.len()))]
    async fn append(&self, records: &[SalesRecord]) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;
        self.append_locked(records).await
    }

    #[instrument(skip_all, fields(path = %self.path.display(), candidates = records.len()))]
    async fn append_missing(
        &self,
        records: Vec<SalesRecord>,
    ) -> Result<Vec<SalesRecord>, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let fresh = missing_records(&self.read_records().await?, records);
        if !fresh.is_empty() {
            self.append_locked(&fresh).await?;
        }
        Ok(fresh)
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    async fn modify(&self, edit: &mut SalesEdit<'_>) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_records().await?;
        edit(&mut records)?;
        self.write(&render_sales_log(&records, true)?).await
    }
}

/// Sales log held in memory
#[derive(Debug)]
pub struct InMemorySalesStore {
    content: RwLock<String>,
}

impl Default for InMemorySalesStore {
    fn default() -> Self {
        Self::new(format!("{SALES_CSV_HEADER}\n"))
    }
}

impl InMemorySalesStore {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: RwLock::new(content.into()),
        }
    }
}

#[async_trait]
impl SalesStore for InMemorySalesStore {
    async fn read_all(&self) -> Result<String, ServiceError> {
        Ok(self.content.read().await.clone())
    }

    async fn append(&self, records: &[SalesRecord]) -> Result<(), ServiceError> {
        let mut content = self.content.write().await;
        push_rows(&mut content, records)
    }

    async fn append_missing(
        &self,
        records: Vec<SalesRecord>,
    ) -> Result<Vec<SalesRecord>, ServiceError> {
        let mut content = self.content.write().await;
        let fresh = missing_records(&parse_sales_log(&content), records);
        push_rows(&mut content, &fresh)?;
        Ok(fresh)
    }

    async fn modify(&self, edit: &mut SalesEdit<'_>) -> Result<(), ServiceError> {
        let mut content = self.content.write().await;
        let mut records = parse_sales_log(&content);
        edit(&mut records)?;
        *content = render_sales_log(&records, true)?;
        Ok(())
    }
}

fn push_rows(content: &mut String, records: &[SalesRecord]) -> Result<(), ServiceError> {
    if records.is_empty() {
        return Ok(());
    }
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(&render_sales_log(records, false)?);
    Ok(())
}
