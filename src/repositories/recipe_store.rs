use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{
    fs,
    sync::{Mutex, RwLock},
};
use tracing::instrument;

use super::RecipeStore;
use crate::errors::ServiceError;
use crate::models::Recipe;

/// Recipes kept as a pretty-printed JSON array on disk
#[derive(Debug)]
pub struct FileRecipeStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileRecipeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<Recipe>, ServiceError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ServiceError::StoreError(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            ServiceError::SerializationError(format!(
                "invalid recipe file {}: {e}",
                self.path.display()
            ))
        })
    }

    async fn save(&self, recipes: &[Recipe]) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(recipes)?;
        fs::write(&self.path, json).await.map_err(|e| {
            ServiceError::StoreError(format!("failed to write {}: {e}", self.path.display()))
        })
    }
}

#[async_trait]
impl RecipeStore for FileRecipeStore {
    async fn read_all(&self) -> Result<Vec<Recipe>, ServiceError> {
        self.load().await
    }

    #[instrument(skip_all, fields(path = %self.path.display(), item = %recipe.item))]
    async fn append(&self, recipe: Recipe) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut recipes = self.load().await?;
        recipes.push(recipe);
        self.save(&recipes).await
    }

    #[instrument(skip_all, fields(path = %self.path.display(), count = recipes.len()))]
    async fn replace(&self, recipes: Vec<Recipe>) -> Result<(), ServiceError> {
        let _guard = self.write_lock.lock().await;
        self.save(&recipes).await
    }
}

/// Recipes held in memory
#[derive(Debug, Default)]
pub struct InMemoryRecipeStore {
    recipes: RwLock<Vec<Recipe>>,
}

impl InMemoryRecipeStore {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: RwLock::new(recipes),
        }
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn read_all(&self) -> Result<Vec<Recipe>, ServiceError> {
        Ok(self.recipes.read().await.clone())
    }

    async fn append(&self, recipe: Recipe) -> Result<(), ServiceError> {
        self.recipes.write().await.push(recipe);
        Ok(())
    }

    async fn replace(&self, recipes: Vec<Recipe>) -> Result<(), ServiceError> {
        *self.recipes.write().await = recipes;
        Ok(())
    }
}
