use std::sync::Arc;

use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::models::Recipe;
use crate::repositories::RecipeStore;

/// Service for managing recipes
#[derive(Clone)]
pub struct RecipeService {
    store: Arc<dyn RecipeStore>,
}

impl RecipeService {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Recipe>, ServiceError> {
        self.store.read_all().await
    }

    /// Adds a recipe. Item names are unique ignoring case.
    #[instrument(skip_all, fields(item = %recipe.item))]
    pub async fn add(&self, recipe: Recipe) -> Result<Recipe, ServiceError> {
        if recipe.item.trim().is_empty() {
            return Err(ServiceError::BadRequest("Invalid recipe format".to_string()));
        }

        let wanted = recipe.item.to_lowercase();
        let recipes = self.store.read_all().await?;
        if recipes.iter().any(|r| r.item.to_lowercase() == wanted) {
            return Err(ServiceError::Conflict("Recipe already exists".to_string()));
        }

        self.store.append(recipe.clone()).await?;
        info!(ingredients = recipe.ingredients.len(), "recipe added");
        Ok(recipe)
    }

    #[instrument(skip_all, fields(item = %recipe.item))]
    pub async fn update(&self, recipe: Recipe) -> Result<Recipe, ServiceError> {
        let mut recipes = self.store.read_all().await?;
        let slot = recipes
            .iter_mut()
            .find(|r| r.item == recipe.item)
            .ok_or_else(|| ServiceError::NotFound("Recipe not found".to_string()))?;
        *slot = recipe.clone();
        self.store.replace(recipes).await?;
        Ok(recipe)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, item: &str) -> Result<(), ServiceError> {
        if item.is_empty() {
            return Err(ServiceError::BadRequest("Item is required".to_string()));
        }
        let recipes = self.store.read_all().await?;
        let before = recipes.len();
        let kept: Vec<Recipe> = recipes.into_iter().filter(|r| r.item != item).collect();
        if kept.len() == before {
            return Err(ServiceError::NotFound("Item not found".to_string()));
        }
        self.store.replace(kept).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryRecipeStore;
    use assert_matches::assert_matches;

    fn service() -> RecipeService {
        RecipeService::new(Arc::new(InMemoryRecipeStore::new(vec![Recipe::new(
            "Bagel",
            [("flour", 0.2)],
        )])))
    }

    #[tokio::test]
    async fn add_rejects_blank_item() {
        let result = service().add(Recipe::new("  ", [("flour", 1.0)])).await;
        assert_matches!(result, Err(ServiceError::BadRequest(msg)) if msg == "Invalid recipe format");
    }

    #[tokio::test]
    async fn add_rejects_duplicates_ignoring_case() {
        let result = service().add(Recipe::new("bagel", [("flour", 1.0)])).await;
        assert_matches!(result, Err(ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn add_then_list() {
        let svc = service();
        svc.add(Recipe::new("muffin", [("sugar", 0.05)])).await.unwrap();
        let items: Vec<_> = svc.list().await.unwrap().into_iter().map(|r| r.item).collect();
        assert_eq!(items, vec!["Bagel", "muffin"]);
    }

    #[tokio::test]
    async fn update_matches_item_exactly() {
        let svc = service();
        assert_matches!(
            svc.update(Recipe::new("bagel", [("flour", 0.3)])).await,
            Err(ServiceError::NotFound(_))
        );
        svc.update(Recipe::new("Bagel", [("flour", 0.3)])).await.unwrap();
        let recipes = svc.list().await.unwrap();
        assert_eq!(recipes[0].ingredients["flour"].multiplier(), Some(0.3));
    }

    #[tokio::test]
    async fn delete_missing_item_is_not_found() {
        let svc = service();
        assert_matches!(svc.delete("scone").await, Err(ServiceError::NotFound(_)));
        svc.delete("Bagel").await.unwrap();
        assert!(svc.list().await.unwrap().is_empty());
    }
}
