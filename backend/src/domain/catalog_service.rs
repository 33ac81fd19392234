//! Ingredient catalog use-cases: search and bulk import.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::ingredient::{Ingredient, IngredientId, NewIngredient};
use crate::domain::ports::{map_repository_error, IngredientRepository};
use crate::domain::Error;

/// Read-mostly catalog service.
#[derive(Clone)]
pub struct CatalogService {
    ingredients: Arc<dyn IngredientRepository>,
}

impl CatalogService {
    /// Create a new service with the given repository.
    pub fn new(ingredients: Arc<dyn IngredientRepository>) -> Self {
        Self { ingredients }
    }

    /// Case-insensitive starts-with search. A blank prefix returns the full
    /// catalog, name-ascending either way.
    pub async fn search(&self, prefix: Option<&str>) -> Result<Vec<Ingredient>, Error> {
        let prefix = prefix.map(str::trim).filter(|p| !p.is_empty());
        self.ingredients
            .search(prefix)
            .await
            .map_err(map_repository_error)
    }

    /// Fetch one catalog entry.
    pub async fn get(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.ingredients
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or(Error::IngredientNotFound { id })
    }

    /// Import catalog entries from a JSON file of `{name, measurement_unit}`
    /// objects, the external catalog format. Returns the inserted count.
    pub async fn import_file(&self, path: &Path) -> Result<u64, Error> {
        let raw = std::fs::read_to_string(path).map_err(|error| {
            Error::internal(format!("cannot read catalog file {}: {error}", path.display()))
        })?;
        let entries: Vec<NewIngredient> = serde_json::from_str(&raw).map_err(|error| {
            Error::internal(format!("malformed catalog file {}: {error}", path.display()))
        })?;
        let inserted = self
            .ingredients
            .import(&entries)
            .await
            .map_err(map_repository_error)?;
        info!(path = %path.display(), inserted, "ingredient catalog imported");
        Ok(inserted)
    }
}
