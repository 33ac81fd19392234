//! Port abstraction for the ingredient catalog.

use async_trait::async_trait;

use crate::domain::ingredient::{Ingredient, IngredientId, NewIngredient};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Case-insensitive starts-with search, name-ascending. `None` returns
    /// the whole catalog in the same order.
    async fn search<'a>(&self, prefix: Option<&'a str>)
        -> Result<Vec<Ingredient>, RepositoryError>;

    /// Fetch a catalog entry by identifier.
    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, RepositoryError>;

    /// Which of the given identifiers exist in the catalog. Used for the bulk
    /// existence check during recipe validation.
    async fn existing_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, RepositoryError>;

    /// Bulk-import catalog entries. Returns the number of rows inserted.
    async fn import(&self, entries: &[NewIngredient]) -> Result<u64, RepositoryError>;
}
