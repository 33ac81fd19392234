//! Port abstraction for recipe persistence adapters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::recipe::{Recipe, RecipeDetail, RecipeDraft, RecipeId, RecipePatch};
use crate::domain::user::UserId;

use super::RepositoryError;

/// Limit/offset window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
        }
    }
}

/// Optional narrowing filters for the recipe listing. `None` fields leave the
/// listing unrestricted; the relation filters name the user whose favorites
/// or cart the result is narrowed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeListFilter {
    pub author: Option<UserId>,
    pub favorited_by: Option<UserId>,
    pub in_cart_of: Option<UserId>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a recipe with its line items in one transaction and return the
    /// hydrated result. The draft is assumed validated.
    async fn insert(
        &self,
        author: &UserId,
        draft: &RecipeDraft,
        created_at: DateTime<Utc>,
    ) -> Result<RecipeDetail, RepositoryError>;

    /// Apply a patch. When the patch carries line items, the stored list is
    /// replaced wholesale (delete-all then bulk-insert) in one transaction;
    /// otherwise line items are untouched. `None` when the recipe is missing.
    async fn update(
        &self,
        id: RecipeId,
        patch: &RecipePatch,
    ) -> Result<Option<RecipeDetail>, RepositoryError>;

    /// Fetch one recipe with hydrated line items.
    async fn find_by_id(&self, id: RecipeId) -> Result<Option<RecipeDetail>, RepositoryError>;

    /// Newest-first window over all recipes matching the filter.
    async fn list(
        &self,
        page: Page,
        filter: RecipeListFilter,
    ) -> Result<Vec<RecipeDetail>, RepositoryError>;

    /// All recipes owned by the given author, newest first, without line
    /// items. Used by the subscriptions listing.
    async fn list_by_author(&self, author: &UserId) -> Result<Vec<Recipe>, RepositoryError>;

    /// Delete a recipe; relation rows and line items cascade. Returns `false`
    /// when nothing was deleted.
    async fn delete(&self, id: RecipeId) -> Result<bool, RepositoryError>;

    /// Cheap existence probe for relation targets and short-link resolution.
    async fn exists(&self, id: RecipeId) -> Result<bool, RepositoryError>;
}
