//! Driven ports: repository traits the domain services depend on.
//!
//! Adapters (Diesel, in-memory) implement these traits. Services translate
//! [`RepositoryError`] into domain [`crate::domain::Error`] values.

mod ingredient_repository;
mod recipe_repository;
mod relation_repository;
mod shopping_list_query;
mod user_repository;

pub use self::ingredient_repository::IngredientRepository;
pub use self::recipe_repository::{Page, RecipeListFilter, RecipeRepository};
pub use self::relation_repository::RelationRepository;
pub use self::shopping_list_query::ShoppingListQuery;
pub use self::user_repository::UserRepository;

#[cfg(test)]
pub use self::ingredient_repository::MockIngredientRepository;
#[cfg(test)]
pub use self::recipe_repository::MockRecipeRepository;
#[cfg(test)]
pub use self::relation_repository::MockRelationRepository;
#[cfg(test)]
pub use self::shopping_list_query::MockShoppingListQuery;
#[cfg(test)]
pub use self::user_repository::MockUserRepository;

/// Persistence failures raised by repository adapters.
///
/// `UniqueViolation` exists so services can turn storage-level uniqueness
/// rejections into precise domain errors instead of opaque query failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// Repository connection could not be established.
    #[error("repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("repository query failed: {message}")]
    Query { message: String },
    /// A storage-level uniqueness constraint rejected the mutation.
    #[error("unique constraint violated: {message}")]
    UniqueViolation { message: String },
}

impl RepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a uniqueness violation with the given message.
    pub fn unique_violation(message: impl Into<String>) -> Self {
        Self::UniqueViolation {
            message: message.into(),
        }
    }
}

/// Shared mapping from repository failures to domain errors, used by every
/// service for the cases that carry no extra meaning.
pub(crate) fn map_repository_error(error: RepositoryError) -> crate::domain::Error {
    match error {
        RepositoryError::Connection { message } => {
            crate::domain::Error::unavailable(format!("storage unavailable: {message}"))
        }
        RepositoryError::Query { message } => {
            crate::domain::Error::internal(format!("storage error: {message}"))
        }
        RepositoryError::UniqueViolation { message } => {
            crate::domain::Error::conflict(message)
        }
    }
}
