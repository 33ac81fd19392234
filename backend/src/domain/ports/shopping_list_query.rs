//! Port abstraction for shopping-list read queries.
//!
//! These are explicit join queries over the cart, not reverse-relation
//! traversal: the adapter selects flat rows and the domain does the grouping.

use async_trait::async_trait;

use crate::domain::shopping_list::{CartLine, CartRecipe};
use crate::domain::user::UserId;

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListQuery: Send + Sync {
    /// Every line item of every recipe in the user's cart, one row per
    /// (recipe, ingredient).
    async fn cart_lines(&self, user: &UserId) -> Result<Vec<CartLine>, RepositoryError>;

    /// The distinct recipes in the user's cart with author details.
    async fn cart_recipes(&self, user: &UserId) -> Result<Vec<CartRecipe>, RepositoryError>;
}
