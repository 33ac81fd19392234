//! PostgreSQL-backed `ShoppingListQuery` implementation using Diesel ORM.
//!
//! Flat join queries over the cart tables; grouping and rendering happen in
//! the domain.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::UserId;
use crate::domain::ports::{RepositoryError, ShoppingListQuery};
use crate::domain::shopping_list::{CartLine, CartRecipe};

use super::diesel_errors::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::schema::{cart_items, ingredients, recipe_ingredients, recipes, users};

/// Diesel-backed implementation of the `ShoppingListQuery` port.
#[derive(Clone)]
pub struct DieselShoppingListQuery {
    pool: DbPool,
}

impl DieselShoppingListQuery {
    /// Create a new query adapter with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShoppingListQuery for DieselShoppingListQuery {
    async fn cart_lines(&self, user: &UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(String, String, i64)> = cart_items::table
            .inner_join(
                recipes::table
                    .inner_join(recipe_ingredients::table.inner_join(ingredients::table)),
            )
            .filter(cart_items::user_id.eq(user.as_uuid()))
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                recipe_ingredients::quantity,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(ingredient_name, measurement_unit, quantity)| CartLine {
                ingredient_name,
                measurement_unit,
                quantity,
            })
            .collect())
    }

    async fn cart_recipes(&self, user: &UserId) -> Result<Vec<CartRecipe>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(String, String, String, String)> = cart_items::table
            .inner_join(recipes::table.inner_join(users::table))
            .filter(cart_items::user_id.eq(user.as_uuid()))
            .select((
                recipes::title,
                users::first_name,
                users::last_name,
                users::username,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(
                |(title, author_first_name, author_last_name, author_username)| CartRecipe {
                    title,
                    author_first_name,
                    author_last_name,
                    author_username,
                },
            )
            .collect())
    }
}
