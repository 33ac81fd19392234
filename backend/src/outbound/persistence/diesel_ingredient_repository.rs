//! PostgreSQL-backed `IngredientRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{IngredientRepository, RepositoryError};
use crate::domain::{Ingredient, IngredientId, NewIngredient};

use super::diesel_errors::{escape_like, map_diesel_error, map_pool_error};
use super::models::{IngredientRow, NewIngredientRow};
use super::pool::DbPool;
use super::schema::ingredients;

/// Diesel-backed implementation of the `IngredientRepository` port.
#[derive(Clone)]
pub struct DieselIngredientRepository {
    pool: DbPool,
}

impl DieselIngredientRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_ingredient(row: IngredientRow) -> Ingredient {
    Ingredient {
        id: row.id,
        name: row.name,
        measurement_unit: row.measurement_unit,
    }
}

#[async_trait]
impl IngredientRepository for DieselIngredientRepository {
    async fn search<'a>(
        &self,
        prefix: Option<&'a str>,
    ) -> Result<Vec<Ingredient>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = ingredients::table
            .select(IngredientRow::as_select())
            .into_boxed();
        if let Some(prefix) = prefix {
            let pattern = format!("{}%", escape_like(prefix));
            query = query.filter(ingredients::name.ilike(pattern));
        }

        let rows: Vec<IngredientRow> = query
            .order_by((ingredients::name.asc(), ingredients::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_ingredient).collect())
    }

    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<IngredientRow> = ingredients::table
            .find(id)
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_ingredient))
    }

    async fn existing_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        ingredients::table
            .filter(ingredients::id.eq_any(ids))
            .select(ingredients::id)
            .order_by(ingredients::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn import(&self, entries: &[NewIngredient]) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<NewIngredientRow<'_>> = entries
            .iter()
            .map(|entry| NewIngredientRow {
                name: &entry.name,
                measurement_unit: &entry.measurement_unit,
            })
            .collect();

        let inserted = diesel::insert_into(ingredients::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(inserted as u64)
    }
}
