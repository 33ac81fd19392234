//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! Recipe writes touch two tables, so insert and update run inside a single
//! transaction. Line-item replacement is delete-all then bulk-insert, which
//! keeps the (recipe, ingredient) primary key authoritative.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{Page, RecipeListFilter, RecipeRepository, RepositoryError};
use crate::domain::{
    Ingredient, LineItem, Recipe, RecipeDetail, RecipeDraft, RecipeId, RecipeLineItem,
    RecipePatch, UserId,
};

use super::diesel_errors::{map_diesel_error, map_pool_error};
use super::models::{
    IngredientRow, NewRecipeIngredientRow, NewRecipeRow, RecipeChangeset, RecipeIngredientRow,
    RecipeRow,
};
use super::pool::DbPool;
use super::schema::{cart_items, favorites, ingredients, recipe_ingredients, recipes};

/// Diesel-backed implementation of the `RecipeRepository` port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_recipe(row: RecipeRow) -> Recipe {
    Recipe {
        id: row.id,
        author: UserId::from_uuid(row.author_id),
        title: row.title,
        instructions: row.instructions,
        cooking_minutes: row.cooking_minutes,
        image: row.image,
        created_at: row.created_at,
    }
}

fn rows_to_line_item(item: RecipeIngredientRow, ingredient: IngredientRow) -> RecipeLineItem {
    RecipeLineItem {
        ingredient: Ingredient {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        },
        quantity: item.quantity,
    }
}

fn line_item_rows(recipe_id: RecipeId, items: &[LineItem]) -> Vec<NewRecipeIngredientRow> {
    items
        .iter()
        .map(|item| NewRecipeIngredientRow {
            recipe_id,
            ingredient_id: item.ingredient_id,
            quantity: item.quantity,
        })
        .collect()
}

/// Load the hydrated line items of one recipe, ingredient-id ascending.
async fn load_line_items<C>(
    conn: &mut C,
    recipe_id: RecipeId,
) -> Result<Vec<RecipeLineItem>, diesel::result::Error>
where
    C: AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    let rows: Vec<(RecipeIngredientRow, IngredientRow)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq(recipe_id))
        .order_by(recipe_ingredients::ingredient_id.asc())
        .select((
            RecipeIngredientRow::as_select(),
            IngredientRow::as_select(),
        ))
        .load(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(item, ingredient)| rows_to_line_item(item, ingredient))
        .collect())
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn insert(
        &self,
        author: &UserId,
        draft: &RecipeDraft,
        created_at: DateTime<Utc>,
    ) -> Result<RecipeDetail, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let author_id = *author.as_uuid();
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let new_row = NewRecipeRow {
                    author_id,
                    title: &draft.title,
                    instructions: &draft.instructions,
                    cooking_minutes: draft.cooking_minutes,
                    image: draft.image.as_deref(),
                    created_at,
                };
                let recipe: RecipeRow = diesel::insert_into(recipes::table)
                    .values(&new_row)
                    .returning(RecipeRow::as_returning())
                    .get_result(conn)
                    .await?;

                diesel::insert_into(recipe_ingredients::table)
                    .values(&line_item_rows(recipe.id, &draft.line_items))
                    .execute(conn)
                    .await?;

                let line_items = load_line_items(conn, recipe.id).await?;
                Ok(RecipeDetail {
                    recipe: row_to_recipe(recipe),
                    line_items,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn update(
        &self,
        id: RecipeId,
        patch: &RecipePatch,
    ) -> Result<Option<RecipeDetail>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let changeset = RecipeChangeset {
                    title: patch.title.as_deref(),
                    instructions: patch.instructions.as_deref(),
                    cooking_minutes: patch.cooking_minutes,
                    image: patch.image.as_deref(),
                };
                if !changeset.is_empty() {
                    let updated = diesel::update(recipes::table.find(id))
                        .set(&changeset)
                        .execute(conn)
                        .await?;
                    if updated == 0 {
                        return Ok(None);
                    }
                }

                let Some(recipe) = recipes::table
                    .find(id)
                    .select(RecipeRow::as_select())
                    .first(conn)
                    .await
                    .optional()?
                else {
                    return Ok(None);
                };

                if let Some(items) = &patch.line_items {
                    diesel::delete(
                        recipe_ingredients::table
                            .filter(recipe_ingredients::recipe_id.eq(id)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::insert_into(recipe_ingredients::table)
                        .values(&line_item_rows(id, items))
                        .execute(conn)
                        .await?;
                }

                let line_items = load_line_items(conn, id).await?;
                Ok(Some(RecipeDetail {
                    recipe: row_to_recipe(recipe),
                    line_items,
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<RecipeDetail>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<RecipeRow> = recipes::table
            .find(id)
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let line_items = load_line_items(&mut conn, id)
            .await
            .map_err(map_diesel_error)?;
        Ok(Some(RecipeDetail {
            recipe: row_to_recipe(row),
            line_items,
        }))
    }

    async fn list(
        &self,
        page: Page,
        filter: RecipeListFilter,
    ) -> Result<Vec<RecipeDetail>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = recipes::table
            .select(RecipeRow::as_select())
            .order_by((recipes::created_at.desc(), recipes::id.desc()))
            .limit(page.limit)
            .offset(page.offset)
            .into_boxed();
        if let Some(author) = filter.author {
            query = query.filter(recipes::author_id.eq(*author.as_uuid()));
        }
        if let Some(user) = filter.favorited_by {
            query = query.filter(
                recipes::id.eq_any(
                    favorites::table
                        .filter(favorites::user_id.eq(*user.as_uuid()))
                        .select(favorites::recipe_id),
                ),
            );
        }
        if let Some(user) = filter.in_cart_of {
            query = query.filter(
                recipes::id.eq_any(
                    cart_items::table
                        .filter(cart_items::user_id.eq(*user.as_uuid()))
                        .select(cart_items::recipe_id),
                ),
            );
        }

        let rows: Vec<RecipeRow> = query
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // One query hydrates the whole window instead of a query per recipe.
        let ids: Vec<RecipeId> = rows.iter().map(|row| row.id).collect();
        let item_rows: Vec<(RecipeIngredientRow, IngredientRow)> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(recipe_ingredients::recipe_id.eq_any(&ids))
            .order_by(recipe_ingredients::ingredient_id.asc())
            .select((
                RecipeIngredientRow::as_select(),
                IngredientRow::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut by_recipe: HashMap<RecipeId, Vec<RecipeLineItem>> = HashMap::new();
        for (item, ingredient) in item_rows {
            by_recipe
                .entry(item.recipe_id)
                .or_default()
                .push(rows_to_line_item(item, ingredient));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let line_items = by_recipe.remove(&row.id).unwrap_or_default();
                RecipeDetail {
                    recipe: row_to_recipe(row),
                    line_items,
                }
            })
            .collect())
    }

    async fn list_by_author(&self, author: &UserId) -> Result<Vec<Recipe>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<RecipeRow> = recipes::table
            .filter(recipes::author_id.eq(author.as_uuid()))
            .select(RecipeRow::as_select())
            .order_by((recipes::created_at.desc(), recipes::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_recipe).collect())
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Line items and relation rows cascade via foreign keys.
        let deleted = diesel::delete(recipes::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn exists(&self, id: RecipeId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(recipes::table.find(id)))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
