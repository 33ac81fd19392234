//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{ingredients, recipe_ingredients, recipes, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub avatar: Option<&'a str>,
}

/// Row struct for reading from the ingredients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

/// Insertable struct for catalog imports. The id column is sequence-assigned.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ingredients)]
pub(crate) struct NewIngredientRow<'a> {
    pub name: &'a str,
    pub measurement_unit: &'a str,
}

/// Row struct for reading from the recipes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub author_id: Uuid,
    pub title: String,
    pub instructions: String,
    pub cooking_minutes: i32,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating recipe records. The id column is
/// sequence-assigned and read back via `RETURNING`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub author_id: Uuid,
    pub title: &'a str,
    pub instructions: &'a str,
    pub cooking_minutes: i32,
    pub image: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Changeset struct for recipe patches. `None` fields are skipped, so a
/// title-only patch updates a single column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
pub(crate) struct RecipeChangeset<'a> {
    pub title: Option<&'a str>,
    pub instructions: Option<&'a str>,
    pub cooking_minutes: Option<i32>,
    pub image: Option<&'a str>,
}

impl RecipeChangeset<'_> {
    /// Whether any column would be written. Diesel rejects empty changesets.
    pub(crate) fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.instructions.is_none()
            && self.cooking_minutes.is_none()
            && self.image.is_none()
    }
}

/// Row struct for reading from the recipe_ingredients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipe_ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeIngredientRow {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub quantity: i64,
}

/// Insertable struct for line-item rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_ingredients)]
pub(crate) struct NewRecipeIngredientRow {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub quantity: i64,
}
