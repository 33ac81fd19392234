//! Recipe entities and line-item validation.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ingredient::{Ingredient, IngredientId};
use crate::domain::user::UserId;
use crate::domain::Error;

/// Recipe identifier assigned by storage.
pub type RecipeId = i64;

/// A recipe owned by a single author.
///
/// ## Invariants
/// - `cooking_minutes >= 1`.
/// - `created_at` is set once at creation and never changes.
/// - A stored recipe always has at least one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub author: UserId,
    pub title: String,
    pub instructions: String,
    pub cooking_minutes: i32,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One (ingredient, quantity) entry as submitted by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub ingredient_id: IngredientId,
    pub quantity: i64,
}

/// A stored line item hydrated with its catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeLineItem {
    pub ingredient: Ingredient,
    pub quantity: i64,
}

/// A recipe together with its hydrated line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub line_items: Vec<RecipeLineItem>,
}

/// Fields for creating a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: String,
    pub instructions: String,
    pub cooking_minutes: i32,
    pub image: Option<String>,
    pub line_items: Vec<LineItem>,
}

/// Partial update. `line_items: Some(_)` replaces the whole list
/// all-or-nothing; `None` leaves the stored items untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub cooking_minutes: Option<i32>,
    pub image: Option<String>,
    pub line_items: Option<Vec<LineItem>>,
}

/// Check intrinsic line-item rules: non-empty list, distinct ingredients,
/// quantities of at least one. Catalog existence is checked separately because
/// it needs the repository.
pub fn validate_line_items(line_items: &[LineItem]) -> Result<(), Error> {
    if line_items.is_empty() {
        return Err(Error::validation("a recipe needs at least one ingredient"));
    }
    let mut seen = HashSet::with_capacity(line_items.len());
    for item in line_items {
        if !seen.insert(item.ingredient_id) {
            return Err(Error::DuplicateLineItem {
                ingredient_id: item.ingredient_id,
            });
        }
    }
    for item in line_items {
        if item.quantity < 1 {
            return Err(Error::InvalidQuantity {
                ingredient_id: item.ingredient_id,
                quantity: item.quantity,
            });
        }
    }
    Ok(())
}

/// Check the cooking duration floor.
pub fn validate_cooking_minutes(minutes: i32) -> Result<(), Error> {
    if minutes < 1 {
        return Err(Error::InvalidDuration {
            minutes: i64::from(minutes),
        });
    }
    Ok(())
}
