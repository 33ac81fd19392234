//! Ingredient catalog entities.

use serde::{Deserialize, Serialize};

/// Catalog identifier assigned by storage.
pub type IngredientId = i64;

/// A purchasable item: name plus measurement unit.
///
/// Names are deliberately not unique; the catalog mirrors whatever reference
/// file it was imported from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

/// Catalog entry before storage assigns an identifier. Matches the shape of
/// the bulk-import file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}
