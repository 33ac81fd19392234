//! Domain entities, validated newtypes, and use-case services.
//!
//! Everything here is transport and storage agnostic. HTTP concerns live in
//! `inbound::http`; persistence lives in `outbound`. Services depend on the
//! async port traits in [`ports`] and return the shared [`Error`] type.

pub mod error;
pub mod ingredient;
pub mod ports;
pub mod recipe;
pub mod relation;
pub mod shopping_list;
pub mod short_link;
pub mod user;

mod catalog_service;
mod recipe_service;
mod relation_service;
mod shopping_list_service;
mod user_service;

pub use self::catalog_service::CatalogService;
pub use self::error::Error;
pub use self::ingredient::{Ingredient, IngredientId, NewIngredient};
pub use self::recipe::{
    LineItem, Recipe, RecipeDetail, RecipeDraft, RecipeId, RecipeLineItem, RecipePatch,
};
pub use self::recipe_service::RecipeService;
pub use self::relation::{RecipeRelationFlags, RelationKind, RelationPair};
pub use self::relation_service::RelationService;
pub use self::shopping_list::ShoppingListReport;
pub use self::shopping_list_service::ShoppingListService;
pub use self::user::{Actor, EmailAddress, User, UserId, UserValidationError, Username};
pub use self::user_service::{AuthorWithRecipes, Registration, UserService};
