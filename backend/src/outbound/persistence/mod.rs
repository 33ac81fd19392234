//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic lives here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) are implementation details, never exposed to the domain.
//! - **Strongly typed errors**: every database failure is mapped to a
//!   [`crate::domain::ports::RepositoryError`] variant; uniqueness violations
//!   keep their own variant so services can report precise conflicts.

pub(crate) mod diesel_errors;
mod diesel_ingredient_repository;
mod diesel_recipe_repository;
mod diesel_relation_repository;
mod diesel_shopping_list_query;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_ingredient_repository::DieselIngredientRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_relation_repository::DieselRelationRepository;
pub use diesel_shopping_list_query::DieselShoppingListQuery;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
