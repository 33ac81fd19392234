//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data`; it bundles the
//! domain services so handlers stay free of wiring decisions.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    IngredientRepository, RecipeRepository, RelationRepository, ShoppingListQuery, UserRepository,
};
use crate::domain::{
    CatalogService, RecipeService, RelationService, ShoppingListService, UserService,
};

/// Parameter object bundling the port implementations behind the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub ingredients: Arc<dyn IngredientRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub relations: Arc<dyn RelationRepository>,
    pub shopping_list: Arc<dyn ShoppingListQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: UserService,
    pub recipes: RecipeService,
    pub relations: RelationService,
    pub catalog: CatalogService,
    pub shopping_list: ShoppingListService,
}

impl HttpState {
    /// Assemble the service layer on top of a repository bundle.
    pub fn new(repositories: Repositories, clock: Arc<dyn Clock>) -> Self {
        let Repositories {
            users,
            ingredients,
            recipes,
            relations,
            shopping_list,
        } = repositories;
        Self {
            users: UserService::new(Arc::clone(&users), Arc::clone(&recipes)),
            recipes: RecipeService::new(
                Arc::clone(&recipes),
                Arc::clone(&ingredients),
                Arc::clone(&clock),
            ),
            relations: RelationService::new(relations, recipes, users),
            catalog: CatalogService::new(ingredients),
            shopping_list: ShoppingListService::new(shopping_list, clock),
        }
    }
}
