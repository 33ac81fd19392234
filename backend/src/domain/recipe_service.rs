//! Recipe use-cases: creation, update, deletion, and short links.

use std::collections::BTreeSet;
use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    map_repository_error, IngredientRepository, Page, RecipeListFilter, RecipeRepository,
};
use crate::domain::recipe::{
    validate_cooking_minutes, validate_line_items, LineItem, Recipe, RecipeDetail, RecipeDraft,
    RecipeId, RecipePatch,
};
use crate::domain::short_link;
use crate::domain::user::{Actor, UserId};
use crate::domain::Error;

/// Recipe service implementing the write and read use-cases.
#[derive(Clone)]
pub struct RecipeService {
    recipes: Arc<dyn RecipeRepository>,
    ingredients: Arc<dyn IngredientRepository>,
    clock: Arc<dyn Clock>,
}

impl RecipeService {
    /// Create a new service with the given repositories and clock.
    pub fn new(
        recipes: Arc<dyn RecipeRepository>,
        ingredients: Arc<dyn IngredientRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            recipes,
            ingredients,
            clock,
        }
    }

    /// Create a recipe owned by the acting user.
    ///
    /// Validation order is part of the contract: non-empty line items, then
    /// catalog existence, then duplicate references, then quantities, then
    /// cooking duration.
    pub async fn create(&self, actor: &Actor, draft: RecipeDraft) -> Result<RecipeDetail, Error> {
        let author = actor.require_user()?;
        self.validate_draft_line_items(&draft.line_items).await?;
        validate_cooking_minutes(draft.cooking_minutes)?;

        self.recipes
            .insert(&author, &draft, self.clock.utc())
            .await
            .map_err(map_repository_error)
    }

    /// Update a recipe. Only the author may update; a patch without line
    /// items leaves the stored items untouched.
    pub async fn update(
        &self,
        actor: &Actor,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<RecipeDetail, Error> {
        let user = actor.require_user()?;
        let existing = self.get(id).await?;
        if existing.recipe.author != user {
            return Err(Error::forbidden("only the author may edit a recipe"));
        }

        if let Some(line_items) = &patch.line_items {
            self.validate_draft_line_items(line_items).await?;
        }
        if let Some(minutes) = patch.cooking_minutes {
            validate_cooking_minutes(minutes)?;
        }

        self.recipes
            .update(id, &patch)
            .await
            .map_err(map_repository_error)?
            .ok_or(Error::RecipeNotFound { id })
    }

    /// Delete a recipe. Only the author may delete.
    pub async fn delete(&self, actor: &Actor, id: RecipeId) -> Result<(), Error> {
        let user = actor.require_user()?;
        let existing = self.get(id).await?;
        if existing.recipe.author != user {
            return Err(Error::forbidden("only the author may delete a recipe"));
        }
        let deleted = self
            .recipes
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::RecipeNotFound { id })
        }
    }

    /// Fetch one recipe with line items.
    pub async fn get(&self, id: RecipeId) -> Result<RecipeDetail, Error> {
        self.recipes
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or(Error::RecipeNotFound { id })
    }

    /// Newest-first window over all recipes matching the filter.
    pub async fn list(
        &self,
        page: Page,
        filter: RecipeListFilter,
    ) -> Result<Vec<RecipeDetail>, Error> {
        self.recipes
            .list(page, filter)
            .await
            .map_err(map_repository_error)
    }

    /// All recipes by one author, newest first, without line items.
    pub async fn list_by_author(&self, author: &UserId) -> Result<Vec<Recipe>, Error> {
        self.recipes
            .list_by_author(author)
            .await
            .map_err(map_repository_error)
    }

    /// Short-link token for an existing recipe.
    pub async fn short_link(&self, id: RecipeId) -> Result<String, Error> {
        let found = self
            .recipes
            .exists(id)
            .await
            .map_err(map_repository_error)?;
        if !found {
            return Err(Error::RecipeNotFound { id });
        }
        // Stored identifiers are positive, so the conversion cannot fail.
        let raw = u64::try_from(id).map_err(|_| Error::RecipeNotFound { id })?;
        Ok(short_link::encode(raw))
    }

    /// Resolve a short-link token back to the recipe it names.
    pub async fn resolve_short_link(&self, token: &str) -> Result<RecipeId, Error> {
        let raw = short_link::decode(token)?;
        let id = RecipeId::try_from(raw).map_err(|_| Error::MalformedToken {
            token: token.to_owned(),
        })?;
        let found = self
            .recipes
            .exists(id)
            .await
            .map_err(map_repository_error)?;
        if found {
            Ok(id)
        } else {
            Err(Error::RecipeNotFound { id })
        }
    }

    /// Order (1)-(4) of the validation contract: non-empty list, catalog
    /// existence, duplicate references, quantity floor.
    async fn validate_draft_line_items(&self, line_items: &[LineItem]) -> Result<(), Error> {
        if line_items.is_empty() {
            return Err(Error::validation("a recipe needs at least one ingredient"));
        }

        let requested: BTreeSet<i64> =
            line_items.iter().map(|item| item.ingredient_id).collect();
        let ids: Vec<i64> = requested.iter().copied().collect();
        let existing: BTreeSet<i64> = self
            .ingredients
            .existing_ids(&ids)
            .await
            .map_err(map_repository_error)?
            .into_iter()
            .collect();
        let missing: Vec<i64> = requested.difference(&existing).copied().collect();
        if !missing.is_empty() {
            return Err(Error::UnknownIngredient { ids: missing });
        }

        validate_line_items(line_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockIngredientRepository, MockRecipeRepository};
    use chrono::{TimeZone, Utc};
    use mockable::DefaultClock;
    use rstest::rstest;

    fn draft(line_items: Vec<LineItem>, cooking_minutes: i32) -> RecipeDraft {
        RecipeDraft {
            title: "Pancakes".to_owned(),
            instructions: "Mix and fry.".to_owned(),
            cooking_minutes,
            image: None,
            line_items,
        }
    }

    fn item(ingredient_id: i64, quantity: i64) -> LineItem {
        LineItem {
            ingredient_id,
            quantity,
        }
    }

    fn detail_for(author: UserId, id: RecipeId) -> RecipeDetail {
        RecipeDetail {
            recipe: Recipe {
                id,
                author,
                title: "Pancakes".to_owned(),
                instructions: "Mix and fry.".to_owned(),
                cooking_minutes: 20,
                image: None,
                created_at: Utc.with_ymd_and_hms(2024, 5, 17, 9, 0, 0)
                    .single()
                    .expect("timestamp"),
            },
            line_items: Vec::new(),
        }
    }

    fn service(
        recipes: MockRecipeRepository,
        ingredients: MockIngredientRepository,
    ) -> RecipeService {
        RecipeService::new(
            Arc::new(recipes),
            Arc::new(ingredients),
            Arc::new(DefaultClock),
        )
    }

    #[tokio::test]
    async fn create_requires_authentication() {
        let service = service(MockRecipeRepository::new(), MockIngredientRepository::new());
        let error = service
            .create(&Actor::Anonymous, draft(vec![item(1, 1)], 10))
            .await
            .expect_err("anonymous");
        assert_eq!(error.code(), "unauthorized");
    }

    #[tokio::test]
    async fn create_stores_validated_draft() {
        let author = UserId::random();
        let mut ingredients = MockIngredientRepository::new();
        ingredients
            .expect_existing_ids()
            .times(1)
            .returning(|ids| Ok(ids.to_vec()));
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_insert()
            .times(1)
            .return_once(move |user, _, _| Ok(detail_for(*user, 1)));

        let service = service(recipes, ingredients);
        let detail = service
            .create(
                &Actor::Authenticated(author),
                draft(vec![item(1, 200), item(2, 2)], 20),
            )
            .await
            .expect("created");
        assert_eq!(detail.recipe.author, author);
    }

    #[tokio::test]
    async fn create_reports_every_unknown_ingredient() {
        let author = UserId::random();
        let mut ingredients = MockIngredientRepository::new();
        // Only ingredient 1 exists.
        ingredients
            .expect_existing_ids()
            .times(1)
            .returning(|_| Ok(vec![1]));
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_insert().times(0);

        let service = service(recipes, ingredients);
        let error = service
            .create(
                &Actor::Authenticated(author),
                draft(vec![item(1, 1), item(7, 1), item(9, 1)], 20),
            )
            .await
            .expect_err("unknown ingredients");
        assert_eq!(error, Error::UnknownIngredient { ids: vec![7, 9] });
    }

    // The existence check runs before the duplicate check.
    #[tokio::test]
    async fn unknown_ingredient_wins_over_duplicate() {
        let author = UserId::random();
        let mut ingredients = MockIngredientRepository::new();
        ingredients
            .expect_existing_ids()
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = service(MockRecipeRepository::new(), ingredients);
        let error = service
            .create(
                &Actor::Authenticated(author),
                draft(vec![item(7, 1), item(7, 1)], 20),
            )
            .await
            .expect_err("unknown");
        assert_eq!(error, Error::UnknownIngredient { ids: vec![7] });
    }

    #[tokio::test]
    async fn create_rejects_short_cooking_time() {
        let author = UserId::random();
        let mut ingredients = MockIngredientRepository::new();
        ingredients
            .expect_existing_ids()
            .times(1)
            .returning(|ids| Ok(ids.to_vec()));

        let service = service(MockRecipeRepository::new(), ingredients);
        let error = service
            .create(&Actor::Authenticated(author), draft(vec![item(1, 1)], 0))
            .await
            .expect_err("zero minutes");
        assert_eq!(error, Error::InvalidDuration { minutes: 0 });
    }

    #[tokio::test]
    async fn create_rejects_empty_line_items_before_touching_the_catalog() {
        let author = UserId::random();
        let mut ingredients = MockIngredientRepository::new();
        ingredients.expect_existing_ids().times(0);

        let service = service(MockRecipeRepository::new(), ingredients);
        let error = service
            .create(&Actor::Authenticated(author), draft(Vec::new(), 10))
            .await
            .expect_err("empty");
        assert_eq!(error.code(), "invalid_request");
    }

    #[tokio::test]
    async fn update_without_line_items_leaves_them_untouched() {
        let author = UserId::random();
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find_by_id()
            .times(1)
            .return_once(move |id| Ok(Some(detail_for(author, id))));
        recipes
            .expect_update()
            .withf(|_, patch| patch.line_items.is_none())
            .times(1)
            .return_once(move |id, _| Ok(Some(detail_for(author, id))));
        let mut ingredients = MockIngredientRepository::new();
        ingredients.expect_existing_ids().times(0);

        let service = service(recipes, ingredients);
        let patch = RecipePatch {
            title: Some("Crepes".to_owned()),
            ..RecipePatch::default()
        };
        service
            .update(&Actor::Authenticated(author), 1, patch)
            .await
            .expect("updated");
    }

    #[tokio::test]
    async fn update_by_non_author_is_forbidden() {
        let author = UserId::random();
        let intruder = UserId::random();
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find_by_id()
            .times(1)
            .return_once(move |id| Ok(Some(detail_for(author, id))));
        recipes.expect_update().times(0);

        let service = service(recipes, MockIngredientRepository::new());
        let error = service
            .update(&Actor::Authenticated(intruder), 1, RecipePatch::default())
            .await
            .expect_err("forbidden");
        assert_eq!(error.code(), "forbidden");
    }

    #[tokio::test]
    async fn short_link_round_trips_through_resolution() {
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_exists().times(2).returning(|_| Ok(true));

        let service = service(recipes, MockIngredientRepository::new());
        let token = service.short_link(1_295).await.expect("token");
        assert_eq!(token, "zz");
        assert_eq!(
            service.resolve_short_link(&token).await.expect("resolved"),
            1_295
        );
    }

    #[tokio::test]
    async fn resolving_token_for_missing_recipe_fails() {
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_exists().times(1).returning(|_| Ok(false));

        let service = service(recipes, MockIngredientRepository::new());
        let error = service.resolve_short_link("zz").await.expect_err("missing");
        assert_eq!(error, Error::RecipeNotFound { id: 1_295 });
    }

    #[rstest]
    #[case("ZZ")]
    #[case("to-ken")]
    fn malformed_tokens_never_reach_storage(#[case] token: &str) {
        let mut recipes = MockRecipeRepository::new();
        recipes.expect_exists().times(0);
        let service = service(recipes, MockIngredientRepository::new());

        let error = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime")
            .block_on(service.resolve_short_link(token))
            .expect_err("malformed");
        assert_eq!(error.code(), "malformed_token");
    }
}
