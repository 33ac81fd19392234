//! In-memory implementations of every port.
//!
//! Used by the server when no database is configured and by handler and
//! integration tests. Uniqueness semantics mirror the PostgreSQL adapters:
//! relation inserts are atomic insert-if-absent over a mutexed set, so a
//! duplicate insert reports `false` exactly like an `ON CONFLICT DO NOTHING`
//! that affected zero rows.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    IngredientRepository, Page, RecipeListFilter, RecipeRepository, RelationRepository,
    RepositoryError, ShoppingListQuery, UserRepository,
};
use crate::domain::shopping_list::{CartLine, CartRecipe};
use crate::domain::{
    EmailAddress, Ingredient, IngredientId, LineItem, NewIngredient, Recipe, RecipeDetail,
    RecipeDraft, RecipeId, RecipeLineItem, RecipePatch, RelationPair, User, UserId,
};

#[derive(Debug, Clone)]
struct StoredRecipe {
    recipe: Recipe,
    line_items: Vec<LineItem>,
}

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    next_ingredient_id: IngredientId,
    recipes: BTreeMap<RecipeId, StoredRecipe>,
    next_recipe_id: RecipeId,
    relations: HashSet<RelationPair>,
}

impl State {
    fn hydrate(&self, stored: &StoredRecipe) -> Result<RecipeDetail, RepositoryError> {
        let mut line_items = Vec::with_capacity(stored.line_items.len());
        for item in &stored.line_items {
            let ingredient = self.ingredients.get(&item.ingredient_id).ok_or_else(|| {
                RepositoryError::query(format!(
                    "line item references missing ingredient {}",
                    item.ingredient_id
                ))
            })?;
            line_items.push(RecipeLineItem {
                ingredient: ingredient.clone(),
                quantity: item.quantity,
            });
        }
        Ok(RecipeDetail {
            recipe: stored.recipe.clone(),
            line_items,
        })
    }
}

/// One store implementing every port behind a single mutex.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert catalog entries directly, bypassing the async port. Test and
    /// startup seeding helper.
    pub fn seed_ingredients(&self, entries: Vec<NewIngredient>) {
        let mut state = self.lock();
        for entry in entries {
            state.next_ingredient_id += 1;
            let id = state.next_ingredient_id;
            state.ingredients.insert(
                id,
                Ingredient {
                    id,
                    name: entry.name,
                    measurement_unit: entry.measurement_unit,
                },
            );
        }
    }

    /// Insert a user directly. Test helper.
    pub fn seed_user(&self, user: User) {
        let mut state = self.lock();
        state.users.insert(*user.id.as_uuid(), user);
    }

    /// Insert a recipe directly and return its identifier. Test helper.
    pub fn seed_recipe(&self, author: &UserId, draft: RecipeDraft) -> RecipeId {
        let mut state = self.lock();
        state.next_recipe_id += 1;
        let id = state.next_recipe_id;
        state.recipes.insert(
            id,
            StoredRecipe {
                recipe: Recipe {
                    id,
                    author: *author,
                    title: draft.title,
                    instructions: draft.instructions,
                    cooking_minutes: draft.cooking_minutes,
                    image: draft.image,
                    created_at: Utc::now(),
                },
                line_items: draft.line_items,
            },
        );
        id
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        let clash = state.users.values().any(|existing| {
            existing.email == user.email || existing.username == user.username
        });
        if clash {
            return Err(RepositoryError::unique_violation(
                "a user with this email or username already exists",
            ));
        }
        state.users.insert(*user.id.as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock().users.get(id.as_uuid()).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|user| user.email == *email)
            .cloned())
    }

    async fn set_avatar<'a>(
        &self,
        id: &UserId,
        avatar: Option<&'a str>,
    ) -> Result<bool, RepositoryError> {
        let mut state = self.lock();
        match state.users.get_mut(id.as_uuid()) {
            Some(user) => {
                user.avatar = avatar.map(str::to_owned);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn subscribed_authors(
        &self,
        subscriber: &UserId,
    ) -> Result<Vec<User>, RepositoryError> {
        let state = self.lock();
        let mut authors: Vec<User> = state
            .relations
            .iter()
            .filter_map(|pair| match pair {
                RelationPair::Subscription {
                    subscriber: s,
                    author,
                } if s == subscriber => state.users.get(author.as_uuid()).cloned(),
                _ => None,
            })
            .collect();
        authors.sort_by(|a, b| a.username.as_ref().cmp(b.username.as_ref()));
        Ok(authors)
    }
}

#[async_trait]
impl IngredientRepository for MemoryStore {
    async fn search<'a>(
        &self,
        prefix: Option<&'a str>,
    ) -> Result<Vec<Ingredient>, RepositoryError> {
        let state = self.lock();
        let needle = prefix.map(str::to_lowercase);
        let mut found: Vec<Ingredient> = state
            .ingredients
            .values()
            .filter(|ingredient| match &needle {
                Some(needle) => ingredient.name.to_lowercase().starts_with(needle),
                None => true,
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, RepositoryError> {
        Ok(self.lock().ingredients.get(&id).cloned())
    }

    async fn existing_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, RepositoryError> {
        let state = self.lock();
        Ok(ids
            .iter()
            .copied()
            .filter(|id| state.ingredients.contains_key(id))
            .collect())
    }

    async fn import(&self, entries: &[NewIngredient]) -> Result<u64, RepositoryError> {
        self.seed_ingredients(entries.to_vec());
        Ok(entries.len() as u64)
    }
}

#[async_trait]
impl RecipeRepository for MemoryStore {
    async fn insert(
        &self,
        author: &UserId,
        draft: &RecipeDraft,
        created_at: DateTime<Utc>,
    ) -> Result<RecipeDetail, RepositoryError> {
        let mut state = self.lock();
        state.next_recipe_id += 1;
        let id = state.next_recipe_id;
        let stored = StoredRecipe {
            recipe: Recipe {
                id,
                author: *author,
                title: draft.title.clone(),
                instructions: draft.instructions.clone(),
                cooking_minutes: draft.cooking_minutes,
                image: draft.image.clone(),
                created_at,
            },
            line_items: draft.line_items.clone(),
        };
        let detail = state.hydrate(&stored)?;
        state.recipes.insert(id, stored);
        Ok(detail)
    }

    async fn update(
        &self,
        id: RecipeId,
        patch: &RecipePatch,
    ) -> Result<Option<RecipeDetail>, RepositoryError> {
        let mut state = self.lock();
        let Some(mut stored) = state.recipes.get(&id).cloned() else {
            return Ok(None);
        };
        if let Some(title) = &patch.title {
            stored.recipe.title = title.clone();
        }
        if let Some(instructions) = &patch.instructions {
            stored.recipe.instructions = instructions.clone();
        }
        if let Some(minutes) = patch.cooking_minutes {
            stored.recipe.cooking_minutes = minutes;
        }
        if let Some(image) = &patch.image {
            stored.recipe.image = Some(image.clone());
        }
        if let Some(line_items) = &patch.line_items {
            stored.line_items = line_items.clone();
        }
        let detail = state.hydrate(&stored)?;
        state.recipes.insert(id, stored);
        Ok(Some(detail))
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<RecipeDetail>, RepositoryError> {
        let state = self.lock();
        state
            .recipes
            .get(&id)
            .map(|stored| state.hydrate(stored))
            .transpose()
    }

    async fn list(
        &self,
        page: Page,
        filter: RecipeListFilter,
    ) -> Result<Vec<RecipeDetail>, RepositoryError> {
        let state = self.lock();
        let mut all: Vec<&StoredRecipe> = state
            .recipes
            .values()
            .filter(|stored| {
                let id = stored.recipe.id;
                filter
                    .author
                    .is_none_or(|author| stored.recipe.author == author)
                    && filter.favorited_by.is_none_or(|user| {
                        state
                            .relations
                            .contains(&RelationPair::Favorite { user, recipe: id })
                    })
                    && filter.in_cart_of.is_none_or(|user| {
                        state
                            .relations
                            .contains(&RelationPair::Cart { user, recipe: id })
                    })
            })
            .collect();
        all.sort_by(|a, b| {
            b.recipe
                .created_at
                .cmp(&a.recipe.created_at)
                .then(b.recipe.id.cmp(&a.recipe.id))
        });
        all.into_iter()
            .skip(usize::try_from(page.offset).unwrap_or(0))
            .take(usize::try_from(page.limit).unwrap_or(0))
            .map(|stored| state.hydrate(stored))
            .collect()
    }

    async fn list_by_author(&self, author: &UserId) -> Result<Vec<Recipe>, RepositoryError> {
        let state = self.lock();
        let mut recipes: Vec<Recipe> = state
            .recipes
            .values()
            .filter(|stored| stored.recipe.author == *author)
            .map(|stored| stored.recipe.clone())
            .collect();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(recipes)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RepositoryError> {
        let mut state = self.lock();
        if state.recipes.remove(&id).is_none() {
            return Ok(false);
        }
        // Mirror the foreign-key cascade of the SQL schema.
        state.relations.retain(|pair| match pair {
            RelationPair::Favorite { recipe, .. } | RelationPair::Cart { recipe, .. } => {
                *recipe != id
            }
            RelationPair::Subscription { .. } => true,
        });
        Ok(true)
    }

    async fn exists(&self, id: RecipeId) -> Result<bool, RepositoryError> {
        Ok(self.lock().recipes.contains_key(&id))
    }
}

#[async_trait]
impl RelationRepository for MemoryStore {
    async fn insert(&self, pair: &RelationPair) -> Result<bool, RepositoryError> {
        Ok(self.lock().relations.insert(*pair))
    }

    async fn delete(&self, pair: &RelationPair) -> Result<bool, RepositoryError> {
        Ok(self.lock().relations.remove(pair))
    }

    async fn exists(&self, pair: &RelationPair) -> Result<bool, RepositoryError> {
        Ok(self.lock().relations.contains(pair))
    }
}

#[async_trait]
impl ShoppingListQuery for MemoryStore {
    async fn cart_lines(&self, user: &UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let state = self.lock();
        let mut lines = Vec::new();
        for pair in &state.relations {
            let RelationPair::Cart { user: u, recipe } = pair else {
                continue;
            };
            if u != user {
                continue;
            }
            let Some(stored) = state.recipes.get(recipe) else {
                continue;
            };
            for item in &stored.line_items {
                let ingredient = state.ingredients.get(&item.ingredient_id).ok_or_else(|| {
                    RepositoryError::query(format!(
                        "line item references missing ingredient {}",
                        item.ingredient_id
                    ))
                })?;
                lines.push(CartLine {
                    ingredient_name: ingredient.name.clone(),
                    measurement_unit: ingredient.measurement_unit.clone(),
                    quantity: item.quantity,
                });
            }
        }
        Ok(lines)
    }

    async fn cart_recipes(&self, user: &UserId) -> Result<Vec<CartRecipe>, RepositoryError> {
        let state = self.lock();
        let mut recipes = Vec::new();
        for pair in &state.relations {
            let RelationPair::Cart { user: u, recipe } = pair else {
                continue;
            };
            if u != user {
                continue;
            }
            let Some(stored) = state.recipes.get(recipe) else {
                continue;
            };
            let author = state
                .users
                .get(stored.recipe.author.as_uuid())
                .ok_or_else(|| RepositoryError::query("recipe author missing"))?;
            recipes.push(CartRecipe {
                title: stored.recipe.title.clone(),
                author_first_name: author.first_name.clone(),
                author_last_name: author.last_name.clone(),
                author_username: author.username.to_string(),
            });
        }
        Ok(recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Username;

    fn fixture_user(email: &str, username: &str) -> User {
        User {
            id: UserId::random(),
            email: EmailAddress::new(email).expect("email"),
            username: Username::new(username).expect("username"),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            avatar: None,
        }
    }

    fn draft(items: Vec<LineItem>) -> RecipeDraft {
        RecipeDraft {
            title: "Pancakes".to_owned(),
            instructions: "Mix and fry.".to_owned(),
            cooking_minutes: 20,
            image: None,
            line_items: items,
        }
    }

    #[tokio::test]
    async fn relation_insert_is_insert_if_absent() {
        let store = MemoryStore::new();
        let pair = RelationPair::Favorite {
            user: UserId::random(),
            recipe: 1,
        };
        assert!(RelationRepository::insert(&store, &pair).await.expect("first insert"));
        assert!(!RelationRepository::insert(&store, &pair).await.expect("second insert"));
        assert!(RelationRepository::delete(&store, &pair).await.expect("delete"));
        assert!(!RelationRepository::delete(&store, &pair).await.expect("second delete"));
    }

    #[tokio::test]
    async fn duplicate_email_violates_uniqueness() {
        let store = MemoryStore::new();
        UserRepository::insert(&store, &fixture_user("ada@example.com", "ada"))
            .await
            .expect("first user");
        let error = UserRepository::insert(&store, &fixture_user("ada@example.com", "other"))
            .await
            .expect_err("duplicate email");
        assert!(matches!(error, RepositoryError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn recipe_delete_cascades_to_relations() {
        let store = MemoryStore::new();
        store.seed_ingredients(vec![NewIngredient {
            name: "flour".to_owned(),
            measurement_unit: "g".to_owned(),
        }]);
        let user = UserId::random();
        let id = store.seed_recipe(
            &user,
            draft(vec![LineItem {
                ingredient_id: 1,
                quantity: 100,
            }]),
        );
        let pair = RelationPair::Cart { user, recipe: id };
        assert!(RelationRepository::insert(&store, &pair).await.expect("insert"));

        assert!(RecipeRepository::delete(&store, id).await.expect("delete"));
        assert!(!RelationRepository::exists(&store, &pair).await.expect("exists"));
    }

    #[tokio::test]
    async fn search_orders_by_name_then_id() {
        let store = MemoryStore::new();
        store.seed_ingredients(vec![
            NewIngredient {
                name: "salt".to_owned(),
                measurement_unit: "g".to_owned(),
            },
            NewIngredient {
                name: "Sugar".to_owned(),
                measurement_unit: "g".to_owned(),
            },
            NewIngredient {
                name: "saffron".to_owned(),
                measurement_unit: "g".to_owned(),
            },
        ]);
        let found = IngredientRepository::search(&store, Some("sa"))
            .await
            .expect("search");
        let names: Vec<&str> = found.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["saffron", "salt"]);
    }

    #[tokio::test]
    async fn listing_is_newest_first_with_paging() {
        let store = MemoryStore::new();
        store.seed_ingredients(vec![NewIngredient {
            name: "flour".to_owned(),
            measurement_unit: "g".to_owned(),
        }]);
        let author = UserId::random();
        let items = vec![LineItem {
            ingredient_id: 1,
            quantity: 1,
        }];
        let now = Utc::now();
        let first = RecipeRepository::insert(&store, &author, &draft(items.clone()), now)
            .await
            .expect("first");
        let second = RecipeRepository::insert(&store, &author, &draft(items), now)
            .await
            .expect("second");

        let page = RecipeRepository::list(
            &store,
            Page { limit: 1, offset: 0 },
            RecipeListFilter::default(),
        )
        .await
        .expect("page");
        assert_eq!(page[0].recipe.id, second.recipe.id);
        let next = RecipeRepository::list(
            &store,
            Page { limit: 1, offset: 1 },
            RecipeListFilter::default(),
        )
        .await
        .expect("page");
        assert_eq!(next[0].recipe.id, first.recipe.id);
    }

    #[tokio::test]
    async fn listing_narrows_by_author_and_relations() {
        let store = MemoryStore::new();
        store.seed_ingredients(vec![NewIngredient {
            name: "flour".to_owned(),
            measurement_unit: "g".to_owned(),
        }]);
        let ada = UserId::random();
        let grace = UserId::random();
        let items = vec![LineItem {
            ingredient_id: 1,
            quantity: 1,
        }];
        let now = Utc::now();
        let by_ada = RecipeRepository::insert(&store, &ada, &draft(items.clone()), now)
            .await
            .expect("ada's recipe");
        let by_grace = RecipeRepository::insert(&store, &grace, &draft(items), now)
            .await
            .expect("grace's recipe");
        let pair = RelationPair::Favorite {
            user: ada,
            recipe: by_grace.recipe.id,
        };
        assert!(RelationRepository::insert(&store, &pair).await.expect("favorite"));

        let page = Page::default();
        let authored = RecipeRepository::list(
            &store,
            page,
            RecipeListFilter {
                author: Some(ada),
                ..RecipeListFilter::default()
            },
        )
        .await
        .expect("author filter");
        assert_eq!(authored.len(), 1);
        assert_eq!(authored[0].recipe.id, by_ada.recipe.id);

        let favorited = RecipeRepository::list(
            &store,
            page,
            RecipeListFilter {
                favorited_by: Some(ada),
                ..RecipeListFilter::default()
            },
        )
        .await
        .expect("favorite filter");
        assert_eq!(favorited.len(), 1);
        assert_eq!(favorited[0].recipe.id, by_grace.recipe.id);

        let carted = RecipeRepository::list(
            &store,
            page,
            RecipeListFilter {
                in_cart_of: Some(ada),
                ..RecipeListFilter::default()
            },
        )
        .await
        .expect("cart filter");
        assert!(carted.is_empty());
    }
}
