//! Recipe API handlers.
//!
//! ```text
//! GET    /api/v1/recipes                        list (paging + filters)
//! POST   /api/v1/recipes                        create
//! GET    /api/v1/recipes/{id}                   detail with relation flags
//! PATCH  /api/v1/recipes/{id}                   partial update
//! DELETE /api/v1/recipes/{id}                   delete (author only)
//! POST   /api/v1/recipes/{id}/favorite          add favorite
//! DELETE /api/v1/recipes/{id}/favorite          remove favorite
//! POST   /api/v1/recipes/{id}/shopping_cart     add to cart
//! DELETE /api/v1/recipes/{id}/shopping_cart     remove from cart
//! GET    /api/v1/recipes/{id}/get-link          short-link token
//! GET    /api/v1/recipes/download_shopping_cart plain-text report
//! ```
//!
//! The download route must be registered before the `{id}` routes so the
//! literal segment is not parsed as a recipe identifier.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{Page, RecipeListFilter};
use crate::domain::{
    Actor, LineItem, RecipeDetail, RecipeDraft, RecipeId, RecipePatch, RecipeRelationFlags,
    RelationPair, ShoppingListReport, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::ingredients::IngredientResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// One submitted (ingredient, quantity) entry.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    pub ingredient_id: i64,
    pub quantity: i64,
}

impl From<LineItemRequest> for LineItem {
    fn from(item: LineItemRequest) -> Self {
        Self {
            ingredient_id: item.ingredient_id,
            quantity: item.quantity,
        }
    }
}

/// Create request body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub title: String,
    pub instructions: String,
    pub cooking_minutes: i32,
    #[serde(default)]
    pub image: Option<String>,
    pub line_items: Vec<LineItemRequest>,
}

impl From<RecipeRequest> for RecipeDraft {
    fn from(request: RecipeRequest) -> Self {
        Self {
            title: request.title,
            instructions: request.instructions,
            cooking_minutes: request.cooking_minutes,
            image: request.image,
            line_items: request.line_items.into_iter().map(LineItem::from).collect(),
        }
    }
}

/// Partial update body. Absent fields keep their stored values; an absent
/// `lineItems` list keeps the stored items.
#[derive(Debug, Clone, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeUpdateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub cooking_minutes: Option<i32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub line_items: Option<Vec<LineItemRequest>>,
}

impl From<RecipeUpdateRequest> for RecipePatch {
    fn from(request: RecipeUpdateRequest) -> Self {
        Self {
            title: request.title,
            instructions: request.instructions,
            cooking_minutes: request.cooking_minutes,
            image: request.image,
            line_items: request
                .line_items
                .map(|items| items.into_iter().map(LineItem::from).collect()),
        }
    }
}

/// A stored line item with its catalog entry.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItemResponse {
    pub ingredient: IngredientResponse,
    pub quantity: i64,
}

/// Full recipe representation with relation flags for the acting user.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub id: RecipeId,
    #[schema(value_type = String)]
    pub author_id: UserId,
    pub title: String,
    pub instructions: String,
    pub cooking_minutes: i32,
    pub image: Option<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    pub line_items: Vec<LineItemResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

impl RecipeResponse {
    fn new(detail: RecipeDetail, flags: RecipeRelationFlags) -> Self {
        Self {
            id: detail.recipe.id,
            author_id: detail.recipe.author,
            title: detail.recipe.title,
            instructions: detail.recipe.instructions,
            cooking_minutes: detail.recipe.cooking_minutes,
            image: detail.recipe.image,
            created_at: detail.recipe.created_at,
            line_items: detail
                .line_items
                .into_iter()
                .map(|item| LineItemResponse {
                    ingredient: item.ingredient.into(),
                    quantity: item.quantity,
                })
                .collect(),
            is_favorited: flags.is_favorited,
            is_in_shopping_cart: flags.is_in_shopping_cart,
        }
    }
}

/// Short-link token payload returned by the `get-link` action.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkResponse {
    pub short_link: String,
}

/// Hard ceiling for a single listing window.
const MAX_PAGE_LIMIT: i64 = 100;

/// Paging and filter query for the recipe listing.
///
/// The relation filters narrow the listing to the acting user's favorites or
/// cart; anonymous callers get the unfiltered listing for those, matching the
/// upstream behaviour. A `false` value is the same as leaving the filter out.
#[derive(Debug, Clone, Copy, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RecipeListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Only recipes by this author.
    pub author: Option<Uuid>,
    /// Only recipes the acting user has favorited.
    pub is_favorited: Option<bool>,
    /// Only recipes in the acting user's shopping cart.
    pub is_in_shopping_cart: Option<bool>,
}

impl RecipeListQuery {
    /// Window with out-of-range values clamped so both storage backends see
    /// the same sane bounds.
    fn page(&self) -> Page {
        let default = Page::default();
        Page {
            limit: self.limit.unwrap_or(default.limit).clamp(0, MAX_PAGE_LIMIT),
            offset: self.offset.unwrap_or(default.offset).max(0),
        }
    }

    fn filter(&self, actor: &Actor) -> RecipeListFilter {
        let user = actor.user_id().copied();
        RecipeListFilter {
            author: self.author.map(UserId::from_uuid),
            favorited_by: user.filter(|_| self.is_favorited == Some(true)),
            in_cart_of: user.filter(|_| self.is_in_shopping_cart == Some(true)),
        }
    }
}

async fn decorated(
    state: &HttpState,
    session: &SessionContext,
    detail: RecipeDetail,
) -> ApiResult<RecipeResponse> {
    let actor = session.actor()?;
    let flags = state.relations.recipe_flags(&actor, detail.recipe.id).await?;
    Ok(RecipeResponse::new(detail, flags))
}

/// Newest-first recipe listing with optional author and relation filters.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(RecipeListQuery),
    responses(
        (status = 200, description = "Recipes, newest first", body = [RecipeResponse])
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security([])
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RecipeListQuery>,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let query = query.into_inner();
    let actor = session.actor()?;
    let details = state
        .recipes
        .list(query.page(), query.filter(&actor))
        .await?;
    let mut out = Vec::with_capacity(details.len());
    for detail in details {
        out.push(decorated(&state, &session, detail).await?);
    }
    Ok(web::Json(out))
}

/// Create a recipe owned by the acting user.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Validation failure", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.actor()?;
    let detail = state
        .recipes
        .create(&actor, payload.into_inner().into())
        .await?;
    let body = RecipeResponse::new(detail, RecipeRelationFlags::default());
    Ok(HttpResponse::Created().json(body))
}

/// Fetch one recipe with relation flags for the acting user.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Recipe detail", body = RecipeResponse),
        (status = 404, description = "No such recipe", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe",
    security([])
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let detail = state.recipes.get(path.into_inner()).await?;
    Ok(web::Json(decorated(&state, &session, detail).await?))
}

/// Partially update a recipe. Author only.
#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe identifier")),
    request_body = RecipeUpdateRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeResponse),
        (status = 403, description = "Not the author", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such recipe", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[patch("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
    payload: web::Json<RecipeUpdateRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let actor = session.actor()?;
    let detail = state
        .recipes
        .update(&actor, path.into_inner(), payload.into_inner().into())
        .await?;
    Ok(web::Json(decorated(&state, &session, detail).await?))
}

/// Delete a recipe. Author only.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe identifier")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 403, description = "Not the author", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such recipe", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<HttpResponse> {
    let actor = session.actor()?;
    state.recipes.delete(&actor, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mark a recipe as a favorite of the acting user.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/favorite",
    params(("id" = i64, Path, description = "Recipe identifier")),
    responses(
        (status = 201, description = "Favorite added"),
        (status = 404, description = "No such recipe", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Already a favorite", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "addFavorite"
)]
#[post("/recipes/{id}/favorite")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<HttpResponse> {
    let user = session.actor()?.require_user()?;
    state
        .relations
        .toggle(RelationPair::Favorite {
            user,
            recipe: path.into_inner(),
        })
        .await?;
    Ok(HttpResponse::Created().finish())
}

/// Remove a recipe from the acting user's favorites.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/favorite",
    params(("id" = i64, Path, description = "Recipe identifier")),
    responses(
        (status = 204, description = "Favorite removed"),
        (status = 404, description = "Not a favorite", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "removeFavorite"
)]
#[delete("/recipes/{id}/favorite")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<HttpResponse> {
    let user = session.actor()?.require_user()?;
    state
        .relations
        .untoggle(RelationPair::Favorite {
            user,
            recipe: path.into_inner(),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Put a recipe into the acting user's shopping cart.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/shopping_cart",
    params(("id" = i64, Path, description = "Recipe identifier")),
    responses(
        (status = 201, description = "Recipe added to cart"),
        (status = 404, description = "No such recipe", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Already in the cart", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "addToCart"
)]
#[post("/recipes/{id}/shopping_cart")]
pub async fn add_to_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<HttpResponse> {
    let user = session.actor()?.require_user()?;
    state
        .relations
        .toggle(RelationPair::Cart {
            user,
            recipe: path.into_inner(),
        })
        .await?;
    Ok(HttpResponse::Created().finish())
}

/// Take a recipe out of the acting user's shopping cart.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/shopping_cart",
    params(("id" = i64, Path, description = "Recipe identifier")),
    responses(
        (status = 204, description = "Recipe removed from cart"),
        (status = 404, description = "Not in the cart", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "removeFromCart"
)]
#[delete("/recipes/{id}/shopping_cart")]
pub async fn remove_from_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<RecipeId>,
) -> ApiResult<HttpResponse> {
    let user = session.actor()?.require_user()?;
    state
        .relations
        .untoggle(RelationPair::Cart {
            user,
            recipe: path.into_inner(),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Short-link token for a recipe, as a path clients can share.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}/get-link",
    params(("id" = i64, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Short link", body = ShortLinkResponse),
        (status = 404, description = "No such recipe", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getShortLink",
    security([])
)]
#[get("/recipes/{id}/get-link")]
pub async fn get_short_link(
    state: web::Data<HttpState>,
    path: web::Path<RecipeId>,
) -> ApiResult<web::Json<ShortLinkResponse>> {
    let token = state.recipes.short_link(path.into_inner()).await?;
    Ok(web::Json(ShortLinkResponse {
        short_link: format!("/s/{token}"),
    }))
}

/// Download the consolidated shopping list as plain text.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/download_shopping_cart",
    responses(
        (status = 200, description = "Plain-text shopping list", body = String),
        (status = 204, description = "The cart is empty"),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "downloadShoppingCart"
)]
#[get("/recipes/download_shopping_cart")]
pub async fn download_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let actor = session.actor()?;
    match state.shopping_list.build(&actor).await? {
        ShoppingListReport::Empty => Ok(HttpResponse::NoContent().finish()),
        ShoppingListReport::Rendered(text) => Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(text)),
    }
}
