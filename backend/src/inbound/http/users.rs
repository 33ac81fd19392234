//! User API handlers.
//!
//! ```text
//! POST   /api/v1/users                    register
//! GET    /api/v1/users/me                 current profile
//! GET    /api/v1/users/subscriptions      subscribed authors with recipes
//! GET    /api/v1/users/{id}               profile with subscription flag
//! PUT    /api/v1/users/me/avatar          set avatar
//! DELETE /api/v1/users/me/avatar          delete avatar
//! POST   /api/v1/users/{id}/subscribe     subscribe
//! DELETE /api/v1/users/{id}/subscribe     unsubscribe
//! POST   /api/v1/auth/login               establish a cookie session
//! ```
//!
//! `me` and `subscriptions` must be registered before the `{id}` routes so
//! the literal segments are not parsed as user identifiers.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    AuthorWithRecipes, Recipe, RecipeId, Registration, RelationPair, User, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration request body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Login request body. Credential verification is the identity layer's job;
/// this endpoint only binds a known account to the cookie session.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
}

/// Avatar replacement body. The value is an opaque reference such as a data
/// URI; the byte store is out of scope.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvatarRequest {
    pub avatar: String,
}

/// Profile representation with the subscription flag for the acting user.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(value_type = String)]
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub is_subscribed: bool,
}

impl UserResponse {
    fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email.into(),
            username: user.username.into(),
            first_name: user.first_name,
            last_name: user.last_name,
            avatar: user.avatar,
            is_subscribed,
        }
    }
}

/// Condensed recipe entry inside a subscription listing.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummaryResponse {
    pub id: RecipeId,
    pub title: String,
    pub cooking_minutes: i32,
    pub image: Option<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl From<Recipe> for RecipeSummaryResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            cooking_minutes: recipe.cooking_minutes,
            image: recipe.image,
            created_at: recipe.created_at,
        }
    }
}

/// One subscribed-to author with their recipes.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub author: UserResponse,
    pub recipes: Vec<RecipeSummaryResponse>,
}

impl From<AuthorWithRecipes> for SubscriptionResponse {
    fn from(entry: AuthorWithRecipes) -> Self {
        Self {
            // Listed authors are subscribed-to by definition.
            author: UserResponse::new(entry.author, true),
            recipes: entry
                .recipes
                .into_iter()
                .map(RecipeSummaryResponse::from)
                .collect(),
        }
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation failure", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Email or username taken", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let user = state
        .users
        .register(Registration {
            email: request.email,
            username: request.username,
            first_name: request.first_name,
            last_name: request.last_name,
        })
        .await?;
    Ok(HttpResponse::Created().json(UserResponse::new(user, false)))
}

/// Establish a cookie session for a known account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Unknown email", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let user = state.users.identify(&payload.email).await?;
    session.persist_user(&user.id)?;
    Ok(HttpResponse::Ok().finish())
}

/// Profile of the acting user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current profile", body = UserResponse),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let actor = session.actor()?;
    let user = state.users.me(&actor).await?;
    Ok(web::Json(UserResponse::new(user, false)))
}

/// Authors the acting user follows, each with their recipes.
#[utoipa::path(
    get,
    path = "/api/v1/users/subscriptions",
    responses(
        (status = 200, description = "Subscribed authors", body = [SubscriptionResponse]),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listSubscriptions"
)]
#[get("/users/subscriptions")]
pub async fn subscriptions(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<SubscriptionResponse>>> {
    let actor = session.actor()?;
    let listing = state.users.subscriptions(&actor).await?;
    Ok(web::Json(
        listing.into_iter().map(SubscriptionResponse::from).collect(),
    ))
}

/// Fetch a profile by identifier.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 404, description = "No such user", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = UserId::from_uuid(path.into_inner());
    let user = state.users.profile(&id).await?;
    let actor = session.actor()?;
    let is_subscribed = state.relations.is_subscribed(&actor, &id).await?;
    Ok(web::Json(UserResponse::new(user, is_subscribed)))
}

/// Replace the acting user's avatar.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/avatar",
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Avatar replaced", body = AvatarRequest),
        (status = 400, description = "Empty avatar", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "setAvatar"
)]
#[put("/users/me/avatar")]
pub async fn set_avatar(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AvatarRequest>,
) -> ApiResult<web::Json<AvatarRequest>> {
    let actor = session.actor()?;
    let request = payload.into_inner();
    state.users.set_avatar(&actor, request.avatar.clone()).await?;
    Ok(web::Json(request))
}

/// Remove the acting user's avatar.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me/avatar",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 400, description = "No avatar to remove", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteAvatar"
)]
#[delete("/users/me/avatar")]
pub async fn delete_avatar(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let actor = session.actor()?;
    state.users.delete_avatar(&actor).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Subscribe the acting user to an author.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/subscribe",
    params(("id" = String, Path, description = "Author identifier")),
    responses(
        (status = 201, description = "Subscribed"),
        (status = 400, description = "Self-subscription", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such author", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Already subscribed", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "subscribe"
)]
#[post("/users/{id}/subscribe")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let subscriber = session.actor()?.require_user()?;
    state
        .relations
        .toggle(RelationPair::Subscription {
            subscriber,
            author: UserId::from_uuid(path.into_inner()),
        })
        .await?;
    Ok(HttpResponse::Created().finish())
}

/// Unsubscribe the acting user from an author.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/subscribe",
    params(("id" = String, Path, description = "Author identifier")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 404, description = "Not subscribed", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "unsubscribe"
)]
#[delete("/users/{id}/subscribe")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let subscriber = session.actor()?.require_user()?;
    state
        .relations
        .untoggle(RelationPair::Subscription {
            subscriber,
            author: UserId::from_uuid(path.into_inner()),
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
