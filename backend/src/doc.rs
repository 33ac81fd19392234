//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every HTTP endpoint from the inbound layer, the request and
//! response schemas, and the session cookie security scheme. The generated
//! document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::ingredients::IngredientResponse;
use crate::inbound::http::recipes::{
    LineItemRequest, LineItemResponse, RecipeRequest, RecipeResponse, RecipeUpdateRequest,
    ShortLinkResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::users::{
    AvatarRequest, LoginRequest, RecipeSummaryResponse, RegisterRequest, SubscriptionResponse,
    UserResponse,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe sharing backend API",
        description = "HTTP interface for recipes, ingredient search, relation \
                       toggles, shopping lists, and short links."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::me,
        crate::inbound::http::users::subscriptions,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::set_avatar,
        crate::inbound::http::users::delete_avatar,
        crate::inbound::http::users::subscribe,
        crate::inbound::http::users::unsubscribe,
        crate::inbound::http::ingredients::search_ingredients,
        crate::inbound::http::ingredients::get_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::add_favorite,
        crate::inbound::http::recipes::remove_favorite,
        crate::inbound::http::recipes::add_to_cart,
        crate::inbound::http::recipes::remove_from_cart,
        crate::inbound::http::recipes::get_short_link,
        crate::inbound::http::recipes::download_shopping_cart,
        crate::inbound::http::short_links::resolve_short_link,
        crate::inbound::http::health::healthz,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AvatarRequest,
        UserResponse,
        RecipeSummaryResponse,
        SubscriptionResponse,
        IngredientResponse,
        LineItemRequest,
        RecipeRequest,
        RecipeUpdateRequest,
        LineItemResponse,
        RecipeResponse,
        ShortLinkResponse,
        ErrorSchema,
    )),
    tags(
        (name = "users", description = "Accounts, sessions, and subscriptions"),
        (name = "ingredients", description = "Ingredient catalog search"),
        (name = "recipes", description = "Recipes, relations, and shopping lists"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;
