//! Short-link resolution.
//!
//! ```text
//! GET /s/{token}   redirect to the canonical recipe URL
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Resolve a base36 token and redirect to the recipe it names.
#[utoipa::path(
    get,
    path = "/s/{token}",
    params(("token" = String, Path, description = "Base36 short-link token")),
    responses(
        (status = 302, description = "Redirect to the recipe", headers(("Location" = String))),
        (status = 400, description = "Malformed token", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such recipe", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "resolveShortLink",
    security([])
)]
#[get("/s/{token}")]
pub async fn resolve_short_link(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = state.recipes.resolve_short_link(&path).await?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, format!("/api/v1/recipes/{id}")))
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailAddress, LineItem, NewIngredient, RecipeDraft, User, UserId, Username};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::Value;

    async fn app_with_recipe() -> (
        impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        i64,
    ) {
        let (store, state) = crate::inbound::http::test_utils::memory_state();
        store.seed_ingredients(vec![NewIngredient {
            name: "flour".to_owned(),
            measurement_unit: "g".to_owned(),
        }]);
        let author = User {
            id: UserId::random(),
            email: EmailAddress::new("ada@example.com").expect("email"),
            username: Username::new("ada").expect("username"),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            avatar: None,
        };
        let author_id = author.id;
        store.seed_user(author);
        let recipe_id = store.seed_recipe(
            &author_id,
            RecipeDraft {
                title: "Pancakes".to_owned(),
                instructions: "Mix and fry.".to_owned(),
                cooking_minutes: 20,
                image: None,
                line_items: vec![LineItem {
                    ingredient_id: 1,
                    quantity: 300,
                }],
            },
        );
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(resolve_short_link),
        )
        .await;
        (app, recipe_id)
    }

    #[actix_web::test]
    async fn token_redirects_to_the_recipe() {
        let (app, id) = app_with_recipe().await;
        let token = crate::domain::short_link::encode(u64::try_from(id).expect("non-negative"));

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/s/{token}"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .expect("location header");
        assert_eq!(location, format!("/api/v1/recipes/{id}"));
    }

    #[actix_web::test]
    async fn uppercase_token_is_malformed() {
        let (app, _) = app_with_recipe().await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/s/ZZ").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body.get("code").and_then(Value::as_str),
            Some("malformed_token")
        );
    }

    #[actix_web::test]
    async fn token_for_missing_recipe_is_not_found() {
        let (app, _) = app_with_recipe().await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/s/zzzz").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
