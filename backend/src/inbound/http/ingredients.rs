//! Ingredient catalog API handlers.
//!
//! ```text
//! GET /api/v1/ingredients?name=<prefix>
//! GET /api/v1/ingredients/{id}
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};

use crate::domain::Ingredient;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Query parameters for the catalog search.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct IngredientQuery {
    /// Case-insensitive name prefix; absent or blank returns the full
    /// catalog.
    pub name: Option<String>,
}

/// Catalog entry representation.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// Search the catalog by name prefix.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    params(IngredientQuery),
    responses(
        (status = 200, description = "Matching catalog entries", body = [IngredientResponse]),
        (status = 500, description = "Internal server error", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "searchIngredients",
    security([])
)]
#[get("/ingredients")]
pub async fn search_ingredients(
    state: web::Data<HttpState>,
    query: web::Query<IngredientQuery>,
) -> ApiResult<web::Json<Vec<IngredientResponse>>> {
    let found = state.catalog.search(query.name.as_deref()).await?;
    Ok(web::Json(
        found.into_iter().map(IngredientResponse::from).collect(),
    ))
}

/// Fetch one catalog entry.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients/{id}",
    params(("id" = i64, Path, description = "Catalog identifier")),
    responses(
        (status = 200, description = "Catalog entry", body = IngredientResponse),
        (status = 404, description = "No such ingredient", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "getIngredient",
    security([])
)]
#[get("/ingredients/{id}")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<IngredientResponse>> {
    let ingredient = state.catalog.get(path.into_inner()).await?;
    Ok(web::Json(ingredient.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewIngredient;
    use actix_web::{App, test as actix_test};
    use serde_json::Value;

    async fn seeded_app() -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        let (store, state) = crate::inbound::http::test_utils::memory_state();
        store.seed_ingredients(vec![
            NewIngredient {
                name: "Flour".to_owned(),
                measurement_unit: "g".to_owned(),
            },
            NewIngredient {
                name: "flaxseed".to_owned(),
                measurement_unit: "g".to_owned(),
            },
            NewIngredient {
                name: "egg".to_owned(),
                measurement_unit: "pcs".to_owned(),
            },
        ]);
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api/v1").service(search_ingredients).service(get_ingredient)),
        )
        .await
    }

    #[actix_web::test]
    async fn prefix_search_is_case_insensitive() {
        let app = seeded_app().await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/ingredients?name=fl")
                .to_request(),
        )
        .await;
        assert!(res.status().is_success());
        let body: Value = actix_test::read_body_json(res).await;
        let names: Vec<&str> = body
            .as_array()
            .expect("array")
            .iter()
            .map(|entry| entry.get("name").and_then(Value::as_str).expect("name"))
            .collect();
        assert_eq!(names, vec!["Flour", "flaxseed"]);
    }

    #[actix_web::test]
    async fn blank_prefix_returns_the_full_catalog() {
        let app = seeded_app().await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/ingredients")
                .to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body.as_array().expect("array").len(), 3);
    }

    #[actix_web::test]
    async fn unknown_id_is_not_found() {
        let app = seeded_app().await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/ingredients/999")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), actix_web::http::StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(
            body.get("code").and_then(Value::as_str),
            Some("ingredient_not_found")
        );
    }
}
