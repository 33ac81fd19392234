//! Liveness probe.

use actix_web::{HttpResponse, get};
use serde_json::json;

/// Report process liveness.
#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "Service is alive")),
    tags = ["health"],
    operation_id = "healthz",
    security([])
)]
#[get("/healthz")]
pub async fn healthz() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn liveness_answers_ok() {
        let app = test::init_service(App::new().service(healthz)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/healthz").to_request())
            .await;
        assert!(res.status().is_success());
    }
}
