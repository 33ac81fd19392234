//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers
//! turn domain failures into consistent JSON envelopes and status codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use tracing::error;

use crate::domain::Error;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// The JSON envelope every error response carries.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
}

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::DuplicateRelation { .. } | Error::Conflict { .. } => StatusCode::CONFLICT,
        Error::RelationNotFound { .. }
        | Error::RecipeNotFound { .. }
        | Error::IngredientNotFound { .. }
        | Error::UserNotFound { .. } => StatusCode::NOT_FOUND,
        Error::InvalidTarget
        | Error::UnknownIngredient { .. }
        | Error::DuplicateLineItem { .. }
        | Error::InvalidQuantity { .. }
        | Error::InvalidDuration { .. }
        | Error::MalformedToken { .. }
        | Error::Validation { .. } => StatusCode::BAD_REQUEST,
        Error::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        Error::Forbidden { .. } => StatusCode::FORBIDDEN,
        Error::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Internal failure details stay in the logs, never in the response body.
fn client_message(error: &Error) -> String {
    if matches!(error, Error::Internal { .. }) {
        error!(%error, "internal error returned to client");
        "internal server error".to_owned()
    } else {
        error.to_string()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            code: self.code(),
            message: client_message(self),
        })
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak framework details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RelationKind;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case(Error::DuplicateRelation { kind: RelationKind::Favorite }, StatusCode::CONFLICT)]
    #[case(Error::RelationNotFound { kind: RelationKind::Cart }, StatusCode::NOT_FOUND)]
    #[case(Error::RecipeNotFound { id: 9 }, StatusCode::NOT_FOUND)]
    #[case(Error::InvalidTarget, StatusCode::BAD_REQUEST)]
    #[case(Error::MalformedToken { token: "UP".into() }, StatusCode::BAD_REQUEST)]
    #[case(Error::unauthorized("login required"), StatusCode::UNAUTHORIZED)]
    #[case(Error::forbidden("not yours"), StatusCode::FORBIDDEN)]
    #[case(Error::conflict("taken"), StatusCode::CONFLICT)]
    #[case(Error::unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
    fn status_codes_follow_the_taxonomy(#[case] error: Error, #[case] status: StatusCode) {
        assert_eq!(error.status_code(), status);
    }

    #[rstest]
    fn envelope_carries_stable_code_and_message() {
        let response = Error::InvalidTarget.error_response();
        let body = actix_web::body::to_bytes(response.into_body());
        let bytes = futures::executor::block_on(body).expect("body bytes");
        let value: Value = serde_json::from_slice(&bytes).expect("json envelope");
        assert_eq!(
            value.get("code").and_then(Value::as_str),
            Some("invalid_target")
        );
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("users cannot subscribe to themselves")
        );
    }

    #[rstest]
    fn internal_details_are_redacted() {
        let response = Error::internal("connection string leaked").error_response();
        let bytes = futures::executor::block_on(actix_web::body::to_bytes(response.into_body()))
            .expect("body bytes");
        let value: Value = serde_json::from_slice(&bytes).expect("json envelope");
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("internal server error")
        );
    }
}
