//! OpenAPI schema definitions for the error envelope.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`; this
//! wrapper mirrors the JSON envelope the error mapper produces and lives in
//! the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for the API error response payload.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "duplicate_relation")]
    code: String,
    /// Human-readable message returned to clients.
    #[schema(example = "favorite relation already exists")]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    #[test]
    fn error_schema_generates() {
        let schema = ErrorSchema::schema();
        let json = serde_json::to_string(&schema).expect("schema serialises");
        assert!(json.contains("code"));
        assert!(json.contains("message"));
    }
}
