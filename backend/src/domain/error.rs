//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP adapter maps them to status
//! codes and a JSON envelope; the domain only records what went wrong.

use uuid::Uuid;

use crate::domain::relation::RelationKind;

/// Failures surfaced by domain operations.
///
/// Every variant is a recoverable, request-local rejection caused by
/// caller-supplied state. None of them warrants a retry or a crash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The (actor, target) pair already exists for this relation kind.
    #[error("{kind} relation already exists")]
    DuplicateRelation { kind: RelationKind },

    /// The (actor, target) pair does not exist for this relation kind.
    #[error("{kind} relation does not exist")]
    RelationNotFound { kind: RelationKind },

    /// Self-subscription is never allowed.
    #[error("users cannot subscribe to themselves")]
    InvalidTarget,

    /// One or more submitted line items reference ingredients that are not in
    /// the catalog. Carries every missing identifier, not just the first.
    #[error("unknown ingredient ids: {ids:?}")]
    UnknownIngredient { ids: Vec<i64> },

    /// The submitted line-item list references the same ingredient twice.
    #[error("ingredient {ingredient_id} appears more than once")]
    DuplicateLineItem { ingredient_id: i64 },

    /// A line-item quantity below the minimum of one.
    #[error("quantity for ingredient {ingredient_id} must be at least 1, got {quantity}")]
    InvalidQuantity { ingredient_id: i64, quantity: i64 },

    /// Cooking duration below the minimum of one minute.
    #[error("cooking time must be at least 1 minute, got {minutes}")]
    InvalidDuration { minutes: i64 },

    /// A short-link token containing characters outside `0-9a-z`, or one that
    /// does not fit a 64-bit identifier.
    #[error("malformed short-link token: {token:?}")]
    MalformedToken { token: String },

    /// No recipe with the given identifier.
    #[error("recipe {id} not found")]
    RecipeNotFound { id: i64 },

    /// No ingredient with the given identifier.
    #[error("ingredient {id} not found")]
    IngredientNotFound { id: i64 },

    /// No user with the given identifier.
    #[error("user {id} not found")]
    UserNotFound { id: Uuid },

    /// Request payload failed field validation.
    #[error("{message}")]
    Validation { message: String },

    /// A uniqueness constraint (email, username) rejected the request.
    #[error("{message}")]
    Conflict { message: String },

    /// Authentication is missing or failed.
    #[error("{message}")]
    Unauthorized { message: String },

    /// Authenticated but not permitted to perform this action.
    #[error("{message}")]
    Forbidden { message: String },

    /// Unexpected failure inside an adapter.
    #[error("{message}")]
    Internal { message: String },

    /// A collaborator (storage) could not be reached.
    #[error("{message}")]
    Unavailable { message: String },
}

impl Error {
    /// Stable machine-readable code for the HTTP envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateRelation { .. } => "duplicate_relation",
            Self::RelationNotFound { .. } => "relation_not_found",
            Self::InvalidTarget => "invalid_target",
            Self::UnknownIngredient { .. } => "unknown_ingredient",
            Self::DuplicateLineItem { .. } => "duplicate_line_item",
            Self::InvalidQuantity { .. } => "invalid_quantity",
            Self::InvalidDuration { .. } => "invalid_duration",
            Self::MalformedToken { .. } => "malformed_token",
            Self::RecipeNotFound { .. } => "recipe_not_found",
            Self::IngredientNotFound { .. } => "ingredient_not_found",
            Self::UserNotFound { .. } => "user_not_found",
            Self::Validation { .. } => "invalid_request",
            Self::Conflict { .. } => "conflict",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Forbidden { .. } => "forbidden",
            Self::Internal { .. } => "internal_error",
            Self::Unavailable { .. } => "service_unavailable",
        }
    }

    /// Convenience constructor for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Error::InvalidTarget, "invalid_target")]
    #[case(Error::MalformedToken { token: "UP".into() }, "malformed_token")]
    #[case(Error::RecipeNotFound { id: 7 }, "recipe_not_found")]
    #[case(Error::DuplicateRelation { kind: RelationKind::Favorite }, "duplicate_relation")]
    #[case(Error::RelationNotFound { kind: RelationKind::Cart }, "relation_not_found")]
    fn codes_are_stable(#[case] error: Error, #[case] code: &str) {
        assert_eq!(error.code(), code);
    }

    #[rstest]
    fn unknown_ingredient_lists_every_missing_id() {
        let error = Error::UnknownIngredient { ids: vec![3, 9] };
        assert!(error.to_string().contains('3'));
        assert!(error.to_string().contains('9'));
    }
}
