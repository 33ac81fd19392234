//! Unique-pair relations between users and recipes or other users.
//!
//! Favorite, shopping cart, and subscription all share the same shape: a
//! unique (actor, target) pair whose existence is the only state. One pair
//! type and one service cover all three instead of three copies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::recipe::RecipeId;
use crate::domain::user::UserId;

/// The three relation kinds, used for error reporting and adapter dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Favorite,
    Cart,
    Subscription,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Favorite => "favorite",
            Self::Cart => "shopping cart",
            Self::Subscription => "subscription",
        };
        f.write_str(name)
    }
}

/// A concrete (actor, target) pair.
///
/// Favorite and cart pair a user with a recipe; subscription pairs a
/// subscriber with an author. Uniqueness of each pair is enforced by storage,
/// not by a check-then-insert in application code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationPair {
    Favorite { user: UserId, recipe: RecipeId },
    Cart { user: UserId, recipe: RecipeId },
    Subscription { subscriber: UserId, author: UserId },
}

impl RelationPair {
    /// The kind of this pair.
    pub const fn kind(&self) -> RelationKind {
        match self {
            Self::Favorite { .. } => RelationKind::Favorite,
            Self::Cart { .. } => RelationKind::Cart,
            Self::Subscription { .. } => RelationKind::Subscription,
        }
    }
}

/// Boolean relation flags decorating a recipe representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecipeRelationFlags {
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pair_reports_its_kind() {
        let user = UserId::random();
        assert_eq!(
            RelationPair::Favorite { user, recipe: 1 }.kind(),
            RelationKind::Favorite
        );
        assert_eq!(
            RelationPair::Cart { user, recipe: 1 }.kind(),
            RelationKind::Cart
        );
        assert_eq!(
            RelationPair::Subscription {
                subscriber: user,
                author: UserId::random(),
            }
            .kind(),
            RelationKind::Subscription
        );
    }
}
