//! Relation toggle service shared by favorite, cart, and subscription.

use std::sync::Arc;

use crate::domain::ports::{
    map_repository_error, RecipeRepository, RelationRepository, UserRepository,
};
use crate::domain::relation::{RecipeRelationFlags, RelationPair};
use crate::domain::recipe::RecipeId;
use crate::domain::user::{Actor, UserId};
use crate::domain::Error;

/// One generic toggle implementation parameterised by the relation pair.
///
/// Duplicate detection is delegated to the storage layer's uniqueness
/// constraints; the service only interprets the affected-row outcome, so two
/// concurrent identical requests cannot both report success.
#[derive(Clone)]
pub struct RelationService {
    relations: Arc<dyn RelationRepository>,
    recipes: Arc<dyn RecipeRepository>,
    users: Arc<dyn UserRepository>,
}

impl RelationService {
    /// Create a new service with the given repositories.
    pub fn new(
        relations: Arc<dyn RelationRepository>,
        recipes: Arc<dyn RecipeRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            relations,
            recipes,
            users,
        }
    }

    /// Add the pair; fails with [`Error::DuplicateRelation`] when it already
    /// exists. Self-subscription fails with [`Error::InvalidTarget`] before
    /// any storage access.
    pub async fn toggle(&self, pair: RelationPair) -> Result<(), Error> {
        if let RelationPair::Subscription { subscriber, author } = &pair {
            if subscriber == author {
                return Err(Error::InvalidTarget);
            }
        }
        self.ensure_target_exists(&pair).await?;

        let created = self
            .relations
            .insert(&pair)
            .await
            .map_err(map_repository_error)?;
        if created {
            Ok(())
        } else {
            Err(Error::DuplicateRelation { kind: pair.kind() })
        }
    }

    /// Remove the pair; fails with [`Error::RelationNotFound`] when it does
    /// not exist.
    pub async fn untoggle(&self, pair: RelationPair) -> Result<(), Error> {
        if let RelationPair::Subscription { subscriber, author } = &pair {
            if subscriber == author {
                return Err(Error::InvalidTarget);
            }
        }
        self.ensure_target_exists(&pair).await?;

        let deleted = self
            .relations
            .delete(&pair)
            .await
            .map_err(map_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::RelationNotFound { kind: pair.kind() })
        }
    }

    /// Favorite/cart flags decorating a recipe DTO. Anonymous actors always
    /// see `false`.
    pub async fn recipe_flags(
        &self,
        actor: &Actor,
        recipe: RecipeId,
    ) -> Result<RecipeRelationFlags, Error> {
        let Some(user) = actor.user_id() else {
            return Ok(RecipeRelationFlags::default());
        };
        let is_favorited = self
            .relations
            .exists(&RelationPair::Favorite {
                user: *user,
                recipe,
            })
            .await
            .map_err(map_repository_error)?;
        let is_in_shopping_cart = self
            .relations
            .exists(&RelationPair::Cart {
                user: *user,
                recipe,
            })
            .await
            .map_err(map_repository_error)?;
        Ok(RecipeRelationFlags {
            is_favorited,
            is_in_shopping_cart,
        })
    }

    /// Subscription flag decorating a user DTO.
    pub async fn is_subscribed(&self, actor: &Actor, author: &UserId) -> Result<bool, Error> {
        let Some(subscriber) = actor.user_id() else {
            return Ok(false);
        };
        self.relations
            .exists(&RelationPair::Subscription {
                subscriber: *subscriber,
                author: *author,
            })
            .await
            .map_err(map_repository_error)
    }

    async fn ensure_target_exists(&self, pair: &RelationPair) -> Result<(), Error> {
        match pair {
            RelationPair::Favorite { recipe, .. } | RelationPair::Cart { recipe, .. } => {
                let found = self
                    .recipes
                    .exists(*recipe)
                    .await
                    .map_err(map_repository_error)?;
                if found {
                    Ok(())
                } else {
                    Err(Error::RecipeNotFound { id: *recipe })
                }
            }
            RelationPair::Subscription { author, .. } => {
                let found = self
                    .users
                    .find_by_id(author)
                    .await
                    .map_err(map_repository_error)?;
                if found.is_some() {
                    Ok(())
                } else {
                    Err(Error::UserNotFound {
                        id: *author.as_uuid(),
                    })
                }
            }
        }
    }
}
