//! User profile use-cases: registration, avatars, and subscriptions.
//!
//! Credential verification is the identity layer's job (out of scope); this
//! service only manages profile state and the subscription listing.

use std::sync::Arc;

use crate::domain::ports::{
    map_repository_error, RecipeRepository, RepositoryError, UserRepository,
};
use crate::domain::recipe::Recipe;
use crate::domain::user::{Actor, EmailAddress, User, UserId, Username};
use crate::domain::Error;

/// Registration payload after transport-level parsing.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// A subscribed-to author together with their recipes, for the
/// subscriptions listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorWithRecipes {
    pub author: User,
    pub recipes: Vec<Recipe>,
}

/// User service implementing profile and subscription reads and writes.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    recipes: Arc<dyn RecipeRepository>,
}

impl UserService {
    /// Create a new service with the given repositories.
    pub fn new(users: Arc<dyn UserRepository>, recipes: Arc<dyn RecipeRepository>) -> Self {
        Self { users, recipes }
    }

    /// Register a new user. Email and username uniqueness is enforced by the
    /// storage constraints, not by a prior lookup.
    pub async fn register(&self, registration: Registration) -> Result<User, Error> {
        let email = EmailAddress::new(registration.email)
            .map_err(|error| Error::validation(error.to_string()))?;
        let username = Username::new(registration.username)
            .map_err(|error| Error::validation(error.to_string()))?;
        let user = User::register(
            email,
            username,
            registration.first_name,
            registration.last_name,
        );

        match self.users.insert(&user).await {
            Ok(()) => Ok(user),
            Err(RepositoryError::UniqueViolation { .. }) => Err(Error::conflict(
                "a user with this email or username already exists",
            )),
            Err(error) => Err(map_repository_error(error)),
        }
    }

    /// Fetch a profile by identifier.
    pub async fn profile(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or(Error::UserNotFound { id: *id.as_uuid() })
    }

    /// Profile of the acting user.
    pub async fn me(&self, actor: &Actor) -> Result<User, Error> {
        let id = actor.require_user()?;
        self.profile(&id).await
    }

    /// Look a user up by login email for session establishment. The identity
    /// layer has already vouched for the credential.
    pub async fn identify(&self, email: &str) -> Result<User, Error> {
        let email = EmailAddress::new(email)
            .map_err(|error| Error::validation(error.to_string()))?;
        self.users
            .find_by_email(&email)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized("unknown email"))
    }

    /// Replace the acting user's avatar reference.
    pub async fn set_avatar(&self, actor: &Actor, avatar: String) -> Result<(), Error> {
        let id = actor.require_user()?;
        if avatar.trim().is_empty() {
            return Err(Error::validation("avatar must not be empty"));
        }
        let updated = self
            .users
            .set_avatar(&id, Some(&avatar))
            .await
            .map_err(map_repository_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::UserNotFound { id: *id.as_uuid() })
        }
    }

    /// Remove the acting user's avatar. Removing an absent avatar is a
    /// request error, mirroring the upstream contract.
    pub async fn delete_avatar(&self, actor: &Actor) -> Result<(), Error> {
        let id = actor.require_user()?;
        let user = self.profile(&id).await?;
        if user.avatar.is_none() {
            return Err(Error::validation("user has no avatar"));
        }
        let updated = self
            .users
            .set_avatar(&id, None)
            .await
            .map_err(map_repository_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::UserNotFound { id: *id.as_uuid() })
        }
    }

    /// Authors the acting user follows, each with their recipes.
    pub async fn subscriptions(&self, actor: &Actor) -> Result<Vec<AuthorWithRecipes>, Error> {
        let id = actor.require_user()?;
        let authors = self
            .users
            .subscribed_authors(&id)
            .await
            .map_err(map_repository_error)?;

        let mut listing = Vec::with_capacity(authors.len());
        for author in authors {
            let recipes = self
                .recipes
                .list_by_author(&author.id)
                .await
                .map_err(map_repository_error)?;
            listing.push(AuthorWithRecipes { author, recipes });
        }
        Ok(listing)
    }
}
