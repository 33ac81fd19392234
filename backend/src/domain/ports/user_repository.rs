//! Port abstraction for user persistence adapters.

use async_trait::async_trait;

use crate::domain::user::{EmailAddress, User, UserId};

use super::RepositoryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Email and username uniqueness is enforced by
    /// storage; a clash surfaces as [`RepositoryError::UniqueViolation`].
    async fn insert(&self, user: &User) -> Result<(), RepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// Fetch a user by login email.
    async fn find_by_email(&self, email: &EmailAddress)
        -> Result<Option<User>, RepositoryError>;

    /// Replace the avatar reference. Returns `false` when the user is
    /// missing.
    async fn set_avatar<'a>(
        &self,
        id: &UserId,
        avatar: Option<&'a str>,
    ) -> Result<bool, RepositoryError>;

    /// Authors the given user is subscribed to, username-ascending.
    async fn subscribed_authors(
        &self,
        subscriber: &UserId,
    ) -> Result<Vec<User>, RepositoryError>;
}
