//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RepositoryError, UserRepository};
use crate::domain::{EmailAddress, User, UserId, Username};

use super::diesel_errors::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::{subscriptions, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert a database row to a domain [`User`].
///
/// Stored emails and usernames were validated on the way in; a row that no
/// longer parses indicates out-of-band writes and is reported as a query
/// error rather than silently dropped.
fn row_to_user(row: UserRow) -> Result<User, RepositoryError> {
    let username = Username::new(row.username)
        .map_err(|error| RepositoryError::query(format!("stored username invalid: {error}")))?;
    let email = EmailAddress::new(row.email)
        .map_err(|error| RepositoryError::query(format!("stored email invalid: {error}")))?;
    Ok(User {
        id: UserId::from_uuid(row.id),
        email,
        username,
        first_name: row.first_name,
        last_name: row.last_name,
        avatar: row.avatar,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            id: *user.id.as_uuid(),
            email: user.email.as_ref(),
            username: user.username.as_ref(),
            first_name: &user.first_name,
            last_name: &user.last_name,
            avatar: user.avatar.as_deref(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn set_avatar<'a>(
        &self,
        id: &UserId,
        avatar: Option<&'a str>,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set(users::avatar.eq(avatar))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn subscribed_authors(
        &self,
        subscriber: &UserId,
    ) -> Result<Vec<User>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Both subscription columns reference users, so the pair is resolved
        // in two queries instead of an ambiguous join.
        let author_ids: Vec<uuid::Uuid> = subscriptions::table
            .filter(subscriptions::subscriber_id.eq(subscriber.as_uuid()))
            .select(subscriptions::author_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(author_ids))
            .select(UserRow::as_select())
            .order_by(users::username.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn row_conversion_preserves_fields() {
        let id = uuid::Uuid::new_v4();
        let row = UserRow {
            id,
            email: "ada@example.com".to_owned(),
            username: "ada".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            avatar: Some("avatars/ada.png".to_owned()),
        };

        let user = row_to_user(row).expect("valid row");

        assert_eq!(user.id, UserId::from_uuid(id));
        assert_eq!(user.email.as_ref(), "ada@example.com");
        assert_eq!(user.username.as_ref(), "ada");
        assert_eq!(user.avatar.as_deref(), Some("avatars/ada.png"));
    }

    #[rstest]
    fn corrupt_username_surfaces_as_query_error() {
        let row = UserRow {
            id: uuid::Uuid::new_v4(),
            email: "ada@example.com".to_owned(),
            username: "not a handle".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            avatar: None,
        };

        let error = row_to_user(row).expect_err("invalid username");

        assert!(matches!(error, RepositoryError::Query { .. }));
    }
}
