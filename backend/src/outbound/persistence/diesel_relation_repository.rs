//! PostgreSQL-backed `RelationRepository` implementation using Diesel ORM.
//!
//! All three relation kinds are composite-primary-key pair tables, so every
//! operation has the same shape: insert uses `ON CONFLICT DO NOTHING` and
//! reports creation through the affected-row count, never check-then-insert.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::RelationPair;
use crate::domain::ports::{RelationRepository, RepositoryError};

use super::diesel_errors::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::schema::{cart_items, favorites, subscriptions};

/// Diesel-backed implementation of the `RelationRepository` port.
#[derive(Clone)]
pub struct DieselRelationRepository {
    pool: DbPool,
}

impl DieselRelationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationRepository for DieselRelationRepository {
    async fn insert(&self, pair: &RelationPair) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let inserted = match pair {
            RelationPair::Favorite { user, recipe } => {
                diesel::insert_into(favorites::table)
                    .values((
                        favorites::user_id.eq(user.as_uuid()),
                        favorites::recipe_id.eq(recipe),
                    ))
                    .on_conflict_do_nothing()
                    .execute(&mut conn)
                    .await
            }
            RelationPair::Cart { user, recipe } => {
                diesel::insert_into(cart_items::table)
                    .values((
                        cart_items::user_id.eq(user.as_uuid()),
                        cart_items::recipe_id.eq(recipe),
                    ))
                    .on_conflict_do_nothing()
                    .execute(&mut conn)
                    .await
            }
            RelationPair::Subscription { subscriber, author } => {
                diesel::insert_into(subscriptions::table)
                    .values((
                        subscriptions::subscriber_id.eq(subscriber.as_uuid()),
                        subscriptions::author_id.eq(author.as_uuid()),
                    ))
                    .on_conflict_do_nothing()
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;

        Ok(inserted > 0)
    }

    async fn delete(&self, pair: &RelationPair) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = match pair {
            RelationPair::Favorite { user, recipe } => {
                diesel::delete(favorites::table.find((user.as_uuid(), recipe)))
                    .execute(&mut conn)
                    .await
            }
            RelationPair::Cart { user, recipe } => {
                diesel::delete(cart_items::table.find((user.as_uuid(), recipe)))
                    .execute(&mut conn)
                    .await
            }
            RelationPair::Subscription { subscriber, author } => {
                diesel::delete(
                    subscriptions::table.find((subscriber.as_uuid(), author.as_uuid())),
                )
                .execute(&mut conn)
                .await
            }
        }
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn exists(&self, pair: &RelationPair) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        match pair {
            RelationPair::Favorite { user, recipe } => {
                diesel::select(diesel::dsl::exists(
                    favorites::table.find((user.as_uuid(), recipe)),
                ))
                .get_result(&mut conn)
                .await
            }
            RelationPair::Cart { user, recipe } => {
                diesel::select(diesel::dsl::exists(
                    cart_items::table.find((user.as_uuid(), recipe)),
                ))
                .get_result(&mut conn)
                .await
            }
            RelationPair::Subscription { subscriber, author } => {
                diesel::select(diesel::dsl::exists(
                    subscriptions::table.find((subscriber.as_uuid(), author.as_uuid())),
                ))
                .get_result(&mut conn)
                .await
            }
        }
        .map_err(map_diesel_error)
    }
}
