//! Port abstraction for unique-pair relation storage.

use async_trait::async_trait;

use crate::domain::relation::RelationPair;

use super::RepositoryError;

/// One port covers all three relation kinds; the adapter dispatches on the
/// pair variant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelationRepository: Send + Sync {
    /// Atomic insert-if-absent. Returns `true` when the pair was created,
    /// `false` when it already existed. The atomicity is the storage
    /// engine's; adapters must not check-then-insert.
    async fn insert(&self, pair: &RelationPair) -> Result<bool, RepositoryError>;

    /// Atomic delete. Returns `true` when a pair was removed, `false` when
    /// none existed.
    async fn delete(&self, pair: &RelationPair) -> Result<bool, RepositoryError>;

    /// Whether the pair currently exists. Used for DTO flag decoration only.
    async fn exists(&self, pair: &RelationPair) -> Result<bool, RepositoryError>;
}
