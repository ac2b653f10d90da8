use crate::error::StorageError;
use crate::models::SearchFilter;
use async_trait::async_trait;
use filterbot_core::UserIdentity;

/// Persistence collaborator of the wizard: append-only user upsert and filter insert.
#[async_trait]
pub trait FilterStore: Send + Sync {
    /// Inserts the user if unknown; an existing row is left untouched. Returns the row id.
    async fn upsert_user(&self, user: &UserIdentity) -> Result<i64, StorageError>;

    /// Upserts `user` and inserts `filter` linked to it. Returns the new filter id.
    async fn insert_filter(
        &self,
        user: &UserIdentity,
        filter: &SearchFilter,
    ) -> Result<i64, StorageError>;
}
