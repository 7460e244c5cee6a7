//! Contact persistence.
//!
//! Stores assign `id` and `createdAt` on insert and list newest first.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::api::models::{Contact, NewContact};
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// Checks that the backing storage can be reached.
    async fn connect(&self) -> Result<(), StoreError>;

    async fn insert(&self, contact: NewContact) -> Result<Contact, StoreError>;

    async fn list_all(&self) -> Result<Vec<Contact>, StoreError>;

    /// Returns the removed record, or `None` when no record has that id.
    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Contact>, StoreError>;
}

/// Creation timestamps keep millisecond precision so the stored value and the
/// one handed back from `insert` compare equal.
pub(crate) fn creation_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
