//! Record store: the `InvestmentStore` contract plus in-memory and Postgres backends.

mod investments;
mod memory;
mod pool;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::types::investment::Investment;

pub use investments::PgStore;
pub use memory::MemoryStore;
pub use pool::{create_pool_and_migrate, run_migrations};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Key-value table of investments keyed by id, with a secondary index on owner.
///
/// Every method is a single store operation; there are no multi-record
/// transactions. Concurrent writers to the same id race with last-writer-wins.
#[async_trait]
pub trait InvestmentStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Investment>, StoreError>;

    async fn insert(&self, investment: &Investment) -> Result<(), StoreError>;

    /// Replace the mutable fields of an existing record. Returns `None` if the
    /// id no longer exists.
    async fn update(&self, investment: &Investment) -> Result<Option<Investment>, StoreError>;

    /// Returns `true` if a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Investment>, StoreError>;
}
