//! Record persistence
//!
//! [`RecordStore`] is the seam between the gateway and the database. Every
//! call receives the variant's schema, so one store instance serves all
//! variants (one table each).

pub mod sqlite;

pub use sqlite::SqliteStore;

use crate::record::Record;
use crate::schema::{RecordSchema, Values};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("corrupt row in '{table}': {reason}")]
    CorruptRow { table: String, reason: String },
    #[error("store worker failed: {0}")]
    Worker(String),
    #[error("store connection lock poisoned")]
    Poisoned,
    #[error("cannot create database directory: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations over one variant's table.
///
/// `values` passed to `insert`/`update` are already validated and carry every
/// declared field.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create the variant's table if it does not exist
    async fn ensure_table(&self, schema: &RecordSchema) -> StoreResult<()>;

    /// Records newest first, optionally filtered on title or content substring
    async fn list(&self, schema: &RecordSchema, filter: Option<&str>) -> StoreResult<Vec<Record>>;

    async fn get(&self, schema: &RecordSchema, id: i64) -> StoreResult<Option<Record>>;

    async fn insert(&self, schema: &RecordSchema, values: &Values) -> StoreResult<Record>;

    /// Overwrite every declared field; `None` when no row has this id
    async fn update(&self, schema: &RecordSchema, id: i64, values: &Values) -> StoreResult<Option<Record>>;

    /// `false` when no row has this id
    async fn delete(&self, schema: &RecordSchema, id: i64) -> StoreResult<bool>;
}
