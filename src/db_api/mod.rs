//! # Persistence of search results
//!
//! Issues and pull requests are stored whole, as JSON, next to the few columns needed for lookups:
//!
//! ```text
//! "id" INTEGER PRIMARY KEY,
//! "repository" TEXT NOT NULL,
//! "number" INTEGER NOT NULL,
//! "is_pull_request" INTEGER NOT NULL,
//! "state" TEXT NOT NULL,
//! "updated_at" TEXT NOT NULL,
//! "data" TEXT NOT NULL
//! ```
//!
//! Rows are only ever inserted or replaced by primary key, there are no other invariants.

pub mod create;
pub mod db_connection;
pub mod delete;
pub mod insert;
pub mod query_db;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Failed to convert item to or from json:\n{0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Id {0} does not fit in a SQLite integer")]
    IdOutOfRange(u64),
}

/// Timestamps are stored in a fixed width UTC format so they compare correctly as text
pub(crate) fn format_timestamp(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    timestamp.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

pub(crate) fn sql_id(id: u64) -> Result<i64, StoreError> {
    i64::try_from(id).map_err(|_| StoreError::IdOutOfRange(id))
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> sqlx::SqlitePool {
    // single connection, every new connection would get its own empty database
    sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}
