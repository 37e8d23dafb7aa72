//! Identity storage.
//!
//! The flow controller only needs two operations, `upsert` and `lookup`, expressed by
//! [`IdentityStore`]. Production uses Redis; tests and local runs can use the
//! in-memory store.

pub mod identity;
pub mod memory;

use crate::models::IdentityRecord;
use std::future::Future;

pub use identity::RedisIdentityStore;
pub use memory::MemoryIdentityStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Durable mapping from external identifier to last-accepted signature.
pub trait IdentityStore: Send + Sync + 'static {
    /// Create the record or overwrite its signature. All-or-nothing per identifier.
    fn upsert(
        &self,
        identifier: i64,
        signature: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn lookup(
        &self,
        identifier: i64,
    ) -> impl Future<Output = Result<Option<IdentityRecord>, StoreError>> + Send;
}
