//! Identity Redis operations.
//!
//! Redis key patterns:
//! - `identity:{id}` — identity record (JSON)
//!
//! Each upsert is a single `SET` of the whole record, so concurrent logins for the same
//! identifier never interleave: the last writer wins with a complete record.

use super::{IdentityStore, StoreError};
use crate::models::IdentityRecord;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use zeroize::Zeroizing;

fn identity_key(id: i64) -> String {
    format!("identity:{}", id)
}

/// Store an identity record, replacing any previous one (no TTL).
pub async fn store_identity<C>(con: &mut C, record: &IdentityRecord) -> Result<(), StoreError>
where
    C: AsyncCommands,
{
    let json = serde_json::to_string(record)?;
    con.set::<_, _, ()>(identity_key(record.id), json).await?;
    Ok(())
}

/// Get an identity record by external identifier.
///
/// The record JSON is zeroized after deserialization.
pub async fn get_identity<C>(con: &mut C, id: i64) -> Result<Option<IdentityRecord>, StoreError>
where
    C: AsyncCommands,
{
    let json: Option<String> = con.get(identity_key(id)).await?;

    match json {
        Some(data) => {
            let zeroizing_data = Zeroizing::new(data);
            let record = serde_json::from_str(&zeroizing_data)?;
            Ok(Some(record))
        }
        None => Ok(None),
    }
}

/// Redis-backed [`IdentityStore`].
#[derive(Clone)]
pub struct RedisIdentityStore {
    client: redis::Client,
}

impl RedisIdentityStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    pub fn open(redis_url: &str) -> Result<Self, StoreError> {
        Ok(Self::new(redis::Client::open(redis_url)?))
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    /// Round-trip a `PING` to confirm the server is reachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut con = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut con).await?;
        Ok(())
    }
}

impl IdentityStore for RedisIdentityStore {
    async fn upsert(&self, identifier: i64, signature: &str) -> Result<(), StoreError> {
        let mut con = self.connection().await?;
        store_identity(&mut con, &IdentityRecord::new(identifier, signature)).await
    }

    async fn lookup(&self, identifier: i64) -> Result<Option<IdentityRecord>, StoreError> {
        let mut con = self.connection().await?;
        get_identity(&mut con, identifier).await
    }
}
