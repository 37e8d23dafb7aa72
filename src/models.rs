//! Request and storage models.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request Models
// ============================================================================

/// Query string accepted by the login entry points.
#[derive(Debug, Default, Deserialize)]
pub struct AuthQuery {
    /// URL-encoded JSON object produced by the Telegram Login widget.
    pub auth_data: Option<String>,
}

// ============================================================================
// Storage Models
// ============================================================================

/// Identity record as stored in Redis.
///
/// One record per external identifier; each successful login overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: i64,
    pub last_accepted_signature: String,
    /// Unix seconds of the login that produced the signature.
    pub accepted_at: u64,
}

impl IdentityRecord {
    pub fn new(id: i64, signature: &str) -> Self {
        Self {
            id,
            last_accepted_signature: signature.to_string(),
            accepted_at: unix_now(),
        }
    }
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
