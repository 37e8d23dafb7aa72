//! Canonical data-check string.
//!
//! The provider signs `key=value` lines for every field except the signature, sorted by
//! key in byte order and joined by `\n` with no trailing newline. Any deviation changes
//! the signed bytes.

use super::payload::{SignedPayload, SIGNATURE_FIELD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CanonicalError {
    #[error("payload has no signed fields")]
    EmptyPayload,
}

/// Build the exact string the provider signed.
pub fn canonicalize(payload: &SignedPayload) -> Result<String, CanonicalError> {
    let mut out = String::new();

    for (key, value) in payload
        .fields()
        .iter()
        .filter(|(key, _)| key.as_str() != SIGNATURE_FIELD)
    {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }

    if out.is_empty() {
        return Err(CanonicalError::EmptyPayload);
    }
    Ok(out)
}
