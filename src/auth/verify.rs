//! HMAC-SHA256 verification of widget payloads.

use super::canonical::{canonicalize, CanonicalError};
use super::payload::SignedPayload;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded HMAC-SHA256 tag.
const SIGNATURE_HEX_LEN: usize = 64;

/// Key the provider signs login payloads with: `SHA256(bot_token)`.
///
/// Derived once at startup and shared read-only by every request.
pub struct ProviderSecretKey(Zeroizing<[u8; 32]>);

impl ProviderSecretKey {
    pub fn from_bot_token(bot_token: &str) -> Self {
        let digest = Sha256::digest(bot_token.as_bytes());
        let mut key = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&digest);
        Self(key)
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.0.as_slice()).expect("HMAC accepts keys of any length")
    }
}

impl std::fmt::Debug for ProviderSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ProviderSecretKey([REDACTED])")
    }
}

/// Compute the lowercase hex signature the provider would attach to `payload`.
pub fn sign(payload: &SignedPayload, key: &ProviderSecretKey) -> Result<String, CanonicalError> {
    let canonical = canonicalize(payload)?;
    let mut mac = key.mac();
    mac.update(canonical.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify the claimed signature of a widget payload.
///
/// # Returns
/// * `true` only if the payload carries a signature, has at least one signed field, and
///   the signature equals the lowercase hex HMAC of the canonical string
/// * `false` in every other case (fails closed)
pub fn verify(payload: &SignedPayload, key: &ProviderSecretKey) -> bool {
    let Some(claimed) = payload.signature() else {
        return false;
    };

    let Ok(canonical) = canonicalize(payload) else {
        return false;
    };

    // The provider emits lowercase hex; anything else cannot be a matching string.
    if claimed.len() != SIGNATURE_HEX_LEN
        || !claimed
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    {
        return false;
    }

    let Ok(claimed_bytes) = hex::decode(claimed) else {
        return false;
    };

    let mut mac = key.mac();
    mac.update(canonical.as_bytes());

    // Constant-time tag comparison.
    mac.verify_slice(&claimed_bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::payload::SIGNATURE_FIELD;

    const BOT_TOKEN: &str = "123456789:AAE-test-token-for-unit-tests";

    fn key() -> ProviderSecretKey {
        ProviderSecretKey::from_bot_token(BOT_TOKEN)
    }

    fn sample() -> SignedPayload {
        SignedPayload::new()
            .with_field("id", 42)
            .with_field("first_name", "A")
            .with_field("auth_date", 100)
    }

    fn expected_hex(key_bytes: &[u8], message: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(key_bytes).unwrap();
        mac.update(message.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_verify_known_vector() {
        let key_bytes = Sha256::digest(BOT_TOKEN.as_bytes());
        let signature = expected_hex(&key_bytes, "auth_date=100\nfirst_name=A\nid=42");

        let payload = sample().with_field(SIGNATURE_FIELD, &signature);
        assert!(verify(&payload, &key()));
        assert_eq!(sign(&sample(), &key()).unwrap(), signature);
    }

    #[test]
    fn test_verify_detects_single_character_flip() {
        let signature = sign(&sample(), &key()).unwrap();

        for (field, tampered) in [("id", "43"), ("first_name", "B"), ("auth_date", "101")] {
            let payload = sample()
                .with_field(field, tampered)
                .with_field(SIGNATURE_FIELD, &signature);
            assert!(!verify(&payload, &key()), "flipping {field} must fail");
        }
    }

    #[test]
    fn test_verify_detects_added_field() {
        let signature = sign(&sample(), &key()).unwrap();
        let payload = sample()
            .with_field("username", "mallory")
            .with_field(SIGNATURE_FIELD, signature);
        assert!(!verify(&payload, &key()));
    }

    #[test]
    fn test_verify_detects_signature_flip() {
        let mut signature = sign(&sample(), &key()).unwrap();
        let last = signature.pop().unwrap();
        signature.push(if last == '0' { '1' } else { '0' });

        let payload = sample().with_field(SIGNATURE_FIELD, signature);
        assert!(!verify(&payload, &key()));
    }

    #[test]
    fn test_verify_signature_only_payload_fails() {
        let signature = sign(&sample(), &key()).unwrap();
        let payload = SignedPayload::new().with_field(SIGNATURE_FIELD, signature);
        assert!(!verify(&payload, &key()));

        let payload = SignedPayload::new().with_field(SIGNATURE_FIELD, "");
        assert!(!verify(&payload, &key()));
    }

    #[test]
    fn test_verify_missing_signature_fails() {
        assert!(!verify(&sample(), &key()));
    }

    #[test]
    fn test_verify_rejects_uppercase_hex() {
        let signature = sign(&sample(), &key()).unwrap().to_uppercase();
        let payload = sample().with_field(SIGNATURE_FIELD, signature);
        assert!(!verify(&payload, &key()));
    }

    #[test]
    fn test_verify_rejects_wrong_length() {
        let signature = sign(&sample(), &key()).unwrap();
        let payload = sample().with_field(SIGNATURE_FIELD, &signature[..32]);
        assert!(!verify(&payload, &key()));

        let payload = sample().with_field(SIGNATURE_FIELD, format!("{signature}00"));
        assert!(!verify(&payload, &key()));
    }

    #[test]
    fn test_verify_wrong_key_fails() {
        let signature = sign(&sample(), &key()).unwrap();
        let payload = sample().with_field(SIGNATURE_FIELD, signature);
        let other = ProviderSecretKey::from_bot_token("987654321:other-token");
        assert!(!verify(&payload, &other));
    }

    #[test]
    fn test_verify_is_repeatable() {
        let signature = sign(&sample(), &key()).unwrap();
        let payload = sample().with_field(SIGNATURE_FIELD, signature);
        let key = key();
        assert!(verify(&payload, &key));
        assert!(verify(&payload, &key));
    }

    #[test]
    fn test_sign_empty_payload() {
        assert_eq!(
            sign(&SignedPayload::new(), &key()),
            Err(CanonicalError::EmptyPayload)
        );
    }

    #[test]
    fn test_secret_key_debug_redacted() {
        let rendered = format!("{:?}", key());
        assert_eq!(rendered, "ProviderSecretKey([REDACTED])");
    }
}
