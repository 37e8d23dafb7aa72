//! Signed login payload delivered by the Telegram Login widget.
//!
//! The widget hands the page a flat JSON object (`id`, `first_name`, `username`,
//! `auth_date`, `hash`, ...). Every field except `hash` is covered by the signature,
//! so values are normalized to the exact text the provider signed.

use serde_json::Value;
use std::collections::BTreeMap;

/// Wire name of the signature field.
pub const SIGNATURE_FIELD: &str = "hash";

/// Wire name of the external user identifier.
pub const IDENTIFIER_FIELD: &str = "id";

/// Wire name of the login timestamp (unix seconds).
pub const AUTH_DATE_FIELD: &str = "auth_date";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("payload must be a JSON object")]
    NotAnObject,

    #[error("unsupported value type for field '{0}'")]
    UnsupportedValue(String),

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{0}' is not a valid integer")]
    InvalidInteger(&'static str),
}

/// Field mapping plus the claimed signature.
///
/// Fields are kept in a `BTreeMap` so iteration order is ascending byte order of the key,
/// which is the order the canonical string requires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedPayload {
    fields: BTreeMap<String, String>,
    signature: Option<String>,
}

impl SignedPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`SignedPayload::insert`].
    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a field. The signature field is routed to [`SignedPayload::signature`].
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        if key == SIGNATURE_FIELD {
            self.signature = Some(value.to_string());
        } else {
            self.fields.insert(key, value.to_string());
        }
    }

    /// Parse the widget's JSON object.
    ///
    /// Strings are kept verbatim and integers are rendered base-10. Any other JSON type
    /// (floats, booleans, null, nested values) was never produced by the widget and is
    /// rejected rather than guessed at.
    pub fn from_json(raw: &str) -> Result<Self, PayloadError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| PayloadError::InvalidJson(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(PayloadError::NotAnObject);
        };

        let mut payload = Self::new();
        for (key, value) in map {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) if key != SIGNATURE_FIELD && (n.is_i64() || n.is_u64()) => {
                    n.to_string()
                }
                _ => return Err(PayloadError::UnsupportedValue(key)),
            };
            payload.insert(key, text);
        }
        Ok(payload)
    }

    /// Signed fields in canonical order, signature excluded.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// External user identifier (`id`).
    pub fn identifier(&self) -> Result<i64, PayloadError> {
        self.fields
            .get(IDENTIFIER_FIELD)
            .ok_or(PayloadError::MissingField(IDENTIFIER_FIELD))?
            .parse()
            .map_err(|_| PayloadError::InvalidInteger(IDENTIFIER_FIELD))
    }

    /// Login timestamp (`auth_date`), if present.
    pub fn auth_date(&self) -> Result<u64, PayloadError> {
        self.fields
            .get(AUTH_DATE_FIELD)
            .ok_or(PayloadError::MissingField(AUTH_DATE_FIELD))?
            .parse()
            .map_err(|_| PayloadError::InvalidInteger(AUTH_DATE_FIELD))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_widget_object() {
        let payload = SignedPayload::from_json(
            r#"{"id":42,"first_name":"Ann","username":"ann","auth_date":1700000000,"hash":"abc123"}"#,
        )
        .unwrap();

        assert_eq!(payload.signature(), Some("abc123"));
        assert_eq!(payload.fields().len(), 4);
        assert_eq!(payload.fields()["id"], "42");
        assert_eq!(payload.fields()["auth_date"], "1700000000");
        assert_eq!(payload.fields()["first_name"], "Ann");
        assert!(!payload.fields().contains_key(SIGNATURE_FIELD));
        assert_eq!(payload.identifier().unwrap(), 42);
        assert_eq!(payload.auth_date().unwrap(), 1_700_000_000);
    }

    #[test]
    fn test_from_json_without_signature() {
        let payload = SignedPayload::from_json(r#"{"id":1}"#).unwrap();
        assert_eq!(payload.signature(), None);
    }

    #[test]
    fn test_from_json_large_identifier() {
        let payload = SignedPayload::from_json(r#"{"id":7000000001,"hash":"h"}"#).unwrap();
        assert_eq!(payload.identifier().unwrap(), 7_000_000_001);
    }

    #[test]
    fn test_from_json_rejects_invalid_json() {
        let result = SignedPayload::from_json("{not json");
        assert!(matches!(result, Err(PayloadError::InvalidJson(_))));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert_eq!(
            SignedPayload::from_json("[1,2,3]"),
            Err(PayloadError::NotAnObject)
        );
    }

    #[test]
    fn test_from_json_rejects_float_and_bool() {
        assert_eq!(
            SignedPayload::from_json(r#"{"id":1.5,"hash":"h"}"#),
            Err(PayloadError::UnsupportedValue("id".to_string()))
        );
        assert_eq!(
            SignedPayload::from_json(r#"{"id":1,"premium":true,"hash":"h"}"#),
            Err(PayloadError::UnsupportedValue("premium".to_string()))
        );
    }

    #[test]
    fn test_from_json_rejects_numeric_signature() {
        assert_eq!(
            SignedPayload::from_json(r#"{"id":1,"hash":1234}"#),
            Err(PayloadError::UnsupportedValue("hash".to_string()))
        );
    }

    #[test]
    fn test_identifier_missing_or_invalid() {
        let payload = SignedPayload::new().with_field("first_name", "A");
        assert_eq!(
            payload.identifier(),
            Err(PayloadError::MissingField(IDENTIFIER_FIELD))
        );

        let payload = SignedPayload::new().with_field("id", "12ab");
        assert_eq!(
            payload.identifier(),
            Err(PayloadError::InvalidInteger(IDENTIFIER_FIELD))
        );
    }

    #[test]
    fn test_builder_routes_signature() {
        let payload = SignedPayload::new()
            .with_field("id", 7)
            .with_field(SIGNATURE_FIELD, "deadbeef");
        assert_eq!(payload.signature(), Some("deadbeef"));
        assert_eq!(payload.fields().len(), 1);
        assert!(!payload.is_empty());
    }
}
