//! Error types and Axum response conversions.

use crate::page;
use crate::storage::StoreError;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Why a presented session was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TamperReason {
    /// `tg_user_id` is not an integer or has no identity record.
    UnknownIdentity,
    /// `tg_hash` differs from the last accepted signature.
    SignatureMismatch,
}

/// Application error types.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Malformed login payload: {0}")]
    MalformedPayload(String),

    #[error("Signature mismatch")]
    SignatureMismatch,

    #[error("Login data expired")]
    LoginExpired,

    #[error("Session tampered: {0:?}")]
    SessionTampered(TamperReason),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub const MSG_MALFORMED: &str = "Error: the login data could not be read. Please try again.";
pub const MSG_BAD_SIGNATURE: &str = "Error: Invalid signature!";
pub const MSG_EXPIRED: &str = "Error: the login data has expired. Please sign in again.";
pub const MSG_SUSPICIOUS: &str = "Hmm.. this session looks suspicious. Please sign in again.";
pub const MSG_ALTERED: &str = "Hmm.. your session cookies appear to have been altered.";
pub const MSG_UNAVAILABLE: &str = "Something went wrong. Please try again later.";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MalformedPayload(detail) => {
                tracing::warn!(action = "auth_failed", reason = %detail, "Malformed login payload");
                (StatusCode::BAD_REQUEST, MSG_MALFORMED)
            }
            AppError::SignatureMismatch => (StatusCode::UNAUTHORIZED, MSG_BAD_SIGNATURE),
            AppError::LoginExpired => (StatusCode::UNAUTHORIZED, MSG_EXPIRED),
            AppError::SessionTampered(TamperReason::UnknownIdentity) => {
                (StatusCode::UNAUTHORIZED, MSG_SUSPICIOUS)
            }
            AppError::SessionTampered(TamperReason::SignatureMismatch) => {
                (StatusCode::UNAUTHORIZED, MSG_ALTERED)
            }
            AppError::StoreUnavailable(msg) => {
                // Log detailed error server-side, return generic message to client
                tracing::error!(error = %msg, "Identity store unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, MSG_UNAVAILABLE)
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_UNAVAILABLE)
            }
        };

        (status, Html(page::message(message))).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }
}
