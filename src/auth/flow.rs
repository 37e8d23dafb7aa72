//! Per-request authentication decision.
//!
//! ```text
//! no session, no payload   -> Prompt
//! no session, payload      -> verify -> upsert -> issue cookies -> LoggedIn
//!                                    \-> SignatureMismatch
//! session cookies present  -> lookup -> compare -> Resumed
//!                                               \-> SessionTampered
//! ```
//!
//! Session cookies take precedence: when both are present the payload is ignored, even
//! one whose query string could not be decoded.
//! Rejections never write a record or a cookie.

use super::payload::SignedPayload;
use super::session::{self, CookieSettings, SessionCookies};
use super::verify::{verify, ProviderSecretKey};
use crate::error::{AppError, TamperReason};
use crate::models::unix_now;
use crate::storage::IdentityStore;
use axum::http::HeaderValue;
use subtle::ConstantTimeEq;

/// How far in the future a login's `auth_date` may lie before it is refused.
pub const MAX_CLOCK_SKEW_SECS: u64 = 60;

/// Login data as it arrived in the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginPayload {
    /// Raw `auth_data` JSON, already URL-decoded.
    Raw(String),
    /// The query string could not be decoded; holds the reason for the log.
    Unreadable(String),
}

impl From<String> for LoginPayload {
    fn from(raw: String) -> Self {
        LoginPayload::Raw(raw)
    }
}

/// Inputs the controller needs from one request.
#[derive(Debug, Default, Clone)]
pub struct AuthRequest {
    pub login_payload: Option<LoginPayload>,
    pub session: Option<SessionCookies>,
}

/// Which branch a request enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    NoSession,
    LoginAttempt,
    ReturningSession,
}

impl AuthRequest {
    pub fn entry(&self) -> Entry {
        match (&self.session, &self.login_payload) {
            (Some(_), _) => Entry::ReturningSession,
            (None, Some(_)) => Entry::LoginAttempt,
            (None, None) => Entry::NoSession,
        }
    }
}

/// Accepted outcomes. Rejections are returned as [`AppError`].
#[derive(Debug)]
pub enum AuthOutcome {
    /// Render the login widget.
    Prompt,
    /// Fresh login verified and recorded; both cookies must be set on the response.
    LoggedIn {
        identifier: i64,
        cookies: [HeaderValue; 2],
    },
    /// Session cookies matched the identity record.
    Resumed { identifier: i64 },
}

/// Login policy knobs beyond signature verification.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginPolicy {
    pub cookies: CookieSettings,
    /// Reject logins whose `auth_date` is older than this many seconds (0 disables).
    pub max_auth_age_secs: u64,
}

/// Drives one request through the authentication state machine.
pub struct Authenticator<'a, S> {
    store: &'a S,
    key: &'a ProviderSecretKey,
    policy: LoginPolicy,
}

impl<'a, S: IdentityStore> Authenticator<'a, S> {
    pub fn new(store: &'a S, key: &'a ProviderSecretKey, policy: LoginPolicy) -> Self {
        Self { store, key, policy }
    }

    pub async fn authenticate(&self, request: AuthRequest) -> Result<AuthOutcome, AppError> {
        let AuthRequest {
            login_payload,
            session,
        } = request;

        match (session, login_payload) {
            (Some(session), _) => self.resume(&session).await,
            (None, Some(LoginPayload::Raw(raw))) => self.login(&raw).await,
            (None, Some(LoginPayload::Unreadable(reason))) => {
                Err(AppError::MalformedPayload(reason))
            }
            (None, None) => Ok(AuthOutcome::Prompt),
        }
    }

    async fn login(&self, raw: &str) -> Result<AuthOutcome, AppError> {
        let payload =
            SignedPayload::from_json(raw).map_err(|e| AppError::MalformedPayload(e.to_string()))?;

        let Some(signature) = payload.signature() else {
            return Err(AppError::MalformedPayload("missing signature".to_string()));
        };

        if !verify(&payload, self.key) {
            tracing::warn!(action = "auth_failed", "Invalid signature");
            return Err(AppError::SignatureMismatch);
        }

        // Only signed data is trusted past this point.
        let identifier = payload
            .identifier()
            .map_err(|e| AppError::MalformedPayload(e.to_string()))?;

        if self.policy.max_auth_age_secs > 0 {
            let auth_date = payload
                .auth_date()
                .map_err(|e| AppError::MalformedPayload(e.to_string()))?;
            let now = unix_now();
            if now.saturating_sub(auth_date) > self.policy.max_auth_age_secs
                || auth_date > now.saturating_add(MAX_CLOCK_SKEW_SECS)
            {
                tracing::warn!(action = "auth_failed", user_id = %identifier, "Login data expired");
                return Err(AppError::LoginExpired);
            }
        }

        self.store.upsert(identifier, signature).await?;

        let cookies = session::issue(identifier, signature, self.policy.cookies)
            .map_err(|e| AppError::Internal(format!("Session cookie: {}", e)))?;

        tracing::info!(action = "auth_success", user_id = %identifier, "User authenticated");

        Ok(AuthOutcome::LoggedIn {
            identifier,
            cookies,
        })
    }

    async fn resume(&self, session: &SessionCookies) -> Result<AuthOutcome, AppError> {
        let Ok(identifier) = session.identifier.parse::<i64>() else {
            tracing::warn!(action = "session_tampered", "Non-numeric session identifier");
            return Err(AppError::SessionTampered(TamperReason::UnknownIdentity));
        };

        let Some(record) = self.store.lookup(identifier).await? else {
            tracing::warn!(action = "session_tampered", user_id = %identifier, "Unknown session identifier");
            return Err(AppError::SessionTampered(TamperReason::UnknownIdentity));
        };

        let stored = record.last_accepted_signature.as_bytes();
        let presented = session.signature.as_bytes();
        if stored.len() != presented.len() || !bool::from(stored.ct_eq(presented)) {
            tracing::warn!(action = "session_tampered", user_id = %identifier, "Session signature mismatch");
            return Err(AppError::SessionTampered(TamperReason::SignatureMismatch));
        }

        tracing::debug!(action = "session_resumed", user_id = %identifier, "Session accepted");
        Ok(AuthOutcome::Resumed { identifier })
    }
}
