//! Shared application state and the session cookie extractor.

use super::flow::{Authenticator, LoginPolicy};
use super::session::{read_session, CookieSettings, SessionCookies};
use super::verify::ProviderSecretKey;
use crate::config::Config;
use crate::storage::IdentityStore;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use std::sync::Arc;

/// Application state shared across handlers.
///
/// The provider key is derived from the bot token once, here, and never per request.
pub struct AppState<S> {
    pub store: Arc<S>,
    pub key: Arc<ProviderSecretKey>,
    pub config: Arc<Config>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: Arc::clone(&self.key),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: IdentityStore> AppState<S> {
    pub fn new(store: S, config: Config) -> Self {
        let key = ProviderSecretKey::from_bot_token(&config.bot_token);
        Self {
            store: Arc::new(store),
            key: Arc::new(key),
            config: Arc::new(config),
        }
    }

    pub fn cookie_settings(&self) -> CookieSettings {
        CookieSettings::from(self.config.as_ref())
    }

    pub fn authenticator(&self) -> Authenticator<'_, S> {
        let policy = LoginPolicy {
            cookies: self.cookie_settings(),
            max_auth_age_secs: self.config.auth_max_age_secs,
        };
        Authenticator::new(self.store.as_ref(), self.key.as_ref(), policy)
    }
}

/// Session cookie pair presented with the request, if both cookies are there.
///
/// Never rejects: a missing or partial pair is simply `None`.
pub struct PresentedSession(pub Option<SessionCookies>);

impl<S> FromRequestParts<S> for PresentedSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(PresentedSession(read_session(&parts.headers)))
    }
}
