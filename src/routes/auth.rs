//! Login entry points and logout.

use crate::auth::flow::{AuthOutcome, AuthRequest, LoginPayload};
use crate::auth::middleware::{AppState, PresentedSession};
use crate::auth::session;
use crate::error::AppError;
use crate::models::AuthQuery;
use crate::page;
use crate::storage::IdentityStore;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
};

pub const MSG_LOGGED_IN: &str = "Nice! You logged in!";
pub const MSG_WELCOME_BACK: &str = "Welcome back! You are logged in.";

/// GET / and GET /login — show the widget, accept a login, or check a session
pub async fn entry<S: IdentityStore>(
    State(state): State<AppState<S>>,
    PresentedSession(session): PresentedSession,
    query: Result<Query<AuthQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    // An undecodable query only matters when there is no session to resume.
    let login_payload = match query {
        Ok(Query(query)) => query.auth_data.map(LoginPayload::Raw),
        Err(rejection) => Some(LoginPayload::Unreadable(rejection.body_text())),
    };
    let request = AuthRequest {
        login_payload,
        session,
    };

    let response = match state.authenticator().authenticate(request).await? {
        AuthOutcome::Prompt => Html(page::login_prompt(&state.config.bot_username)).into_response(),
        AuthOutcome::LoggedIn { cookies, .. } => {
            let mut headers = HeaderMap::new();
            for cookie in cookies {
                headers.append(header::SET_COOKIE, cookie);
            }
            (headers, Html(page::message(MSG_LOGGED_IN))).into_response()
        }
        AuthOutcome::Resumed { .. } => Html(page::message(MSG_WELCOME_BACK)).into_response(),
    };

    Ok(response)
}

/// GET|POST /logout — expire both session cookies
pub async fn logout<S: IdentityStore>(
    State(state): State<AppState<S>>,
    PresentedSession(session): PresentedSession,
) -> Result<impl IntoResponse, AppError> {
    let cookies = session::clear(state.cookie_settings())
        .map_err(|e| AppError::Internal(format!("Session cookie: {}", e)))?;

    let mut headers = HeaderMap::new();
    for cookie in cookies {
        headers.append(header::SET_COOKIE, cookie);
    }

    if let Some(session) = session {
        tracing::info!(action = "logout", user_id = %session.identifier, "User logged out");
    }

    Ok((headers, Redirect::to("/")))
}

/// GET /login.js — widget loader
pub async fn login_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        page::LOGIN_SCRIPT,
    )
}
