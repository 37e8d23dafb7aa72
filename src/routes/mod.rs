//! HTTP route handlers.

pub mod auth;

use crate::auth::middleware::AppState;
use crate::storage::IdentityStore;
use axum::{routing::get, Router};

/// Build the router. `/` and `/login` are the same entry point.
pub fn router<S: IdentityStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(auth::entry::<S>))
        .route("/login", get(auth::entry::<S>))
        .route("/logout", get(auth::logout::<S>).post(auth::logout::<S>))
        .route("/login.js", get(auth::login_script))
}
