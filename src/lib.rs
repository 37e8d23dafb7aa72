pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod page;
pub mod routes;
pub mod storage;

use auth::middleware::AppState;
use axum::Router;
use storage::IdentityStore;
use tower_http::cors::CorsLayer;

/// Full application: routes, CORS deny-all, and security headers.
pub fn app<S: IdentityStore>(state: AppState<S>) -> Router {
    // CorsLayer::new() with no allowed origins rejects all CORS preflight requests.
    routes::router::<S>()
        .layer(CorsLayer::new())
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .with_state(state)
}
