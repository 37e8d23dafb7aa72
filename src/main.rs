//! tglogin application entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Connect to Redis and verify it answers
//! 3. Derive the provider key from the bot token (once)
//! 4. Build router with security headers middleware
//! 5. Start Axum server

use tglogin::{auth::AppState, config::Config, storage::RedisIdentityStore};

#[tokio::main]
async fn main() {
    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config from environment
    let config = Config::from_env().expect("Failed to load config");
    tracing::info!("Starting tglogin on {}", config.bind_addr);

    // Connect to Redis
    let store = RedisIdentityStore::open(&config.redis_url).expect("Invalid Redis URL");
    store.ping().await.expect("Failed to connect to Redis");

    let bind_addr = config.bind_addr;
    let bot_username = config.bot_username.clone();
    let state = AppState::new(store, config);
    tracing::info!(bot = %bot_username, "Telegram login configured");

    let app = tglogin::app(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
