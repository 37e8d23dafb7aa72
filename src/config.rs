use crate::auth::session::DEFAULT_SESSION_TTL_SECS;
use std::env;
use std::net::SocketAddr;

#[derive(Clone)]
pub struct Config {
    // Telegram bot
    pub bot_token: String,
    pub bot_username: String,

    // Redis
    pub redis_url: String,

    // Server
    pub bind_addr: SocketAddr,

    // Session cookies
    pub session_ttl_secs: u64,
    pub cookie_secure: bool,

    // Maximum age of a widget login in seconds (0 disables the check)
    pub auth_max_age_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"[REDACTED]")
            .field("bot_username", &self.bot_username)
            .field("redis_url", &"[REDACTED]")
            .field("bind_addr", &self.bind_addr)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("cookie_secure", &self.cookie_secure)
            .field("auth_max_age_secs", &self.auth_max_age_secs)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        let bot_token =
            env::var("BOT_TOKEN").map_err(|_| ConfigError::MissingVar("BOT_TOKEN".to_string()))?;
        validate_bot_token(&bot_token)?;

        let bot_username = env::var("BOT_USERNAME")
            .map_err(|_| ConfigError::MissingVar("BOT_USERNAME".to_string()))?;
        validate_bot_username(&bot_username)?;

        // Redis — required to prevent silent unauthenticated connections
        let redis_url =
            env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL".to_string()))?;

        // Server
        let bind_addr_str = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_addr = bind_addr_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::ParseError("BIND_ADDR".to_string(), e.to_string()))?;

        // Session cookies
        let session_ttl_secs = parse_env_or_default("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        if session_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_TTL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let cookie_secure = parse_env_or_default("COOKIE_SECURE", true)?;

        let auth_max_age_secs = parse_env_or_default("AUTH_MAX_AGE_SECS", 0)?;

        Ok(Config {
            bot_token,
            bot_username,
            redis_url,
            bind_addr,
            session_ttl_secs,
            cookie_secure,
            auth_max_age_secs,
        })
    }
}

/// Bot tokens look like `<bot id>:<secret>`.
fn validate_bot_token(token: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| {
        Err(ConfigError::InvalidValue(
            "BOT_TOKEN".to_string(),
            reason.to_string(),
        ))
    };

    if token.is_empty() {
        return invalid("cannot be empty");
    }
    let Some((bot_id, secret)) = token.split_once(':') else {
        return invalid("expected <bot id>:<secret>");
    };
    if bot_id.is_empty() || !bot_id.chars().all(|c| c.is_ascii_digit()) {
        return invalid("bot id must be numeric");
    }
    if secret.is_empty() || secret.chars().any(|c| c.is_whitespace()) {
        return invalid("secret part must be non-empty without whitespace");
    }
    Ok(())
}

/// Telegram usernames: 5-32 characters, ASCII letters, digits and underscores.
fn validate_bot_username(username: &str) -> Result<(), ConfigError> {
    if username.len() < 5 || username.len() > 32 {
        return Err(ConfigError::InvalidValue(
            "BOT_USERNAME".to_string(),
            "must be 5-32 characters".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ConfigError::InvalidValue(
            "BOT_USERNAME".to_string(),
            "may only contain ASCII letters, digits, and underscores".to_string(),
        ));
    }
    Ok(())
}

/// Helper function to parse environment variable with a default value
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(key.to_string(), format!("{}: {}", e, val))),
        Err(_) => Ok(default),
    }
}
