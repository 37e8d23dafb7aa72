//! Telegram Login verification, session cookies, and the per-request flow.

pub mod canonical;
pub mod flow;
pub mod middleware;
pub mod payload;
pub mod session;
pub mod verify;

pub use canonical::{canonicalize, CanonicalError};
pub use flow::{AuthOutcome, AuthRequest, Authenticator, Entry, LoginPayload, LoginPolicy};
pub use middleware::{AppState, PresentedSession};
pub use payload::{PayloadError, SignedPayload};
pub use session::{CookieSettings, SessionCookies};
pub use verify::{sign, verify, ProviderSecretKey};
