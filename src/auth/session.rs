//! Session cookie pair issuance and parsing.
//!
//! A session is two cookies set together: `tg_user_id` (external identifier) and
//! `tg_hash` (the signature accepted at login). Expiry is left to the browser via
//! `Max-Age`.

use crate::config::Config;
use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};

pub const USER_ID_COOKIE: &str = "tg_user_id";
pub const HASH_COOKIE: &str = "tg_hash";

/// Default session lifetime: 20 days.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 20 * 24 * 60 * 60;

/// Cookie attributes shared by both session cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
    pub ttl_secs: u64,
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
            secure: true,
        }
    }
}

impl From<&Config> for CookieSettings {
    fn from(config: &Config) -> Self {
        Self {
            ttl_secs: config.session_ttl_secs,
            secure: config.cookie_secure,
        }
    }
}

/// Session cookies as presented by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookies {
    /// Raw `tg_user_id` value. Not trusted to be numeric.
    pub identifier: String,
    pub signature: String,
}

/// Build both `Set-Cookie` values for a freshly verified login.
pub fn issue(
    identifier: i64,
    signature: &str,
    settings: CookieSettings,
) -> Result<[HeaderValue; 2], InvalidHeaderValue> {
    Ok([
        cookie(USER_ID_COOKIE, &identifier.to_string(), settings.ttl_secs, settings.secure)?,
        cookie(HASH_COOKIE, signature, settings.ttl_secs, settings.secure)?,
    ])
}

/// Build `Set-Cookie` values that expire both session cookies immediately.
pub fn clear(settings: CookieSettings) -> Result<[HeaderValue; 2], InvalidHeaderValue> {
    Ok([
        cookie(USER_ID_COOKIE, "", 0, settings.secure)?,
        cookie(HASH_COOKIE, "", 0, settings.secure)?,
    ])
}

fn cookie(
    name: &str,
    value: &str,
    max_age: u64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Read the session cookie pair from request headers.
///
/// Returns `None` unless both cookies are present and non-empty.
pub fn read_session(headers: &HeaderMap) -> Option<SessionCookies> {
    let mut identifier = None;
    let mut signature = None;

    for header in headers.get_all(COOKIE) {
        // Other cookies may carry non-ASCII bytes; only those pairs are skipped.
        for pair in header.as_bytes().split(|b| *b == b';') {
            let Ok(pair) = std::str::from_utf8(pair) else {
                continue;
            };
            let Some((key, val)) = pair.trim().split_once('=') else {
                continue;
            };
            let val = val.trim();
            if val.is_empty() {
                continue;
            }
            match key.trim() {
                USER_ID_COOKIE => identifier = Some(val.to_string()),
                HASH_COOKIE => signature = Some(val.to_string()),
                _ => {}
            }
        }
    }

    Some(SessionCookies {
        identifier: identifier?,
        signature: signature?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for c in cookies {
            headers.append(COOKIE, HeaderValue::from_str(c).unwrap());
        }
        headers
    }

    #[test]
    fn test_issue_sets_both_cookies() {
        let [id, hash] = issue(7, "abc", CookieSettings::default()).unwrap();

        assert_eq!(
            id.to_str().unwrap(),
            "tg_user_id=7; Path=/; HttpOnly; SameSite=Lax; Max-Age=1728000; Secure"
        );
        assert_eq!(
            hash.to_str().unwrap(),
            "tg_hash=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=1728000; Secure"
        );
    }

    #[test]
    fn test_issue_without_secure() {
        let settings = CookieSettings {
            ttl_secs: 60,
            secure: false,
        };
        let [id, hash] = issue(-100, "ff", settings).unwrap();
        assert_eq!(
            id.to_str().unwrap(),
            "tg_user_id=-100; Path=/; HttpOnly; SameSite=Lax; Max-Age=60"
        );
        assert!(!hash.to_str().unwrap().contains("Secure"));
    }

    #[test]
    fn test_default_ttl_is_twenty_days() {
        assert_eq!(DEFAULT_SESSION_TTL_SECS, 1_728_000);
    }

    #[test]
    fn test_clear_expires_both() {
        let [id, hash] = clear(CookieSettings::default()).unwrap();
        assert!(id.to_str().unwrap().starts_with("tg_user_id=; "));
        assert!(id.to_str().unwrap().contains("Max-Age=0"));
        assert!(hash.to_str().unwrap().starts_with("tg_hash=; "));
        assert!(hash.to_str().unwrap().contains("Max-Age=0"));
    }

    #[test]
    fn test_read_session_both_present() {
        let session = read_session(&headers(&["theme=dark; tg_user_id=7; tg_hash=abc"])).unwrap();
        assert_eq!(
            session,
            SessionCookies {
                identifier: "7".to_string(),
                signature: "abc".to_string(),
            }
        );
    }

    #[test]
    fn test_read_session_split_headers() {
        let session = read_session(&headers(&["tg_user_id=7", "tg_hash=abc"])).unwrap();
        assert_eq!(session.identifier, "7");
        assert_eq!(session.signature, "abc");
    }

    #[test]
    fn test_read_session_skips_only_undecodable_pairs() {
        let mut headers = HeaderMap::new();
        headers.append(
            COOKIE,
            HeaderValue::from_bytes(b"theme=caf\xc3\xa9; junk=\xff\xfe; tg_user_id=7; tg_hash=abc")
                .unwrap(),
        );
        assert!(headers.get(COOKIE).unwrap().to_str().is_err());

        let session = read_session(&headers).unwrap();
        assert_eq!(session.identifier, "7");
        assert_eq!(session.signature, "abc");
    }

    #[test]
    fn test_read_session_requires_both() {
        assert_eq!(read_session(&headers(&["tg_user_id=7"])), None);
        assert_eq!(read_session(&headers(&["tg_hash=abc"])), None);
        assert_eq!(read_session(&headers(&["tg_user_id=; tg_hash=abc"])), None);
        assert_eq!(read_session(&HeaderMap::new()), None);
    }

    #[test]
    fn test_read_session_ignores_lookalike_names() {
        assert_eq!(
            read_session(&headers(&["xtg_user_id=7; tg_hash_old=abc"])),
            None
        );
    }
}
