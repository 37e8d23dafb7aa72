//! Security headers middleware.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

/// Content Security Policy admitting the Telegram Login widget and nothing else off-site.
///
/// - `telegram.org` serves the widget script
/// - `oauth.telegram.org` hosts the widget iframe
/// - `t.me` / `telegram.org` serve user pictures
///
/// The widget turns its `data-onauth` attribute into a function at runtime, which needs
/// `'unsafe-eval'`.
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
     script-src 'self' https://telegram.org 'unsafe-eval'; \
     frame-src https://oauth.telegram.org; \
     img-src 'self' https://t.me https://telegram.org data:; \
     style-src 'self'; \
     object-src 'none'; \
     frame-ancestors 'none'; \
     base-uri 'self'; \
     form-action 'self'";

/// Middleware that adds security headers to all responses.
///
/// - **Cache-Control: no-store**: login pages carry `auth_data` in the URL and set
///   session cookies; nothing may be cached.
/// - **Referrer-Policy: no-referrer**: keeps the signed `auth_data` query string from
///   leaking to the widget origin or any other site.
/// - **X-Content-Type-Options: nosniff**
/// - **X-Frame-Options: DENY**
/// - **Strict-Transport-Security**: two years, subdomains, preload.
/// - **Permissions-Policy**: camera, microphone, geolocation, and payment disabled.
///
/// # Usage
///
/// ```rust,no_run
/// use axum::Router;
/// use axum::middleware;
/// use tglogin::middleware::security_headers;
///
/// let app: Router = Router::new()
///     .layer(middleware::from_fn(security_headers));
/// ```
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("cache-control", HeaderValue::from_static("no-store"));
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "strict-transport-security",
        HeaderValue::from_static("max-age=63072000; includeSubDomains; preload"),
    );
    headers.insert(
        "permissions-policy",
        HeaderValue::from_static("camera=(), microphone=(), geolocation=(), payment=()"),
    );
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );

    response
}
