//! Signed session cookie
//!
//! The session token travels in an HttpOnly cookie named `token`, signed
//! with a key derived from `COOKIE_SECRET`.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use sha2::{Digest, Sha512};

use crate::config::AuthConfig;

pub const SESSION_COOKIE: &str = "token";

/// Derive the 64-byte cookie signing key from an arbitrary-length secret
pub fn derive_cookie_key(secret: &str) -> Key {
    Key::from(&Sha512::digest(secret.as_bytes()))
}

pub(crate) fn session_cookie(token: String, config: &AuthConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(config.session_ttl_secs))
        .build()
}

/// Add the session cookie to a fresh jar for the response
pub(crate) fn with_session(key: Key, token: String, config: &AuthConfig) -> SignedCookieJar {
    SignedCookieJar::new(key).add(session_cookie(token, config))
}

/// Jar that instructs the client to drop the session cookie
pub(crate) fn without_session(key: Key) -> SignedCookieJar {
    SignedCookieJar::new(key).remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Read the session token; `None` if absent or the signature does not verify
pub(crate) fn read_session(headers: &HeaderMap, key: Key) -> Option<String> {
    SignedCookieJar::from_headers(headers, key)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
}
