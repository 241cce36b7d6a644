//! Session-state reading (cookie header parsing, no HTTP types).

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Where the gate reads the caller's raw session token from.
pub trait SessionTokenSource {
    fn session_token(&self) -> Option<&str>;
}

impl SessionTokenSource for Option<&str> {
    fn session_token(&self) -> Option<&str> {
        *self
    }
}

/// A raw `Cookie:` header value.
#[derive(Debug, Clone, Copy)]
pub struct CookieHeader<'a>(pub &'a str);

impl SessionTokenSource for CookieHeader<'_> {
    fn session_token(&self) -> Option<&str> {
        cookie_value(self.0, SESSION_COOKIE)
    }
}

/// Find a cookie by name in a `Cookie:` header value.
///
/// Empty values count as absent.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| k.trim() == name)
        .map(|(_, v)| v.trim().trim_matches('"'))
        .filter(|v| !v.is_empty())
}
