//! Browser session handling.
//!
//! The bearer token lives in a cookie named `token`. Every handler receives an
//! explicit [`Session`] and passes it to the backend client, so nothing reads
//! the token from global state.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use cookie::{Cookie, SameSite};

/// Name of the cookie holding the bearer token.
pub const TOKEN_COOKIE: &str = "token";

/// Per-request session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// A session with no credentials.
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// A session carrying the given bearer token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Read the session from request headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let token = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(Cookie::split_parse_encoded)
            .filter_map(Result::ok)
            .find(|c| c.name() == TOKEN_COOKIE && !c.value_trimmed().is_empty())
            .map(|c| c.value_trimmed().to_string());

        Self { token }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Session::from_headers(&parts.headers))
    }
}

fn base_cookie(value: &str) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// `Set-Cookie` value that stores the token.
pub fn token_cookie(token: &str, secure: bool) -> String {
    let mut cookie = base_cookie(token);
    cookie.set_secure(secure);
    cookie.encoded().to_string()
}

/// `Set-Cookie` value that removes the token.
pub fn clear_cookie() -> String {
    let mut cookie = base_cookie("");
    cookie.make_removal();
    cookie.to_string()
}
