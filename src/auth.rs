//! Session token extraction.
//!
//! The authentication service stores the bearer token in the `token` cookie.
//! API clients may send it as `Authorization: Bearer` instead.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::error::Error;
use crate::models::User;
use crate::services::ApiClient;
use crate::state::AppState;

pub const TOKEN_COOKIE: &str = "token";

/// Bearer token of the incoming request, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.trim().to_string());

    from_cookie
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .map(|s| s.trim().to_string())
        })
        .filter(|token| !token.is_empty())
}

/// API client for the request's session. Calls made without a token fail with
/// [`Error::MissingToken`], so extraction itself never rejects.
pub struct Api(pub ApiClient);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for Api {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        Ok(Api(state.api(session_token(&parts.headers))))
    }
}

/// Logged-in user together with the client acting for them.
pub struct Session {
    pub api: ApiClient,
    pub user: User,
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let api = state.api(session_token(&parts.headers));
        let user = api.users().me().await?;
        Ok(Session { api, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; token=abc123; lang=pt"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn empty_or_absent_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);
        headers.insert(header::COOKIE, HeaderValue::from_static("token="));
        assert_eq!(session_token(&headers), None);
        headers.insert(header::COOKIE, HeaderValue::from_static("xtoken=nope"));
        assert_eq!(session_token(&headers), None);
    }
}
