//! Request Context Extraction
//!
//! Lifts the session cookie and the CSRF header out of the request once, so
//! nothing below the presentation layer sees HTTP types.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use platform::cookie::extract_cookie;

use crate::application::config::AuthConfig;
use crate::domain::entity::request_context::RequestContext;

impl RequestContext {
    /// Read the configured session cookie and CSRF header
    pub fn from_headers(headers: &HeaderMap, config: &AuthConfig) -> Self {
        let csrf_token = headers
            .get(config.csrf_header_name.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Self {
            session_cookie: extract_cookie(headers, &config.session_cookie_name),
            csrf_token,
        }
    }
}

/// Never rejects: missing values surface later as auth errors
impl<S> FromRequestParts<S> for RequestContext
where
    Arc<AuthConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<AuthConfig>::from_ref(state);
        Ok(Self::from_headers(&parts.headers, &config))
    }
}
