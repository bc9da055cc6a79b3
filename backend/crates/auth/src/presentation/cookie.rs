//! Session cookie headers.

use axum::http::HeaderValue;
use axum::http::header::InvalidHeaderValue;
use platform::cookie::{clear_cookie_header, set_cookie_header};

use crate::application::config::AuthConfig;
use crate::application::token_codec::SessionToken;
use crate::error::{AuthError, AuthResult};

/// `Set-Cookie` carrying `Bearer <token>`
pub fn session_cookie_header(config: &AuthConfig, token: &SessionToken) -> AuthResult<HeaderValue> {
    set_cookie_header(&config.session_cookie(), &token.cookie_value()).map_err(cookie_error)
}

/// `Set-Cookie` that empties the session cookie (logout)
pub fn clear_session_cookie_header(config: &AuthConfig) -> AuthResult<HeaderValue> {
    clear_cookie_header(&config.session_cookie()).map_err(cookie_error)
}

fn cookie_error(err: InvalidHeaderValue) -> AuthError {
    AuthError::Internal(format!("Session cookie is not a valid header: {err}"))
}
