//! Auth Middleware
//!
//! Session guards for routes outside this crate. Mount with
//! `axum::middleware::from_fn_with_state(config, ...)`.
//!
//! On success the subject is available to handlers as a [`SessionSubject`]
//! extension. The refreshing guards also append the new cookie to successful
//! responses; [`require_session`] leaves the cookie alone.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token_codec::SessionToken;
use crate::application::{CsrfGate, SessionVerifier};
use crate::domain::entity::request_context::RequestContext;
use crate::error::AuthError;
use crate::presentation::cookie::session_cookie_header;

/// Authenticated subject stored in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSubject(pub String);

/// Require a valid session without touching its expiry
///
/// For reads that must not keep an idle session alive, such as polling.
pub async fn require_session(
    State(config): State<Arc<AuthConfig>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let ctx = RequestContext::from_headers(req.headers(), &config);
    let subject = SessionVerifier::new(config).verify(&ctx)?;

    req.extensions_mut().insert(SessionSubject(subject));
    Ok(next.run(req).await)
}

/// Require a valid session and slide its expiry (read endpoints)
pub async fn refresh_session(
    State(config): State<Arc<AuthConfig>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let ctx = RequestContext::from_headers(req.headers(), &config);
    let (token, subject) = SessionVerifier::new(config.clone()).verify_and_refresh(&ctx)?;

    run_with_session(&config, token, subject, req, next).await
}

/// Require a valid CSRF header and a valid session, then slide the session
/// (mutation endpoints)
pub async fn require_csrf_session(
    State(config): State<Arc<AuthConfig>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let ctx = RequestContext::from_headers(req.headers(), &config);
    let token = CsrfGate::new(config.clone()).verify_csrf_and_refresh(&ctx)?;
    let subject = token.subject().to_string();

    run_with_session(&config, token, subject, req, next).await
}

async fn run_with_session(
    config: &AuthConfig,
    token: SessionToken,
    subject: String,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let cookie = session_cookie_header(config, &token)?;
    req.extensions_mut().insert(SessionSubject(subject));

    let mut response = next.run(req).await;

    // Failed requests leave the client's cookie as it was
    if response.status().is_success() {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    Ok(response)
}
