//! HTTP Handlers
//!
//! Auth endpoints for a host router to mount. Each handler maps one use case
//! onto request/response types and owns the `Set-Cookie` side.

use axum::Json;
use axum::extract::{FromRef, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CsrfProtect, SessionVerifier, SignInInput, SignInUseCase, SignOutUseCase, SignUpInput,
    SignUpUseCase,
};
use crate::domain::entity::request_context::RequestContext;
use crate::domain::repository::CredentialStore;
use crate::error::AuthResult;
use crate::presentation::cookie::{clear_session_cookie_header, session_cookie_header};
use crate::presentation::dto::{CsrfTokenResponse, SuccessMessage, UserInfo, UserRequest};

/// Shared state for auth handlers
pub struct AuthAppState<C> {
    pub store: Arc<C>,
    pub config: Arc<AuthConfig>,
}

impl<C> AuthAppState<C> {
    pub fn new(store: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self { store, config }
    }
}

impl<C> Clone for AuthAppState<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C> FromRef<AuthAppState<C>> for Arc<AuthConfig> {
    fn from_ref(state: &AuthAppState<C>) -> Self {
        state.config.clone()
    }
}

// ============================================================================
// CSRF Token
// ============================================================================

/// GET /api/csrftoken
pub async fn csrf_token<C>(
    State(state): State<AuthAppState<C>>,
) -> AuthResult<Json<CsrfTokenResponse>>
where
    C: CredentialStore + Send + Sync + 'static,
{
    let csrf_token = CsrfProtect::new(state.config.clone()).generate()?;
    Ok(Json(CsrfTokenResponse { csrf_token }))
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/register
pub async fn sign_up<C>(
    State(state): State<AuthAppState<C>>,
    ctx: RequestContext,
    Json(req): Json<UserRequest>,
) -> AuthResult<Json<UserInfo>>
where
    C: CredentialStore + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.store.clone(), state.config.clone());

    let input = SignUpInput {
        email: req.email,
        password: req.password,
    };

    let identity = use_case.execute(&ctx, input).await?;
    Ok(Json(identity.into()))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/login
pub async fn sign_in<C>(
    State(state): State<AuthAppState<C>>,
    ctx: RequestContext,
    Json(req): Json<UserRequest>,
) -> AuthResult<impl IntoResponse>
where
    C: CredentialStore + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.store.clone(), state.config.clone());

    let input = SignInInput {
        email: req.email,
        password: req.password,
    };

    let output = use_case.execute(&ctx, input).await?;
    let cookie = session_cookie_header(&state.config, &output.token)?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(SuccessMessage::new("Successfully loggedIn")),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /api/logout
pub async fn sign_out<C>(
    State(state): State<AuthAppState<C>>,
    ctx: RequestContext,
) -> AuthResult<impl IntoResponse>
where
    C: CredentialStore + Send + Sync + 'static,
{
    SignOutUseCase::new(state.config.clone()).execute(&ctx)?;
    let cookie = clear_session_cookie_header(&state.config)?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(SuccessMessage::new("Successfully LoggedOut")),
    ))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/user
///
/// Returns the session subject and slides the session forward.
pub async fn current_user<C>(
    State(state): State<AuthAppState<C>>,
    ctx: RequestContext,
) -> AuthResult<impl IntoResponse>
where
    C: CredentialStore + Send + Sync + 'static,
{
    let (token, subject) = SessionVerifier::new(state.config.clone()).verify_and_refresh(&ctx)?;
    let cookie = session_cookie_header(&state.config, &token)?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserInfo {
            id: None,
            email: subject,
        }),
    ))
}
