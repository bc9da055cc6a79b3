//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
///
/// The first five variants are the session/CSRF rejections. Every one of
/// them is terminal for the current request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Session cookie absent, empty, or without the `Bearer ` prefix
    #[error("Missing session credential")]
    MissingCredential,

    /// Token structure or signature does not verify
    #[error("Invalid session token")]
    TokenInvalid,

    /// Signature verifies but the token is past its expiry
    #[error("Session token expired")]
    TokenExpired,

    /// No CSRF token in the request header
    #[error("CSRF token missing")]
    CsrfMissing,

    /// CSRF token present but not valid for the current secret
    #[error("CSRF token mismatch")]
    CsrfMismatch,

    /// Credential store rejected the login
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Credential store already holds this email
    #[error("Email is already registered")]
    EmailTaken,

    /// Malformed input (email, password)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Credential store failed for a reason other than the above
    #[error("Credential store error: {0}")]
    Store(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingCredential
            | AuthError::TokenInvalid
            | AuthError::TokenExpired
            | AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::CsrfMissing | AuthError::CsrfMismatch => ErrorKind::Forbidden,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Store(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// `true` for rejections that send the client back to the anonymous state
    pub fn is_session_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::MissingCredential | AuthError::TokenInvalid | AuthError::TokenExpired
        )
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::TokenExpired | AuthError::MissingCredential => {
                err.with_action("Sign in again")
            }
            AuthError::CsrfMissing | AuthError::CsrfMismatch => {
                err.with_action("Fetch a fresh CSRF token and retry")
            }
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Store(msg) => {
                tracing::error!(message = %msg, "Credential store error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::TokenInvalid => {
                tracing::warn!("Rejected tampered or malformed session token");
            }
            AuthError::CsrfMismatch => {
                tracing::warn!("Rejected request with invalid CSRF token");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<platform::crypto::InvalidLength> for AuthError {
    fn from(err: platform::crypto::InvalidLength) -> Self {
        AuthError::Internal(format!("HMAC key rejected: {err}"))
    }
}
