//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, credential store trait
//! - `application/` - Token codec, session verification, CSRF, use cases
//! - `presentation/` - Request extraction, cookies, DTOs, handlers, middleware
//!
//! ## Features
//! - Stateless session tokens (HS256 JWT) in an `access_token` cookie
//! - Sliding expiry: every authenticated request re-mints the token
//! - Signed CSRF tokens for the double-submit pattern on mutations
//! - Sign up / sign in / sign out over a pluggable credential store
//!
//! ## Security Model
//! - Session cookie is `HttpOnly; Secure; SameSite=None`
//! - Token signature is checked before expiry; no grace window
//! - CSRF tokens are bound to the CSRF secret, not to the session
//! - Password hashing and storage belong to the credential store

pub mod application;
pub mod domain;
pub mod error;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::{CsrfGate, CsrfProtect, SessionToken, SessionVerifier, TokenCodec};
pub use domain::{CredentialStore, RequestContext};
pub use error::{AuthError, AuthResult};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
