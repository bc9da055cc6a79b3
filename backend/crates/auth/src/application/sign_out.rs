//! Sign Out Use Case
//!
//! Tokens are stateless, so signing out is only the CSRF check. The caller
//! clears the session cookie afterwards.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::csrf::CsrfProtect;
use crate::application::session_verifier::SessionVerifier;
use crate::domain::entity::request_context::RequestContext;
use crate::error::AuthResult;

/// Sign out use case
#[derive(Debug, Clone)]
pub struct SignOutUseCase {
    csrf: CsrfProtect,
    sessions: SessionVerifier,
}

impl SignOutUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self {
            csrf: CsrfProtect::new(config.clone()),
            sessions: SessionVerifier::new(config),
        }
    }

    /// Returns the subject of the session being closed, if it was still valid
    ///
    /// An invalid or expired session does not fail the sign out.
    pub fn execute(&self, ctx: &RequestContext) -> AuthResult<Option<String>> {
        self.csrf.validate(ctx.csrf_token.as_deref())?;

        let subject = self.sessions.verify(ctx).ok();
        match &subject {
            Some(subject) => tracing::info!(subject = %subject, "User signed out"),
            None => tracing::debug!("Sign out without a valid session"),
        }

        Ok(subject)
    }
}
