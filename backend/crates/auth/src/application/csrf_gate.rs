//! CSRF Gate
//!
//! Guard for state-changing endpoints: the CSRF header is checked first and
//! only then is the session verified and refreshed.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::application::csrf::CsrfProtect;
use crate::application::session_verifier::SessionVerifier;
use crate::application::token_codec::SessionToken;
use crate::domain::entity::request_context::RequestContext;
use crate::error::AuthResult;

#[derive(Debug, Clone)]
pub struct CsrfGate {
    csrf: CsrfProtect,
    sessions: SessionVerifier,
}

impl CsrfGate {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self {
            csrf: CsrfProtect::new(config.clone()),
            sessions: SessionVerifier::new(config),
        }
    }

    pub fn csrf(&self) -> &CsrfProtect {
        &self.csrf
    }

    pub fn sessions(&self) -> &SessionVerifier {
        &self.sessions
    }

    /// Validate the CSRF header, then verify and refresh the session
    ///
    /// A CSRF failure returns before the session cookie is read.
    pub fn verify_csrf_and_refresh(&self, ctx: &RequestContext) -> AuthResult<SessionToken> {
        self.verify_csrf_and_refresh_at(ctx, Utc::now())
    }

    pub fn verify_csrf_and_refresh_at(
        &self,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> AuthResult<SessionToken> {
        self.csrf.validate_at(ctx.csrf_token.as_deref(), now)?;
        let (refreshed, _subject) = self.sessions.verify_and_refresh_at(ctx, now)?;
        Ok(refreshed)
    }
}
