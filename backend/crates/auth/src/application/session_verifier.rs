//! Session Verifier
//!
//! Reads the bearer token out of the session cookie, verifies it and, on
//! refreshing paths, re-mints it so the session expiry slides forward with
//! every authenticated request.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::{AuthConfig, BEARER_PREFIX};
use crate::application::token_codec::{SessionToken, TokenCodec};
use crate::domain::entity::request_context::RequestContext;
use crate::error::{AuthError, AuthResult};

/// Session verification use case
#[derive(Debug, Clone)]
pub struct SessionVerifier {
    codec: TokenCodec,
}

impl SessionVerifier {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self {
            codec: TokenCodec::new(config),
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Strip the `Bearer ` prefix off the session cookie
    pub fn extract_token<'a>(&self, ctx: &'a RequestContext) -> AuthResult<&'a str> {
        let cookie = ctx
            .session_cookie
            .as_deref()
            .ok_or(AuthError::MissingCredential)?;

        match cookie.strip_prefix(BEARER_PREFIX) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(AuthError::MissingCredential),
        }
    }

    /// Verify the session and return its subject, leaving expiry untouched
    pub fn verify(&self, ctx: &RequestContext) -> AuthResult<String> {
        self.verify_at(ctx, Utc::now())
    }

    pub fn verify_at(&self, ctx: &RequestContext, now: DateTime<Utc>) -> AuthResult<String> {
        let token = self.extract_token(ctx)?;
        self.codec.decode_at(token, now)
    }

    /// Verify the session and mint a replacement expiring `TTL` from now
    ///
    /// The replacement carries the same subject. Writing it back into the
    /// response cookie is the caller's job.
    pub fn verify_and_refresh(&self, ctx: &RequestContext) -> AuthResult<(SessionToken, String)> {
        self.verify_and_refresh_at(ctx, Utc::now())
    }

    pub fn verify_and_refresh_at(
        &self,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> AuthResult<(SessionToken, String)> {
        let subject = self.verify_at(ctx, now)?;
        let refreshed = self.codec.encode_at(&subject, now)?;

        tracing::debug!(
            subject = %subject,
            expires_at = refreshed.expires_at(),
            "Session refreshed"
        );

        Ok((refreshed, subject))
    }
}
