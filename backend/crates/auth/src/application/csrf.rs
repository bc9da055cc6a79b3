//! CSRF Tokens
//!
//! Stateless, secret-signed CSRF tokens for the double-submit pattern. A
//! token is handed to the client on request and must be echoed back in the
//! CSRF header of every state-changing request. Tokens are bound to the
//! CSRF secret only, never to a session or user.
//!
//! Format: `<nonce>.<issued_at>.<signature>` where `nonce` is 32 random bytes
//! (base64url), `issued_at` is Unix seconds and `signature` is
//! HMAC-SHA256 over a domain-separated `<nonce>.<issued_at>`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::crypto::{from_base64url, hmac_sha256, random_bytes, to_base64url, verify_hmac_sha256};

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Keeps CSRF signatures from ever being valid in another context that
/// happens to share the secret.
const SIGNING_CONTEXT: &[u8] = b"csrf-token.";

const NONCE_LEN: usize = 32;

/// CSRF token generator / validator
#[derive(Debug, Clone)]
pub struct CsrfProtect {
    config: Arc<AuthConfig>,
}

impl CsrfProtect {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Name of the request header that must carry the token
    pub fn header_name(&self) -> &str {
        &self.config.csrf_header_name
    }

    /// Issue a new CSRF token
    pub fn generate(&self) -> AuthResult<String> {
        self.generate_at(Utc::now())
    }

    pub fn generate_at(&self, now: DateTime<Utc>) -> AuthResult<String> {
        let payload = format!(
            "{}.{}",
            to_base64url(&random_bytes(NONCE_LEN)),
            now.timestamp()
        );
        let signature = hmac_sha256(self.secret()?, &signing_input(&payload))?;
        Ok(format!("{payload}.{}", to_base64url(&signature)))
    }

    /// Check a header-supplied CSRF token
    ///
    /// `None` or a blank value is [`AuthError::CsrfMissing`]. Anything else
    /// that fails (shape, signature, age) is [`AuthError::CsrfMismatch`].
    pub fn validate(&self, token: Option<&str>) -> AuthResult<()> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: Option<&str>, now: DateTime<Utc>) -> AuthResult<()> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::CsrfMissing)?;
        let secret = self.secret()?;

        let Some((payload, signature_b64)) = token.rsplit_once('.') else {
            return Err(AuthError::CsrfMismatch);
        };
        let Some((nonce_b64, issued_at)) = payload.split_once('.') else {
            return Err(AuthError::CsrfMismatch);
        };
        if nonce_b64.is_empty() || issued_at.contains('.') {
            return Err(AuthError::CsrfMismatch);
        }

        let signature = from_base64url(signature_b64).map_err(|_| AuthError::CsrfMismatch)?;
        if !verify_hmac_sha256(secret, &signing_input(payload), &signature)? {
            return Err(AuthError::CsrfMismatch);
        }

        let issued_at: i64 = issued_at.parse().map_err(|_| AuthError::CsrfMismatch)?;
        let age = now.timestamp() - issued_at;
        if age > self.config.csrf_max_age_secs() {
            tracing::debug!(age_secs = age, "CSRF token expired");
            return Err(AuthError::CsrfMismatch);
        }

        Ok(())
    }

    fn secret(&self) -> AuthResult<&[u8]> {
        if self.config.csrf_secret.is_empty() {
            return Err(AuthError::Internal(
                "CSRF secret is not configured".to_string(),
            ));
        }
        Ok(&self.config.csrf_secret)
    }
}

fn signing_input(payload: &str) -> Vec<u8> {
    let mut input = Vec::with_capacity(SIGNING_CONTEXT.len() + payload.len());
    input.extend_from_slice(SIGNING_CONTEXT);
    input.extend_from_slice(payload.as_bytes());
    input
}
