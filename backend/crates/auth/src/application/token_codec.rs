//! Token Codec
//!
//! Mints and verifies session tokens: compact HS256 JWTs signed with the
//! process-wide token secret.
//!
//! ```text
//! base64url({"alg":"HS256","typ":"JWT"}) "." base64url(claims) "." base64url(hmac)
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::crypto::{from_base64url, hmac_sha256, to_base64url, verify_hmac_sha256};
use serde::{Deserialize, Serialize};

use crate::application::config::{AuthConfig, BEARER_PREFIX};
use crate::domain::entity::claims::Claims;
use crate::error::{AuthError, AuthResult};

const ALG_HS256: &str = "HS256";

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

impl TokenHeader {
    fn hs256() -> Self {
        Self {
            alg: ALG_HS256.to_string(),
            typ: Some("JWT".to_string()),
        }
    }
}

/// A freshly minted session token together with the claims it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    /// Signed token string
    pub value: String,
    /// Claims signed into `value`
    pub claims: Claims,
}

impl SessionToken {
    /// Value to store in the session cookie (`Bearer <token>`)
    pub fn cookie_value(&self) -> String {
        format!("{BEARER_PREFIX}{}", self.value)
    }

    pub fn subject(&self) -> &str {
        &self.claims.subject
    }

    /// Expiry (Unix timestamp seconds)
    pub fn expires_at(&self) -> i64 {
        self.claims.expires_at
    }
}

/// Session token encoder / decoder
#[derive(Debug, Clone)]
pub struct TokenCodec {
    config: Arc<AuthConfig>,
}

impl TokenCodec {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    /// Mint a token for `subject`, valid for the configured TTL from now
    pub fn encode(&self, subject: &str) -> AuthResult<SessionToken> {
        self.encode_at(subject, Utc::now())
    }

    /// Mint a token for `subject` as if the current time were `now`
    ///
    /// Deterministic: the same subject, secret and `now` always produce the
    /// same token. Only fails on a broken configuration.
    pub fn encode_at(&self, subject: &str, now: DateTime<Utc>) -> AuthResult<SessionToken> {
        let secret = self.secret()?;
        let ttl = chrono::Duration::from_std(self.config.token_ttl)
            .map_err(|e| AuthError::Internal(format!("Invalid token TTL: {e}")))?;

        let claims = Claims::new(subject, now, ttl)
            .ok_or_else(|| AuthError::Internal("Token TTL overflows expiry time".to_string()))?;

        let header_b64 = encode_segment(&TokenHeader::hs256())?;
        let claims_b64 = encode_segment(&claims)?;
        let signing_input = format!("{header_b64}.{claims_b64}");
        let signature = hmac_sha256(secret, signing_input.as_bytes())?;

        Ok(SessionToken {
            value: format!("{signing_input}.{}", to_base64url(&signature)),
            claims,
        })
    }

    /// Verify `token` and return its subject
    pub fn decode(&self, token: &str) -> AuthResult<String> {
        self.decode_at(token, Utc::now())
    }

    /// Verify `token` as of `now` and return its subject
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<String> {
        self.decode_claims_at(token, now).map(|claims| claims.subject)
    }

    /// Verify `token` and return all of its claims
    pub fn decode_claims(&self, token: &str) -> AuthResult<Claims> {
        self.decode_claims_at(token, Utc::now())
    }

    /// Verify `token` as of `now` and return all of its claims
    ///
    /// Structure and signature are checked before expiry, so a token that
    /// has been tampered with is always [`AuthError::TokenInvalid`] and only
    /// an authentic token can be [`AuthError::TokenExpired`].
    pub fn decode_claims_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Claims> {
        let secret = self.secret()?;

        let mut parts = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::TokenInvalid);
        };

        let header: TokenHeader = decode_segment(header_b64)?;
        if header.alg != ALG_HS256 {
            return Err(AuthError::TokenInvalid);
        }

        let signature = from_base64url(signature_b64).map_err(|_| AuthError::TokenInvalid)?;
        let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
        if !verify_hmac_sha256(secret, signing_input.as_bytes(), &signature)? {
            return Err(AuthError::TokenInvalid);
        }

        let claims: Claims = decode_segment(claims_b64)?;
        if claims.is_expired_at(now) {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    fn secret(&self) -> AuthResult<&[u8]> {
        if self.config.token_secret.is_empty() {
            return Err(AuthError::Internal(
                "Session token secret is not configured".to_string(),
            ));
        }
        Ok(&self.config.token_secret)
    }
}

fn encode_segment<T: Serialize>(value: &T) -> AuthResult<String> {
    let json = serde_json::to_vec(value)
        .map_err(|e| AuthError::Internal(format!("Token serialization failed: {e}")))?;
    Ok(to_base64url(&json))
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> AuthResult<T> {
    let bytes = from_base64url(segment).map_err(|_| AuthError::TokenInvalid)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::TokenInvalid)
}
