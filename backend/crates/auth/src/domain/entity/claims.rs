//! Session Token Claims
//!
//! The payload signed into every session token.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Claims embedded in a session token
///
/// Serialized with the registered JWT claim names so the token body stays
/// readable by standard JWT tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identity (the user's email)
    #[serde(rename = "sub")]
    pub subject: String,
    /// Issued-at (Unix timestamp seconds)
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Expiry (Unix timestamp seconds)
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl Claims {
    /// Claims for `subject` issued at `now`, valid for `ttl`
    ///
    /// `None` when `now + ttl` falls outside the representable time range.
    pub fn new(subject: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Option<Self> {
        let expires_at = now.checked_add_signed(ttl)?;
        Some(Self {
            subject: subject.into(),
            issued_at: now.timestamp(),
            expires_at: expires_at.timestamp(),
        })
    }

    /// A token is expired from its expiry instant onward
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at
    }

    /// Expiry as a UTC timestamp
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.expires_at, 0).single()
    }
}
