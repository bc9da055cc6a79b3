//! Application Configuration
//!
//! Configuration for the Auth application layer. Built once at startup and
//! shared read-only (`Arc<AuthConfig>`) by every component.

use std::env;
use std::time::Duration;

use platform::cookie::CookieConfig;
use thiserror::Error;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Session cookie prefix required in front of the signed token
pub const BEARER_PREFIX: &str = "Bearer ";

/// Upper bound for configured durations (100 years)
pub const MAX_DURATION_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Errors raised while loading configuration from the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{name} is not valid: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Secret key for HMAC signing of session tokens
    pub token_secret: Vec<u8>,
    /// Session token lifetime, restarted on every refresh
    pub token_ttl: Duration,
    /// Secret key for HMAC signing of CSRF tokens
    pub csrf_secret: Vec<u8>,
    /// Request header carrying the CSRF token
    pub csrf_header_name: String,
    /// Maximum age of an accepted CSRF token
    pub csrf_max_age: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "access_token".to_string(),
            token_secret: Vec::new(),
            token_ttl: Duration::from_secs(5 * 60), // 5 minutes
            csrf_secret: Vec::new(),
            csrf_header_name: "X-CSRF-Token".to_string(),
            csrf_max_age: Duration::from_secs(3600), // 1 hour
            cookie_secure: true,
            cookie_same_site: SameSite::None,
        }
    }
}

impl AuthConfig {
    /// Create config with random token and CSRF secrets (for development)
    pub fn with_random_secret() -> Self {
        Self {
            token_secret: platform::crypto::random_bytes(32),
            csrf_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    ///
    /// Browsers refuse `SameSite=None` without `Secure`, so the policy drops
    /// to `Lax` as well.
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
            ..Self::with_random_secret()
        }
    }

    /// Load config from the process environment
    ///
    /// - `JWT_KEY` (required): session token signing secret
    /// - `CSRF_KEY` (required): CSRF token signing secret
    /// - `ACCESS_TOKEN_TTL_SECS` (optional, default 300)
    /// - `CSRF_MAX_AGE_SECS` (optional, default 3600)
    ///
    /// Durations must lie in `1..=MAX_DURATION_SECS`.
    /// - `COOKIE_SECURE` (optional, `true`/`false`, default `true`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let token_ttl = match optional_secs("ACCESS_TOKEN_TTL_SECS")? {
            Some(ttl) => ttl,
            None => defaults.token_ttl,
        };
        let csrf_max_age = match optional_secs("CSRF_MAX_AGE_SECS")? {
            Some(age) => age,
            None => defaults.csrf_max_age,
        };
        let cookie_secure = match env::var("COOKIE_SECURE") {
            Ok(value) => parse_bool("COOKIE_SECURE", &value)?,
            Err(_) => defaults.cookie_secure,
        };

        Ok(Self {
            token_secret: required_secret("JWT_KEY")?,
            csrf_secret: required_secret("CSRF_KEY")?,
            token_ttl,
            csrf_max_age,
            cookie_secure,
            cookie_same_site: if cookie_secure {
                SameSite::None
            } else {
                SameSite::Lax
            },
            ..defaults
        })
    }

    /// Session token TTL in whole seconds
    pub fn token_ttl_secs(&self) -> i64 {
        i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX)
    }

    /// CSRF max age in whole seconds
    pub fn csrf_max_age_secs(&self) -> i64 {
        i64::try_from(self.csrf_max_age.as_secs()).unwrap_or(i64::MAX)
    }

    /// Cookie settings for the session cookie
    ///
    /// No `Max-Age`: the cookie lives for the browser session and the token
    /// expiry inside it is authoritative.
    pub fn session_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

fn required_secret(name: &'static str) -> Result<Vec<u8>, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::Missing(name))?;
    if value.is_empty() {
        return Err(ConfigError::Empty(name));
    }
    Ok(value.into_bytes())
}

fn optional_secs(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    let Ok(value) = env::var(name) else {
        return Ok(None);
    };
    match value.trim().parse::<u64>() {
        Ok(secs) if (1..=MAX_DURATION_SECS).contains(&secs) => {
            Ok(Some(Duration::from_secs(secs)))
        }
        _ => Err(ConfigError::Invalid { name, value }),
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}
