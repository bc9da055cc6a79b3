//! Request Context
//!
//! The two transport values the session core looks at, lifted out of the
//! HTTP request once at the boundary.

/// Credentials carried by one inbound request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Raw session cookie value, expected as `Bearer <token>`
    pub session_cookie: Option<String>,
    /// CSRF token echoed back in the request header
    pub csrf_token: Option<String>,
}

impl RequestContext {
    pub fn new(session_cookie: Option<String>, csrf_token: Option<String>) -> Self {
        Self {
            session_cookie,
            csrf_token,
        }
    }

    /// Context carrying only a session cookie
    pub fn with_cookie(session_cookie: impl Into<String>) -> Self {
        Self {
            session_cookie: Some(session_cookie.into()),
            csrf_token: None,
        }
    }

    /// Replace the CSRF header value
    pub fn csrf(mut self, csrf_token: impl Into<String>) -> Self {
        self.csrf_token = Some(csrf_token.into());
        self
    }
}
