//! Credentials and identities exchanged with the credential store.

use crate::domain::value_object::email::Email;

/// Login / registration credentials as submitted by the client
///
/// The password is handed to the credential store untouched; this crate
/// never hashes, stores or compares it.
#[derive(Clone)]
pub struct Credentials {
    pub email: Email,
    pub password: String,
}

impl Credentials {
    pub fn new(email: Email, password: impl Into<String>) -> Self {
        Self {
            email,
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Identity returned by the store after registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// Store-assigned id, when the store exposes one
    pub id: Option<String>,
    pub email: Email,
}
