//! Repository Traits
//!
//! Interfaces to the credential store. Password handling and persistence
//! live entirely on the other side of this trait.

use crate::domain::entity::credentials::{Credentials, UserIdentity};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// Credential store trait
///
/// Implementations report a duplicate account as [`AuthError::EmailTaken`],
/// a failed login as [`AuthError::InvalidCredentials`] and anything else as
/// [`AuthError::Store`].
///
/// [`AuthError::EmailTaken`]: crate::error::AuthError::EmailTaken
/// [`AuthError::InvalidCredentials`]: crate::error::AuthError::InvalidCredentials
/// [`AuthError::Store`]: crate::error::AuthError::Store
#[trait_variant::make(CredentialStore: Send)]
pub trait LocalCredentialStore {
    /// Register a new user
    async fn create_user(&self, credentials: &Credentials) -> AuthResult<UserIdentity>;

    /// Check credentials and return the session subject
    async fn authenticate(&self, credentials: &Credentials) -> AuthResult<Email>;
}
