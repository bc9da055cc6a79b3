//! Sign In Use Case
//!
//! Authenticates a user against the credential store and mints the first
//! session token.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::csrf::CsrfProtect;
use crate::application::token_codec::{SessionToken, TokenCodec};
use crate::domain::entity::credentials::Credentials;
use crate::domain::entity::request_context::RequestContext;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    /// Session token for the cookie
    pub token: SessionToken,
    /// Authenticated subject
    pub subject: Email,
}

/// Sign in use case
pub struct SignInUseCase<C>
where
    C: CredentialStore,
{
    store: Arc<C>,
    csrf: CsrfProtect,
    codec: TokenCodec,
}

impl<C> SignInUseCase<C>
where
    C: CredentialStore,
{
    pub fn new(store: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            store,
            csrf: CsrfProtect::new(config.clone()),
            codec: TokenCodec::new(config),
        }
    }

    pub async fn execute(
        &self,
        ctx: &RequestContext,
        input: SignInInput,
    ) -> AuthResult<SignInOutput> {
        self.csrf.validate(ctx.csrf_token.as_deref())?;

        // Malformed email can never match an account
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let credentials = Credentials::new(email, input.password);

        let subject = self.store.authenticate(&credentials).await?;
        let token = self.codec.encode(subject.as_str())?;

        tracing::info!(
            subject = %subject,
            expires_at = token.expires_at(),
            "User signed in"
        );

        Ok(SignInOutput { token, subject })
    }
}
