//! Sign Up Use Case
//!
//! Registers a new user with the credential store. No session is created;
//! the client signs in afterwards.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::csrf::CsrfProtect;
use crate::domain::entity::credentials::{Credentials, UserIdentity};
use crate::domain::entity::request_context::RequestContext;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
}

/// Sign up use case
pub struct SignUpUseCase<C>
where
    C: CredentialStore,
{
    store: Arc<C>,
    csrf: CsrfProtect,
}

impl<C> SignUpUseCase<C>
where
    C: CredentialStore,
{
    pub fn new(store: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            store,
            csrf: CsrfProtect::new(config),
        }
    }

    pub async fn execute(
        &self,
        ctx: &RequestContext,
        input: SignUpInput,
    ) -> AuthResult<UserIdentity> {
        self.csrf.validate(ctx.csrf_token.as_deref())?;

        let email = Email::new(&input.email)?;
        if input.password.is_empty() {
            return Err(AuthError::Validation(
                "Password cannot be empty".to_string(),
            ));
        }

        let identity = self
            .store
            .create_user(&Credentials::new(email, input.password))
            .await?;

        tracing::info!(
            email = %identity.email,
            id = identity.id.as_deref().unwrap_or("-"),
            "User signed up"
        );

        Ok(identity)
    }
}
