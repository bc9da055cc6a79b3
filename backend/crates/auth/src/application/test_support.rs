//! In-memory credential store shared by the use case tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::entity::credentials::{Credentials, UserIdentity};
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<String, String>>,
    calls: AtomicUsize,
    offline: bool,
}

impl MemoryStore {
    pub fn with_user(email: &str, password: &str) -> Self {
        let store = Self::default();
        store
            .users
            .lock()
            .unwrap()
            .insert(email.to_string(), password.to_string());
        store
    }

    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn contains(&self, email: &str) -> bool {
        self.users.lock().unwrap().contains_key(email)
    }
}

impl CredentialStore for MemoryStore {
    async fn create_user(&self, credentials: &Credentials) -> AuthResult<UserIdentity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(AuthError::Store("connection refused".to_string()));
        }

        let mut users = self.users.lock().unwrap();
        if users.contains_key(credentials.email.as_str()) {
            return Err(AuthError::EmailTaken);
        }
        users.insert(
            credentials.email.as_str().to_string(),
            credentials.password.clone(),
        );

        Ok(UserIdentity {
            id: Some(users.len().to_string()),
            email: credentials.email.clone(),
        })
    }

    async fn authenticate(&self, credentials: &Credentials) -> AuthResult<Email> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(AuthError::Store("connection refused".to_string()));
        }

        let users = self.users.lock().unwrap();
        match users.get(credentials.email.as_str()) {
            Some(password) if *password == credentials.password => Ok(credentials.email.clone()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}
