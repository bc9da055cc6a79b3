//! Domain Layer
//!
//! Contains entities, value objects, and the credential store trait.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    claims::Claims,
    credentials::{Credentials, UserIdentity},
    request_context::RequestContext,
};
pub use repository::{CredentialStore, LocalCredentialStore};
pub use value_object::email::Email;
