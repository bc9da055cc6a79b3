//! Domain entities

pub mod claims;
pub mod credentials;
pub mod request_context;
