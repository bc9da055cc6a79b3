//! Application Layer
//!
//! Token codec, session verification, CSRF gating and the sign in / up / out
//! use cases built on top of them.

pub mod config;
pub mod csrf;
pub mod csrf_gate;
pub mod session_verifier;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod token_codec;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use config::{AuthConfig, ConfigError};
pub use csrf::CsrfProtect;
pub use csrf_gate::CsrfGate;
pub use session_verifier::SessionVerifier;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use token_codec::{SessionToken, TokenCodec};
