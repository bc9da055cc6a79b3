//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, base64url, OS randomness)
//! - Cookie parsing and `Set-Cookie` construction

pub mod cookie;
pub mod crypto;
