//! Presentation Layer
//!
//! Request extraction, cookie headers, DTOs, handlers and middleware. The
//! router itself belongs to the host application.

pub mod cookie;
pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;

pub use cookie::{clear_session_cookie_header, session_cookie_header};
pub use handlers::AuthAppState;
pub use middleware::{SessionSubject, refresh_session, require_csrf_session, require_session};
