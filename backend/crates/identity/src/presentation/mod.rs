//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::IdentityAppState;
pub use middleware::require_bearer;
pub use router::identity_router;
