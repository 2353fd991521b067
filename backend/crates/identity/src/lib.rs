//! Identity Backend Module
//!
//! Buyer and seller accounts for the marketplace.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, token issuer
//! - `application/` - Use cases and the [`IdentityService`] facade
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Buyer registration; seller registration with a seller profile
//! - Email/password sign in issuing signed, expiring bearer tokens
//! - Public account and seller profile lookup
//! - Seller profile replacement by its owner
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Unknown email and wrong password are indistinguishable
//! - Tokens are HMAC-SHA256 signed and validated without a store lookup
//! - Every operation is bounded by a request deadline

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::{IdentityConfig, IdentityService, UpdateSellerProfileInput};
pub use domain::token::{Claims, SigningKey, TokenIssuer};
pub use error::{IdentityError, IdentityResult};
pub use infra::{InMemoryIdentityStore, PgIdentityRepository};
pub use presentation::router::identity_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
