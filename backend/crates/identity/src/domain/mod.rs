//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the token issuer.

pub mod entity;
pub mod repository;
pub mod token;
pub mod value_object;

// Re-exports
pub use entity::{account::Account, credential::Credential, seller_profile::SellerProfile};
pub use repository::{AccountRepository, SellerProfileRepository};
pub use token::{Claims, IssuedToken, SigningKey, TokenIssuer};
