//! Infrastructure Layer
//!
//! Repository implementations: PostgreSQL for deployments, in-memory for
//! development and tests.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryIdentityStore;
pub use postgres::PgIdentityRepository;
