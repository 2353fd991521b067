//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - Credential hashing (Argon2id) and clear-text password handling
//! - Cryptographic helpers (HMAC-SHA256, base64url, OS randomness)
//! - Wall clock abstraction so time-dependent logic can be tested

pub mod clock;
pub mod crypto;
pub mod password;
