//! Credential Entity
//!
//! Password hash of an account. Stored next to the account by the account
//! store and never handed to a transport.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::account_id::AccountId;

/// Credential entity
///
/// `Debug` is safe: [`HashedPassword`] prints a placeholder.
#[derive(Debug, Clone)]
pub struct Credential {
    pub account_id: AccountId,
    pub password_hash: HashedPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(account_id: AccountId, password_hash: HashedPassword) -> Self {
        let now = Utc::now();

        Self {
            account_id,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}
