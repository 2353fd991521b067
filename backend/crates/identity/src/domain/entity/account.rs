//! Account Entity
//!
//! Identity record shared by buyers and sellers.
//! Credentials live in the separate [`Credential`](super::credential::Credential) entity.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    account_id::AccountId, account_name::AccountName, account_role::AccountRole, email::Email,
};

/// Account entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Opaque UUIDv4 identifier
    pub account_id: AccountId,
    pub name: AccountName,
    /// Unique within the account's role
    pub email: Email,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a fresh ID
    pub fn new(name: AccountName, email: Email, role: AccountRole) -> Self {
        let now = Utc::now();

        Self {
            account_id: AccountId::new(),
            name,
            email,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_seller(&self) -> bool {
        self.role.is_seller()
    }
}
