//! In-Memory Repository Implementation
//!
//! Process-local store for development and tests. Data is lost on restart.
//!
//! Email uniqueness hangs off the `(role, email)` index: `create_account`
//! holds that key's entry lock while it checks and inserts, so two concurrent
//! registrations for the same key cannot both win, while unrelated keys only
//! contend when they hash to the same shard. No lock is held across an await.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use kernel::context::RequestContext;

use crate::domain::entity::{
    account::Account, credential::Credential, seller_profile::SellerProfile,
};
use crate::domain::repository::{AccountRepository, SellerProfileRepository};
use crate::domain::value_object::{account_id::AccountId, account_role::AccountRole, email::Email};
use crate::error::{IdentityError, IdentityResult};

#[derive(Clone)]
struct AccountRecord {
    account: Account,
    credential: Credential,
}

/// In-memory account and seller profile store
///
/// Clones share the same maps.
#[derive(Clone, Default)]
pub struct InMemoryIdentityStore {
    accounts: Arc<DashMap<AccountId, AccountRecord>>,
    email_index: Arc<DashMap<(AccountRole, Email), AccountId>>,
    profiles: Arc<DashMap<AccountId, SellerProfile>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Number of stored seller profiles
    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for InMemoryIdentityStore {
    async fn create_account(
        &self,
        ctx: &RequestContext,
        account: &Account,
        credential: &Credential,
    ) -> IdentityResult<()> {
        ctx.ensure_active()?;

        match self.email_index.entry((account.role, account.email.clone())) {
            Entry::Occupied(_) => Err(IdentityError::DuplicateEmail),
            Entry::Vacant(slot) => {
                self.accounts.insert(
                    account.account_id,
                    AccountRecord {
                        account: account.clone(),
                        credential: credential.clone(),
                    },
                );
                slot.insert(account.account_id);
                Ok(())
            }
        }
    }

    async fn find_account_by_id(
        &self,
        ctx: &RequestContext,
        account_id: &AccountId,
    ) -> IdentityResult<Option<Account>> {
        ctx.ensure_active()?;

        Ok(self
            .accounts
            .get(account_id)
            .map(|record| record.account.clone()))
    }

    async fn find_account_by_email(
        &self,
        ctx: &RequestContext,
        email: &Email,
        role: AccountRole,
    ) -> IdentityResult<Option<Account>> {
        ctx.ensure_active()?;

        let account_id = match self.email_index.get(&(role, email.clone())) {
            Some(entry) => *entry.value(),
            None => return Ok(None),
        };

        Ok(self
            .accounts
            .get(&account_id)
            .map(|record| record.account.clone()))
    }

    async fn find_credential(
        &self,
        ctx: &RequestContext,
        account_id: &AccountId,
    ) -> IdentityResult<Option<Credential>> {
        ctx.ensure_active()?;

        Ok(self
            .accounts
            .get(account_id)
            .map(|record| record.credential.clone()))
    }

    async fn delete_account(
        &self,
        ctx: &RequestContext,
        account_id: &AccountId,
    ) -> IdentityResult<bool> {
        ctx.ensure_active()?;

        let Some((_, record)) = self.accounts.remove(account_id) else {
            return Ok(false);
        };

        let key = (record.account.role, record.account.email);
        self.email_index.remove_if(&key, |_, owner| owner == account_id);
        self.profiles.remove(account_id);

        Ok(true)
    }
}

// ============================================================================
// Seller Profile Repository Implementation
// ============================================================================

impl SellerProfileRepository for InMemoryIdentityStore {
    async fn create_profile(
        &self,
        ctx: &RequestContext,
        profile: &SellerProfile,
    ) -> IdentityResult<()> {
        ctx.ensure_active()?;

        if !self.accounts.contains_key(&profile.account_id) {
            return Err(IdentityError::Storage(format!(
                "no account {} for seller profile",
                profile.account_id
            )));
        }

        match self.profiles.entry(profile.account_id) {
            Entry::Occupied(_) => Err(IdentityError::Storage(format!(
                "seller profile {} already exists",
                profile.account_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(profile.clone());
                Ok(())
            }
        }
    }

    async fn find_profile(
        &self,
        ctx: &RequestContext,
        account_id: &AccountId,
    ) -> IdentityResult<Option<SellerProfile>> {
        ctx.ensure_active()?;

        Ok(self
            .profiles
            .get(account_id)
            .map(|profile| profile.value().clone()))
    }

    async fn replace_profile(
        &self,
        ctx: &RequestContext,
        profile: &SellerProfile,
    ) -> IdentityResult<bool> {
        ctx.ensure_active()?;

        match self.profiles.get_mut(&profile.account_id) {
            Some(mut current) => {
                *current = profile.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
