//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infrastructure layer.
//! Every call takes the caller's [`RequestContext`] and fails with
//! `DeadlineExceeded` once its deadline has passed.

use kernel::context::RequestContext;

use crate::domain::entity::{
    account::Account, credential::Credential, seller_profile::SellerProfile,
};
use crate::domain::value_object::{account_id::AccountId, account_role::AccountRole, email::Email};
use crate::error::IdentityResult;

/// Account store: accounts and their credentials
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Persist an account together with its credential
    ///
    /// The email uniqueness check and the insert are one atomic step: two
    /// concurrent creates for the same `(role, email)` yield exactly one
    /// success and one `DuplicateEmail`.
    async fn create_account(
        &self,
        ctx: &RequestContext,
        account: &Account,
        credential: &Credential,
    ) -> IdentityResult<()>;

    /// Find account by ID
    async fn find_account_by_id(
        &self,
        ctx: &RequestContext,
        account_id: &AccountId,
    ) -> IdentityResult<Option<Account>>;

    /// Find account by email within one role
    async fn find_account_by_email(
        &self,
        ctx: &RequestContext,
        email: &Email,
        role: AccountRole,
    ) -> IdentityResult<Option<Account>>;

    /// Find the credential of an account
    async fn find_credential(
        &self,
        ctx: &RequestContext,
        account_id: &AccountId,
    ) -> IdentityResult<Option<Credential>>;

    /// Delete an account, its credential and any profile; returns whether it existed
    async fn delete_account(&self, ctx: &RequestContext, account_id: &AccountId)
    -> IdentityResult<bool>;
}

/// Seller profile store
#[trait_variant::make(SellerProfileRepository: Send)]
pub trait LocalSellerProfileRepository {
    /// Create the profile of a seller
    async fn create_profile(&self, ctx: &RequestContext, profile: &SellerProfile)
    -> IdentityResult<()>;

    /// Find profile by the seller's account ID
    async fn find_profile(
        &self,
        ctx: &RequestContext,
        account_id: &AccountId,
    ) -> IdentityResult<Option<SellerProfile>>;

    /// Replace an existing profile (last write wins); returns `false` if none existed
    async fn replace_profile(
        &self,
        ctx: &RequestContext,
        profile: &SellerProfile,
    ) -> IdentityResult<bool>;
}
