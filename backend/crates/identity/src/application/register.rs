//! Register Use Case
//!
//! Creates buyer and seller accounts.

use std::sync::Arc;

use kernel::context::RequestContext;
use platform::password::{ClearTextPassword, CredentialHasher};

use crate::application::config::IdentityConfig;
use crate::application::run_blocking;
use crate::domain::entity::{
    account::Account, credential::Credential, seller_profile::SellerProfile,
};
use crate::domain::repository::{AccountRepository, SellerProfileRepository};
use crate::domain::value_object::{
    account_name::AccountName, account_role::AccountRole, email::Email,
    phone_number::PhoneNumber,
};
use crate::error::{IdentityError, IdentityResult};

/// Register buyer input
pub struct RegisterUserInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Register seller input
pub struct RegisterSellerInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

/// Register use case
pub struct RegisterUseCase<A, P>
where
    A: AccountRepository,
    P: SellerProfileRepository,
{
    account_repo: Arc<A>,
    profile_repo: Arc<P>,
    hasher: Arc<CredentialHasher>,
    config: Arc<IdentityConfig>,
}

impl<A, P> RegisterUseCase<A, P>
where
    A: AccountRepository,
    P: SellerProfileRepository,
{
    pub fn new(
        account_repo: Arc<A>,
        profile_repo: Arc<P>,
        hasher: Arc<CredentialHasher>,
        config: Arc<IdentityConfig>,
    ) -> Self {
        Self {
            account_repo,
            profile_repo,
            hasher,
            config,
        }
    }

    /// Create a buyer account
    pub async fn register_user(
        &self,
        ctx: &RequestContext,
        input: RegisterUserInput,
    ) -> IdentityResult<Account> {
        let (account, credential) = self
            .prepare(ctx, input.name, input.email, input.password, AccountRole::Buyer)
            .await?;

        self.account_repo
            .create_account(ctx, &account, &credential)
            .await?;

        tracing::info!(
            account_id = %account.account_id,
            role = %account.role,
            "Account registered"
        );

        Ok(account)
    }

    /// Create a seller account and its profile
    ///
    /// If the profile cannot be written the account is deleted again, so a
    /// seller without a profile is never left behind.
    pub async fn register_seller(
        &self,
        ctx: &RequestContext,
        input: RegisterSellerInput,
    ) -> IdentityResult<Account> {
        let phone = PhoneNumber::new(&input.phone)?;

        let (account, credential) = self
            .prepare(ctx, input.name, input.email, input.password, AccountRole::Seller)
            .await?;

        self.account_repo
            .create_account(ctx, &account, &credential)
            .await?;

        let profile = SellerProfile::new(account.account_id, phone, &account.name);
        if let Err(e) = self.profile_repo.create_profile(ctx, &profile).await {
            self.roll_back(&account).await;
            return Err(IdentityError::RegistrationFailed(format!(
                "seller profile not created: {e}"
            )));
        }

        tracing::info!(
            account_id = %account.account_id,
            role = %account.role,
            "Account registered"
        );

        Ok(account)
    }

    /// Validate input, reject known duplicates early and hash the password
    async fn prepare(
        &self,
        ctx: &RequestContext,
        name: String,
        email: String,
        password: String,
        role: AccountRole,
    ) -> IdentityResult<(Account, Credential)> {
        let name = AccountName::new(name)?;
        let email = Email::new(email)?;
        let password = ClearTextPassword::new(password, &self.config.password_policy)
            .map_err(|e| IdentityError::InvalidInput(e.to_string()))?;

        // Fast path only; the store's atomic create is what enforces uniqueness
        if self
            .account_repo
            .find_account_by_email(ctx, &email, role)
            .await?
            .is_some()
        {
            return Err(IdentityError::DuplicateEmail);
        }

        let hasher = Arc::clone(&self.hasher);
        let password_hash = run_blocking(ctx, move || hasher.hash(&password))
            .await?
            .map_err(|e| IdentityError::RegistrationFailed(format!("password hashing failed: {e}")))?;

        let account = Account::new(name, email, role);
        let credential = Credential::new(account.account_id, password_hash);

        Ok((account, credential))
    }

    /// Compensating delete, bounded by a fresh request deadline
    async fn roll_back(&self, account: &Account) {
        let ctx = self.config.request_context();

        match self
            .account_repo
            .delete_account(&ctx, &account.account_id)
            .await
        {
            Ok(_) => {
                tracing::warn!(
                    account_id = %account.account_id,
                    "Seller registration rolled back"
                );
            }
            Err(e) => {
                tracing::error!(
                    account_id = %account.account_id,
                    error = %e,
                    "Seller registration rollback failed"
                );
            }
        }
    }
}
