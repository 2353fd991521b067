//! Authenticate Use Case
//!
//! Verifies an email/password pair and issues a session token.
//!
//! An email may exist once per role. Lookup checks buyers first, then sellers:
//! - one candidate: verify against it
//! - both, with a role hint: verify against the hinted one
//! - both, without a hint: verify against both; any match is `AmbiguousIdentity`
//! - none: burn a dummy verification, then `InvalidCredentials`
//!
//! Unknown email and wrong password are indistinguishable to the caller.

use std::sync::Arc;

use kernel::context::RequestContext;
use platform::password::{ClearTextPassword, CredentialHasher, HashedPassword};

use crate::application::config::IdentityConfig;
use crate::application::run_blocking;
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::token::{IssuedToken, TokenIssuer};
use crate::domain::value_object::{account_role::AccountRole, email::Email};
use crate::error::{IdentityError, IdentityResult};

/// Authenticate input
pub struct AuthenticateInput {
    pub email: String,
    pub password: String,
    /// Which account to use when the email exists for both roles
    pub role_hint: Option<AccountRole>,
}

/// Authenticate output
#[derive(Debug)]
pub struct AuthenticateOutput {
    pub account: Account,
    pub token: IssuedToken,
}

/// Authenticate use case
pub struct AuthenticateUseCase<A>
where
    A: AccountRepository,
{
    account_repo: Arc<A>,
    hasher: Arc<CredentialHasher>,
    issuer: Arc<TokenIssuer>,
    config: Arc<IdentityConfig>,
}

impl<A> AuthenticateUseCase<A>
where
    A: AccountRepository,
{
    pub fn new(
        account_repo: Arc<A>,
        hasher: Arc<CredentialHasher>,
        issuer: Arc<TokenIssuer>,
        config: Arc<IdentityConfig>,
    ) -> Self {
        Self {
            account_repo,
            hasher,
            issuer,
            config,
        }
    }

    pub async fn execute(
        &self,
        ctx: &RequestContext,
        input: AuthenticateInput,
    ) -> IdentityResult<AuthenticateOutput> {
        let email = Email::new(input.email).map_err(|_| IdentityError::InvalidCredentials)?;
        let password = ClearTextPassword::new(input.password, &self.config.password_policy)
            .map_err(|_| IdentityError::InvalidCredentials)?;

        let candidates = self.candidates(ctx, &email, input.role_hint).await?;

        if candidates.is_empty() {
            let hasher = Arc::clone(&self.hasher);
            run_blocking(ctx, move || hasher.verify_dummy(&password)).await?;
            return Err(IdentityError::InvalidCredentials);
        }

        let mut hashes = Vec::with_capacity(candidates.len());
        for account in &candidates {
            let credential = self
                .account_repo
                .find_credential(ctx, &account.account_id)
                .await?
                .ok_or_else(|| {
                    IdentityError::Storage(format!(
                        "credential missing for account {}",
                        account.account_id
                    ))
                })?;
            hashes.push(credential.password_hash);
        }

        let matches = self.verify_all(ctx, password, hashes.clone()).await?;
        let candidate_count = candidates.len();
        let mut matched: Vec<(Account, HashedPassword)> = candidates
            .into_iter()
            .zip(hashes)
            .zip(matches)
            .filter_map(|(pair, ok)| ok.then_some(pair))
            .collect();

        if matched.is_empty() {
            return Err(IdentityError::InvalidCredentials);
        }
        if candidate_count > 1 {
            return Err(IdentityError::AmbiguousIdentity);
        }

        let (account, password_hash) = matched.remove(0);

        if self.hasher.needs_rehash(&password_hash) {
            tracing::info!(
                account_id = %account.account_id,
                "Credential uses outdated hashing parameters"
            );
        }

        let token = self.issuer.issue(account.account_id, account.role)?;

        tracing::info!(
            account_id = %account.account_id,
            role = %account.role,
            "Account authenticated"
        );

        Ok(AuthenticateOutput { account, token })
    }

    /// Accounts the password has to be checked against, buyer first
    async fn candidates(
        &self,
        ctx: &RequestContext,
        email: &Email,
        role_hint: Option<AccountRole>,
    ) -> IdentityResult<Vec<Account>> {
        let buyer = self
            .account_repo
            .find_account_by_email(ctx, email, AccountRole::Buyer)
            .await?;
        let seller = self
            .account_repo
            .find_account_by_email(ctx, email, AccountRole::Seller)
            .await?;

        let candidates = match (buyer, seller, role_hint) {
            (Some(buyer), Some(_), Some(AccountRole::Buyer)) => vec![buyer],
            (Some(_), Some(seller), Some(AccountRole::Seller)) => vec![seller],
            (Some(buyer), Some(seller), None) => vec![buyer, seller],
            (Some(buyer), None, _) => vec![buyer],
            (None, Some(seller), _) => vec![seller],
            (None, None, _) => Vec::new(),
        };

        Ok(candidates)
    }

    /// Verify one password against several hashes in a single blocking task
    async fn verify_all(
        &self,
        ctx: &RequestContext,
        password: ClearTextPassword,
        hashes: Vec<HashedPassword>,
    ) -> IdentityResult<Vec<bool>> {
        let hasher = Arc::clone(&self.hasher);
        run_blocking(ctx, move || {
            hashes
                .iter()
                .map(|hash| hasher.verify(&password, hash))
                .collect()
        })
        .await
    }
}
