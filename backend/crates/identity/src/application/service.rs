//! Identity Service
//!
//! Single entry point over the identity use cases, shared by every transport.

use std::sync::Arc;

use kernel::context::RequestContext;
use platform::clock::Clock;
use platform::password::CredentialHasher;

use crate::application::authenticate::{AuthenticateInput, AuthenticateOutput, AuthenticateUseCase};
use crate::application::config::IdentityConfig;
use crate::application::register::{RegisterSellerInput, RegisterUseCase, RegisterUserInput};
use crate::application::seller_profile::{SellerProfileUseCase, UpdateSellerProfileInput};
use crate::domain::entity::{account::Account, seller_profile::SellerProfile};
use crate::domain::repository::{AccountRepository, SellerProfileRepository};
use crate::domain::token::{Claims, SigningKey, TokenIssuer};
use crate::domain::value_object::{account_id::AccountId, account_role::AccountRole};
use crate::error::{IdentityError, IdentityResult};

pub struct IdentityService<A, P>
where
    A: AccountRepository,
    P: SellerProfileRepository,
{
    account_repo: Arc<A>,
    issuer: Arc<TokenIssuer>,
    config: Arc<IdentityConfig>,
    register: RegisterUseCase<A, P>,
    authenticate: AuthenticateUseCase<A>,
    profiles: SellerProfileUseCase<A, P>,
}

impl<A, P> IdentityService<A, P>
where
    A: AccountRepository,
    P: SellerProfileRepository,
{
    /// Wire the service; fails if the configured hashing parameters are unusable
    ///
    /// Tokens are issued with `signing_key` and live for `config.token_ttl`.
    pub fn new(
        account_repo: Arc<A>,
        profile_repo: Arc<P>,
        signing_key: SigningKey,
        clock: Arc<dyn Clock>,
        config: IdentityConfig,
    ) -> IdentityResult<Self> {
        let hasher = Arc::new(CredentialHasher::new(
            config.password_params,
            config.password_pepper.clone(),
        )?);
        let issuer = Arc::new(TokenIssuer::new(signing_key, config.token_ttl, clock));
        let config = Arc::new(config);

        Ok(Self {
            register: RegisterUseCase::new(
                account_repo.clone(),
                profile_repo.clone(),
                hasher.clone(),
                config.clone(),
            ),
            authenticate: AuthenticateUseCase::new(
                account_repo.clone(),
                hasher,
                issuer.clone(),
                config.clone(),
            ),
            profiles: SellerProfileUseCase::new(account_repo.clone(), profile_repo),
            account_repo,
            issuer,
            config,
        })
    }

    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    /// Create a buyer account
    pub async fn register_user(
        &self,
        ctx: &RequestContext,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> IdentityResult<Account> {
        let input = RegisterUserInput {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        };
        self.register.register_user(ctx, input).await
    }

    /// Create a seller account together with its profile
    pub async fn register_seller(
        &self,
        ctx: &RequestContext,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        phone: impl Into<String>,
    ) -> IdentityResult<Account> {
        let input = RegisterSellerInput {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            phone: phone.into(),
        };
        self.register.register_seller(ctx, input).await
    }

    /// Verify credentials and issue a session token
    pub async fn authenticate(
        &self,
        ctx: &RequestContext,
        email: impl Into<String>,
        password: impl Into<String>,
        role_hint: Option<AccountRole>,
    ) -> IdentityResult<AuthenticateOutput> {
        let input = AuthenticateInput {
            email: email.into(),
            password: password.into(),
            role_hint,
        };
        self.authenticate.execute(ctx, input).await
    }

    pub async fn get_user_by_id(
        &self,
        ctx: &RequestContext,
        account_id: &AccountId,
    ) -> IdentityResult<Account> {
        self.account_repo
            .find_account_by_id(ctx, account_id)
            .await?
            .ok_or(IdentityError::NotFound)
    }

    pub async fn get_seller_profile_by_id(
        &self,
        ctx: &RequestContext,
        account_id: &AccountId,
    ) -> IdentityResult<SellerProfile> {
        self.profiles.get(ctx, account_id).await
    }

    pub async fn update_seller_profile(
        &self,
        ctx: &RequestContext,
        input: UpdateSellerProfileInput,
    ) -> IdentityResult<()> {
        self.profiles.update(ctx, input).await
    }

    /// Check a session token without touching any store
    pub fn validate_token(&self, token: &str) -> IdentityResult<Claims> {
        self.issuer.validate(token)
    }
}
