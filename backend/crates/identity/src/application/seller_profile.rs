//! Seller Profile Use Case
//!
//! Reads and replaces the public profile of a seller.

use std::sync::Arc;

use kernel::context::RequestContext;

use crate::domain::entity::seller_profile::{SellerProfile, VendorType, clean_text};
use crate::domain::repository::{AccountRepository, SellerProfileRepository};
use crate::domain::value_object::{account_id::AccountId, phone_number::PhoneNumber};
use crate::error::{IdentityError, IdentityResult};

/// Full replacement of the seller-editable part of a profile
///
/// `verified` and the rating aggregates are owned by the platform and carried
/// over from the stored profile.
#[derive(Debug, Clone)]
pub struct UpdateSellerProfileInput {
    pub account_id: AccountId,
    pub phone: String,
    pub store_name: Option<String>,
    pub vendor_type: VendorType,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub specialty: Option<String>,
    pub operating_hours: Option<String>,
    pub delivery_options: Vec<String>,
    pub image_url: Option<String>,
    pub profile_image_url: Option<String>,
}

impl UpdateSellerProfileInput {
    /// Start from the current profile, so callers only touch what they change
    pub fn from_profile(profile: &SellerProfile) -> Self {
        Self {
            account_id: profile.account_id,
            phone: profile.phone.as_str().to_string(),
            store_name: profile.store_name.clone(),
            vendor_type: profile.vendor_type,
            description: profile.description.clone(),
            address: profile.address.clone(),
            city: profile.city.clone(),
            specialty: profile.specialty.clone(),
            operating_hours: profile.operating_hours.clone(),
            delivery_options: profile.delivery_options.clone(),
            image_url: profile.image_url.clone(),
            profile_image_url: profile.profile_image_url.clone(),
        }
    }

    /// Validated profile; timestamps are filled in by [`SellerProfile::replaced_by`]
    fn into_profile(self, current: &SellerProfile) -> IdentityResult<SellerProfile> {
        let next = SellerProfile {
            account_id: self.account_id,
            phone: PhoneNumber::new(&self.phone)?,
            store_name: clean_text(self.store_name),
            vendor_type: self.vendor_type,
            description: clean_text(self.description),
            address: clean_text(self.address),
            city: clean_text(self.city),
            specialty: clean_text(self.specialty),
            operating_hours: clean_text(self.operating_hours),
            delivery_options: self
                .delivery_options
                .into_iter()
                .filter_map(|option| clean_text(Some(option)))
                .collect(),
            image_url: clean_text(self.image_url),
            profile_image_url: clean_text(self.profile_image_url),
            verified: current.verified,
            rating: current.rating,
            created_at: current.created_at,
            updated_at: current.updated_at,
        };

        Ok(current.replaced_by(next))
    }
}

/// Seller profile use case
pub struct SellerProfileUseCase<A, P>
where
    A: AccountRepository,
    P: SellerProfileRepository,
{
    account_repo: Arc<A>,
    profile_repo: Arc<P>,
}

impl<A, P> SellerProfileUseCase<A, P>
where
    A: AccountRepository,
    P: SellerProfileRepository,
{
    pub fn new(account_repo: Arc<A>, profile_repo: Arc<P>) -> Self {
        Self {
            account_repo,
            profile_repo,
        }
    }

    /// Public profile of a seller
    pub async fn get(
        &self,
        ctx: &RequestContext,
        account_id: &AccountId,
    ) -> IdentityResult<SellerProfile> {
        self.ensure_seller(ctx, account_id).await?;

        self.profile_repo
            .find_profile(ctx, account_id)
            .await?
            .ok_or(IdentityError::NotFound)
    }

    /// Replace the profile of an existing seller (last write wins)
    pub async fn update(
        &self,
        ctx: &RequestContext,
        input: UpdateSellerProfileInput,
    ) -> IdentityResult<()> {
        let account_id = input.account_id;
        self.ensure_seller(ctx, &account_id).await?;

        let current = self
            .profile_repo
            .find_profile(ctx, &account_id)
            .await?
            .ok_or(IdentityError::NotFound)?;

        let profile = input.into_profile(&current)?;

        if !self.profile_repo.replace_profile(ctx, &profile).await? {
            return Err(IdentityError::NotFound);
        }

        tracing::info!(account_id = %account_id, "Seller profile updated");

        Ok(())
    }

    async fn ensure_seller(&self, ctx: &RequestContext, account_id: &AccountId) -> IdentityResult<()> {
        let account = self
            .account_repo
            .find_account_by_id(ctx, account_id)
            .await?
            .ok_or(IdentityError::NotFound)?;

        if !account.is_seller() {
            return Err(IdentityError::NotASeller);
        }

        Ok(())
    }
}
