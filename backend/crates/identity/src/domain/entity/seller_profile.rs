//! Seller Profile Entity
//!
//! Public storefront data of a seller, keyed by the seller's account ID.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{
    account_id::AccountId, account_name::AccountName, phone_number::PhoneNumber,
};

/// Kind of food business a seller runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum VendorType {
    #[default]
    HomeCook = 0,
    TiffinService = 1,
}

impl VendorType {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(VendorType::HomeCook),
            1 => Some(VendorType::TiffinService),
            _ => None,
        }
    }
}

/// Highest possible average rating
pub const MAX_RATING: f64 = 5.0;

/// Aggregated review score
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
    /// Mean rating in `0.0..=5.0`
    pub average: f64,
    pub review_count: u32,
}

impl RatingSummary {
    pub fn new(average: f64, review_count: u32) -> AppResult<Self> {
        if !average.is_finite() || !(0.0..=MAX_RATING).contains(&average) {
            return Err(AppError::bad_request(format!(
                "Rating must be between 0 and {}",
                MAX_RATING
            )));
        }

        Ok(Self {
            average,
            review_count,
        })
    }
}

/// Seller profile entity
#[derive(Debug, Clone, PartialEq)]
pub struct SellerProfile {
    /// Same ID as the owning seller account
    pub account_id: AccountId,
    pub phone: PhoneNumber,
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
    pub verified: bool,
    pub rating: RatingSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SellerProfile {
    /// Profile created alongside a seller account: phone plus defaults,
    /// with the account name as the initial store name
    pub fn new(account_id: AccountId, phone: PhoneNumber, name: &AccountName) -> Self {
        let now = Utc::now();

        Self {
            account_id,
            phone,
            store_name: Some(name.as_str().to_string()),
            vendor_type: VendorType::default(),
            description: None,
            address: None,
            city: None,
            specialty: None,
            operating_hours: None,
            delivery_options: Vec::new(),
            image_url: None,
            profile_image_url: None,
            verified: false,
            rating: RatingSummary::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Full replacement of the public fields, keeping identity and creation time
    pub fn replaced_by(&self, next: SellerProfile) -> SellerProfile {
        SellerProfile {
            account_id: self.account_id,
            created_at: self.created_at,
            updated_at: Utc::now(),
            ..next
        }
    }
}

/// Trim a free-text field; blank becomes `None`
pub fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> SellerProfile {
        SellerProfile::new(
            AccountId::new(),
            PhoneNumber::new("555-0100").unwrap(),
            &AccountName::new("Asha's Kitchen").unwrap(),
        )
    }

    #[test]
    fn test_new_profile_defaults() {
        let profile = profile();
        assert_eq!(profile.phone.as_str(), "555-0100");
        assert_eq!(profile.store_name.as_deref(), Some("Asha's Kitchen"));
        assert_eq!(profile.vendor_type, VendorType::HomeCook);
        assert!(!profile.verified);
        assert_eq!(profile.rating, RatingSummary::default());
    }

    #[test]
    fn test_replaced_by_keeps_identity_and_created_at() {
        let current = profile();
        let mut next = profile();
        next.city = Some("Pune".to_string());

        let replaced = current.replaced_by(next);
        assert_eq!(replaced.account_id, current.account_id);
        assert_eq!(replaced.created_at, current.created_at);
        assert!(replaced.updated_at >= current.updated_at);
        assert_eq!(replaced.city.as_deref(), Some("Pune"));
    }

    #[test]
    fn test_rating_bounds() {
        assert!(RatingSummary::new(4.5, 10).is_ok());
        assert!(RatingSummary::new(0.0, 0).is_ok());
        assert!(RatingSummary::new(5.1, 1).is_err());
        assert!(RatingSummary::new(-0.1, 1).is_err());
        assert!(RatingSummary::new(f64::NAN, 1).is_err());
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text(Some("  Thali  ".to_string())).as_deref(), Some("Thali"));
        assert_eq!(clean_text(Some("   ".to_string())), None);
        assert_eq!(clean_text(None), None);
    }

    #[test]
    fn test_vendor_type_codes() {
        assert_eq!(VendorType::from_id(VendorType::TiffinService.id()), Some(VendorType::TiffinService));
        assert_eq!(VendorType::from_id(9), None);
        assert_eq!(
            serde_json::to_string(&VendorType::TiffinService).unwrap(),
            "\"tiffin_service\""
        );
    }
}
