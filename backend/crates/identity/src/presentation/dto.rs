//! API DTOs (Data Transfer Objects)
//!
//! Nothing here carries a password hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{
    account::Account,
    seller_profile::{SellerProfile, VendorType},
};
use crate::domain::token::{Claims, IssuedToken};
use crate::domain::value_object::{account_id::AccountId, account_role::AccountRole};

// ============================================================================
// Registration
// ============================================================================

/// Register buyer request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Register seller request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSellerRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

/// Public view of an account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.account_id,
            name: account.name.as_str().to_string(),
            email: account.email.as_str().to_string(),
            role: account.role,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

// ============================================================================
// Sessions
// ============================================================================

/// Sign in request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateRequest {
    pub email: String,
    pub password: String,
    /// Needed only when the email is registered for both roles
    #[serde(default)]
    pub role: Option<AccountRole>,
}

/// Sign in response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub account: AccountResponse,
    pub token: String,
    /// Always "Bearer"
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}

impl SessionResponse {
    pub fn new(account: &Account, issued: IssuedToken) -> Self {
        Self {
            account: AccountResponse::from(account),
            expires_at: issued.claims.expires_at(),
            token: issued.token,
            token_type: "Bearer",
        }
    }
}

/// Current session (decoded bearer token)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimsResponse {
    pub account_id: AccountId,
    pub role: AccountRole,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<&Claims> for ClaimsResponse {
    fn from(claims: &Claims) -> Self {
        Self {
            account_id: claims.sub,
            role: claims.role,
            issued_at: claims.issued_at(),
            expires_at: claims.expires_at(),
        }
    }
}

// ============================================================================
// Seller Profiles
// ============================================================================

/// Public seller profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfileResponse {
    pub id: AccountId,
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
    pub verified: bool,
    pub rating: f64,
    pub review_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SellerProfile> for SellerProfileResponse {
    fn from(profile: SellerProfile) -> Self {
        Self {
            id: profile.account_id,
            phone: profile.phone.as_str().to_string(),
            store_name: profile.store_name,
            vendor_type: profile.vendor_type,
            description: profile.description,
            address: profile.address,
            city: profile.city,
            specialty: profile.specialty,
            operating_hours: profile.operating_hours,
            delivery_options: profile.delivery_options,
            image_url: profile.image_url,
            profile_image_url: profile.profile_image_url,
            verified: profile.verified,
            rating: profile.rating.average,
            review_count: profile.rating.review_count,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Replace seller profile request
///
/// Every seller-editable field is written; verification and ratings are not
/// part of the request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSellerProfileRequest {
    pub phone: String,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub vendor_type: VendorType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub operating_hours: Option<String>,
    #[serde(default)]
    pub delivery_options: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}
