//! PostgreSQL Repository Implementations
//!
//! Uniqueness of `(role, email)` is enforced by the `accounts_role_email_key`
//! constraint; a violation surfaces as `DuplicateEmail`. Every query runs
//! under the caller's deadline.

use chrono::{DateTime, Utc};
use kernel::context::RequestContext;
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    account::Account,
    credential::Credential,
    seller_profile::{RatingSummary, SellerProfile, VendorType},
};
use crate::domain::repository::{AccountRepository, SellerProfileRepository};
use crate::domain::value_object::{
    account_id::AccountId, account_name::AccountName, account_role::AccountRole, email::Email,
    phone_number::PhoneNumber,
};
use crate::error::{IdentityError, IdentityResult};

/// PostgreSQL-backed identity repository
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique index on `(role, email)`
const ROLE_EMAIL_CONSTRAINT: &str = "accounts_role_email_key";

/// Violations of the `(role, email)` index become `DuplicateEmail`; everything
/// else, other unique violations included, stays a database error
fn map_unique_violation(err: sqlx::Error) -> IdentityError {
    if is_role_email_violation(err.as_database_error()) {
        IdentityError::DuplicateEmail
    } else {
        IdentityError::Database(err)
    }
}

fn is_role_email_violation(db_err: Option<&dyn sqlx::error::DatabaseError>) -> bool {
    db_err.is_some_and(|e| e.is_unique_violation() && e.constraint() == Some(ROLE_EMAIL_CONSTRAINT))
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgIdentityRepository {
    async fn create_account(
        &self,
        ctx: &RequestContext,
        account: &Account,
        credential: &Credential,
    ) -> IdentityResult<()> {
        ctx.bound(async {
            let mut tx = self.pool.begin().await?;

            sqlx::query(
                r#"
                INSERT INTO accounts (
                    account_id,
                    name,
                    email,
                    role,
                    created_at,
                    updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(account.account_id.as_uuid())
            .bind(account.name.as_str())
            .bind(account.email.as_str())
            .bind(account.role.id())
            .bind(account.created_at)
            .bind(account.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(map_unique_violation)?;

            sqlx::query(
                r#"
                INSERT INTO account_credentials (
                    account_id,
                    password_hash,
                    created_at,
                    updated_at
                ) VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(credential.account_id.as_uuid())
            .bind(credential.password_hash.as_phc_string())
            .bind(credential.created_at)
            .bind(credential.updated_at)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok::<_, IdentityError>(())
        })
        .await?
    }

    async fn find_account_by_id(
        &self,
        ctx: &RequestContext,
        account_id: &AccountId,
    ) -> IdentityResult<Option<Account>> {
        let row = ctx
            .bound(
                sqlx::query_as::<_, AccountRow>(
                    r#"
                    SELECT
                        account_id,
                        name,
                        email,
                        role,
                        created_at,
                        updated_at
                    FROM accounts
                    WHERE account_id = $1
                    "#,
                )
                .bind(account_id.as_uuid())
                .fetch_optional(&self.pool),
            )
            .await??;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_account_by_email(
        &self,
        ctx: &RequestContext,
        email: &Email,
        role: AccountRole,
    ) -> IdentityResult<Option<Account>> {
        let row = ctx
            .bound(
                sqlx::query_as::<_, AccountRow>(
                    r#"
                    SELECT
                        account_id,
                        name,
                        email,
                        role,
                        created_at,
                        updated_at
                    FROM accounts
                    WHERE role = $1 AND email = $2
                    "#,
                )
                .bind(role.id())
                .bind(email.as_str())
                .fetch_optional(&self.pool),
            )
            .await??;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_credential(
        &self,
        ctx: &RequestContext,
        account_id: &AccountId,
    ) -> IdentityResult<Option<Credential>> {
        let row = ctx
            .bound(
                sqlx::query_as::<_, CredentialRow>(
                    r#"
                    SELECT
                        account_id,
                        password_hash,
                        created_at,
                        updated_at
                    FROM account_credentials
                    WHERE account_id = $1
                    "#,
                )
                .bind(account_id.as_uuid())
                .fetch_optional(&self.pool),
            )
            .await??;

        row.map(|r| r.into_credential()).transpose()
    }

    async fn delete_account(
        &self,
        ctx: &RequestContext,
        account_id: &AccountId,
    ) -> IdentityResult<bool> {
        // Credentials and profiles go with it (ON DELETE CASCADE)
        let result = ctx
            .bound(
                sqlx::query("DELETE FROM accounts WHERE account_id = $1")
                    .bind(account_id.as_uuid())
                    .execute(&self.pool),
            )
            .await??;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Seller Profile Repository Implementation
// ============================================================================

impl SellerProfileRepository for PgIdentityRepository {
    async fn create_profile(
        &self,
        ctx: &RequestContext,
        profile: &SellerProfile,
    ) -> IdentityResult<()> {
        ctx.bound(
            sqlx::query(
                r#"
                INSERT INTO seller_profiles (
                    account_id,
                    phone,
                    store_name,
                    vendor_type,
                    description,
                    address,
                    city,
                    specialty,
                    operating_hours,
                    delivery_options,
                    image_url,
                    profile_image_url,
                    verified,
                    rating_average,
                    review_count,
                    created_at,
                    updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
                "#,
            )
            .bind(profile.account_id.as_uuid())
            .bind(profile.phone.as_str())
            .bind(&profile.store_name)
            .bind(profile.vendor_type.id())
            .bind(&profile.description)
            .bind(&profile.address)
            .bind(&profile.city)
            .bind(&profile.specialty)
            .bind(&profile.operating_hours)
            .bind(&profile.delivery_options)
            .bind(&profile.image_url)
            .bind(&profile.profile_image_url)
            .bind(profile.verified)
            .bind(profile.rating.average)
            .bind(i64::from(profile.rating.review_count))
            .bind(profile.created_at)
            .bind(profile.updated_at)
            .execute(&self.pool),
        )
        .await??;

        Ok(())
    }

    async fn find_profile(
        &self,
        ctx: &RequestContext,
        account_id: &AccountId,
    ) -> IdentityResult<Option<SellerProfile>> {
        let row = ctx
            .bound(
                sqlx::query_as::<_, SellerProfileRow>(
                    r#"
                    SELECT
                        account_id,
                        phone,
                        store_name,
                        vendor_type,
                        description,
                        address,
                        city,
                        specialty,
                        operating_hours,
                        delivery_options,
                        image_url,
                        profile_image_url,
                        verified,
                        rating_average,
                        review_count,
                        created_at,
                        updated_at
                    FROM seller_profiles
                    WHERE account_id = $1
                    "#,
                )
                .bind(account_id.as_uuid())
                .fetch_optional(&self.pool),
            )
            .await??;

        row.map(|r| r.into_profile()).transpose()
    }

    async fn replace_profile(
        &self,
        ctx: &RequestContext,
        profile: &SellerProfile,
    ) -> IdentityResult<bool> {
        let result = ctx
            .bound(
                sqlx::query(
                    r#"
                    UPDATE seller_profiles SET
                        phone = $2,
                        store_name = $3,
                        vendor_type = $4,
                        description = $5,
                        address = $6,
                        city = $7,
                        specialty = $8,
                        operating_hours = $9,
                        delivery_options = $10,
                        image_url = $11,
                        profile_image_url = $12,
                        verified = $13,
                        rating_average = $14,
                        review_count = $15,
                        updated_at = $16
                    WHERE account_id = $1
                    "#,
                )
                .bind(profile.account_id.as_uuid())
                .bind(profile.phone.as_str())
                .bind(&profile.store_name)
                .bind(profile.vendor_type.id())
                .bind(&profile.description)
                .bind(&profile.address)
                .bind(&profile.city)
                .bind(&profile.specialty)
                .bind(&profile.operating_hours)
                .bind(&profile.delivery_options)
                .bind(&profile.image_url)
                .bind(&profile.profile_image_url)
                .bind(profile.verified)
                .bind(profile.rating.average)
                .bind(i64::from(profile.rating.review_count))
                .bind(profile.updated_at)
                .execute(&self.pool),
            )
            .await??;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    name: String,
    email: String,
    role: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> IdentityResult<Account> {
        let role = AccountRole::from_id(self.role).ok_or_else(|| {
            IdentityError::Storage(format!(
                "account {} has unknown role id {}",
                self.account_id, self.role
            ))
        })?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            name: AccountName::from_db(self.name),
            email: Email::from_db(self.email),
            role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    account_id: Uuid,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> IdentityResult<Credential> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash).map_err(|_| {
            IdentityError::Storage(format!(
                "account {} has a malformed password hash",
                self.account_id
            ))
        })?;

        Ok(Credential {
            account_id: AccountId::from_uuid(self.account_id),
            password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SellerProfileRow {
    account_id: Uuid,
    phone: String,
    store_name: Option<String>,
    vendor_type: i16,
    description: Option<String>,
    address: Option<String>,
    city: Option<String>,
    specialty: Option<String>,
    operating_hours: Option<String>,
    delivery_options: Vec<String>,
    image_url: Option<String>,
    profile_image_url: Option<String>,
    verified: bool,
    rating_average: f64,
    review_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SellerProfileRow {
    fn into_profile(self) -> IdentityResult<SellerProfile> {
        let corrupt = |what: &str| {
            IdentityError::Storage(format!("seller profile {} has {}", self.account_id, what))
        };

        let vendor_type =
            VendorType::from_id(self.vendor_type).ok_or_else(|| corrupt("an unknown vendor type"))?;
        let review_count =
            u32::try_from(self.review_count).map_err(|_| corrupt("an invalid review count"))?;
        let rating = RatingSummary::new(self.rating_average, review_count)
            .map_err(|_| corrupt("a rating out of range"))?;

        Ok(SellerProfile {
            account_id: AccountId::from_uuid(self.account_id),
            phone: PhoneNumber::from_db(self.phone),
            store_name: self.store_name,
            vendor_type,
            description: self.description,
            address: self.address,
            city: self.city,
            specialty: self.specialty,
            operating_hours: self.operating_hours,
            delivery_options: self.delivery_options,
            image_url: self.image_url,
            profile_image_url: self.profile_image_url,
            verified: self.verified,
            rating,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::error::Error as StdError;

    /// Unique violation reported by PostgreSQL for the given constraint
    #[derive(Debug, thiserror::Error)]
    #[error("duplicate key value violates unique constraint \"{constraint}\"")]
    struct UniqueViolation {
        constraint: &'static str,
    }

    impl DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            Some(self.constraint)
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    fn violation(constraint: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(UniqueViolation { constraint }))
    }

    #[test]
    fn test_role_email_violation_is_duplicate_email() {
        assert!(matches!(
            map_unique_violation(violation("accounts_role_email_key")),
            IdentityError::DuplicateEmail
        ));
    }

    #[test]
    fn test_other_unique_violations_stay_database_errors() {
        assert!(matches!(
            map_unique_violation(violation("accounts_pkey")),
            IdentityError::Database(_)
        ));
        assert!(matches!(
            map_unique_violation(sqlx::Error::RowNotFound),
            IdentityError::Database(_)
        ));
    }
}
