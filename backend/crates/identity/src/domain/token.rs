//! Session Tokens
//!
//! Self-contained signed tokens carrying account ID and role.
//!
//! ## Format
//! `base64url(claims JSON) "." base64url(HMAC-SHA256(key, first segment))`,
//! both segments without padding. Claims:
//! `{"sub": "<uuid>", "role": "buyer|seller", "iat": <unix s>, "exp": <unix s>}`.
//!
//! Tokens are not persisted and cannot be revoked; they stop validating at `exp`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use platform::clock::Clock;
use platform::crypto::{
    from_base64, from_base64url, hmac_sha256, hmac_sha256_verify, random_bytes, to_base64url,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::value_object::{account_id::AccountId, account_role::AccountRole};
use crate::error::{IdentityError, IdentityResult};

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: AccountId,
    pub role: AccountRole,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds); the token is expired once `now >= exp`
    pub exp: i64,
}

impl Claims {
    pub fn account_id(&self) -> AccountId {
        self.sub
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

// ============================================================================
// Signing Key
// ============================================================================

/// Signing key errors (configuration time)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningKeyError {
    #[error("Signing key must be at least {min} bytes (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Signing key is not valid base64")]
    InvalidEncoding,
}

/// HMAC key material, wiped from memory on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub const MIN_LEN: usize = 32;

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, SigningKeyError> {
        if bytes.len() < Self::MIN_LEN {
            let actual = bytes.len();
            let mut bytes = bytes;
            bytes.zeroize();
            return Err(SigningKeyError::TooShort {
                min: Self::MIN_LEN,
                actual,
            });
        }
        Ok(Self(bytes))
    }

    /// Decode standard (padded) base64, e.g. from an environment variable
    pub fn from_base64(encoded: &str) -> Result<Self, SigningKeyError> {
        let bytes = from_base64(encoded.trim()).map_err(|_| SigningKeyError::InvalidEncoding)?;
        Self::from_bytes(bytes)
    }

    /// Fresh random key (development and tests)
    pub fn generate() -> Self {
        Self(random_bytes(Self::MIN_LEN))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Token Issuer
// ============================================================================

/// A freshly issued token and the claims it carries
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Issues and validates session tokens
///
/// Owns the signing key for the lifetime of the process. Validation is pure:
/// no store is consulted.
pub struct TokenIssuer {
    key: SigningKey,
    ttl_secs: i64,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    pub fn new(key: SigningKey, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            key,
            ttl_secs: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
            clock,
        }
    }

    /// Sign a token for an account
    pub fn issue(&self, account_id: AccountId, role: AccountRole) -> IdentityResult<IssuedToken> {
        let iat = self.clock.now().timestamp();
        let claims = Claims {
            sub: account_id,
            role,
            iat,
            exp: iat.saturating_add(self.ttl_secs),
        };

        let payload = serde_json::to_vec(&claims).map_err(|_| IdentityError::SigningFailure)?;
        let payload = to_base64url(&payload);
        let signature = hmac_sha256(self.key.as_bytes(), payload.as_bytes())
            .map_err(|_| IdentityError::SigningFailure)?;

        Ok(IssuedToken {
            token: format!("{}.{}", payload, to_base64url(&signature)),
            claims,
        })
    }

    /// Check signature and expiry, returning the claims
    pub fn validate(&self, token: &str) -> IdentityResult<Claims> {
        let (payload, signature) = token.split_once('.').ok_or(IdentityError::TokenInvalid)?;
        let signature = from_base64url(signature).map_err(|_| IdentityError::TokenInvalid)?;

        // Signature first; the payload is only parsed once it is known to be ours
        if !hmac_sha256_verify(self.key.as_bytes(), payload.as_bytes(), &signature) {
            return Err(IdentityError::TokenInvalid);
        }

        let payload = from_base64url(payload).map_err(|_| IdentityError::TokenInvalid)?;
        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| IdentityError::TokenInvalid)?;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(IdentityError::TokenExpired);
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("key", &self.key)
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use platform::clock::ManualClock;

    fn issuer_with_clock() -> (TokenIssuer, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        let issuer = TokenIssuer::new(
            SigningKey::generate(),
            Duration::from_secs(3600),
            Arc::new(clock.clone()),
        );
        (issuer, clock)
    }

    #[test]
    fn test_issue_and_validate() {
        let (issuer, _) = issuer_with_clock();
        let account_id = AccountId::new();

        let issued = issuer.issue(account_id, AccountRole::Seller).unwrap();
        assert_eq!(issued.claims.exp - issued.claims.iat, 3600);

        let claims = issuer.validate(&issued.token).unwrap();
        assert_eq!(claims.sub, account_id);
        assert_eq!(claims.role, AccountRole::Seller);
        assert_eq!(claims, issued.claims);
    }

    #[test]
    fn test_expiry_boundary() {
        let (issuer, clock) = issuer_with_clock();
        let issued = issuer.issue(AccountId::new(), AccountRole::Buyer).unwrap();

        clock.advance(chrono::Duration::seconds(3599));
        assert!(issuer.validate(&issued.token).is_ok());

        clock.advance(chrono::Duration::seconds(1));
        assert!(matches!(
            issuer.validate(&issued.token),
            Err(IdentityError::TokenExpired)
        ));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let (issuer, _) = issuer_with_clock();
        let issued = issuer.issue(AccountId::new(), AccountRole::Buyer).unwrap();
        let (_, signature) = issued.token.split_once('.').unwrap();

        // Promote the buyer to seller, keep the original signature
        let forged_claims = Claims {
            role: AccountRole::Seller,
            ..issued.claims.clone()
        };
        let forged_payload = to_base64url(&serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{}.{}", forged_payload, signature);

        assert!(matches!(
            issuer.validate(&forged),
            Err(IdentityError::TokenInvalid)
        ));
    }

    #[test]
    fn test_foreign_key_rejected() {
        let (issuer, clock) = issuer_with_clock();
        let other = TokenIssuer::new(SigningKey::generate(), Duration::from_secs(3600), Arc::new(clock));
        let issued = other.issue(AccountId::new(), AccountRole::Buyer).unwrap();

        assert!(matches!(
            issuer.validate(&issued.token),
            Err(IdentityError::TokenInvalid)
        ));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let (issuer, _) = issuer_with_clock();
        for token in ["", "no-dot", ".", "abc.def", "a.b.c", "!!!.???"] {
            assert!(
                matches!(issuer.validate(token), Err(IdentityError::TokenInvalid)),
                "token {token:?} should be invalid"
            );
        }
    }

    #[test]
    fn test_signing_key_length() {
        assert!(matches!(
            SigningKey::from_bytes(vec![1u8; 31]),
            Err(SigningKeyError::TooShort { min: 32, actual: 31 })
        ));
        assert!(SigningKey::from_bytes(vec![1u8; 32]).is_ok());
        assert_eq!(
            SigningKey::from_base64("not base64!").unwrap_err(),
            SigningKeyError::InvalidEncoding
        );
        // 32 bytes of 0x00, standard base64
        assert!(SigningKey::from_base64("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=").is_ok());
    }

    #[test]
    fn test_signing_key_debug_redacted() {
        let key = SigningKey::from_bytes(vec![0xAB; 32]).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("171"));
    }
}
