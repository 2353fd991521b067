//! Password Hashing and Verification
//!
//! The credential hasher of the platform:
//! - Argon2id hashing (memory-hard, OWASP parameters by default)
//! - Fresh 128-bit salt from the OS RNG for every hash
//! - Constant-time verification (delegated to argon2)
//! - Zeroization of clear-text material
//! - Optional application-wide pepper
//!
//! ## Security Notes
//! - [`ClearTextPassword`] is not `Clone` and its `Debug` output is redacted
//! - [`HashedPassword`] prints as `[HASH]`, so it never ends up in logs by accident
//! - [`CredentialHasher::verify_dummy`] lets callers spend the same work on
//!   "unknown account" as on "wrong password"

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::{random_bytes, to_base64url};

// ============================================================================
// Policy
// ============================================================================

/// Default minimum length in characters; registration only requires a non-empty secret
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 1;

/// Default maximum length in characters; bounds the cost of hashing attacker input
pub const DEFAULT_MAX_PASSWORD_LENGTH: usize = 128;

/// Length bounds applied to clear-text passwords (counted in Unicode scalar values)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_PASSWORD_LENGTH,
            max_length: DEFAULT_MAX_PASSWORD_LENGTH,
        }
    }
}

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Salt generation or Argon2 computation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Argon2 parameters rejected (misconfiguration)
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    /// Stored hash is not a PHC string
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// ## Examples
/// ```rust
/// use platform::password::{ClearTextPassword, PasswordPolicy};
///
/// let password = ClearTextPassword::new("correct horse".to_string(), &PasswordPolicy::default()).unwrap();
/// assert!(format!("{password:?}").contains("REDACTED"));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Validate and normalize user input
    ///
    /// Unicode is normalized with NFKC before counting characters, so the same
    /// password typed on different keyboards hashes identically.
    pub fn new(raw: String, policy: &PasswordPolicy) -> Result<Self, PasswordPolicyError> {
        let mut raw = raw;
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        // From here on the normalized copy is owned by `candidate` and wiped on
        // every early return.
        let candidate = Self(normalized);

        if candidate.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = candidate.0.chars().count();
        if char_count < policy.min_length {
            return Err(PasswordPolicyError::TooShort {
                min: policy.min_length,
                actual: char_count,
            });
        }
        if char_count > policy.max_length {
            return Err(PasswordPolicyError::TooLong {
                max: policy.max_length,
                actual: char_count,
            });
        }

        // Control characters other than tab/newline are almost always paste accidents
        if candidate
            .0
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(candidate)
    }

    /// Create without validation (tests only)
    #[cfg(test)]
    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.to_string())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format (algorithm, version, params, salt, digest)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Credential Hasher
// ============================================================================

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for PasswordParams {
    /// OWASP recommended Argon2id parameters: m=19456 (19 MiB), t=2, p=1
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl PasswordParams {
    /// Smallest parameters Argon2 accepts; development and tests only
    pub const fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }

    fn to_argon2(self) -> Result<Params, PasswordHashError> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordHashError::InvalidParams(e.to_string()))
    }
}

/// One-way salted password hashing and verification
pub struct CredentialHasher {
    params: Params,
    pepper: Option<Zeroizing<Vec<u8>>>,
    decoy: HashedPassword,
}

impl CredentialHasher {
    /// Build a hasher; parameters are checked here so misconfiguration fails at startup
    ///
    /// The decoy hash used by [`verify_dummy`](Self::verify_dummy) is computed
    /// here too, so no login ever pays for building it.
    pub fn new(params: PasswordParams, pepper: Option<Vec<u8>>) -> Result<Self, PasswordHashError> {
        let mut hasher = Self {
            params: params.to_argon2()?,
            pepper: pepper.map(Zeroizing::new),
            decoy: HashedPassword {
                hash: String::new(),
            },
        };
        let secret = ClearTextPassword(to_base64url(&random_bytes(24)));
        hasher.decoy = hasher.hash(&secret)?;
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Password bytes with the pepper appended; wiped when dropped
    fn peppered(&self, password: &ClearTextPassword) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(password.as_bytes().to_vec());
        if let Some(pepper) = &self.pepper {
            bytes.extend_from_slice(pepper);
        }
        bytes
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let input = self.peppered(password);

        let hash = self
            .argon2()
            .hash_password(&input, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }

    /// Verify a password against a stored hash
    ///
    /// The parameters embedded in the stored hash are used, so hashes created
    /// under older settings keep verifying. A malformed stored hash simply
    /// fails verification.
    pub fn verify(&self, password: &ClearTextPassword, hashed: &HashedPassword) -> bool {
        let Ok(parsed) = PasswordHash::new(&hashed.hash) else {
            return false;
        };
        let input = self.peppered(password);

        // Argon2 compares digests in constant time
        self.argon2().verify_password(&input, &parsed).is_ok()
    }

    /// Spend one verification's worth of work and return `false`
    ///
    /// Used when there is no stored hash to check against (unknown account).
    pub fn verify_dummy(&self, password: &ClearTextPassword) -> bool {
        let _ = self.verify(password, &self.decoy);
        false
    }

    /// True when the stored hash should be recomputed with the current settings
    pub fn needs_rehash(&self, hashed: &HashedPassword) -> bool {
        let Ok(parsed) = PasswordHash::new(&hashed.hash) else {
            return true;
        };
        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }
        match Params::try_from(&parsed) {
            Ok(stored) => {
                stored.m_cost() != self.params.m_cost()
                    || stored.t_cost() != self.params.t_cost()
                    || stored.p_cost() != self.params.p_cost()
            }
            Err(_) => true,
        }
    }
}

impl fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(PasswordParams::minimal(), None).unwrap()
    }

    #[test]
    fn test_policy_accepts_short_nonempty_password() {
        assert!(ClearTextPassword::new("pw".to_string(), &PasswordPolicy::default()).is_ok());
    }

    #[test]
    fn test_policy_rejects_empty_and_whitespace() {
        let policy = PasswordPolicy::default();
        assert_eq!(
            ClearTextPassword::new(String::new(), &policy).unwrap_err(),
            PasswordPolicyError::EmptyOrWhitespace
        );
        assert_eq!(
            ClearTextPassword::new("   \t".to_string(), &policy).unwrap_err(),
            PasswordPolicyError::EmptyOrWhitespace
        );
    }

    #[test]
    fn test_policy_length_bounds() {
        let policy = PasswordPolicy {
            min_length: 8,
            max_length: 16,
        };
        assert!(matches!(
            ClearTextPassword::new("short".to_string(), &policy),
            Err(PasswordPolicyError::TooShort { min: 8, actual: 5 })
        ));
        assert!(matches!(
            ClearTextPassword::new("a".repeat(17), &policy),
            Err(PasswordPolicyError::TooLong { max: 16, actual: 17 })
        ));
        // Characters, not bytes
        assert!(ClearTextPassword::new("パスワード安全です".to_string(), &policy).is_ok());
    }

    #[test]
    fn test_policy_rejects_control_characters() {
        let result = ClearTextPassword::new("pass\u{0007}word".to_string(), &PasswordPolicy::default());
        assert_eq!(result.unwrap_err(), PasswordPolicyError::InvalidCharacter);
    }

    #[test]
    fn test_nfkc_normalization_is_applied() {
        let hasher = hasher();
        let policy = PasswordPolicy::default();
        // U+FB01 LATIN SMALL LIGATURE FI normalizes to "fi"
        let ligature = ClearTextPassword::new("\u{FB01}sh-tank".to_string(), &policy).unwrap();
        let plain = ClearTextPassword::new("fish-tank".to_string(), &policy).unwrap();
        let hashed = hasher.hash(&ligature).unwrap();
        assert!(hasher.verify(&plain, &hashed));
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let password = ClearTextPassword::new_unchecked("TestPassword123!");
        let hashed = hasher.hash(&password).unwrap();

        assert!(hashed.as_phc_string().starts_with("$argon2id$"));
        assert!(hasher.verify(&password, &hashed));

        let wrong = ClearTextPassword::new_unchecked("WrongPassword123!");
        assert!(!hasher.verify(&wrong, &hashed));
    }

    #[test]
    fn test_salt_is_fresh_per_hash() {
        let hasher = hasher();
        let password = ClearTextPassword::new_unchecked("same input");
        let a = hasher.hash(&password).unwrap();
        let b = hasher.hash(&password).unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify(&password, &a));
        assert!(hasher.verify(&password, &b));
    }

    #[test]
    fn test_pepper_must_match() {
        let peppered = CredentialHasher::new(PasswordParams::minimal(), Some(b"pepper".to_vec())).unwrap();
        let plain = hasher();
        let password = ClearTextPassword::new_unchecked("TestPassword123!");

        let hashed = peppered.hash(&password).unwrap();
        assert!(peppered.verify(&password, &hashed));
        assert!(!plain.verify(&password, &hashed));
    }

    #[test]
    fn test_verify_uses_params_from_stored_hash() {
        let old = CredentialHasher::new(
            PasswordParams {
                memory_kib: 64,
                iterations: 1,
                parallelism: 1,
            },
            None,
        )
        .unwrap();
        let current = hasher();
        let password = ClearTextPassword::new_unchecked("legacy");

        let hashed = old.hash(&password).unwrap();
        assert!(current.verify(&password, &hashed));
        assert!(current.needs_rehash(&hashed));
        assert!(!old.needs_rehash(&hashed));
    }

    #[test]
    fn test_malformed_stored_hash_fails_verification() {
        let hasher = hasher();
        let password = ClearTextPassword::new_unchecked("whatever");
        let bogus = HashedPassword {
            hash: "not_a_valid_hash".to_string(),
        };
        assert!(!hasher.verify(&password, &bogus));
        assert!(hasher.needs_rehash(&bogus));
    }

    #[test]
    fn test_verify_dummy_is_always_false() {
        let hasher = hasher();
        let password = ClearTextPassword::new_unchecked("anything");
        assert!(!hasher.verify_dummy(&password));
        assert!(!hasher.verify_dummy(&password));
    }

    #[test]
    fn test_decoy_ready_after_construction() {
        let hasher = hasher();
        assert!(hasher.decoy.as_phc_string().starts_with("$argon2id$"));
        assert!(!hasher.needs_rehash(&hasher.decoy));

        let peppered = CredentialHasher::new(PasswordParams::minimal(), Some(b"pepper".to_vec())).unwrap();
        assert_ne!(peppered.decoy, hasher.decoy);
    }

    #[test]
    fn test_invalid_params_rejected_up_front() {
        let result = CredentialHasher::new(
            PasswordParams {
                memory_kib: 1,
                iterations: 0,
                parallelism: 0,
            },
            None,
        );
        assert!(matches!(result, Err(PasswordHashError::InvalidParams(_))));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let hasher = hasher();
        let password = ClearTextPassword::new_unchecked("TestPassword123!");
        let hashed = hasher.hash(&password).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(hasher.verify(&password, &restored));
        assert!(HashedPassword::from_phc_string("nope").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::new_unchecked("secret");
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));

        let hashed = hasher().hash(&password).unwrap();
        assert!(!format!("{:?}", hashed).contains("argon2"));

        let peppered = CredentialHasher::new(PasswordParams::minimal(), Some(b"pepper".to_vec())).unwrap();
        assert!(!format!("{:?}", peppered).contains("pepper\""));
    }
}
