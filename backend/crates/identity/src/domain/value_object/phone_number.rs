//! Phone Number Value Object
//!
//! Sellers publish a contact number on their profile. Only the character set
//! is checked; the number is stored as typed (trimmed).

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

const PHONE_MAX_LENGTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(phone: impl AsRef<str>) -> AppResult<Self> {
        let phone = phone.as_ref().trim();

        if phone.is_empty() {
            return Err(AppError::bad_request("Phone number cannot be empty"));
        }

        if phone.len() > PHONE_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Phone number must be at most {} characters",
                PHONE_MAX_LENGTH
            )));
        }

        let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.');
        if !phone.chars().all(allowed) || !phone.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::bad_request("Invalid phone number format"));
        }

        Ok(Self(phone.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_valid() {
        assert_eq!(PhoneNumber::new("555-0100").unwrap().as_str(), "555-0100");
        assert!(PhoneNumber::new("+91 (80) 1234.5678").is_ok());
        assert_eq!(PhoneNumber::new(" 555 ").unwrap().as_str(), "555");
    }

    #[test]
    fn test_phone_invalid() {
        assert!(PhoneNumber::new("").is_err());
        assert!(PhoneNumber::new("call me").is_err());
        assert!(PhoneNumber::new("+-()").is_err());
        assert!(PhoneNumber::new("1".repeat(33)).is_err());
    }
}
