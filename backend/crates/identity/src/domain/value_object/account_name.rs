//! Account Name Value Object
//!
//! Display name of a buyer or seller. Not unique.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

const ACCOUNT_NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountName(String);

impl AccountName {
    pub fn new(name: impl AsRef<str>) -> AppResult<Self> {
        let name = name.as_ref().trim();

        if name.is_empty() {
            return Err(AppError::bad_request("Name cannot be empty"));
        }

        if name.chars().count() > ACCOUNT_NAME_MAX_CHARS {
            return Err(AppError::bad_request(format!(
                "Name must be at most {} characters",
                ACCOUNT_NAME_MAX_CHARS
            )));
        }

        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request("Name contains invalid characters"));
        }

        Ok(Self(name.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_name_trimmed() {
        assert_eq!(AccountName::new("  Asha  ").unwrap().as_str(), "Asha");
        assert_eq!(AccountName::new("ராஜ் Kitchen").unwrap().as_str(), "ராஜ் Kitchen");
    }

    #[test]
    fn test_account_name_invalid() {
        assert!(AccountName::new("").is_err());
        assert!(AccountName::new(" \t ").is_err());
        assert!(AccountName::new("bad\u{0000}name").is_err());
        assert!(AccountName::new("n".repeat(101)).is_err());
        assert!(AccountName::new("n".repeat(100)).is_ok());
    }
}
