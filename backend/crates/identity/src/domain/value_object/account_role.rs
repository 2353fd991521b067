use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use kernel::error::app_error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum AccountRole {
    Buyer = 0,
    Seller = 1,
}

impl AccountRole {
    /// Both roles, in authentication lookup order
    pub const ALL: [AccountRole; 2] = [AccountRole::Buyer, AccountRole::Seller];

    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AccountRole::Buyer => "buyer",
            AccountRole::Seller => "seller",
        }
    }

    #[inline]
    pub const fn is_seller(&self) -> bool {
        matches!(self, AccountRole::Seller)
    }

    #[inline]
    pub const fn other(&self) -> Self {
        match self {
            AccountRole::Buyer => AccountRole::Seller,
            AccountRole::Seller => AccountRole::Buyer,
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(AccountRole::Buyer),
            1 => Some(AccountRole::Seller),
            _ => None,
        }
    }
}

impl FromStr for AccountRole {
    type Err = AppError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "buyer" => Ok(AccountRole::Buyer),
            "seller" => Ok(AccountRole::Seller),
            _ => Err(AppError::bad_request(format!("Unknown account role: {code}"))),
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_role_from_id() {
        assert_eq!(AccountRole::from_id(0), Some(AccountRole::Buyer));
        assert_eq!(AccountRole::from_id(1), Some(AccountRole::Seller));
        assert_eq!(AccountRole::from_id(7), None);
    }

    #[test]
    fn test_account_role_codes() {
        for role in AccountRole::ALL {
            assert_eq!(role.code().parse::<AccountRole>().unwrap(), role);
            assert_eq!(AccountRole::from_id(role.id()), Some(role));
        }
        assert!("admin".parse::<AccountRole>().is_err());
    }

    #[test]
    fn test_account_role_serde() {
        assert_eq!(serde_json::to_string(&AccountRole::Seller).unwrap(), "\"seller\"");
        let role: AccountRole = serde_json::from_str("\"buyer\"").unwrap();
        assert_eq!(role, AccountRole::Buyer);
        assert_eq!(role.other(), AccountRole::Seller);
        assert!(!role.is_seller());
    }
}
