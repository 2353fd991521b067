use kernel::id::Id;

pub struct AccountMarker;
pub type AccountId = Id<AccountMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_new() {
        let account_id = AccountId::new();
        assert_eq!(account_id.as_uuid().get_version_num(), 4); // UUIDv4
    }

    #[test]
    fn test_account_id_parse() {
        let account_id = AccountId::new();
        let parsed: AccountId = account_id.to_string().parse().unwrap();
        assert_eq!(parsed, account_id);
        assert!("not-a-uuid".parse::<AccountId>().is_err());
    }
}
