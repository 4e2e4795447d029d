use ams_core::{Account, AccountKind, AccountType};

#[test]
fn standard_constructor_sets_defaults() {
    let account = Account::standard("Lee", 1111, 10_000);

    assert!(account.number.is_empty());
    assert!(!account.is_registered());
    assert_eq!(account.owner, "Lee");
    assert_eq!(account.balance, 10_000);
    assert_eq!(account.account_type(), AccountType::Standard);
    assert_eq!(account.borrowed(), None);
    assert_eq!(account.stored_balance(), Some(10_000));
}

#[test]
fn overdraft_folds_credit_line_into_balance() {
    let account = Account::overdraft("Kim", 2222, 0, 100_000);

    assert!(account.is_overdraft());
    assert_eq!(account.balance, 100_000);
    assert_eq!(account.borrowed(), Some(100_000));
    assert_eq!(account.stored_balance(), Some(0));
}

#[test]
fn set_borrowed_only_applies_to_overdraft_accounts() {
    let mut standard = Account::standard("Lee", 1, 1);
    assert!(!standard.set_borrowed(50));
    assert_eq!(standard.kind, AccountKind::Standard);

    let mut overdraft = Account::overdraft("Kim", 1, 10, 0);
    assert!(overdraft.set_borrowed(50));
    assert_eq!(overdraft.borrowed(), Some(50));
}

#[test]
fn type_tags_match_file_format() {
    assert_eq!(AccountType::Standard.tag(), 10);
    assert_eq!(AccountType::Overdraft.tag(), 20);
    assert_eq!(AccountType::from_tag(20), Some(AccountType::Overdraft));
    assert_eq!(AccountType::from_tag(0), None);
}

#[test]
fn account_serialization_uses_expected_wire_fields() {
    let mut account = Account::overdraft("Kim", 2222, 0, 100_000);
    account.number = "1001".to_string();

    let json = serde_json::to_value(&account).unwrap();
    assert_eq!(json["account_number"], "1001");
    assert_eq!(json["owner"], "Kim");
    assert_eq!(json["password"], 2222);
    assert_eq!(json["balance"], 100_000);
    assert_eq!(json["type"], "overdraft");
    assert_eq!(json["borrowed"], 100_000);

    let decoded: Account = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, account);
}

#[test]
fn standard_account_serializes_without_borrowed_field() {
    let account = Account::standard("Lee", 1111, 10_000);

    let json = serde_json::to_value(&account).unwrap();
    assert_eq!(json["type"], "standard");
    assert!(json.get("borrowed").is_none());
}
