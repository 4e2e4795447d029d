use ams_core::store::layout::{LayoutError, RECORD_LENGTH};
use ams_core::{
    Account, AccountKind, AccountRepository, AccountService, FileAccountRepository, RepoError,
    MAX_RECORDS,
};
use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("accounts.dbf")
}

fn patch(path: &Path, offset: u64, bytes: &[u8]) {
    let mut file = OpenOptions::new().write(true).open(path).unwrap();
    file.seek(SeekFrom::Start(offset)).unwrap();
    file.write_all(bytes).unwrap();
}

#[test]
fn new_store_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileAccountRepository::open(store_path(&dir)).unwrap();

    assert_eq!(repo.count().unwrap(), 0);
    assert!(repo.list_accounts().unwrap().is_empty());
    assert!(repo.search_by_owner("Lee").unwrap().is_empty());
    assert!(repo.search_by_number("1000").unwrap().is_none());
}

#[test]
fn add_assigns_sequential_numbers_and_counts() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileAccountRepository::open(store_path(&dir)).unwrap();

    for expected in 0..5u32 {
        let mut account = Account::standard("Lee", 1111, 100);
        account.number = "9999".to_string();
        assert!(repo.add_account(&mut account).unwrap());
        assert_eq!(account.number, (1000 + expected).to_string());
        assert_eq!(repo.count().unwrap(), expected + 1);
    }

    let numbers: Vec<_> = repo
        .list_accounts()
        .unwrap()
        .into_iter()
        .map(|account| account.number)
        .collect();
    assert_eq!(numbers, vec!["1000", "1001", "1002", "1003", "1004"]);
}

#[test]
fn standard_and_overdraft_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileAccountRepository::open(store_path(&dir)).unwrap();

    let mut lee = Account::standard("Lee", 1111, 10_000);
    repo.add_account(&mut lee).unwrap();
    assert_eq!(lee.number, "1000");

    let mut kim = Account::overdraft("Kim", 2222, 0, 100_000);
    repo.add_account(&mut kim).unwrap();
    assert_eq!(kim.number, "1001");

    let loaded = repo.search_by_number("1001").unwrap().unwrap();
    assert_eq!(loaded.balance, 100_000);
    assert_eq!(loaded.borrowed(), Some(100_000));
    assert_eq!(loaded.kind, AccountKind::Overdraft { borrowed: 100_000 });

    let by_owner = repo.search_by_owner("Lee").unwrap();
    assert_eq!(by_owner.len(), 1);
    assert_eq!(by_owner[0].number, "1000");

    assert!(repo.remove_account("1000").unwrap());
    assert!(repo.search_by_number("1000").unwrap().is_none());
    assert_eq!(repo.count().unwrap(), 2);
}

#[test]
fn roundtrip_preserves_fields() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileAccountRepository::open(store_path(&dir)).unwrap();

    let mut account = Account::standard("Park", -7, -250);
    repo.add_account(&mut account).unwrap();

    let loaded = repo.decode_at(0).unwrap();
    assert_eq!(loaded, account);
    assert_eq!(loaded.owner, "Park");
    assert_eq!(loaded.password, -7);
    assert_eq!(loaded.balance, -250);
    assert!(!loaded.is_overdraft());
}

#[test]
fn long_owner_names_are_truncated_to_five_characters() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileAccountRepository::open(store_path(&dir)).unwrap();

    let mut account = Account::standard("Jonathan", 1, 1);
    repo.add_account(&mut account).unwrap();

    let loaded = repo.search_by_number(&account.number).unwrap().unwrap();
    assert_eq!(loaded.owner, "Jonat");
    assert!(repo.search_by_owner("Jonathan").unwrap().is_empty());
    assert_eq!(repo.search_by_owner("Jonat").unwrap().len(), 1);
}

#[test]
fn search_by_owner_keeps_file_order() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileAccountRepository::open(store_path(&dir)).unwrap();

    for (owner, balance) in [("Lee", 1), ("Kim", 2), ("Lee", 3), ("Lee", 4)] {
        repo.add_account(&mut Account::standard(owner, 0, balance))
            .unwrap();
    }
    repo.remove_account("1002").unwrap();

    let balances: Vec<_> = repo
        .search_by_owner("Lee")
        .unwrap()
        .into_iter()
        .map(|account| account.balance)
        .collect();
    assert_eq!(balances, vec![1, 4]);
}

#[test]
fn remove_hides_record_but_keeps_slot() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileAccountRepository::open(store_path(&dir)).unwrap();

    for owner in ["A", "B", "C"] {
        repo.add_account(&mut Account::standard(owner, 0, 0)).unwrap();
    }
    assert!(repo.remove_account("1001").unwrap());

    let listed = repo.list_accounts().unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|account| account.number != "1001"));
    assert_eq!(repo.count().unwrap(), 3);

    let raw = repo.decode_at(1).unwrap();
    assert_eq!(raw.owner, "B");
}

#[test]
fn remove_unknown_or_inactive_returns_false_without_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    let repo = FileAccountRepository::open(&path).unwrap();

    repo.add_account(&mut Account::standard("Lee", 1, 1)).unwrap();
    repo.add_account(&mut Account::overdraft("Kim", 2, 3, 4)).unwrap();
    assert!(repo.remove_account("1000").unwrap());
    repo.sync().unwrap();
    let before = std::fs::read(&path).unwrap();

    assert!(!repo.remove_account("1000").unwrap());
    assert!(!repo.remove_account("4242").unwrap());
    repo.sync().unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    {
        let repo = FileAccountRepository::open(&path).unwrap();
        repo.add_account(&mut Account::standard("Lee", 1111, 10_000))
            .unwrap();
        repo.add_account(&mut Account::overdraft("Kim", 2222, 0, 100_000))
            .unwrap();
        repo.remove_account("1000").unwrap();
    }

    let repo = FileAccountRepository::open(&path).unwrap();
    assert_eq!(repo.count().unwrap(), 2);
    let listed = repo.list_accounts().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].number, "1001");

    let mut next = Account::standard("Choi", 3, 3);
    repo.add_account(&mut next).unwrap();
    assert_eq!(next.number, "1002");

    let len = std::fs::metadata(&path).unwrap().len();
    assert_eq!(len, 4 + 3 * RECORD_LENGTH as u64);
}

#[test]
fn unknown_type_tag_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    let repo = FileAccountRepository::open(&path).unwrap();
    repo.add_account(&mut Account::standard("Lee", 1, 1)).unwrap();
    drop(repo);

    patch(&path, 4 + 38, &30_i32.to_be_bytes());

    let repo = FileAccountRepository::open(&path).unwrap();
    let err = repo.list_accounts().unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidData {
            index: 0,
            source: LayoutError::UnknownAccountType(30)
        }
    ));
}

#[test]
fn nonzero_state_hides_record_without_breaking_scans() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    let repo = FileAccountRepository::open(&path).unwrap();
    repo.add_account(&mut Account::standard("Lee", 1, 1)).unwrap();
    repo.add_account(&mut Account::standard("Kim", 2, 2)).unwrap();
    repo.add_account(&mut Account::standard("Lee", 3, 3)).unwrap();
    drop(repo);

    patch(&path, 4 + 42, &5_i32.to_be_bytes());

    let repo = FileAccountRepository::open(&path).unwrap();
    let numbers: Vec<_> = repo
        .list_accounts()
        .unwrap()
        .into_iter()
        .map(|account| account.number)
        .collect();
    assert_eq!(numbers, vec!["1001", "1002"]);

    assert!(repo.search_by_number("1000").unwrap().is_none());
    assert_eq!(repo.search_by_number("1001").unwrap().unwrap().owner, "Kim");
    let lees = repo.search_by_owner("Lee").unwrap();
    assert_eq!(lees.len(), 1);
    assert_eq!(lees[0].number, "1002");

    assert!(!repo.remove_account("1000").unwrap());
    assert!(repo.remove_account("1001").unwrap());
    assert_eq!(repo.list_accounts().unwrap().len(), 1);
    assert_eq!(repo.count().unwrap(), 3);
}

#[test]
fn corrupt_owner_text_still_decodes() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    let repo = FileAccountRepository::open(&path).unwrap();
    repo.add_account(&mut Account::standard("Lee", 1, 1)).unwrap();
    repo.add_account(&mut Account::standard("Kim", 2, 2)).unwrap();
    drop(repo);

    patch(&path, 4 + 8, &0xDC00_u16.to_be_bytes());

    let repo = FileAccountRepository::open(&path).unwrap();
    let listed = repo.list_accounts().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].owner, "\u{FFFD}ee");
    assert_eq!(listed[0].number, "1000");
    assert!(repo.remove_account("1000").unwrap());
}

#[test]
fn decode_at_rejects_out_of_range_slot() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileAccountRepository::open(store_path(&dir)).unwrap();

    let err = repo.decode_at(0).unwrap_err();
    assert!(matches!(err, RepoError::OutOfRange { index: 0, count: 0 }));
}

#[test]
fn add_refuses_numbers_beyond_field_width() {
    let dir = tempfile::tempdir().unwrap();
    let path = store_path(&dir);
    std::fs::write(&path, (MAX_RECORDS as i32).to_be_bytes()).unwrap();

    let repo = FileAccountRepository::open(&path).unwrap();
    assert_eq!(repo.count().unwrap(), 9000);

    let mut account = Account::standard("Lee", 1, 1);
    let err = repo.add_account(&mut account).unwrap_err();
    assert!(matches!(err, RepoError::CapacityExhausted { count: 9000 }));
    assert!(account.number.is_empty());
    assert_eq!(repo.count().unwrap(), 9000);
}

#[test]
fn overflowing_overdraft_balance_is_rejected_before_write() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileAccountRepository::open(store_path(&dir)).unwrap();

    let mut account = Account::overdraft("Kim", 1, 0, 10);
    account.balance = i64::MIN;
    let err = repo.add_account(&mut account).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(LayoutError::BalanceOverflow { .. })
    ));
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn service_wraps_repository_calls() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileAccountRepository::open(store_path(&dir)).unwrap();
    let service = AccountService::new(repo);

    let lee = service.open_standard("Lee", 1111, 10_000).unwrap();
    let kim = service.open_overdraft("Kim", 2222, 500, 1_000).unwrap();
    assert_eq!(lee.number, "1000");
    assert_eq!(kim.number, "1001");
    assert_eq!(kim.balance, 1_500);

    let fetched = service.find_by_number("1001").unwrap().unwrap();
    assert_eq!(fetched, kim);
    assert_eq!(service.find_by_owner("Lee").unwrap(), vec![lee]);

    assert!(service.close_account("1001").unwrap());
    assert!(!service.close_account("1001").unwrap());
    assert_eq!(service.list_accounts().unwrap().len(), 1);
    assert_eq!(service.count().unwrap(), 2);
}

#[test]
fn register_persists_balance_net_of_credit_line() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileAccountRepository::open(store_path(&dir)).unwrap();
    let service = AccountService::new(repo);

    let mut folded = Account::overdraft("Kim", 2222, 0, 100_000);
    service.register(&mut folded).unwrap();
    let mut unfolded = Account {
        number: String::new(),
        owner: "Yoon".to_string(),
        password: 1,
        balance: 0,
        kind: AccountKind::Overdraft { borrowed: 100_000 },
    };
    service.register(&mut unfolded).unwrap();

    let folded_loaded = service.find_by_number(&folded.number).unwrap().unwrap();
    assert_eq!(folded_loaded.balance, 100_000);
    assert_eq!(folded_loaded.stored_balance(), Some(0));

    let unfolded_loaded = service.find_by_number(&unfolded.number).unwrap().unwrap();
    assert_eq!(unfolded_loaded.balance, 0);
    assert_eq!(unfolded_loaded.stored_balance(), Some(-100_000));
}
