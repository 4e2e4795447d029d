//! Account repository contract and flat-file implementation.
//!
//! # Responsibility
//! - Provide list/search/add/remove over the fixed-record account file.
//! - Keep byte layout details inside the store boundary.
//!
//! # Invariants
//! - Queries only ever see active records, in file order.
//! - `add_account` assigns `1000 + count` as the account number.
//! - `remove_account` flips one state field and touches nothing else.
//! - Every public call holds the store lock for its whole duration.

use crate::model::account::Account;
use crate::store::layout::{
    decode_record, encode_record, LayoutError, RecordState, ACCOUNT_NUM_UNITS,
};
use crate::store::{open_store, RecordFile, StoreError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// First number handed out by the store.
pub const ACCOUNT_NUMBER_BASE: u32 = 1000;

/// Largest slot count whose assigned number still fits the number field.
pub const MAX_RECORDS: u32 = 10_u32.pow(ACCOUNT_NUM_UNITS as u32) - ACCOUNT_NUMBER_BASE;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for account persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Store(StoreError),
    /// A record could not be decoded.
    InvalidData { index: u32, source: LayoutError },
    /// The account cannot be encoded for persistence.
    Validation(LayoutError),
    /// Slot index past the record count.
    OutOfRange { index: u32, count: u32 },
    /// No further account numbers fit the fixed-width number field.
    CapacityExhausted { count: u32 },
    /// A previous call panicked while holding the store lock.
    LockPoisoned,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData { index, source } => {
                write!(f, "invalid persisted account at slot {index}: {source}")
            }
            Self::Validation(err) => write!(f, "account cannot be persisted: {err}"),
            Self::OutOfRange { index, count } => {
                write!(f, "slot {index} out of range for {count} records")
            }
            Self::CapacityExhausted { count } => write!(
                f,
                "store is full: {count} records allocated, no account numbers left"
            ),
            Self::LockPoisoned => write!(f, "account store lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::InvalidData { source, .. } => Some(source),
            Self::Validation(err) => Some(err),
            Self::OutOfRange { .. } => None,
            Self::CapacityExhausted { .. } => None,
            Self::LockPoisoned => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Store(StoreError::Io(value))
    }
}

/// Repository interface for account records.
pub trait AccountRepository {
    /// Total allocated records, including soft-deleted ones.
    fn count(&self) -> RepoResult<u32>;
    fn list_accounts(&self) -> RepoResult<Vec<Account>>;
    fn search_by_number(&self, number: &str) -> RepoResult<Option<Account>>;
    fn search_by_owner(&self, owner: &str) -> RepoResult<Vec<Account>>;
    /// Persists `account` and writes the assigned number back into it.
    fn add_account(&self, account: &mut Account) -> RepoResult<bool>;
    fn remove_account(&self, number: &str) -> RepoResult<bool>;
}

/// Account repository backed by one fixed-record file.
#[derive(Debug)]
pub struct FileAccountRepository {
    inner: Mutex<RecordFile>,
}

impl FileAccountRepository {
    /// Opens (or creates) the account file at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_store(path)?))
    }

    pub fn new(file: RecordFile) -> Self {
        Self {
            inner: Mutex::new(file),
        }
    }

    /// Decodes slot `index` regardless of its state.
    pub fn decode_at(&self, index: u32) -> RepoResult<Account> {
        let mut file = self.lock()?;
        let count = file.record_count();
        if index >= count {
            return Err(RepoError::OutOfRange { index, count });
        }
        decode_slot(&mut file, index)
    }

    /// Flushes pending writes to disk.
    pub fn sync(&self) -> RepoResult<()> {
        self.lock()?.sync()?;
        Ok(())
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, RecordFile>> {
        self.inner.lock().map_err(|_| RepoError::LockPoisoned)
    }
}

impl AccountRepository for FileAccountRepository {
    fn count(&self) -> RepoResult<u32> {
        Ok(self.lock()?.record_count())
    }

    fn list_accounts(&self) -> RepoResult<Vec<Account>> {
        let mut file = self.lock()?;
        let mut accounts = Vec::new();
        scan_active(&mut file, |_, account| {
            accounts.push(account);
            false
        })?;
        Ok(accounts)
    }

    fn search_by_number(&self, number: &str) -> RepoResult<Option<Account>> {
        let mut file = self.lock()?;
        let mut found = None;
        scan_active(&mut file, |_, account| {
            if account.number == number {
                found = Some(account);
                return true;
            }
            false
        })?;
        Ok(found)
    }

    fn search_by_owner(&self, owner: &str) -> RepoResult<Vec<Account>> {
        let mut file = self.lock()?;
        let mut matches = Vec::new();
        scan_active(&mut file, |_, account| {
            if account.owner == owner {
                matches.push(account);
            }
            false
        })?;
        Ok(matches)
    }

    fn add_account(&self, account: &mut Account) -> RepoResult<bool> {
        let mut file = self.lock()?;
        let count = file.record_count();
        if count >= MAX_RECORDS {
            warn!(
                "event=account_add module=repo status=rejected reason=capacity records={}",
                count
            );
            return Err(RepoError::CapacityExhausted { count });
        }

        let number = (ACCOUNT_NUMBER_BASE + count).to_string();
        let mut candidate = account.clone();
        candidate.number = number;
        let image =
            encode_record(&candidate, RecordState::Active).map_err(RepoError::Validation)?;

        let index = file.append_record(&image)?;
        account.number = candidate.number;
        info!(
            "event=account_add module=repo status=ok slot={} type={:?} records={}",
            index,
            account.account_type(),
            file.record_count()
        );
        Ok(true)
    }

    fn remove_account(&self, number: &str) -> RepoResult<bool> {
        let mut file = self.lock()?;
        let mut target = None;
        scan_active(&mut file, |index, account| {
            if account.number == number {
                target = Some(index);
                return true;
            }
            false
        })?;

        match target {
            Some(index) => {
                file.write_state(index, RecordState::Inactive)?;
                info!("event=account_remove module=repo status=ok slot={}", index);
                Ok(true)
            }
            None => {
                debug!("event=account_remove module=repo status=not_found");
                Ok(false)
            }
        }
    }
}

/// Visits active records in file order until `visit` returns `true`.
///
/// Only the state field is read for inactive slots. Any non-zero state
/// counts as inactive and is skipped.
fn scan_active<F>(file: &mut RecordFile, mut visit: F) -> RepoResult<()>
where
    F: FnMut(u32, Account) -> bool,
{
    for index in 0..file.record_count() {
        let state = RecordState::from_value(file.read_state(index)?);
        if state == RecordState::Inactive {
            continue;
        }

        let account = decode_slot(file, index)?;
        if visit(index, account) {
            break;
        }
    }
    Ok(())
}

fn decode_slot(file: &mut RecordFile, index: u32) -> RepoResult<Account> {
    let image = file.read_record(index)?;
    decode_record(&image)
        .into_account()
        .map_err(|source| RepoError::InvalidData { index, source })
}
