//! Fixed-width record layout and codec.
//!
//! # Responsibility
//! - Own every width and offset of the account file format.
//! - Convert between `Account` values and 46-byte record images.
//!
//! # Invariants
//! - Integers are big-endian; text is UTF-16BE code units.
//! - Text fields are space-padded and truncated to their fixed width.
//!   Truncation never splits a surrogate pair.
//! - Decoding text never fails: stray surrogates become U+FFFD.
//! - Any state value other than 0 reads as inactive.
//! - Layout: `[count: i32][record 0][record 1]...`, each record
//!   `number(8) owner(10) password(4) stored(8) borrowed(8) type(4) state(4)`.

use crate::model::account::{Account, AccountKind, AccountType};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const RECORD_COUNT_LENGTH: u64 = 4;

pub const ACCOUNT_NUM_LENGTH: usize = 8;
pub const ACCOUNT_OWNER_LENGTH: usize = 10;
pub const PASSWORD_LENGTH: usize = 4;
pub const STORED_BALANCE_LENGTH: usize = 8;
pub const BORROWED_LENGTH: usize = 8;
pub const ACCOUNT_TYPE_LENGTH: usize = 4;
pub const ACCOUNT_STATE_LENGTH: usize = 4;

pub const RECORD_LENGTH: usize = ACCOUNT_NUM_LENGTH
    + ACCOUNT_OWNER_LENGTH
    + PASSWORD_LENGTH
    + STORED_BALANCE_LENGTH
    + BORROWED_LENGTH
    + ACCOUNT_TYPE_LENGTH
    + ACCOUNT_STATE_LENGTH;

const NUMBER_OFFSET: usize = 0;
const OWNER_OFFSET: usize = NUMBER_OFFSET + ACCOUNT_NUM_LENGTH;
const PASSWORD_OFFSET: usize = OWNER_OFFSET + ACCOUNT_OWNER_LENGTH;
const STORED_BALANCE_OFFSET: usize = PASSWORD_OFFSET + PASSWORD_LENGTH;
const BORROWED_OFFSET: usize = STORED_BALANCE_OFFSET + STORED_BALANCE_LENGTH;
const TYPE_OFFSET: usize = BORROWED_OFFSET + BORROWED_LENGTH;
/// Offset of the state field inside one record.
pub const STATE_OFFSET: usize = TYPE_OFFSET + ACCOUNT_TYPE_LENGTH;

/// Width of the account-number field in UTF-16 code units.
pub const ACCOUNT_NUM_UNITS: usize = ACCOUNT_NUM_LENGTH / 2;
/// Width of the owner field in UTF-16 code units.
pub const ACCOUNT_OWNER_UNITS: usize = ACCOUNT_OWNER_LENGTH / 2;

const PAD_UNIT: u16 = b' ' as u16;

pub type RecordImage = [u8; RECORD_LENGTH];

/// Byte offset of record `index` from the start of the file.
pub fn record_offset(index: u32) -> u64 {
    RECORD_COUNT_LENGTH + u64::from(index) * RECORD_LENGTH as u64
}

/// Byte offset of the state field of record `index`.
pub fn state_offset(index: u32) -> u64 {
    record_offset(index) + STATE_OFFSET as u64
}

/// Soft-delete state of one record slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Active,
    Inactive,
}

impl RecordState {
    pub fn to_value(self) -> i32 {
        match self {
            Self::Active => 0,
            Self::Inactive => 1,
        }
    }

    /// Only 0 is active; every other value hides the record.
    pub fn from_value(value: i32) -> Self {
        match value {
            0 => Self::Active,
            _ => Self::Inactive,
        }
    }
}

/// Record codec failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Type tag is neither standard nor overdraft.
    UnknownAccountType(i32),
    /// Balance arithmetic left the `i64` range.
    BalanceOverflow { balance: i64, borrowed: i64 },
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAccountType(tag) => write!(f, "unknown account type tag `{tag}`"),
            Self::BalanceOverflow { balance, borrowed } => write!(
                f,
                "balance {balance} with borrowed amount {borrowed} overflows 64-bit range"
            ),
        }
    }
}

impl Error for LayoutError {}

/// One record as it sits on disk, before type dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub number: String,
    pub owner: String,
    pub password: i32,
    pub stored_balance: i64,
    pub borrowed: i64,
    pub type_tag: i32,
    pub state: i32,
}

impl RawRecord {
    /// Builds the in-memory account from the record fields.
    ///
    /// Overdraft balances are reconstructed as `stored + borrowed`.
    pub fn into_account(self) -> Result<Account, LayoutError> {
        let kind = AccountType::from_tag(self.type_tag)
            .ok_or(LayoutError::UnknownAccountType(self.type_tag))?;

        let (balance, kind) = match kind {
            AccountType::Standard => (self.stored_balance, AccountKind::Standard),
            AccountType::Overdraft => {
                let balance = self.stored_balance.checked_add(self.borrowed).ok_or(
                    LayoutError::BalanceOverflow {
                        balance: self.stored_balance,
                        borrowed: self.borrowed,
                    },
                )?;
                (
                    balance,
                    AccountKind::Overdraft {
                        borrowed: self.borrowed,
                    },
                )
            }
        };

        Ok(Account {
            number: self.number,
            owner: self.owner,
            password: self.password,
            balance,
            kind,
        })
    }
}

/// Encodes `account` into a full record image with the given state.
pub fn encode_record(account: &Account, state: RecordState) -> Result<RecordImage, LayoutError> {
    let borrowed = account.borrowed().unwrap_or(0);
    let stored_balance = account
        .stored_balance()
        .ok_or(LayoutError::BalanceOverflow {
            balance: account.balance,
            borrowed,
        })?;

    let mut image = [0u8; RECORD_LENGTH];
    put_text(&mut image, NUMBER_OFFSET, &account.number, ACCOUNT_NUM_UNITS);
    put_text(&mut image, OWNER_OFFSET, &account.owner, ACCOUNT_OWNER_UNITS);
    image[PASSWORD_OFFSET..PASSWORD_OFFSET + PASSWORD_LENGTH]
        .copy_from_slice(&account.password.to_be_bytes());
    image[STORED_BALANCE_OFFSET..STORED_BALANCE_OFFSET + STORED_BALANCE_LENGTH]
        .copy_from_slice(&stored_balance.to_be_bytes());
    image[BORROWED_OFFSET..BORROWED_OFFSET + BORROWED_LENGTH]
        .copy_from_slice(&borrowed.to_be_bytes());
    image[TYPE_OFFSET..TYPE_OFFSET + ACCOUNT_TYPE_LENGTH]
        .copy_from_slice(&account.account_type().tag().to_be_bytes());
    image[STATE_OFFSET..STATE_OFFSET + ACCOUNT_STATE_LENGTH]
        .copy_from_slice(&state.to_value().to_be_bytes());
    Ok(image)
}

/// Decodes every field of a record image, in declared order.
///
/// The owner is right-trimmed of padding; the account number is kept as-is.
pub fn decode_record(image: &RecordImage) -> RawRecord {
    let number = get_text(image, NUMBER_OFFSET, ACCOUNT_NUM_UNITS);
    let owner = get_text(image, OWNER_OFFSET, ACCOUNT_OWNER_UNITS);

    RawRecord {
        number,
        owner: owner.trim_end().to_string(),
        password: get_i32(image, PASSWORD_OFFSET),
        stored_balance: get_i64(image, STORED_BALANCE_OFFSET),
        borrowed: get_i64(image, BORROWED_OFFSET),
        type_tag: get_i32(image, TYPE_OFFSET),
        state: get_i32(image, STATE_OFFSET),
    }
}

/// Returns `text` as exactly `units` UTF-16 code units.
///
/// Shorter input is space-padded; longer input keeps its leading characters
/// and drops the rest.
pub fn fixed_width_units(text: &str, units: usize) -> Vec<u16> {
    let mut out = Vec::with_capacity(units);
    let mut scratch = [0u16; 2];
    for ch in text.chars() {
        let encoded = ch.encode_utf16(&mut scratch);
        if out.len() + encoded.len() > units {
            break;
        }
        out.extend_from_slice(encoded);
    }
    out.resize(units, PAD_UNIT);
    out
}

fn put_text(image: &mut RecordImage, offset: usize, text: &str, units: usize) {
    for (i, unit) in fixed_width_units(text, units).into_iter().enumerate() {
        let at = offset + i * 2;
        image[at..at + 2].copy_from_slice(&unit.to_be_bytes());
    }
}

fn get_text(image: &RecordImage, offset: usize, units: usize) -> String {
    let code_units: Vec<u16> = image[offset..offset + units * 2]
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&code_units)
}

fn get_i32(image: &RecordImage, offset: usize) -> i32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&image[offset..offset + 4]);
    i32::from_be_bytes(bytes)
}

fn get_i64(image: &RecordImage, offset: usize) -> i64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&image[offset..offset + 8]);
    i64::from_be_bytes(bytes)
}
