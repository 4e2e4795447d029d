//! Flat-file record storage for accounts.
//!
//! # Responsibility
//! - Open the backing file and load the record-count header.
//! - Provide positioned record and state-field I/O.
//!
//! # Invariants
//! - The header always holds the total number of allocated slots,
//!   including soft-deleted ones.
//! - Records are only ever appended; existing slots change their state
//!   field and nothing else.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod file;
pub mod layout;
mod open;

pub use file::RecordFile;
pub use open::{open_store, DEFAULT_STORE_PATH};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    /// File is non-empty but shorter than the count header.
    TruncatedHeader { len: u64 },
    /// Header holds a negative record count.
    InvalidHeader(i32),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::TruncatedHeader { len } => {
                write!(f, "store file is {len} bytes, shorter than the record count header")
            }
            Self::InvalidHeader(value) => write!(f, "invalid record count header `{value}`"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::TruncatedHeader { .. } => None,
            Self::InvalidHeader(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
