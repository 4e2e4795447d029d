//! Account domain model.
//!
//! # Responsibility
//! - Define the in-memory account shape shared by store, service and CLI.
//! - Keep the standard/overdraft split as a tagged variant.
//!
//! # Invariants
//! - `balance` is the visible, spendable amount.
//! - For overdraft accounts the credit line is folded into `balance`;
//!   `borrowed` tracks it separately for accounting.
//! - `number` is empty until the store assigns one.

use serde::{Deserialize, Serialize};

/// On-disk type tag for standard accounts.
pub const STANDARD_TAG: i32 = 10;
/// On-disk type tag for overdraft-enabled accounts.
pub const OVERDRAFT_TAG: i32 = 20;

/// Account category as persisted in the record type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Plain deposit account.
    Standard,
    /// Account with a borrowed-amount credit line.
    Overdraft,
}

impl AccountType {
    /// Returns the 32-bit tag written to the record type field.
    pub fn tag(self) -> i32 {
        match self {
            Self::Standard => STANDARD_TAG,
            Self::Overdraft => OVERDRAFT_TAG,
        }
    }

    /// Maps a persisted tag back to a type. Unknown tags yield `None`.
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            STANDARD_TAG => Some(Self::Standard),
            OVERDRAFT_TAG => Some(Self::Overdraft),
            _ => None,
        }
    }
}

/// Variant-specific account data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountKind {
    Standard,
    Overdraft {
        /// Credit line already included in the visible balance.
        borrowed: i64,
    },
}

/// Bank account value object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned account number, e.g. `"1000"`.
    #[serde(rename = "account_number")]
    pub number: String,
    pub owner: String,
    pub password: i32,
    /// Visible balance. Includes `borrowed` for overdraft accounts.
    ///
    /// The store persists `balance - borrowed` for overdraft accounts, so
    /// hand-built values must already carry the folded amount; use
    /// `Account::overdraft` to get it right.
    pub balance: i64,
    #[serde(flatten)]
    pub kind: AccountKind,
}

impl Account {
    /// Creates a standard account without a number.
    pub fn standard(owner: impl Into<String>, password: i32, balance: i64) -> Self {
        Self {
            number: String::new(),
            owner: owner.into(),
            password,
            balance,
            kind: AccountKind::Standard,
        }
    }

    /// Creates an overdraft account without a number.
    ///
    /// The visible balance is `deposit + borrowed`, saturating at the `i64`
    /// bounds.
    pub fn overdraft(owner: impl Into<String>, password: i32, deposit: i64, borrowed: i64) -> Self {
        Self {
            number: String::new(),
            owner: owner.into(),
            password,
            balance: deposit.saturating_add(borrowed),
            kind: AccountKind::Overdraft { borrowed },
        }
    }

    pub fn account_type(&self) -> AccountType {
        match self.kind {
            AccountKind::Standard => AccountType::Standard,
            AccountKind::Overdraft { .. } => AccountType::Overdraft,
        }
    }

    pub fn is_overdraft(&self) -> bool {
        matches!(self.kind, AccountKind::Overdraft { .. })
    }

    /// Returns the borrowed amount, or `None` for standard accounts.
    pub fn borrowed(&self) -> Option<i64> {
        match self.kind {
            AccountKind::Standard => None,
            AccountKind::Overdraft { borrowed } => Some(borrowed),
        }
    }

    /// Updates the borrowed amount.
    ///
    /// Returns `false` and leaves the account untouched when it is a
    /// standard account.
    pub fn set_borrowed(&mut self, amount: i64) -> bool {
        match &mut self.kind {
            AccountKind::Standard => false,
            AccountKind::Overdraft { borrowed } => {
                *borrowed = amount;
                true
            }
        }
    }

    /// Balance as persisted in the stored-balance field.
    ///
    /// Equals `balance` for standard accounts and `balance - borrowed` for
    /// overdraft accounts. Returns `None` on arithmetic overflow.
    pub fn stored_balance(&self) -> Option<i64> {
        match self.kind {
            AccountKind::Standard => Some(self.balance),
            AccountKind::Overdraft { borrowed } => self.balance.checked_sub(borrowed),
        }
    }

    /// Returns whether the store has assigned a number yet.
    pub fn is_registered(&self) -> bool {
        !self.number.is_empty()
    }
}
