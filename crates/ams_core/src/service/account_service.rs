//! Account use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for opening, finding and closing accounts.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::account::Account;
use crate::repo::account_repo::{AccountRepository, RepoResult};

/// Use-case service wrapper for account operations.
pub struct AccountService<R: AccountRepository> {
    repo: R,
}

impl<R: AccountRepository> AccountService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Opens a standard account and returns it with its assigned number.
    pub fn open_standard(
        &self,
        owner: impl Into<String>,
        password: i32,
        balance: i64,
    ) -> RepoResult<Account> {
        let mut account = Account::standard(owner, password, balance);
        self.repo.add_account(&mut account)?;
        Ok(account)
    }

    /// Opens an overdraft account and returns it with its assigned number.
    ///
    /// # Contract
    /// - Visible balance is `deposit + borrowed`.
    pub fn open_overdraft(
        &self,
        owner: impl Into<String>,
        password: i32,
        deposit: i64,
        borrowed: i64,
    ) -> RepoResult<Account> {
        let mut account = Account::overdraft(owner, password, deposit, borrowed);
        self.repo.add_account(&mut account)?;
        Ok(account)
    }

    /// Registers a caller-built account; its number is overwritten.
    ///
    /// # Contract
    /// - Overdraft accounts must carry the folded balance
    ///   (`deposit + borrowed`), as built by `Account::overdraft`.
    pub fn register(&self, account: &mut Account) -> RepoResult<bool> {
        self.repo.add_account(account)
    }

    pub fn count(&self) -> RepoResult<u32> {
        self.repo.count()
    }

    /// Lists active accounts in file order.
    pub fn list_accounts(&self) -> RepoResult<Vec<Account>> {
        self.repo.list_accounts()
    }

    pub fn find_by_number(&self, number: &str) -> RepoResult<Option<Account>> {
        self.repo.search_by_number(number)
    }

    pub fn find_by_owner(&self, owner: &str) -> RepoResult<Vec<Account>> {
        self.repo.search_by_owner(owner)
    }

    /// Soft-deletes an account. Returns `false` when no active account matches.
    pub fn close_account(&self, number: &str) -> RepoResult<bool> {
        self.repo.remove_account(number)
    }

    /// Gives access to the wrapped repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }
}
