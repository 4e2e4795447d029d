//! Core persistence for bank-account records.
//! Accounts live in one flat file of fixed-length records with soft delete.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::account::{Account, AccountKind, AccountType};
pub use repo::account_repo::{
    AccountRepository, FileAccountRepository, RepoError, RepoResult, ACCOUNT_NUMBER_BASE,
    MAX_RECORDS,
};
pub use service::account_service::AccountService;
pub use store::{open_store, StoreError, DEFAULT_STORE_PATH};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
