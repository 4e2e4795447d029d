//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for accounts.
//! - Isolate record layout and file offsets from service orchestration.
//!
//! # Invariants
//! - Not-found is an empty/absent result, never an error.
//! - I/O and decode faults abort the current call and propagate unchanged.

pub mod account_repo;
