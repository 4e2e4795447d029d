//! Account domain model.
//!
//! # Responsibility
//! - Define the value objects exchanged with the record store.
//!
//! # Invariants
//! - Deletion is represented by a soft-delete state flag on disk and is
//!   never visible on the in-memory model.

pub mod account;
