//! # tvc-core — Foundational Types for Trainer Version Compliance
//!
//! This crate is the leaf of the workspace. It defines the input entities the
//! compliance engine consumes and the error taxonomy every other crate
//! propagates. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype for version identifiers.** `VersionId` wraps the raw string so
//!    a version can never be confused with an operator id or a group label.
//!
//! 2. **Validated ledger.** A `VersionLedger` can only be constructed through
//!    `VersionLedger::new()` (serde deserialization routes through it too), so
//!    every ledger the engine sees has a non-empty history containing the
//!    current version exactly once.
//!
//! 3. **Injected time.** Nothing in this crate reads the clock. Day counts are
//!    computed against an explicit `as_of` date supplied by the caller.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tvc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod ledger;
pub mod operator;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use digest::sha256_hex;
pub use error::{ConfigError, DataError, TvcError};
pub use ledger::{VersionId, VersionLedger};
pub use operator::{OperatorRecord, UNKNOWN_GROUP};
pub use temporal::{days_between, parse_activity_date};
