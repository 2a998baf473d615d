//! Sia Core - Unit Directory Foundation
//!
//! This crate provides the foundational types for the SIA unit directory:
//! the organizational domain model (units, teams, servants, accounts,
//! assignments), the indexed `Directory` snapshot the read paths run
//! against, and the pure effect interfaces the backing stores implement.
//! It contains no I/O of its own.
//!
//! # Layers
//!
//! - `identifiers` / `domain`: pure data with invariants
//! - `directory`: immutable, validated, indexed snapshot of one data set
//! - `effects`: store trait signatures (implemented in `sia-store`)
//! - `errors` / `config` / `text`: shared plumbing

#![forbid(unsafe_code)]

/// Entity identifier types
pub mod identifiers;

/// Organizational domain model
pub mod domain;

/// Immutable indexed snapshot of the full data set
pub mod directory;

/// Pure store interfaces (no implementations)
pub mod effects;

/// Unified error handling
pub mod errors;

/// Service configuration
pub mod config;

/// Text normalization shared by search, lookup, and label parsing
pub mod text;

// === Public API Re-exports ===

pub use config::DirectoryConfig;
pub use directory::{Directory, DirectoryBuilder};
pub use domain::{
    AccessTier, Account, Assignment, AssignmentRole, AssignmentScope, Gender, PasswordHash, Role,
    Servant, Subfondo, Team, Unit,
};
pub use effects::{AssignmentStore, DirectoryStore, IdentityStore, UnitStore};
pub use errors::{Result, SiaError};
pub use identifiers::{AccountId, AssignmentId, ServantId, SubfondoId, TeamId, UnitId};
