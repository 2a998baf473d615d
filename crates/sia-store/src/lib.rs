//! Sia Store - Store Handlers
//!
//! Implementations of the `sia-core` store effect traits. The in-memory
//! handler serves both as the reference implementation and as the fixture
//! the service-level tests run against; the doubles in [`testing`] exercise
//! the fail-closed paths (unavailable backends, slow backends).

#![forbid(unsafe_code)]

/// In-memory store over an indexed directory snapshot
pub mod memory;

/// Store doubles for failure-path testing
pub mod testing;

pub use memory::MemoryDirectoryStore;
pub use testing::{FailingStore, SlowStore};
