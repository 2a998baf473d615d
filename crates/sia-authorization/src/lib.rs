//! Sia Authorization - May This Account Act On This Unit
//!
//! A pure decision table over (account tier, action, unit), shared between
//! the snapshot-backed [`decision::decide`] and the store-backed
//! [`service::AuthorizationService`]. Denial is a first-class value, not an
//! error; errors are reserved for unresolvable references and unavailable
//! backends, which callers must treat as deny (fail closed, never open).

#![forbid(unsafe_code)]

/// Actions, decisions, and the pure decision table
pub mod decision;

/// Store-backed authorization with request-scoped timeouts
pub mod service;

pub use decision::{decide, Action, Decision};
pub use service::AuthorizationService;
