//! Sia Visibility - Who Sees Which Units
//!
//! Three pieces, composed by [`service::VisibilityService`]:
//!
//! - [`engine`]: the visibility predicate deciding which units an account
//!   may know exist at all, as a flat set
//! - [`search`]: the optional free-text filter layered on top of the
//!   predicate (never replacing it)
//! - [`forest`]: projection of the flat visible set back into a consistent
//!   forest, skipping invisible ancestors without gaps
//!
//! Everything here is a pure function of an immutable
//! [`sia_core::Directory`] snapshot; the service adds only the
//! timeout-guarded snapshot load.

#![forbid(unsafe_code)]

/// Visibility predicate engine
pub mod engine;

/// Free-text search filter
pub mod search;

/// Forest projection over the visible set
pub mod forest;

/// Request-facing service composing the three
pub mod service;

pub use engine::visible_units;
pub use forest::{project, VisibleForest};
pub use search::SearchFilter;
pub use service::VisibilityService;
