//! Forest projection over a visible subset
//!
//! Given the flat visible set and the full parent index, reconstructs a
//! forest over exactly the visible units: each unit attaches to its nearest
//! visible ancestor (skipping invisible ones) or becomes a root. The
//! result is a first-class immutable value backing both the full-forest and
//! single-branch entry points.

use sia_core::directory::Directory;
use sia_core::errors::{Result, SiaError};
use sia_core::identifiers::UnitId;
use sia_core::text;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, error};

/// A projected forest: visible units bucketed by resolved visible parent.
///
/// The `None` bucket holds the roots. Buckets are stored in canonical
/// order (roots first, then parents by name key) and siblings are sorted
/// by name key with identifier tie-break, so equal inputs produce equal
/// values, byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleForest {
    buckets: IndexMap<Option<UnitId>, Vec<UnitId>>,
    members: BTreeSet<UnitId>,
}

impl VisibleForest {
    /// Root units (visible units with no visible ancestor)
    pub fn roots(&self) -> &[UnitId] {
        self.buckets
            .get(&None)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Projected children of a visible unit
    pub fn children_of(&self, id: UnitId) -> &[UnitId] {
        self.buckets
            .get(&Some(id))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether a unit appears anywhere in the forest
    pub fn contains(&self, id: UnitId) -> bool {
        self.members.contains(&id)
    }

    /// Number of units in the forest
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the forest is empty
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate buckets as (resolved parent, ordered children)
    pub fn iter(&self) -> impl Iterator<Item = (Option<UnitId>, &[UnitId])> {
        self.buckets.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}

/// Project the visible set into a [`VisibleForest`].
///
/// Duplicate ids in `visible` are ignored after the first occurrence. Every
/// id must resolve in `directory`. The ancestor walk is capped at
/// `max_depth` hops; exceeding the cap is a data-integrity error, never a
/// silent root assignment.
pub fn project(
    visible: &[UnitId],
    directory: &Directory,
    max_depth: usize,
) -> Result<VisibleForest> {
    let members: BTreeSet<UnitId> = visible.iter().copied().collect();

    let mut buckets: HashMap<Option<UnitId>, Vec<UnitId>> = HashMap::new();
    let mut placed = BTreeSet::new();
    for &id in visible {
        if !placed.insert(id) {
            continue;
        }
        if directory.unit(id).is_none() {
            return Err(SiaError::not_found(format!(
                "visible unit {id} does not resolve in the directory"
            )));
        }
        let parent = resolve_visible_ancestor(id, &members, directory, max_depth)?;
        buckets.entry(parent).or_default().push(id);
    }

    for children in buckets.values_mut() {
        children.sort_by_key(|&id| order_key(id, directory));
    }

    // Canonical bucket order: the root bucket first, then parent buckets by
    // the parents' own ordering key, so the forest is a pure function of
    // the visible *set*, not of input order.
    let mut keys: Vec<Option<UnitId>> = buckets.keys().copied().collect();
    keys.sort_by(|a, b| match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => order_key(*x, directory).cmp(&order_key(*y, directory)),
    });

    let mut ordered = IndexMap::with_capacity(keys.len());
    for key in keys {
        if let Some(children) = buckets.remove(&key) {
            ordered.insert(key, children);
        }
    }

    debug!(
        units = placed.len(),
        buckets = ordered.len(),
        "forest projected"
    );

    Ok(VisibleForest {
        buckets: ordered,
        members: placed,
    })
}

/// Sibling ordering: display name, case- and accent-insensitive, with the
/// identifier as a stable tie-break.
fn order_key(id: UnitId, directory: &Directory) -> (String, UnitId) {
    let name = directory
        .unit(id)
        .map(|u| text::sort_key(&u.name))
        .unwrap_or_default();
    (name, id)
}

/// Walk the true parent chain until it re-enters the visible set (the
/// resolved parent) or ends (a root). The walk is capped: the source tree
/// is guaranteed acyclic upstream, but a violated invariant must surface
/// as an integrity error instead of looping or minting a fake root.
fn resolve_visible_ancestor(
    start: UnitId,
    members: &BTreeSet<UnitId>,
    directory: &Directory,
    max_depth: usize,
) -> Result<Option<UnitId>> {
    let mut hops = 0usize;
    let mut current = directory.parent_of(start);
    while let Some(parent) = current {
        if members.contains(&parent) {
            return Ok(Some(parent));
        }
        hops += 1;
        if hops > max_depth {
            error!(unit = %start, max_depth, "ancestor chain exceeds depth cap");
            return Err(SiaError::integrity(format!(
                "ancestor chain of {start} exceeds the depth cap of {max_depth}"
            )));
        }
        current = directory.parent_of(parent);
    }
    Ok(None)
}
