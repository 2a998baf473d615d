//! Property tests for the projection laws
//!
//! For arbitrary acyclic parent maps and arbitrary visible subsets, the
//! projected forest must contain exactly the visible units, place each in
//! exactly one bucket keyed by a visible unit (or the root bucket), and be
//! a pure function of the visible set: independent of input order and
//! stable across repeated runs.

use proptest::prelude::*;
use sia_core::directory::Directory;
use sia_core::domain::{Subfondo, Unit};
use sia_core::identifiers::{SubfondoId, UnitId};
use sia_visibility::forest::project;
use std::collections::BTreeSet;

/// Parent links with `parent[i] < i`, so the tree is acyclic by
/// construction, plus a visibility mask.
fn tree_strategy() -> impl Strategy<Value = (Vec<Option<usize>>, Vec<bool>)> {
    (1usize..40).prop_flat_map(|n| {
        let parents = proptest::collection::vec(proptest::option::of(0usize..n), n).prop_map(
            |raw| {
                raw.into_iter()
                    .enumerate()
                    .map(|(i, p)| p.filter(|&candidate| candidate < i))
                    .collect::<Vec<_>>()
            },
        );
        let mask = proptest::collection::vec(any::<bool>(), n);
        (parents, mask)
    })
}

fn build_directory(parents: &[Option<usize>]) -> (Directory, Vec<UnitId>) {
    let sf = Subfondo::new(SubfondoId::new(), "Fondo");
    let ids: Vec<UnitId> = (0..parents.len()).map(|_| UnitId::new()).collect();

    let mut builder = Directory::builder().subfondo(sf.clone());
    for (i, parent) in parents.iter().enumerate() {
        // duplicate names on purpose, so the identifier tie-break is hit
        let mut unit = Unit::new(ids[i], format!("U-{i:03}"), format!("N{}", i % 5), sf.id);
        if let Some(p) = parent {
            unit = unit.with_parent(ids[*p]);
        }
        builder = builder.unit(unit);
    }
    (builder.build().unwrap(), ids)
}

proptest! {
    #[test]
    fn projection_contains_exactly_the_visible_set(
        (parents, mask) in tree_strategy()
    ) {
        let (directory, ids) = build_directory(&parents);
        let visible: Vec<UnitId> = ids
            .iter()
            .zip(&mask)
            .filter_map(|(&id, &on)| on.then_some(id))
            .collect();
        let visible_set: BTreeSet<UnitId> = visible.iter().copied().collect();

        let forest = project(&visible, &directory, parents.len() + 1).unwrap();

        // every visible unit appears in exactly one bucket
        let mut placed: Vec<UnitId> = forest
            .iter()
            .flat_map(|(_, children)| children.to_vec())
            .collect();
        placed.sort();
        let mut expected: Vec<UnitId> = visible_set.iter().copied().collect();
        expected.sort();
        prop_assert_eq!(placed, expected);

        // no bucket is keyed by an invisible unit
        for (key, _) in forest.iter() {
            if let Some(parent) = key {
                prop_assert!(visible_set.contains(&parent));
            }
        }
    }

    #[test]
    fn projection_is_order_independent_and_idempotent(
        (parents, mask) in tree_strategy()
    ) {
        let (directory, ids) = build_directory(&parents);
        let visible: Vec<UnitId> = ids
            .iter()
            .zip(&mask)
            .filter_map(|(&id, &on)| on.then_some(id))
            .collect();

        let cap = parents.len() + 1;
        let forward = project(&visible, &directory, cap).unwrap();

        let mut reversed = visible.clone();
        reversed.reverse();
        prop_assert_eq!(&forward, &project(&reversed, &directory, cap).unwrap());

        let mut doubled = visible.clone();
        doubled.extend_from_slice(&visible);
        prop_assert_eq!(&forward, &project(&doubled, &directory, cap).unwrap());

        prop_assert_eq!(&forward, &project(&visible, &directory, cap).unwrap());
    }

    #[test]
    fn resolved_parent_is_nearest_visible_ancestor(
        (parents, mask) in tree_strategy()
    ) {
        let (directory, ids) = build_directory(&parents);
        let visible: Vec<UnitId> = ids
            .iter()
            .zip(&mask)
            .filter_map(|(&id, &on)| on.then_some(id))
            .collect();
        let visible_set: BTreeSet<UnitId> = visible.iter().copied().collect();

        let forest = project(&visible, &directory, parents.len() + 1).unwrap();

        for (key, children) in forest.iter() {
            for &child in children {
                // walk the true chain; the first visible ancestor must be
                // exactly the bucket key
                let mut current = directory.parent_of(child);
                let mut nearest = None;
                while let Some(p) = current {
                    if visible_set.contains(&p) {
                        nearest = Some(p);
                        break;
                    }
                    current = directory.parent_of(p);
                }
                prop_assert_eq!(nearest, key);
            }
        }
    }
}
