//! Request-facing visibility service
//!
//! Composes snapshot load → visibility predicate → search filter → forest
//! projection. The only I/O is the snapshot load, guarded by the
//! request-scoped timeout from [`DirectoryConfig`]; elapse or store failure
//! surfaces as `SiaError::Unavailable`, which callers must treat as
//! "nothing visible" (fail closed) while still being able to tell it apart
//! from a legitimately empty result.

use crate::engine::visible_units;
use crate::forest::{project, VisibleForest};
use crate::search::{filter_visible, SearchFilter};
use sia_core::config::DirectoryConfig;
use sia_core::directory::Directory;
use sia_core::domain::{Account, Assignment, Unit};
use sia_core::effects::DirectoryStore;
use sia_core::errors::{Result, SiaError};
use sia_core::identifiers::UnitId;
use std::sync::Arc;
use tracing::warn;

/// Visibility and projection entry points over a [`DirectoryStore`].
#[derive(Debug)]
pub struct VisibilityService<S> {
    store: S,
    config: DirectoryConfig,
}

impl<S: DirectoryStore> VisibilityService<S> {
    /// Create a service over `store`
    pub fn new(store: S, config: DirectoryConfig) -> Self {
        Self { store, config }
    }

    async fn load(&self) -> Result<Arc<Directory>> {
        match tokio::time::timeout(self.config.store_timeout(), self.store.directory()).await {
            Ok(Ok(directory)) => Ok(directory),
            Ok(Err(err)) => {
                warn!(%err, "directory load failed");
                Err(err)
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.store_timeout_ms,
                    "directory load timed out"
                );
                Err(SiaError::unavailable(format!(
                    "directory load timed out after {} ms",
                    self.config.store_timeout_ms
                )))
            }
        }
    }

    /// The forest of units visible to `account`, optionally restricted by a
    /// free-text query.
    pub async fn visible_forest(
        &self,
        account: &Account,
        q: Option<&str>,
    ) -> Result<VisibleForest> {
        let directory = self.load().await?;
        let filter = SearchFilter::new(q);
        let visible = filter_visible(visible_units(account, &directory), &filter, &directory);
        project(&visible, &directory, self.config.max_tree_depth)
    }

    /// Projected children of one unit, for incremental branch expansion.
    ///
    /// Returns `NotFound` when the unit id does not resolve at all; an
    /// existing unit with no visible children yields an empty list.
    pub async fn children_of(&self, account: &Account, unit: UnitId) -> Result<Vec<Unit>> {
        let directory = self.load().await?;
        if directory.unit(unit).is_none() {
            return Err(SiaError::not_found(format!("unit {unit}")));
        }
        let visible = visible_units(account, &directory);
        let forest = project(&visible, &directory, self.config.max_tree_depth)?;
        Ok(forest
            .children_of(unit)
            .iter()
            .filter_map(|&id| directory.unit(id).cloned())
            .collect())
    }

    /// One page of root units (1-based), `page_size` roots per page.
    ///
    /// Page 1 is always valid, even when empty; asking past the last page
    /// is `NotFound`.
    pub async fn visible_roots_page(
        &self,
        account: &Account,
        q: Option<&str>,
        page: usize,
    ) -> Result<Vec<Unit>> {
        if page == 0 {
            return Err(SiaError::invalid("pages are numbered from 1"));
        }
        let directory = self.load().await?;
        let filter = SearchFilter::new(q);
        let visible = filter_visible(visible_units(account, &directory), &filter, &directory);
        let forest = project(&visible, &directory, self.config.max_tree_depth)?;

        let roots = forest.roots();
        let start = (page - 1) * self.config.page_size;
        if start >= roots.len() && page > 1 {
            return Err(SiaError::not_found(format!("page {page} is out of range")));
        }
        Ok(roots
            .iter()
            .skip(start)
            .take(self.config.page_size)
            .filter_map(|&id| directory.unit(id).cloned())
            .collect())
    }

    /// The single unit a non-staff account should land on directly, when it
    /// can see exactly one and no search is active. Staff accounts always
    /// get the full forest.
    pub async fn single_visible_unit(&self, account: &Account) -> Result<Option<UnitId>> {
        if account.is_staff() {
            return Ok(None);
        }
        let directory = self.load().await?;
        let visible = visible_units(account, &directory);
        Ok(match visible.as_slice() {
            [only] => Some(*only),
            _ => None,
        })
    }

    /// Assignments the account's servant holds on generating units, in unit
    /// code order; empty for staff accounts and accounts without a servant.
    pub async fn generating_assignments(&self, account: &Account) -> Result<Vec<Assignment>> {
        if account.is_staff() {
            return Ok(Vec::new());
        }
        let Some(servant) = account.servant else {
            return Ok(Vec::new());
        };
        let directory = self.load().await?;
        Ok(directory
            .generating_assignments_for_servant(servant)
            .into_iter()
            .cloned()
            .collect())
    }
}
