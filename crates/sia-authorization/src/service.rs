//! Store-backed authorization
//!
//! Resolves the subject unit and performs the portal existence check
//! through the stores, under the request-scoped timeout. A store that
//! fails or times out surfaces as `SiaError::Unavailable`; callers must
//! treat that as deny. An unresolvable unit id is `NotFound` for every
//! tier; a 404 must never be masked as a 403 or an allow.

use crate::decision::{same_team, Action, Decision};
use sia_core::config::DirectoryConfig;
use sia_core::domain::{AccessTier, Account};
use sia_core::effects::{AssignmentStore, UnitStore};
use sia_core::errors::{Result, SiaError};
use sia_core::identifiers::UnitId;
use std::future::Future;
use tracing::{debug, warn};

/// Authorization entry point over a [`UnitStore`] and an
/// [`AssignmentStore`].
#[derive(Debug)]
pub struct AuthorizationService<U, A> {
    units: U,
    assignments: A,
    config: DirectoryConfig,
}

impl<U: UnitStore, A: AssignmentStore> AuthorizationService<U, A> {
    /// Create a service over the two stores
    pub fn new(units: U, assignments: A, config: DirectoryConfig) -> Self {
        Self {
            units,
            assignments,
            config,
        }
    }

    async fn guarded<T, F>(&self, what: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send,
    {
        match tokio::time::timeout(self.config.store_timeout(), call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(what, timeout_ms = self.config.store_timeout_ms, "store call timed out");
                Err(SiaError::unavailable(format!(
                    "{what} timed out after {} ms",
                    self.config.store_timeout_ms
                )))
            }
        }
    }

    /// Decide whether `account` may perform `action` on the unit named by
    /// `unit` (or with no subject, for `Create`).
    pub async fn authorize(
        &self,
        account: &Account,
        action: Action,
        unit: Option<UnitId>,
    ) -> Result<Decision> {
        // Resolve the subject first: an id that does not resolve is
        // NotFound for every tier, the admin bypass included.
        let unit = match unit {
            None => None,
            Some(id) => match self.guarded("unit lookup", self.units.unit(id)).await? {
                Some(unit) => Some(unit),
                None => return Err(SiaError::not_found(format!("unit {id}"))),
            },
        };

        let decision = match account.tier() {
            AccessTier::Admin => Decision::Allow,

            AccessTier::Advisor => match action {
                Action::View | Action::RequestChange => match &unit {
                    Some(u) if same_team(account, u) => Decision::Allow,
                    _ => Decision::Deny,
                },
                Action::Create | Action::Edit | Action::Delete => Decision::Deny,
            },

            AccessTier::Portal => match (action, &unit, account.servant) {
                (Action::View, Some(u), Some(servant)) if u.generating => {
                    let exists = self
                        .guarded(
                            "assignment existence check",
                            self.assignments.assignment_exists(u.id, servant),
                        )
                        .await?;
                    if exists {
                        Decision::Allow
                    } else {
                        Decision::Deny
                    }
                }
                _ => Decision::Deny,
            },
        };

        debug!(
            account = %account.id,
            tier = %account.tier(),
            %action,
            unit = ?unit.as_ref().map(|u| u.id),
            ?decision,
            "authorization decided"
        );
        Ok(decision)
    }
}
