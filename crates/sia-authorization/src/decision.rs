//! The authorization decision table
//!
//! | tier    | Create | View            | Edit | Delete | RequestChange   |
//! |---------|--------|-----------------|------|--------|-----------------|
//! | admin   | allow  | allow           | allow| allow  | allow           |
//! | advisor | deny   | same team       | deny | deny   | same team       |
//! | portal  | deny   | assigned + gen. | deny | deny   | deny            |
//!
//! The admin row is evaluated first and bypasses everything else. Every
//! other branch fails closed on missing prerequisite data: an advisor
//! without a team, a unit without a team, or a portal account without a
//! servant is simply denied. Absence of entitlement data is evidence of
//! no entitlement, not a fault.

use sia_core::directory::Directory;
use sia_core::domain::{AccessTier, Account, Unit};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// An action an account may attempt on a unit (or, for `Create`, with no
/// subject at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Create a new unit
    Create,
    /// View an existing unit
    View,
    /// Edit an existing unit
    Edit,
    /// Delete an existing unit
    Delete,
    /// Request a change to an existing unit
    RequestChange,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::View => write!(f, "view"),
            Self::Edit => write!(f, "edit"),
            Self::Delete => write!(f, "delete"),
            Self::RequestChange => write!(f, "request-change"),
        }
    }
}

/// Outcome of an authorization check. Deny is the normal, expected outcome
/// of many checks: it is a value, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    /// Whether the action may proceed
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    fn from_bool(allowed: bool) -> Self {
        if allowed {
            Self::Allow
        } else {
            Self::Deny
        }
    }
}

/// Both sides must have a team and the teams must match; anything missing
/// fails closed.
pub(crate) fn same_team(account: &Account, unit: &Unit) -> bool {
    match (account.team, unit.team) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Decide whether `account` may perform `action` on `unit` against a
/// directory snapshot.
///
/// Scope (`SelfOnly`/`Descendants`) is irrelevant here: the check is about
/// one concrete unit, so only the existence of a direct assignment counts.
pub fn decide(
    account: &Account,
    action: Action,
    unit: Option<&Unit>,
    directory: &Directory,
) -> Decision {
    let decision = match account.tier() {
        AccessTier::Admin => Decision::Allow,

        AccessTier::Advisor => match action {
            Action::View | Action::RequestChange => {
                Decision::from_bool(unit.is_some_and(|u| same_team(account, u)))
            }
            Action::Create | Action::Edit | Action::Delete => Decision::Deny,
        },

        AccessTier::Portal => match action {
            Action::View => {
                let allowed = unit.is_some_and(|u| {
                    u.generating
                        && account
                            .servant
                            .is_some_and(|servant| directory.assignment_exists(u.id, servant))
                });
                Decision::from_bool(allowed)
            }
            _ => Decision::Deny,
        },
    };

    debug!(
        account = %account.id,
        tier = %account.tier(),
        %action,
        ?decision,
        "authorization decided"
    );
    decision
}
