//! Visibility predicate engine
//!
//! Computes the flat set of units an account may know about, before any
//! hierarchy reconstruction. Exactly one tier branch applies per account
//! (Admin > Advisor > Portal); results are never merged across branches.
//! Missing entitlement data (advisor without a team, portal account
//! without a servant) yields the empty set, never an error.

use sia_core::directory::Directory;
use sia_core::domain::{AccessTier, Account};
use sia_core::identifiers::UnitId;
use tracing::{debug, warn};

/// The flat set of units `account` is allowed to know exist, in unit-code
/// order.
///
/// Only generating units are ever visible; non-generating units exist
/// solely to carry hierarchy structure. Assignment scope (`Descendants`)
/// is deliberately not expanded here: visibility is assignment-direct.
pub fn visible_units(account: &Account, directory: &Directory) -> Vec<UnitId> {
    let tier = account.tier();
    let visible: Vec<UnitId> = match tier {
        AccessTier::Admin => directory
            .generating_units(None)
            .iter()
            .map(|u| u.id)
            .collect(),

        AccessTier::Advisor => match account.team {
            Some(team) => directory
                .generating_units(Some(team))
                .iter()
                .map(|u| u.id)
                .collect(),
            None => {
                warn!(account = %account.id, "advisor account has no team; showing nothing");
                Vec::new()
            }
        },

        AccessTier::Portal => match account.servant {
            Some(servant) => directory
                .generating_units(None)
                .iter()
                .filter(|u| directory.assignment_exists(u.id, servant))
                .map(|u| u.id)
                .collect(),
            None => {
                warn!(account = %account.id, "portal account has no servant; showing nothing");
                Vec::new()
            }
        },
    };

    debug!(account = %account.id, %tier, count = visible.len(), "visibility computed");
    visible
}
