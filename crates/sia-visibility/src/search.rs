//! Free-text search filter
//!
//! An additional predicate layered on the role-based visibility set, never
//! a replacement for it. Matching is substring, case- and
//! accent-insensitive, against unit code, unit name, subfondo name, team
//! number, and the emails/names of the people on the unit's team.

use sia_core::directory::Directory;
use sia_core::domain::Unit;
use sia_core::identifiers::UnitId;
use sia_core::text;
use tracing::debug;

/// A normalized free-text query. Blank input is the identity filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    query: Option<String>,
}

impl SearchFilter {
    /// Build a filter from raw user input
    pub fn new(q: Option<&str>) -> Self {
        let query = q.map(text::fold).filter(|s| !s.is_empty());
        Self { query }
    }

    /// Whether this filter lets everything through
    pub fn is_empty(&self) -> bool {
        self.query.is_none()
    }

    /// Whether `unit` matches the query
    pub fn matches(&self, unit: &Unit, directory: &Directory) -> bool {
        let Some(q) = &self.query else {
            return true;
        };

        if text::fold(&unit.code).contains(q.as_str())
            || text::fold(&unit.name).contains(q.as_str())
        {
            return true;
        }

        if let Some(subfondo) = directory.subfondo(unit.subfondo) {
            if text::fold(&subfondo.name).contains(q.as_str()) {
                return true;
            }
        }

        let Some(team_id) = unit.team else {
            return false;
        };

        if let Some(team) = directory.team(team_id) {
            if team.number.to_string().contains(q.as_str()) {
                return true;
            }
        }

        // People reachable through the unit's team: account emails and the
        // linked servants' name parts
        for account in directory.accounts_in_team(team_id) {
            if text::fold(&account.email).contains(q.as_str()) {
                return true;
            }
            let Some(servant) = account.servant.and_then(|id| directory.servant(id)) else {
                continue;
            };
            if text::fold(&servant.first_name).contains(q.as_str())
                || text::fold(&servant.last_name1).contains(q.as_str())
                || servant
                    .last_name2
                    .as_deref()
                    .is_some_and(|l2| text::fold(l2).contains(q.as_str()))
            {
                return true;
            }
        }

        false
    }
}

/// Restrict an already-computed visible set to the units matching `filter`,
/// preserving order.
pub fn filter_visible(
    visible: Vec<UnitId>,
    filter: &SearchFilter,
    directory: &Directory,
) -> Vec<UnitId> {
    if filter.is_empty() {
        return visible;
    }
    let before = visible.len();
    let out: Vec<UnitId> = visible
        .into_iter()
        .filter(|&id| {
            directory
                .unit(id)
                .is_some_and(|unit| filter.matches(unit, directory))
        })
        .collect();
    debug!(before, after = out.len(), "search filter applied");
    out
}
