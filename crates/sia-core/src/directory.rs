//! Immutable indexed snapshot of the full directory data set
//!
//! A [`Directory`] is built once per load from plain entity lists, is
//! validated on construction, and is read-only afterwards. It is the
//! batch-scoped context the read paths run against; nothing in this crate
//! keeps a process-wide cache.
//!
//! Parent linkage is an explicit id-to-id index, so ancestor walks are
//! bounded map lookups that never touch a live object graph.

use crate::domain::{Account, Assignment, AssignmentRole, Servant, Subfondo, Team, Unit};
use crate::errors::{Result, SiaError};
use crate::identifiers::{AccountId, ServantId, SubfondoId, TeamId, UnitId};
use crate::text;
use indexmap::IndexMap;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Validated, indexed, read-only snapshot of one directory data set.
///
/// Units iterate in code order (case- and accent-insensitive), which is the
/// canonical listing order everywhere in the system.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    units: IndexMap<UnitId, Unit>,
    unit_codes: HashMap<String, UnitId>,
    parents: HashMap<UnitId, UnitId>,
    subfondos: HashMap<SubfondoId, Subfondo>,
    teams: HashMap<TeamId, Team>,
    servants: HashMap<ServantId, Servant>,
    accounts: HashMap<AccountId, Account>,
    accounts_by_email: HashMap<String, AccountId>,
    accounts_by_team: HashMap<TeamId, Vec<AccountId>>,
    assignments: Vec<Assignment>,
    assignments_by_unit: HashMap<UnitId, Vec<usize>>,
    assignments_by_servant: HashMap<ServantId, Vec<usize>>,
}

impl Directory {
    /// Start building a directory
    pub fn builder() -> DirectoryBuilder {
        DirectoryBuilder::default()
    }

    /// Look up a unit by id
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Look up a unit by business code, case- and accent-insensitively
    pub fn unit_by_code(&self, code: &str) -> Option<&Unit> {
        self.unit_codes
            .get(&text::fold(code))
            .and_then(|id| self.units.get(id))
    }

    /// Parent id of a unit, without loading the parent object
    pub fn parent_of(&self, id: UnitId) -> Option<UnitId> {
        self.parents.get(&id).copied()
    }

    /// All units in code order
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Number of units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the directory holds no units
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Generating units in code order, optionally restricted to one team
    pub fn generating_units(&self, team: Option<TeamId>) -> Vec<&Unit> {
        self.units
            .values()
            .filter(|u| u.generating)
            .filter(|u| team.is_none() || u.team == team)
            .collect()
    }

    /// Look up a team by id
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(&id)
    }

    /// Look up a subfondo by id
    pub fn subfondo(&self, id: SubfondoId) -> Option<&Subfondo> {
        self.subfondos.get(&id)
    }

    /// Look up a servant by id
    pub fn servant(&self, id: ServantId) -> Option<&Servant> {
        self.servants.get(&id)
    }

    /// Look up an account by id
    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    /// Look up an account by login email (case-insensitive)
    pub fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts_by_email
            .get(&email.trim().to_lowercase())
            .and_then(|id| self.accounts.get(id))
    }

    /// Accounts affiliated with a team
    pub fn accounts_in_team(&self, team: TeamId) -> Vec<&Account> {
        self.accounts_by_team
            .get(&team)
            .map(|ids| ids.iter().filter_map(|id| self.accounts.get(id)).collect())
            .unwrap_or_default()
    }

    /// Assignments attached to a unit
    pub fn assignments_for_unit(&self, unit: UnitId) -> Vec<&Assignment> {
        self.assignments_by_unit
            .get(&unit)
            .map(|ix| ix.iter().map(|&i| &self.assignments[i]).collect())
            .unwrap_or_default()
    }

    /// Assignments held by a servant
    pub fn assignments_for_servant(&self, servant: ServantId) -> Vec<&Assignment> {
        self.assignments_by_servant
            .get(&servant)
            .map(|ix| ix.iter().map(|&i| &self.assignments[i]).collect())
            .unwrap_or_default()
    }

    /// Assignments held by a servant on generating units, ordered by unit
    /// code
    pub fn generating_assignments_for_servant(&self, servant: ServantId) -> Vec<&Assignment> {
        let mut out: Vec<&Assignment> = self
            .assignments_for_servant(servant)
            .into_iter()
            .filter(|a| self.unit(a.unit).is_some_and(|u| u.generating))
            .collect();
        out.sort_by_key(|a| {
            let code = self.unit(a.unit).map(|u| text::fold(&u.code)).unwrap_or_default();
            (code, a.id)
        });
        out
    }

    /// Whether any assignment binds this servant to this unit, in any role
    pub fn assignment_exists(&self, unit: UnitId, servant: ServantId) -> bool {
        self.assignments_by_unit
            .get(&unit)
            .is_some_and(|ix| ix.iter().any(|&i| self.assignments[i].servant == servant))
    }

    /// All assignments
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }
}

/// Accumulates entity lists and validates them into a [`Directory`].
///
/// Validation enforces: unique unit codes (case/accent-insensitive), unique
/// team numbers, unique servant and account emails, unique staff keys,
/// resolvable references everywhere (a dangling parent is an error, not a
/// root), acyclic parent links, at most one account per servant, and
/// assignment triple uniqueness (a repeated `(unit, servant, role)` updates
/// the scope of the existing record).
#[derive(Debug, Default)]
pub struct DirectoryBuilder {
    subfondos: Vec<Subfondo>,
    teams: Vec<Team>,
    servants: Vec<Servant>,
    units: Vec<Unit>,
    accounts: Vec<Account>,
    assignments: Vec<Assignment>,
}

impl DirectoryBuilder {
    /// Add a subfondo
    pub fn subfondo(mut self, subfondo: Subfondo) -> Self {
        self.subfondos.push(subfondo);
        self
    }

    /// Add a team
    pub fn team(mut self, team: Team) -> Self {
        self.teams.push(team);
        self
    }

    /// Add a servant
    pub fn servant(mut self, servant: Servant) -> Self {
        self.servants.push(servant);
        self
    }

    /// Add a unit
    pub fn unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    /// Add an account
    pub fn account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }

    /// Add an assignment
    pub fn assignment(mut self, assignment: Assignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    /// Validate and index everything into a [`Directory`]
    pub fn build(self) -> Result<Directory> {
        let Self {
            subfondos,
            teams,
            servants,
            mut units,
            accounts,
            assignments,
        } = self;

        let mut subfondo_map = HashMap::new();
        for sf in subfondos {
            if subfondo_map.insert(sf.id, sf).is_some() {
                return Err(SiaError::invalid("duplicate subfondo id"));
            }
        }

        let mut team_map = HashMap::new();
        let mut team_numbers = HashSet::new();
        for team in teams {
            if !team_numbers.insert(team.number) {
                return Err(SiaError::invalid(format!(
                    "duplicate team number {}",
                    team.number
                )));
            }
            if team_map.insert(team.id, team).is_some() {
                return Err(SiaError::invalid("duplicate team id"));
            }
        }

        let mut servant_map = HashMap::new();
        let mut servant_emails = HashSet::new();
        let mut staff_keys = HashSet::new();
        for servant in servants {
            if let Some(email) = &servant.email {
                if !servant_emails.insert(email.trim().to_lowercase()) {
                    return Err(SiaError::invalid(format!(
                        "duplicate servant email {email}"
                    )));
                }
            }
            if let Some(key) = servant.staff_key {
                if !staff_keys.insert(key) {
                    return Err(SiaError::invalid(format!("duplicate staff key {key}")));
                }
            }
            if servant_map.insert(servant.id, servant).is_some() {
                return Err(SiaError::invalid("duplicate servant id"));
            }
        }

        // Canonical listing order: folded code, id as tie-break
        units.sort_by_key(|u| (text::fold(&u.code), u.id));

        let mut unit_map: IndexMap<UnitId, Unit> = IndexMap::with_capacity(units.len());
        let mut unit_codes = HashMap::with_capacity(units.len());
        for unit in units {
            let folded = text::fold(&unit.code);
            if folded.is_empty() {
                return Err(SiaError::invalid(format!(
                    "unit {} has a blank code",
                    unit.id
                )));
            }
            if unit_codes.insert(folded, unit.id).is_some() {
                return Err(SiaError::invalid(format!(
                    "duplicate unit code {:?}",
                    unit.code
                )));
            }
            if let Some(team) = unit.team {
                if !team_map.contains_key(&team) {
                    return Err(SiaError::invalid(format!(
                        "unit {} references unknown team {team}",
                        unit.id
                    )));
                }
            }
            if !subfondo_map.contains_key(&unit.subfondo) {
                return Err(SiaError::invalid(format!(
                    "unit {} references unknown subfondo {}",
                    unit.id, unit.subfondo
                )));
            }
            if unit_map.insert(unit.id, unit).is_some() {
                return Err(SiaError::invalid("duplicate unit id"));
            }
        }

        let mut parents = HashMap::new();
        for unit in unit_map.values() {
            if let Some(parent) = unit.parent {
                if !unit_map.contains_key(&parent) {
                    return Err(SiaError::invalid(format!(
                        "unit {} references unknown parent {parent}",
                        unit.id
                    )));
                }
                parents.insert(unit.id, parent);
            }
        }
        // The parent relation must be a forest. A chain longer than the
        // unit count can only mean a cycle.
        for &id in unit_map.keys() {
            let mut hops = 0usize;
            let mut current = parents.get(&id).copied();
            while let Some(parent) = current {
                hops += 1;
                if hops > unit_map.len() {
                    return Err(SiaError::integrity(format!(
                        "parent chain of {id} forms a cycle"
                    )));
                }
                current = parents.get(&parent).copied();
            }
        }

        let mut account_map = HashMap::new();
        let mut accounts_by_email = HashMap::new();
        let mut accounts_by_team: HashMap<TeamId, Vec<AccountId>> = HashMap::new();
        let mut servants_with_account = HashSet::new();
        for account in accounts {
            let email = account.email.trim().to_lowercase();
            if accounts_by_email.insert(email, account.id).is_some() {
                return Err(SiaError::invalid(format!(
                    "duplicate account email {}",
                    account.email
                )));
            }
            if let Some(team) = account.team {
                if !team_map.contains_key(&team) {
                    return Err(SiaError::invalid(format!(
                        "account {} references unknown team {team}",
                        account.id
                    )));
                }
                accounts_by_team.entry(team).or_default().push(account.id);
            }
            if let Some(servant) = account.servant {
                if !servant_map.contains_key(&servant) {
                    return Err(SiaError::invalid(format!(
                        "account {} references unknown servant {servant}",
                        account.id
                    )));
                }
                if !servants_with_account.insert(servant) {
                    return Err(SiaError::invalid(format!(
                        "servant {servant} is linked to more than one account"
                    )));
                }
            }
            if account_map.insert(account.id, account).is_some() {
                return Err(SiaError::invalid("duplicate account id"));
            }
        }

        let mut list: Vec<Assignment> = Vec::with_capacity(assignments.len());
        let mut triples: HashMap<(UnitId, ServantId, AssignmentRole), usize> = HashMap::new();
        for assignment in assignments {
            let Some(unit) = unit_map.get(&assignment.unit) else {
                return Err(SiaError::invalid(format!(
                    "assignment {} references unknown unit {}",
                    assignment.id, assignment.unit
                )));
            };
            if !servant_map.contains_key(&assignment.servant) {
                return Err(SiaError::invalid(format!(
                    "assignment {} references unknown servant {}",
                    assignment.id, assignment.servant
                )));
            }
            if !unit.generating {
                // Allowed by the model, but unexpected from the import path
                debug!(unit = %assignment.unit, "assignment targets a non-generating unit");
            }
            match triples.entry((assignment.unit, assignment.servant, assignment.role)) {
                Entry::Occupied(slot) => {
                    // Re-import of an existing triple updates the scope in
                    // place instead of duplicating the record
                    list[*slot.get()].scope = assignment.scope;
                }
                Entry::Vacant(slot) => {
                    slot.insert(list.len());
                    list.push(assignment);
                }
            }
        }

        let mut assignments_by_unit: HashMap<UnitId, Vec<usize>> = HashMap::new();
        let mut assignments_by_servant: HashMap<ServantId, Vec<usize>> = HashMap::new();
        for (i, assignment) in list.iter().enumerate() {
            assignments_by_unit
                .entry(assignment.unit)
                .or_default()
                .push(i);
            assignments_by_servant
                .entry(assignment.servant)
                .or_default()
                .push(i);
        }

        debug!(
            units = unit_map.len(),
            servants = servant_map.len(),
            accounts = account_map.len(),
            assignments = list.len(),
            "directory built"
        );

        Ok(Directory {
            units: unit_map,
            unit_codes,
            parents,
            subfondos: subfondo_map,
            teams: team_map,
            servants: servant_map,
            accounts: account_map,
            accounts_by_email,
            accounts_by_team,
            assignments: list,
            assignments_by_unit,
            assignments_by_servant,
        })
    }
}
