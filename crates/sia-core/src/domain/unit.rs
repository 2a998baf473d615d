//! Units, teams, and classification groups

use crate::identifiers::{SubfondoId, TeamId, UnitId};
use serde::{Deserialize, Serialize};

/// A node in the organizational hierarchy.
///
/// The parent is a reference by id; child collections are derived by the
/// projection layer, never stored. A unit with `generating = false` is an
/// administrative grouping node: it carries hierarchy structure but is
/// never individually visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Stable unique identifier
    pub id: UnitId,

    /// Unique business key; compared case- and accent-insensitively
    pub code: String,

    /// Display name
    pub name: String,

    /// Whether this unit produces correspondence/work
    pub generating: bool,

    /// Team the unit belongs to, if any
    pub team: Option<TeamId>,

    /// Classification group (required)
    pub subfondo: SubfondoId,

    /// Parent unit, if any; the parent relation forms a strict out-tree
    pub parent: Option<UnitId>,
}

impl Unit {
    /// Create a new generating unit
    pub fn new(
        id: UnitId,
        code: impl Into<String>,
        name: impl Into<String>,
        subfondo: SubfondoId,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
            generating: true,
            team: None,
            subfondo,
            parent: None,
        }
    }

    /// Create a non-generating grouping node
    pub fn grouping(
        id: UnitId,
        code: impl Into<String>,
        name: impl Into<String>,
        subfondo: SubfondoId,
    ) -> Self {
        Self {
            generating: false,
            ..Self::new(id, code, name, subfondo)
        }
    }

    /// Set the team affiliation
    pub fn with_team(mut self, team: TeamId) -> Self {
        self.team = Some(team);
        self
    }

    /// Set the parent unit
    pub fn with_parent(mut self, parent: UnitId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// A numbered grouping of staff and units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Stable unique identifier
    pub id: TeamId,

    /// Unique team number
    pub number: u32,
}

impl Team {
    /// Create a new team
    pub fn new(id: TeamId, number: u32) -> Self {
        Self { id, number }
    }
}

/// A classification group ("subfondo"); every unit belongs to exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subfondo {
    /// Stable unique identifier
    pub id: SubfondoId,

    /// Display name; participates in free-text search
    pub name: String,
}

impl Subfondo {
    /// Create a new subfondo
    pub fn new(id: SubfondoId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
