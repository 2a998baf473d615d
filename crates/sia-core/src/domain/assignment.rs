//! Servant-to-unit responsibility assignments

use crate::identifiers::{AssignmentId, ServantId, UnitId};
use crate::text;
use serde::{Deserialize, Serialize};

/// Role category of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssignmentRole {
    /// Correspondence area responsible
    Mail,
    /// Transaction handler
    Transact,
    /// Liaison
    Liaison,
    /// Assistant
    Assistant,
}

impl AssignmentRole {
    /// All role categories, in declaration order
    pub const ALL: [Self; 4] = [Self::Mail, Self::Transact, Self::Liaison, Self::Assistant];

    /// Human label as it appears in the source directory
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mail => "Área de correspondencia",
            Self::Transact => "Trámite",
            Self::Liaison => "Enlace",
            Self::Assistant => "Auxiliar",
        }
    }

    /// Parse a raw label, tolerating case, accents, and the synonym
    /// phrasings the source data uses. Unknown labels parse to `None`.
    pub fn parse_label(raw: &str) -> Option<Self> {
        let n = text::fold(raw);
        if n.is_empty() {
            return None;
        }

        for role in Self::ALL {
            if n == text::fold(role.label()) {
                return Some(role);
            }
        }

        if n.contains("correspondencia") {
            Some(Self::Mail)
        } else if n.contains("tramite") {
            Some(Self::Transact)
        } else if n.contains("enlace") {
            Some(Self::Liaison)
        } else if n.contains("auxiliar") {
            Some(Self::Assistant)
        } else {
            None
        }
    }
}

/// Reach of an assignment's authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentScope {
    /// Applies to the assigned unit only
    SelfOnly,
    /// Applies to the assigned unit and its visible sub-hierarchy
    Descendants,
}

impl AssignmentScope {
    /// Default scope per role: liaisons reach descendants, everyone else
    /// stays on the single unit.
    pub fn default_for(role: AssignmentRole) -> Self {
        match role {
            AssignmentRole::Liaison => Self::Descendants,
            _ => Self::SelfOnly,
        }
    }
}

/// Binds a servant to a unit with a role category and a scope.
///
/// At most one assignment exists per `(unit, servant, role)` triple;
/// re-inserting the triple updates the scope in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Stable unique identifier
    pub id: AssignmentId,

    /// Assigned unit
    pub unit: UnitId,

    /// Assigned servant
    pub servant: ServantId,

    /// Role category
    pub role: AssignmentRole,

    /// Authority reach
    pub scope: AssignmentScope,
}

impl Assignment {
    /// Create an assignment with the role's default scope
    pub fn new(id: AssignmentId, unit: UnitId, servant: ServantId, role: AssignmentRole) -> Self {
        Self {
            id,
            unit,
            servant,
            role,
            scope: AssignmentScope::default_for(role),
        }
    }

    /// Override the scope
    pub fn with_scope(mut self, scope: AssignmentScope) -> Self {
        self.scope = scope;
        self
    }
}
