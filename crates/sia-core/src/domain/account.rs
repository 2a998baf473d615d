//! Login accounts and authorization tiers

use crate::identifiers::{AccountId, ServantId, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A role label attached to an account. Accounts may carry several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Team-scoped staff access
    Advisor,
    /// Portal access through a linked servant
    Portal,
}

/// The single authorization tier that drives visibility and authorization.
///
/// An account's raw role set may carry several labels; the tier is resolved
/// by fixed precedence Admin > Advisor > Portal and is the only thing the
/// engines ever branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessTier {
    Admin,
    Advisor,
    Portal,
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Advisor => write!(f, "advisor"),
            Self::Portal => write!(f, "portal"),
        }
    }
}

/// Opaque password credential. This repo never hashes or verifies; the
/// value is whatever the credential layer produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-encoded credential
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The encoded credential string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A login identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable unique identifier
    pub id: AccountId,

    /// Login email; unique across accounts
    pub email: String,

    /// Opaque password credential
    pub password: PasswordHash,

    /// Raw role labels; resolved to a tier via [`Account::tier`]
    pub roles: BTreeSet<Role>,

    /// Team affiliation; meaningful only for the advisor tier
    pub team: Option<TeamId>,

    /// Linked servant; at most one account per servant
    pub servant: Option<ServantId>,
}

impl Account {
    /// Create a new account with no roles (portal tier by default)
    pub fn new(id: AccountId, email: impl Into<String>, password: PasswordHash) -> Self {
        Self {
            id,
            email: email.into(),
            password,
            roles: BTreeSet::new(),
            team: None,
            servant: None,
        }
    }

    /// Add a role label
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    /// Set the team affiliation
    pub fn with_team(mut self, team: TeamId) -> Self {
        self.team = Some(team);
        self
    }

    /// Link a servant
    pub fn with_servant(mut self, servant: ServantId) -> Self {
        self.servant = Some(servant);
        self
    }

    /// Resolve the authorization tier: Admin > Advisor > Portal.
    pub fn tier(&self) -> AccessTier {
        if self.roles.contains(&Role::Admin) {
            AccessTier::Admin
        } else if self.roles.contains(&Role::Advisor) {
            AccessTier::Advisor
        } else {
            AccessTier::Portal
        }
    }

    /// Whether the account is staff (admin or advisor tier)
    pub fn is_staff(&self) -> bool {
        matches!(self.tier(), AccessTier::Admin | AccessTier::Advisor)
    }
}
