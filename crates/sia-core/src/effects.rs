//! Store Effect Traits
//!
//! Pure interface signatures for the backing stores; implementations live
//! in `sia-store`. The engines in `sia-visibility` and `sia-authorization`
//! are synchronous and pure, so these traits are the only async seams, and
//! callers wrap every call in a request-scoped timeout, treating elapse as
//! `SiaError::Unavailable` (fail closed).
//!
//! All stores answer deterministically: unit listings come back in code
//! order, so repeated calls over unchanged data are byte-identical.

use async_trait::async_trait;
use std::sync::Arc;

use crate::directory::Directory;
use crate::domain::{Account, Assignment, Servant, Team, Unit};
use crate::errors::Result;
use crate::identifiers::{AccountId, ServantId, TeamId, UnitId};

/// Lookup and listing of units.
#[async_trait]
pub trait UnitStore: Send + Sync {
    /// Fetch a unit by id
    async fn unit(&self, id: UnitId) -> Result<Option<Unit>>;

    /// Fetch a unit by business code (case- and accent-insensitive)
    async fn unit_by_code(&self, code: &str) -> Result<Option<Unit>>;

    /// Parent id of a unit without loading the parent object, so ancestor
    /// walks stay O(1) per hop
    async fn parent_of(&self, id: UnitId) -> Result<Option<UnitId>>;

    /// All generating units in code order, optionally restricted to a team
    async fn generating_units(&self, team: Option<TeamId>) -> Result<Vec<Unit>>;
}

/// Existence checks and listings over assignments.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Whether any assignment binds this servant to this unit, in any role
    async fn assignment_exists(&self, unit: UnitId, servant: ServantId) -> Result<bool>;

    /// Assignments the servant holds on generating units, ordered by unit
    /// code
    async fn generating_assignments_for_servant(
        &self,
        servant: ServantId,
    ) -> Result<Vec<Assignment>>;
}

/// Account, servant, and team resolution.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fetch an account by id
    async fn account(&self, id: AccountId) -> Result<Option<Account>>;

    /// Fetch an account by login email (case-insensitive)
    async fn account_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Fetch a servant by id
    async fn servant(&self, id: ServantId) -> Result<Option<Servant>>;

    /// Fetch a team by id
    async fn team(&self, id: TeamId) -> Result<Option<Team>>;
}

/// Bulk snapshot access for the visibility and projection paths.
///
/// Visibility computes over the whole joined data set (the search filter
/// reaches units, subfondos, teams, and the people on a unit's team), so
/// the service loads one consistent snapshot per request rather than
/// issuing piecemeal queries.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// A consistent snapshot of the current data set
    async fn directory(&self) -> Result<Arc<Directory>>;
}

#[async_trait]
impl<T: UnitStore + ?Sized> UnitStore for Arc<T> {
    async fn unit(&self, id: UnitId) -> Result<Option<Unit>> {
        (**self).unit(id).await
    }

    async fn unit_by_code(&self, code: &str) -> Result<Option<Unit>> {
        (**self).unit_by_code(code).await
    }

    async fn parent_of(&self, id: UnitId) -> Result<Option<UnitId>> {
        (**self).parent_of(id).await
    }

    async fn generating_units(&self, team: Option<TeamId>) -> Result<Vec<Unit>> {
        (**self).generating_units(team).await
    }
}

#[async_trait]
impl<T: AssignmentStore + ?Sized> AssignmentStore for Arc<T> {
    async fn assignment_exists(&self, unit: UnitId, servant: ServantId) -> Result<bool> {
        (**self).assignment_exists(unit, servant).await
    }

    async fn generating_assignments_for_servant(
        &self,
        servant: ServantId,
    ) -> Result<Vec<Assignment>> {
        (**self).generating_assignments_for_servant(servant).await
    }
}

#[async_trait]
impl<T: IdentityStore + ?Sized> IdentityStore for Arc<T> {
    async fn account(&self, id: AccountId) -> Result<Option<Account>> {
        (**self).account(id).await
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>> {
        (**self).account_by_email(email).await
    }

    async fn servant(&self, id: ServantId) -> Result<Option<Servant>> {
        (**self).servant(id).await
    }

    async fn team(&self, id: TeamId) -> Result<Option<Team>> {
        (**self).team(id).await
    }
}

#[async_trait]
impl<T: DirectoryStore + ?Sized> DirectoryStore for Arc<T> {
    async fn directory(&self) -> Result<Arc<Directory>> {
        (**self).directory().await
    }
}
