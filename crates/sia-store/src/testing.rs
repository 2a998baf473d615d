//! Store doubles for failure-path testing
//!
//! `FailingStore` answers every call with `SiaError::Unavailable`;
//! `SlowStore` delays delegation by a fixed amount so callers can exercise
//! their request-scoped timeouts.

use async_trait::async_trait;
use sia_core::directory::Directory;
use sia_core::domain::{Account, Assignment, Servant, Team, Unit};
use sia_core::effects::{AssignmentStore, DirectoryStore, IdentityStore, UnitStore};
use sia_core::errors::{Result, SiaError};
use sia_core::identifiers::{AccountId, ServantId, TeamId, UnitId};
use std::sync::Arc;
use std::time::Duration;

fn unavailable<T>() -> Result<T> {
    Err(SiaError::unavailable("backing store is down"))
}

/// A store whose backend is permanently unreachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

#[async_trait]
impl UnitStore for FailingStore {
    async fn unit(&self, _id: UnitId) -> Result<Option<Unit>> {
        unavailable()
    }

    async fn unit_by_code(&self, _code: &str) -> Result<Option<Unit>> {
        unavailable()
    }

    async fn parent_of(&self, _id: UnitId) -> Result<Option<UnitId>> {
        unavailable()
    }

    async fn generating_units(&self, _team: Option<TeamId>) -> Result<Vec<Unit>> {
        unavailable()
    }
}

#[async_trait]
impl AssignmentStore for FailingStore {
    async fn assignment_exists(&self, _unit: UnitId, _servant: ServantId) -> Result<bool> {
        unavailable()
    }

    async fn generating_assignments_for_servant(
        &self,
        _servant: ServantId,
    ) -> Result<Vec<Assignment>> {
        unavailable()
    }
}

#[async_trait]
impl IdentityStore for FailingStore {
    async fn account(&self, _id: AccountId) -> Result<Option<Account>> {
        unavailable()
    }

    async fn account_by_email(&self, _email: &str) -> Result<Option<Account>> {
        unavailable()
    }

    async fn servant(&self, _id: ServantId) -> Result<Option<Servant>> {
        unavailable()
    }

    async fn team(&self, _id: TeamId) -> Result<Option<Team>> {
        unavailable()
    }
}

#[async_trait]
impl DirectoryStore for FailingStore {
    async fn directory(&self) -> Result<Arc<Directory>> {
        unavailable()
    }
}

/// Wraps a store and delays every call by a fixed duration.
#[derive(Debug)]
pub struct SlowStore<S> {
    inner: S,
    delay: Duration,
}

impl<S> SlowStore<S> {
    /// Wrap `inner`, delaying each call by `delay`
    pub fn new(inner: S, delay: Duration) -> Self {
        Self { inner, delay }
    }

    async fn stall(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

#[async_trait]
impl<S: UnitStore> UnitStore for SlowStore<S> {
    async fn unit(&self, id: UnitId) -> Result<Option<Unit>> {
        self.stall().await;
        self.inner.unit(id).await
    }

    async fn unit_by_code(&self, code: &str) -> Result<Option<Unit>> {
        self.stall().await;
        self.inner.unit_by_code(code).await
    }

    async fn parent_of(&self, id: UnitId) -> Result<Option<UnitId>> {
        self.stall().await;
        self.inner.parent_of(id).await
    }

    async fn generating_units(&self, team: Option<TeamId>) -> Result<Vec<Unit>> {
        self.stall().await;
        self.inner.generating_units(team).await
    }
}

#[async_trait]
impl<S: AssignmentStore> AssignmentStore for SlowStore<S> {
    async fn assignment_exists(&self, unit: UnitId, servant: ServantId) -> Result<bool> {
        self.stall().await;
        self.inner.assignment_exists(unit, servant).await
    }

    async fn generating_assignments_for_servant(
        &self,
        servant: ServantId,
    ) -> Result<Vec<Assignment>> {
        self.stall().await;
        self.inner.generating_assignments_for_servant(servant).await
    }
}

#[async_trait]
impl<S: DirectoryStore> DirectoryStore for SlowStore<S> {
    async fn directory(&self) -> Result<Arc<Directory>> {
        self.stall().await;
        self.inner.directory().await
    }
}
