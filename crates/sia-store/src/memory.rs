//! In-memory store over an indexed [`Directory`] snapshot
//!
//! The handler keeps one immutable snapshot behind a lock and serves every
//! read from it. [`MemoryDirectoryStore::replace`] swaps in a freshly built
//! snapshot atomically; readers holding the previous `Arc` keep a
//! consistent view until they finish.

use async_trait::async_trait;
use sia_core::directory::Directory;
use sia_core::domain::{Account, Assignment, Servant, Team, Unit};
use sia_core::effects::{AssignmentStore, DirectoryStore, IdentityStore, UnitStore};
use sia_core::errors::Result;
use sia_core::identifiers::{AccountId, ServantId, TeamId, UnitId};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory implementation of all four store traits.
#[derive(Debug)]
pub struct MemoryDirectoryStore {
    inner: RwLock<Arc<Directory>>,
}

impl MemoryDirectoryStore {
    /// Create a store over a built directory
    pub fn new(directory: Directory) -> Self {
        Self {
            inner: RwLock::new(Arc::new(directory)),
        }
    }

    /// Create a store with no data
    pub fn empty() -> Self {
        Self::new(Directory::default())
    }

    /// Atomically replace the snapshot
    pub async fn replace(&self, directory: Directory) {
        let mut guard = self.inner.write().await;
        *guard = Arc::new(directory);
        debug!("directory snapshot replaced");
    }

    async fn snapshot(&self) -> Arc<Directory> {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl UnitStore for MemoryDirectoryStore {
    async fn unit(&self, id: UnitId) -> Result<Option<Unit>> {
        Ok(self.snapshot().await.unit(id).cloned())
    }

    async fn unit_by_code(&self, code: &str) -> Result<Option<Unit>> {
        Ok(self.snapshot().await.unit_by_code(code).cloned())
    }

    async fn parent_of(&self, id: UnitId) -> Result<Option<UnitId>> {
        Ok(self.snapshot().await.parent_of(id))
    }

    async fn generating_units(&self, team: Option<TeamId>) -> Result<Vec<Unit>> {
        Ok(self
            .snapshot()
            .await
            .generating_units(team)
            .into_iter()
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AssignmentStore for MemoryDirectoryStore {
    async fn assignment_exists(&self, unit: UnitId, servant: ServantId) -> Result<bool> {
        Ok(self.snapshot().await.assignment_exists(unit, servant))
    }

    async fn generating_assignments_for_servant(
        &self,
        servant: ServantId,
    ) -> Result<Vec<Assignment>> {
        Ok(self
            .snapshot()
            .await
            .generating_assignments_for_servant(servant)
            .into_iter()
            .cloned()
            .collect())
    }
}

#[async_trait]
impl IdentityStore for MemoryDirectoryStore {
    async fn account(&self, id: AccountId) -> Result<Option<Account>> {
        Ok(self.snapshot().await.account(id).cloned())
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self.snapshot().await.account_by_email(email).cloned())
    }

    async fn servant(&self, id: ServantId) -> Result<Option<Servant>> {
        Ok(self.snapshot().await.servant(id).cloned())
    }

    async fn team(&self, id: TeamId) -> Result<Option<Team>> {
        Ok(self.snapshot().await.team(id).cloned())
    }
}

#[async_trait]
impl DirectoryStore for MemoryDirectoryStore {
    async fn directory(&self) -> Result<Arc<Directory>> {
        Ok(self.snapshot().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sia_core::domain::AssignmentRole;
    use sia_core::identifiers::{AssignmentId, SubfondoId};
    use sia_core::Subfondo;

    fn sample() -> (Directory, Unit, Unit, Servant) {
        let sf = Subfondo::new(SubfondoId::new(), "Fondo");
        let parent = Unit::new(UnitId::new(), "B-2", "Beta", sf.id);
        let child = Unit::new(UnitId::new(), "A-1", "Alfa", sf.id).with_parent(parent.id);
        let servant = Servant::new(ServantId::new(), "Ana", "Pérez");
        let dir = Directory::builder()
            .subfondo(sf)
            .unit(parent.clone())
            .unit(child.clone())
            .servant(servant.clone())
            .assignment(Assignment::new(
                AssignmentId::new(),
                child.id,
                servant.id,
                AssignmentRole::Mail,
            ))
            .build()
            .unwrap();
        (dir, parent, child, servant)
    }

    #[tokio::test]
    async fn test_unit_lookups() {
        let (dir, parent, child, _) = sample();
        let store = MemoryDirectoryStore::new(dir);

        assert_eq!(store.unit(child.id).await.unwrap().map(|u| u.id), Some(child.id));
        assert_eq!(
            store.unit_by_code("a-1").await.unwrap().map(|u| u.id),
            Some(child.id)
        );
        assert_eq!(store.parent_of(child.id).await.unwrap(), Some(parent.id));
        assert_eq!(store.parent_of(parent.id).await.unwrap(), None);
        assert!(store.unit(UnitId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_generating_units_ordered() {
        let (dir, parent, child, _) = sample();
        let store = MemoryDirectoryStore::new(dir);

        let units = store.generating_units(None).await.unwrap();
        let ids: Vec<UnitId> = units.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![child.id, parent.id]);
    }

    #[tokio::test]
    async fn test_assignment_queries() {
        let (dir, parent, child, servant) = sample();
        let store = MemoryDirectoryStore::new(dir);

        assert!(store.assignment_exists(child.id, servant.id).await.unwrap());
        assert!(!store.assignment_exists(parent.id, servant.id).await.unwrap());

        let held = store
            .generating_assignments_for_servant(servant.id)
            .await
            .unwrap();
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].unit, child.id);
    }

    #[tokio::test]
    async fn test_identity_lookups() {
        use sia_core::domain::PasswordHash;

        let team = Team::new(TeamId::new(), 5);
        let servant = Servant::new(ServantId::new(), "Ana", "Pérez");
        let account = Account::new(AccountId::new(), "Ana@SIA.gob", PasswordHash::new("h"))
            .with_team(team.id)
            .with_servant(servant.id);
        let dir = Directory::builder()
            .team(team)
            .servant(servant.clone())
            .account(account.clone())
            .build()
            .unwrap();
        let store = MemoryDirectoryStore::new(dir);

        assert_eq!(
            store.account(account.id).await.unwrap().map(|a| a.id),
            Some(account.id)
        );
        assert_eq!(
            store
                .account_by_email("ana@sia.gob")
                .await
                .unwrap()
                .map(|a| a.id),
            Some(account.id)
        );
        assert_eq!(
            store.servant(servant.id).await.unwrap().map(|s| s.id),
            Some(servant.id)
        );
        assert_eq!(
            store.team(team.id).await.unwrap().map(|t| t.number),
            Some(5)
        );
        assert!(store.team(TeamId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_swaps_snapshot() {
        let (dir, _, child, _) = sample();
        let store = MemoryDirectoryStore::new(dir);
        assert!(store.unit(child.id).await.unwrap().is_some());

        store.replace(Directory::default()).await;
        assert!(store.unit(child.id).await.unwrap().is_none());
        assert!(store.directory().await.unwrap().is_empty());
    }
}
