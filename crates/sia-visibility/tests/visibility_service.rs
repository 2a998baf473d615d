//! End-to-end tests for the visibility service over the in-memory store

use assert_matches::assert_matches;
use sia_core::config::DirectoryConfig;
use sia_core::directory::Directory;
use sia_core::domain::{
    Account, Assignment, AssignmentRole, PasswordHash, Role, Servant, Subfondo, Team, Unit,
};
use sia_core::errors::SiaError;
use sia_core::identifiers::{AccountId, AssignmentId, ServantId, SubfondoId, TeamId, UnitId};
use sia_store::{MemoryDirectoryStore, SlowStore};
use sia_visibility::VisibilityService;
use std::sync::Arc;
use std::time::Duration;

fn account(email: &str) -> Account {
    Account::new(AccountId::new(), email, PasswordHash::new("hash"))
}

/// The layered scenario: A (root, generating, team 1), B (child of A,
/// non-generating, team 1), C (child of B, generating, team 1).
struct Layered {
    service: VisibilityService<Arc<MemoryDirectoryStore>>,
    advisor: Account,
    a: UnitId,
    b: UnitId,
    c: UnitId,
}

fn layered() -> Layered {
    let sf = Subfondo::new(SubfondoId::new(), "Fondo");
    let team = Team::new(TeamId::new(), 1);
    let a = Unit::new(UnitId::new(), "A-1", "Alfa", sf.id).with_team(team.id);
    let b = Unit::grouping(UnitId::new(), "B-1", "Beta", sf.id)
        .with_team(team.id)
        .with_parent(a.id);
    let c = Unit::new(UnitId::new(), "C-1", "Gamma", sf.id)
        .with_team(team.id)
        .with_parent(b.id);

    let directory = Directory::builder()
        .subfondo(sf)
        .team(team)
        .unit(a.clone())
        .unit(b.clone())
        .unit(c.clone())
        .build()
        .unwrap();

    let advisor = account("advisor@sia.gob")
        .with_role(Role::Advisor)
        .with_team(team.id);

    Layered {
        service: VisibilityService::new(
            Arc::new(MemoryDirectoryStore::new(directory)),
            DirectoryConfig::default(),
        ),
        advisor,
        a: a.id,
        b: b.id,
        c: c.id,
    }
}

#[tokio::test]
async fn test_advisor_forest_skips_non_generating_middle() {
    let fx = layered();

    let forest = fx.service.visible_forest(&fx.advisor, None).await.unwrap();

    // visible set is {A, C}; B is structural only
    assert_eq!(forest.len(), 2);
    assert!(forest.contains(fx.a));
    assert!(forest.contains(fx.c));
    assert!(!forest.contains(fx.b));

    // C hangs off A directly, neither orphaned nor dropped
    assert_eq!(forest.roots(), &[fx.a]);
    assert_eq!(forest.children_of(fx.a), &[fx.c]);
    assert!(forest.children_of(fx.b).is_empty());
}

#[tokio::test]
async fn test_visible_forest_is_idempotent() {
    let fx = layered();
    let one = fx.service.visible_forest(&fx.advisor, None).await.unwrap();
    let two = fx.service.visible_forest(&fx.advisor, None).await.unwrap();
    assert_eq!(one, two);
}

#[tokio::test]
async fn test_children_of_scopes_one_branch() {
    let fx = layered();

    let children = fx.service.children_of(&fx.advisor, fx.a).await.unwrap();
    assert_eq!(children.iter().map(|u| u.id).collect::<Vec<_>>(), vec![fx.c]);
    // existing unit, no visible children
    assert!(fx
        .service
        .children_of(&fx.advisor, fx.c)
        .await
        .unwrap()
        .is_empty());
    // unknown unit is NotFound, not an empty success
    assert_matches!(
        fx.service.children_of(&fx.advisor, UnitId::new()).await,
        Err(SiaError::NotFound { .. })
    );
}

#[tokio::test]
async fn test_portal_visibility_follows_generating_flag() {
    let sf = Subfondo::new(SubfondoId::new(), "Fondo");
    let unit = Unit::new(UnitId::new(), "U-1", "Única", sf.id);
    let servant = Servant::new(ServantId::new(), "Ana", "Pérez");
    let assignment = Assignment::new(
        AssignmentId::new(),
        unit.id,
        servant.id,
        AssignmentRole::Transact,
    );

    let directory = Directory::builder()
        .subfondo(sf.clone())
        .unit(unit.clone())
        .servant(servant.clone())
        .assignment(assignment.clone())
        .build()
        .unwrap();

    let store = Arc::new(MemoryDirectoryStore::new(directory));
    let service = VisibilityService::new(store.clone(), DirectoryConfig::default());
    let portal = account("ana@sia.gob")
        .with_role(Role::Portal)
        .with_servant(servant.id);

    let forest = service.visible_forest(&portal, None).await.unwrap();
    assert_eq!(forest.roots(), &[unit.id]);
    assert_eq!(
        service.single_visible_unit(&portal).await.unwrap(),
        Some(unit.id)
    );

    // flip the unit to non-generating: it disappears entirely
    let mut flipped = unit.clone();
    flipped.generating = false;
    let directory = Directory::builder()
        .subfondo(sf)
        .unit(flipped)
        .servant(servant)
        .assignment(assignment)
        .build()
        .unwrap();
    store.replace(directory).await;

    let forest = service.visible_forest(&portal, None).await.unwrap();
    assert!(forest.is_empty());
    assert_eq!(service.single_visible_unit(&portal).await.unwrap(), None);
}

#[tokio::test]
async fn test_single_visible_unit_is_none_for_staff() {
    let fx = layered();
    assert_eq!(
        fx.service.single_visible_unit(&fx.advisor).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_search_restricts_but_never_widens() {
    let fx = layered();

    let forest = fx
        .service
        .visible_forest(&fx.advisor, Some("gamma"))
        .await
        .unwrap();
    // only C matches; it becomes a root of the filtered forest
    assert_eq!(forest.roots(), &[fx.c]);
    assert!(!forest.contains(fx.a));

    let forest = fx
        .service
        .visible_forest(&fx.advisor, Some("no-such-thing"))
        .await
        .unwrap();
    assert!(forest.is_empty());
}

#[tokio::test]
async fn test_root_pagination() {
    let sf = Subfondo::new(SubfondoId::new(), "Fondo");
    let mut builder = Directory::builder().subfondo(sf.clone());
    for i in 0..12 {
        builder = builder.unit(Unit::new(
            UnitId::new(),
            format!("U-{i:02}"),
            format!("Unidad {i:02}"),
            sf.id,
        ));
    }
    let service = VisibilityService::new(
        Arc::new(MemoryDirectoryStore::new(builder.build().unwrap())),
        DirectoryConfig::default(),
    );
    let admin = account("admin@sia.gob").with_role(Role::Admin);

    let page1 = service.visible_roots_page(&admin, None, 1).await.unwrap();
    let page2 = service.visible_roots_page(&admin, None, 2).await.unwrap();
    assert_eq!(page1.len(), 10);
    assert_eq!(page2.len(), 2);
    assert!(page1.iter().all(|u| u.id != page2[0].id));

    assert_matches!(
        service.visible_roots_page(&admin, None, 3).await,
        Err(SiaError::NotFound { .. })
    );
    assert_matches!(
        service.visible_roots_page(&admin, None, 0).await,
        Err(SiaError::Invalid { .. })
    );

    // an empty first page is fine
    let nobody = account("portal@sia.gob").with_role(Role::Portal);
    assert!(service
        .visible_roots_page(&nobody, None, 1)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_generating_assignments_for_portal_account() {
    let sf = Subfondo::new(SubfondoId::new(), "Fondo");
    let z = Unit::new(UnitId::new(), "Z-1", "Zeta", sf.id);
    let a = Unit::new(UnitId::new(), "A-1", "Alfa", sf.id);
    let servant = Servant::new(ServantId::new(), "Ana", "Pérez");
    let directory = Directory::builder()
        .subfondo(sf)
        .unit(z.clone())
        .unit(a.clone())
        .servant(servant.clone())
        .assignment(Assignment::new(
            AssignmentId::new(),
            z.id,
            servant.id,
            AssignmentRole::Mail,
        ))
        .assignment(Assignment::new(
            AssignmentId::new(),
            a.id,
            servant.id,
            AssignmentRole::Liaison,
        ))
        .build()
        .unwrap();

    let service = VisibilityService::new(
        Arc::new(MemoryDirectoryStore::new(directory)),
        DirectoryConfig::default(),
    );

    let portal = account("ana@sia.gob").with_servant(servant.id);
    let held = service.generating_assignments(&portal).await.unwrap();
    let units: Vec<UnitId> = held.iter().map(|x| x.unit).collect();
    assert_eq!(units, vec![a.id, z.id]);

    // staff accounts and accounts without a servant get nothing
    let admin = account("admin@sia.gob").with_role(Role::Admin);
    assert!(service.generating_assignments(&admin).await.unwrap().is_empty());
    let bare = account("bare@sia.gob");
    assert!(service.generating_assignments(&bare).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_slow_store_fails_closed_as_unavailable() {
    let store = SlowStore::new(MemoryDirectoryStore::empty(), Duration::from_millis(200));
    let config = DirectoryConfig {
        store_timeout_ms: 20,
        ..Default::default()
    };
    let service = VisibilityService::new(store, config);
    let admin = account("admin@sia.gob").with_role(Role::Admin);

    let result = service.visible_forest(&admin, None).await;
    assert_matches!(result, Err(SiaError::Unavailable { .. }));
}
