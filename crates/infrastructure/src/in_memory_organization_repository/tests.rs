use tasklane_application::{OrganizationHierarchy, OrganizationRepository};
use tasklane_core::{AppError, OrganizationId};
use tasklane_domain::Organization;

use super::InMemoryOrganizationRepository;

fn org(value: &str) -> OrganizationId {
    OrganizationId::new(value).unwrap_or_else(|_| unreachable!())
}

fn organization(id: &str, parent: Option<&str>) -> Organization {
    Organization::new(org(id), format!("Org {id}"), parent.map(org))
        .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn save_and_resolve_organizations() {
    let repository = InMemoryOrganizationRepository::new();

    assert!(
        repository
            .save_organization(organization("A", None))
            .await
            .is_ok()
    );
    assert!(
        repository
            .save_organization(organization("B", Some("A")))
            .await
            .is_ok()
    );

    let link = repository.resolve(&org("B")).await;
    assert!(link.is_ok());
    let link = link.unwrap_or_default();
    assert_eq!(
        link.as_ref().and_then(|link| link.parent_id()),
        Some(&org("A"))
    );

    let root = repository.resolve(&org("A")).await.unwrap_or_default();
    assert!(root.is_some_and(|link| link.is_root()));
}

#[tokio::test]
async fn unknown_ids_resolve_to_none() {
    let repository = InMemoryOrganizationRepository::new();

    let resolved = repository.resolve(&org("missing")).await;
    assert!(matches!(resolved, Ok(None)));

    let found = repository.find_organization(&org("missing")).await;
    assert!(matches!(found, Ok(None)));
}

#[tokio::test]
async fn duplicate_ids_conflict() {
    let repository = InMemoryOrganizationRepository::new();
    assert!(
        repository
            .save_organization(organization("A", None))
            .await
            .is_ok()
    );

    let duplicate = repository.save_organization(organization("A", None)).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn parent_must_exist_before_child() {
    let repository = InMemoryOrganizationRepository::new();

    let orphan = repository
        .save_organization(organization("B", Some("A")))
        .await;
    assert!(matches!(orphan, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn children_are_listed_in_id_order() {
    let repository = InMemoryOrganizationRepository::from_organizations(vec![
        organization("root", None),
        organization("zeta", Some("root")),
        organization("alpha", Some("root")),
        organization("alpha-1", Some("alpha")),
    ]);
    assert!(repository.is_ok());
    let repository = repository.unwrap_or_default();

    let children = repository.list_children(&org("root")).await.unwrap_or_default();
    let ids: Vec<&str> = children.iter().map(|link| link.id().as_str()).collect();
    assert_eq!(ids, vec!["alpha", "zeta"]);

    let records = repository
        .list_child_organizations(&org("alpha"))
        .await
        .unwrap_or_default();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name().as_str(), "Org alpha-1");

    let leaves = repository.list_children(&org("alpha-1")).await;
    assert!(leaves.is_ok_and(|children| children.is_empty()));
}

#[test]
fn batch_loading_rejects_duplicates_and_dangling_parents() {
    let duplicated = InMemoryOrganizationRepository::from_organizations(vec![
        organization("A", None),
        organization("A", None),
    ]);
    assert!(matches!(duplicated, Err(AppError::Conflict(_))));

    let dangling =
        InMemoryOrganizationRepository::from_organizations(vec![organization("B", Some("A"))]);
    assert!(matches!(dangling, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn seed_json_accepts_children_before_parents() {
    let repository = InMemoryOrganizationRepository::from_seed_json(
        r#"[
            {"id": "B", "name": "Org B", "parentId": "A"},
            {"id": "A", "name": "Org A"},
            {"id": "C", "name": "Org C", "parentId": ""}
        ]"#,
    );
    assert!(repository.is_ok());
    let repository = repository.unwrap_or_default();

    let b = repository.find_organization(&org("B")).await.unwrap_or_default();
    assert_eq!(b.and_then(|b| b.parent_id().cloned()), Some(org("A")));

    let c = repository.resolve(&org("C")).await.unwrap_or_default();
    assert!(c.is_some_and(|link| link.is_root()));
}

#[test]
fn malformed_seed_json_is_rejected() {
    assert!(matches!(
        InMemoryOrganizationRepository::from_seed_json("{not json"),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        InMemoryOrganizationRepository::from_seed_json(r#"[{"id": "A", "name": "  "}]"#),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        InMemoryOrganizationRepository::from_seed_json(r#"[{"id": "", "name": "Blank"}]"#),
        Err(AppError::Validation(_))
    ));
}
