// Integration tests for role/permission dual-write consistency

mod common;

use rbac_admin_backend::types::parse_string_set;

#[tokio::test]
async fn test_role_and_permission_sides_stay_mirrored_through_lifecycle() {
    let app = common::setup_app().await;
    let graph = &app.graph_service;

    graph
        .create_permission("actor", "user:update", "Edit users", &[])
        .await
        .unwrap();
    graph
        .create_permission("actor", "user:delete", "Delete users", &[])
        .await
        .unwrap();

    // Create: role side is authoritative, permission side follows
    let editor = graph
        .create_role(
            "actor",
            "Editor",
            &["user:update".to_string()],
            "Active",
            "admin",
        )
        .await
        .unwrap();

    let perms = graph.list_permissions().await.unwrap();
    let update_perm = perms.iter().find(|p| p.key == "user:update").unwrap();
    assert_eq!(parse_string_set(&update_perm.roles), vec!["Editor"]);

    // Update: diff adds user:delete and keeps user:update
    graph
        .update_role(
            "actor",
            &editor.id,
            "Editor",
            &["user:update".to_string(), "user:delete".to_string()],
            "Active",
        )
        .await
        .unwrap();

    let perms = graph.list_permissions().await.unwrap();
    for perm in &perms {
        assert_eq!(parse_string_set(&perm.roles), vec!["Editor"], "{}", perm.key);
    }
    assert!(graph.audit_consistency().await.unwrap().is_empty());

    // Delete: role name is stripped from both permissions
    graph.delete_role("actor", &editor.id).await.unwrap();

    let perms = graph.list_permissions().await.unwrap();
    for perm in &perms {
        assert!(parse_string_set(&perm.roles).is_empty(), "{}", perm.key);
    }
    assert!(graph.audit_consistency().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_permission_side_mutations_mirror_onto_roles() {
    let app = common::setup_app().await;
    let graph = &app.graph_service;

    let editor = graph
        .create_role("actor", "Editor", &[], "Active", "admin")
        .await
        .unwrap();
    graph
        .create_role("actor", "Viewer", &[], "Active", "admin")
        .await
        .unwrap();

    let perm = graph
        .create_permission(
            "actor",
            "report:view",
            "View reports",
            &["Editor".to_string()],
        )
        .await
        .unwrap();

    let editor_after = graph
        .list_roles()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.name == "Editor")
        .unwrap();
    assert_eq!(parse_string_set(&editor_after.permissions), vec!["report:view"]);

    // Move the permission from Editor to Viewer
    graph
        .update_permission(
            "actor",
            &perm.id,
            "report:view",
            "View reports",
            &["Viewer".to_string()],
        )
        .await
        .unwrap();

    let roles = graph.list_roles().await.unwrap();
    let editor_after = roles.iter().find(|r| r.name == "Editor").unwrap();
    let viewer_after = roles.iter().find(|r| r.name == "Viewer").unwrap();
    assert!(parse_string_set(&editor_after.permissions).is_empty());
    assert_eq!(
        parse_string_set(&viewer_after.permissions),
        vec!["report:view"]
    );

    // Delete strips the key from every holder
    graph.delete_permission("actor", &perm.id).await.unwrap();
    let roles = graph.list_roles().await.unwrap();
    assert!(roles
        .iter()
        .all(|r| parse_string_set(&r.permissions).is_empty()));

    assert_eq!(graph.delete_role("actor", &editor.id).await.unwrap().name, "Editor");
}

#[tokio::test]
async fn test_unresolved_keys_survive_and_are_never_backfilled() {
    let app = common::setup_app().await;
    let graph = &app.graph_service;

    // Role references a key that has no Permission record yet
    graph
        .create_role(
            "actor",
            "Auditor",
            &["audit:read".to_string()],
            "Active",
            "admin",
        )
        .await
        .unwrap();

    // Creating the permission later does not backfill the existing holder
    let perm = graph
        .create_permission("actor", "audit:read", "Read audit feed", &[])
        .await
        .unwrap();
    assert!(parse_string_set(&perm.roles).is_empty());

    // The role still holds the key on its side
    let auditor = graph
        .list_roles()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.name == "Auditor")
        .unwrap();
    assert_eq!(parse_string_set(&auditor.permissions), vec!["audit:read"]);

    // The repair pass is what restores the mirror
    let repaired = graph.reconcile_permission_index().await.unwrap();
    assert_eq!(repaired, 1);

    let perm = graph
        .list_permissions()
        .await
        .unwrap()
        .into_iter()
        .find(|p| p.key == "audit:read")
        .unwrap();
    assert_eq!(parse_string_set(&perm.roles), vec!["Auditor"]);
    assert!(graph.audit_consistency().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_graph_mutations_feed_the_activity_log() {
    let app = common::setup_app().await;
    let graph = &app.graph_service;

    graph
        .create_role("actor", "Editor", &[], "Active", "admin")
        .await
        .unwrap();
    graph
        .create_permission("actor", "report:view", "View reports", &[])
        .await
        .unwrap();

    let recent = app.activity_store.recent(10).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].action, "Created Permission");
    assert_eq!(recent[0].target, "Permission: report:view");
    assert_eq!(recent[1].action, "Created Role");
    assert_eq!(recent[1].target, "Role: Editor");
}
