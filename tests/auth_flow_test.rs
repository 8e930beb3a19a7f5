// Integration tests for the login/session/capability flow

mod common;

use rbac_admin_backend::client::{
    FallbackPolicy, GatedElement, SessionContext, UiReconciler,
};
use rbac_admin_backend::errors::ServiceError;
use rbac_admin_backend::types::dto::user::UpdateUserRequest;

#[tokio::test]
async fn test_seeded_admin_can_login_and_resolve_capabilities() {
    let app = common::setup_app().await;
    let settings = common::test_settings();
    app.seed_admin(&settings).await.unwrap();

    app.graph_service
        .create_role(
            "system",
            "Admin",
            &["user:update".to_string(), "user:delete".to_string()],
            "Active",
            "system",
        )
        .await
        .unwrap();

    let (user, token) = app.auth_service.login("admin", "admin123").await.unwrap();
    assert_eq!(user.role, "Admin");

    let claims = app.session_service.verify(&token).unwrap();
    let current = app.auth_service.current_user(&claims).await.unwrap();
    assert_eq!(current.username, "admin");
    assert_eq!(current.permissions, vec!["user:update", "user:delete"]);
}

#[tokio::test]
async fn test_tampered_token_is_rejected() {
    let app = common::setup_app().await;
    let settings = common::test_settings();
    app.seed_admin(&settings).await.unwrap();

    let (_, token) = app.auth_service.login("admin", "admin123").await.unwrap();
    let mut tampered = token.clone();
    tampered.push('x');

    assert!(matches!(
        app.session_service.verify(&tampered),
        Err(ServiceError::Forbidden)
    ));
}

#[tokio::test]
async fn test_role_grant_flows_to_client_after_refresh() {
    let app = common::setup_app().await;
    let settings = common::test_settings();
    app.seed_admin(&settings).await.unwrap();

    let admin_role = app
        .graph_service
        .create_role(
            "system",
            "Admin",
            &["user:update".to_string()],
            "Active",
            "system",
        )
        .await
        .unwrap();

    let (_, token) = app.auth_service.login("admin", "admin123").await.unwrap();
    let claims = app.session_service.verify(&token).unwrap();

    // Client boots: populate cache, register a gated delete button
    let mut ctx = SessionContext::new();
    ctx.populate(app.auth_service.current_user(&claims).await.unwrap());
    let mut ui = UiReconciler::new();
    ui.register(GatedElement::new(
        "delete-user-btn",
        "user:delete",
        FallbackPolicy::Hide,
    ));
    ui.reconcile(&ctx);
    assert!(!ui.element("delete-user-btn").unwrap().visible);

    // An operator grants user:delete to the Admin role; the mutation
    // response carries needsRefresh
    app.graph_service
        .update_role(
            &claims.sub,
            &admin_role.id,
            "Admin",
            &["user:update".to_string(), "user:delete".to_string()],
            "Active",
        )
        .await
        .unwrap();
    ctx.observe_response(true);
    assert!(ctx.is_stale());

    // Client re-fetches its snapshot and reconciles
    ctx.apply_refresh(app.auth_service.current_user(&claims).await.unwrap());
    ui.reconcile(&ctx);
    assert!(ui.element("delete-user-btn").unwrap().visible);
    assert!(ui.element("delete-user-btn").unwrap().enabled);
}

#[tokio::test]
async fn test_user_lifecycle_through_services() {
    let app = common::setup_app().await;
    let settings = common::test_settings();
    app.seed_admin(&settings).await.unwrap();

    let (admin, _) = app.auth_service.login("admin", "admin123").await.unwrap();

    let created = app
        .identity_service
        .create_user(
            &admin.user_id,
            rbac_admin_backend::types::dto::user::CreateUserRequest {
                username: "alice".to_string(),
                password: "alicepass".to_string(),
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                phone: "".to_string(),
                role: "Viewer".to_string(),
                status: "Active".to_string(),
            },
        )
        .await
        .unwrap();
    // Admin took user001
    assert_eq!(created.user_id, "user002");

    // The new user can log in
    app.auth_service.login("alice", "alicepass").await.unwrap();

    app.identity_service
        .update_user(
            &admin.user_id,
            &created.id,
            UpdateUserRequest {
                status: Some("Inactive".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    app.identity_service
        .delete_user(&admin.user_id, &created.id)
        .await
        .unwrap();

    // Credential is gone with the identity
    assert!(matches!(
        app.auth_service.login("alice", "alicepass").await,
        Err(ServiceError::InvalidUsername)
    ));

    // The feed attributes every step to the admin, newest first
    let recent = app.activity_store.recent(10).await.unwrap();
    let actions: Vec<&str> = recent.iter().map(|a| a.action.as_str()).collect();
    assert_eq!(
        actions,
        vec![
            "Deleted User",
            "Updated User",
            "Logged In",
            "Created User",
            "Logged In",
            "Created User"
        ]
    );
}
