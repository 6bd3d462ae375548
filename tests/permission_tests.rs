//! End-to-end tests for permission resolution and enforcement.
//!
//! Users acquire permissions from three places: the static legacy tier
//! mapping, an assigned relational role, and the view-only default set
//! for users with neither. These tests drive the real router with real
//! API keys to check that the union of those sources is what the guard
//! middleware actually enforces.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::collections::HashSet;
use std::sync::Arc;
use tower::ServiceExt;

use cadre::api::AppState;
use cadre::config::Config;

/// Default API key seeded by migration (must match m20250301_000002_seed_access_control.rs)
const ADMIN_API_KEY: &str = "cadre_default_api_key_please_regenerate";

async fn spawn_app() -> (Arc<AppState>, Router) {
    let db_path = std::env::temp_dir().join(format!(
        "cadre-permission-test-{}.db",
        uuid::Uuid::new_v4()
    ));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = cadre::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    let app = cadre::api::router(state.clone()).await;

    (state, app)
}

async fn read_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Creates a user through the admin API and returns their id.
async fn create_user(
    app: &Router,
    username: &str,
    legacy_role: Option<&str>,
    role_id: Option<i64>,
) -> i64 {
    let payload = serde_json::json!({
        "username": username,
        "email": format!("{username}@cadre.test"),
        "password": "changeme-123",
        "first_name": "Test",
        "last_name": "User",
        "legacy_role": legacy_role,
        "role_id": role_id,
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/employees")
                .header("X-Api-Key", ADMIN_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "user creation failed");

    let body_json = read_body_json(response).await;
    body_json["data"]["id"].as_i64().unwrap()
}

async fn api_key_for(state: &Arc<AppState>, username: &str) -> String {
    state
        .store()
        .get_user_api_key(username)
        .await
        .expect("api key lookup failed")
        .expect("user should have an api key")
}

/// Creates a role through the admin API and returns its id.
async fn create_role(app: &Router, name: &str, permissions: &[&str]) -> i64 {
    let payload = serde_json::json!({
        "name": name,
        "permissions": permissions,
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/roles")
                .header("X-Api-Key", ADMIN_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "role creation failed");

    let body_json = read_body_json(response).await;
    body_json["data"]["id"].as_i64().unwrap()
}

/// What the server says the caller may do, as a set.
async fn fetch_permissions(app: &Router, api_key: &str) -> HashSet<String> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/permissions")
                .header("X-Api-Key", api_key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_json = read_body_json(response).await;
    body_json["data"]["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

fn name_set(names: &[&str]) -> HashSet<String> {
    names.iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn test_legacy_employee_tier_resolves_to_fixed_set() {
    let (state, app) = spawn_app().await;

    create_user(&app, "plain.employee", Some("EMPLOYEE"), None).await;
    let key = api_key_for(&state, "plain.employee").await;

    let permissions = fetch_permissions(&app, &key).await;
    let expected = name_set(&[
        "leaves.view",
        "leaves.create",
        "attendance.view",
        "attendance.record",
        "expenses.view",
        "expenses.create",
        "announcements.view",
        "projects.view",
        "tasks.view",
        "reviews.view",
    ]);

    assert_eq!(permissions, expected);
}

#[tokio::test]
async fn test_user_without_any_role_gets_view_only_defaults() {
    let (state, app) = spawn_app().await;

    create_user(&app, "drifter", None, None).await;
    let key = api_key_for(&state, "drifter").await;

    let permissions = fetch_permissions(&app, &key).await;
    let expected = name_set(&[
        "announcements.view",
        "leaves.view",
        "attendance.view",
        "expenses.view",
        "tasks.view",
        "reviews.view",
    ]);

    assert_eq!(permissions, expected);
}

#[tokio::test]
async fn test_role_crud_and_lazy_permission_creation() {
    let (_state, app) = spawn_app().await;

    // "payroll.export" is not a seeded permission name; the role editor
    // accepts it and the catalog row is created on the fly.
    let role_id = create_role(&app, "Auditor", &["audit.view", "payroll.export"]).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/roles/{role_id}"))
                .header("X-Api-Key", ADMIN_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["name"], "Auditor");
    assert_eq!(body_json["data"]["is_system"], false);
    assert_eq!(body_json["data"]["member_count"], 0);
    let granted: HashSet<String> = body_json["data"]["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(granted, name_set(&["audit.view", "payroll.export"]));

    // The lazily created name is now part of the catalog, under a
    // category derived from its prefix.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/roles/catalog")
                .header("X-Api-Key", ADMIN_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_json = read_body_json(response).await;
    let groups = body_json["data"].as_array().unwrap();
    let payroll_group = groups
        .iter()
        .find(|g| g["category"] == "payroll")
        .expect("lazily created permission should appear in the catalog");
    assert!(
        payroll_group["permissions"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p["name"] == "payroll.export")
    );
}

#[tokio::test]
async fn test_role_update_replaces_the_permission_set() {
    let (_state, app) = spawn_app().await;

    let role_id = create_role(&app, "Shifting", &["leaves.view", "leaves.approve"]).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/roles/{role_id}"))
                .header("X-Api-Key", ADMIN_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "name": "Shifting",
                        "permissions": ["leaves.approve", "tasks.edit"],
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body_json = read_body_json(response).await;
    let granted: HashSet<String> = body_json["data"]["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();

    // Replacement, not accumulation: leaves.view is gone.
    assert_eq!(granted, name_set(&["leaves.approve", "tasks.edit"]));
}

#[tokio::test]
async fn test_role_grants_union_with_the_legacy_tier() {
    let (state, app) = spawn_app().await;

    let role_id = create_role(&app, "Approver", &["leaves.approve"]).await;
    create_user(&app, "hybrid", Some("EMPLOYEE"), Some(role_id)).await;
    let key = api_key_for(&state, "hybrid").await;

    let permissions = fetch_permissions(&app, &key).await;

    // Everything from the employee tier plus the role grant.
    assert!(permissions.contains("leaves.view"));
    assert!(permissions.contains("attendance.record"));
    assert!(permissions.contains("leaves.approve"));
    assert!(!permissions.contains("users.view"));
}

#[tokio::test]
async fn test_guard_rejects_missing_permissions_by_name() {
    let (state, app) = spawn_app().await;

    create_user(&app, "lowly", Some("EMPLOYEE"), None).await;
    let key = api_key_for(&state, "lowly").await;

    // No key at all.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/employees")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Authenticated but lacking users.view.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/employees")
                .header("X-Api-Key", &key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body_json = read_body_json(response).await;
    assert_eq!(body_json["success"], false);
    assert_eq!(
        body_json["error"],
        "Missing required permission(s): users.view"
    );
}

#[tokio::test]
async fn test_system_admin_is_not_an_implicit_wildcard() {
    let (state, app) = spawn_app().await;

    let role_id = create_role(&app, "Root", &["system.admin"]).await;
    create_user(&app, "rootish", None, Some(role_id)).await;
    let root_key = api_key_for(&state, "rootish").await;

    create_user(&app, "worker.bee", Some("EMPLOYEE"), None).await;
    let worker_key = api_key_for(&state, "worker.bee").await;

    // system.admin does not stand in for users.view at the guard.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/employees")
                .header("X-Api-Key", &root_key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // But the explicitly admin-gated audit purge accepts it.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/system/audit")
                .header("X-Api-Key", &root_key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // And refuses everyone else.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/system/audit")
                .header("X-Api-Key", &worker_key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_role_assignment_takes_effect_immediately() {
    let (state, app) = spawn_app().await;

    let role_id = create_role(&app, "Scheduler", &["attendance.view_team"]).await;
    let user_id = create_user(&app, "floater", Some("EMPLOYEE"), None).await;
    let key = api_key_for(&state, "floater").await;

    let before = fetch_permissions(&app, &key).await;
    assert!(!before.contains("attendance.view_team"));

    // Assign the role.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/employees/{user_id}/role"))
                .header("X-Api-Key", ADMIN_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"role_id": role_id}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let during = fetch_permissions(&app, &key).await;
    assert!(during.contains("attendance.view_team"));

    // Detach it again.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/employees/{user_id}/role"))
                .header("X-Api-Key", ADMIN_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::json!({"role_id": null}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let after = fetch_permissions(&app, &key).await;
    assert!(!after.contains("attendance.view_team"));

    // Assigning a role that does not exist is a 404, not a silent no-op.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/employees/{user_id}/role"))
                .header("X-Api-Key", ADMIN_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::json!({"role_id": 9999}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_role_deletion_rules() {
    let (state, app) = spawn_app().await;

    let role_id = create_role(&app, "Ephemeral", &["users.view"]).await;
    let user_id = create_user(&app, "temp.holder", None, Some(role_id)).await;
    let key = api_key_for(&state, "temp.holder").await;

    let before = fetch_permissions(&app, &key).await;
    assert!(before.contains("users.view"));

    // Occupied roles cannot be deleted out from under their members.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/roles/{role_id}"))
                .header("X-Api-Key", ADMIN_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Detach the member first, then deletion goes through.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/employees/{user_id}/role"))
                .header("X-Api-Key", ADMIN_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::json!({"role_id": null}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/roles/{role_id}"))
                .header("X-Api-Key", ADMIN_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The detached ex-member is back on the default set.
    let after = fetch_permissions(&app, &key).await;
    assert!(!after.contains("users.view"));
    assert!(after.contains("announcements.view"));

    // The seeded Administrator role is a system role and stays.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/roles/1")
                .header("X-Api-Key", ADMIN_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
