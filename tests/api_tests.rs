use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use cadre::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Default API key seeded by migration (must match m20250301_000002_seed_access_control.rs)
const DEFAULT_API_KEY: &str = "cadre_default_api_key_please_regenerate";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A single connection so every query sees the same in-memory database.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;

    let state = cadre::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    cadre::api::router(state).await
}

async fn read_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_auth_endpoints() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .header("X-Api-Key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_with_seeded_admin() {
    let app = spawn_app().await;

    // Wrong password is a 401, not a 404, so usernames cannot be probed.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"username": "admin", "password": "wrong"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"username": "admin", "password": "password"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body_json = read_body_json(response).await;
    assert_eq!(body_json["success"], true);
    assert_eq!(body_json["data"]["username"], "admin");
    assert_eq!(body_json["data"]["api_key"], DEFAULT_API_KEY);
    // The seeded account still carries its placeholder password.
    assert_eq!(body_json["data"]["must_change_password"], true);
}

#[tokio::test]
async fn test_system_status() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body_json = read_body_json(response).await;
    assert_eq!(body_json["success"], true);
    assert_eq!(body_json["data"]["database"], "connected");
    assert!(body_json["data"]["version"].is_string());
}

#[tokio::test]
async fn test_system_config() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/config")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body_json: serde_json::Value = read_body_json(response).await;

    assert!(body_json["data"]["company"]["default_currency"].is_string());

    let mut current_config = body_json["data"].clone();
    current_config["scheduler"]["reminder_interval_hours"] = serde_json::json!(999);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/system/config")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&current_config).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/config")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body_json = read_body_json(response).await;

    assert_eq!(
        body_json["data"]["scheduler"]["reminder_interval_hours"],
        999
    );
}

#[tokio::test]
async fn test_system_config_rejects_invalid_values() {
    let app = spawn_app().await;

    let mut config = Config::default();
    config.scheduler.reminder_interval_hours = 0;
    config.scheduler.cron_expression = None;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/system/config")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&config).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_employees_crud() {
    let app = spawn_app().await;

    let new_employee = serde_json::json!({
        "username": "jdoe",
        "email": "jdoe@cadre.test",
        "password": "changeme-123",
        "first_name": "Jane",
        "last_name": "Doe",
        "department": "Engineering",
        "job_title": "Backend Developer",
        "hire_date": "2025-02-01",
        "legacy_role": "EMPLOYEE"
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/employees")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&new_employee).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body_json = read_body_json(response).await;
    let id = body_json["data"]["id"].as_i64().unwrap();
    assert_eq!(body_json["data"]["username"], "jdoe");
    assert_eq!(body_json["data"]["department"], "Engineering");
    assert_eq!(body_json["data"]["active"], true);

    // Usernames are unique.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/employees")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&new_employee).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The roster now holds the seeded admin plus the new hire.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/employees")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body_json = read_body_json(response).await;
    assert!(body_json["data"].as_array().unwrap().len() >= 2);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/employees/{id}"))
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["email"], "jdoe@cadre.test");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/employees/{id}"))
                .header("X-Api-Key", DEFAULT_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "email": "jdoe@cadre.test",
                        "first_name": "Jane",
                        "last_name": "Doe",
                        "department": "Platform",
                        "job_title": "Senior Backend Developer"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["department"], "Platform");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/employees/{id}/deactivate"))
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["active"], false);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/employees/{id}/activate"))
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["active"], true);
}

#[tokio::test]
async fn test_employee_creation_validates_input() {
    let app = spawn_app().await;

    // Password below the configured minimum length.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/employees")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": "shorty",
                        "email": "shorty@cadre.test",
                        "password": "tiny",
                        "first_name": "Short",
                        "last_name": "Password"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Email without an @.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/employees")
                .header("X-Api-Key", DEFAULT_API_KEY)
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": "noat",
                        "email": "not-an-email",
                        "password": "changeme-123",
                        "first_name": "No",
                        "last_name": "At"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_endpoints_need_no_auth() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/health/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["status"], "alive");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/health/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["ready"], true);
    assert_eq!(body_json["data"]["database"], true);
}

#[tokio::test]
async fn test_metrics_endpoint_outside_api_tree() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
