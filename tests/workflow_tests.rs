//! End-to-end workflow tests: leave requests, attendance, expenses,
//! performance reviews, dashboards and notification fan-out.
//!
//! Each test provisions its own file-backed database, seeds a worker and
//! a manager through the admin API, and then drives the state machines
//! the way real clients would.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use cadre::api::AppState;
use cadre::config::Config;

/// Default API key seeded by migration (must match m20250301_000002_seed_access_control.rs)
const ADMIN_API_KEY: &str = "cadre_default_api_key_please_regenerate";

async fn spawn_app() -> (Arc<AppState>, Router) {
    let db_path = std::env::temp_dir().join(format!(
        "cadre-workflow-test-{}.db",
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

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    api_key: &str,
    body: &serde_json::Value,
) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("X-Api-Key", api_key)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn send_empty(
    app: &Router,
    method: &str,
    uri: &str,
    api_key: &str,
) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("X-Api-Key", api_key)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Seeds a user through the admin API and hands back (id, api_key).
async fn seed_user(
    state: &Arc<AppState>,
    app: &Router,
    username: &str,
    legacy_role: &str,
) -> (i64, String) {
    let payload = serde_json::json!({
        "username": username,
        "email": format!("{username}@cadre.test"),
        "password": "changeme-123",
        "first_name": "Test",
        "last_name": "User",
        "legacy_role": legacy_role,
    });

    let response = send_json(app, "POST", "/api/employees", ADMIN_API_KEY, &payload).await;
    assert_eq!(response.status(), StatusCode::OK, "user creation failed");
    let body_json = read_body_json(response).await;
    let id = body_json["data"]["id"].as_i64().unwrap();

    let api_key = state
        .store()
        .get_user_api_key(username)
        .await
        .expect("api key lookup failed")
        .expect("user should have an api key");

    (id, api_key)
}

fn utc_today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn test_leave_request_lifecycle() {
    let (state, app) = spawn_app().await;
    let (_worker_id, worker_key) = seed_user(&state, &app, "worker", "EMPLOYEE").await;
    let (manager_id, manager_key) = seed_user(&state, &app, "manager", "MANAGER").await;

    // 2027-03-01 is a Monday; three business days.
    let response = send_json(
        &app,
        "POST",
        "/api/leaves",
        &worker_key,
        &serde_json::json!({
            "kind": "vacation",
            "start_date": "2027-03-01",
            "end_date": "2027-03-03",
            "reason": "spring trip"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    let leave_id = body_json["data"]["id"].as_i64().unwrap();
    assert_eq!(body_json["data"]["status"], "pending");
    assert_eq!(body_json["data"]["business_days"], 3);

    // Overlapping span is rejected.
    let response = send_json(
        &app,
        "POST",
        "/api/leaves",
        &worker_key,
        &serde_json::json!({
            "kind": "vacation",
            "start_date": "2027-03-03",
            "end_date": "2027-03-05"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // A weekend-only span covers no business days.
    let response = send_json(
        &app,
        "POST",
        "/api/leaves",
        &worker_key,
        &serde_json::json!({
            "kind": "vacation",
            "start_date": "2027-03-06",
            "end_date": "2027-03-07"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown leave kind.
    let response = send_json(
        &app,
        "POST",
        "/api/leaves",
        &worker_key,
        &serde_json::json!({
            "kind": "sabbatical-ish",
            "start_date": "2027-06-01",
            "end_date": "2027-06-02"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The worker cannot approve anything, own or not.
    let response = send_json(
        &app,
        "POST",
        &format!("/api/leaves/{leave_id}/approve"),
        &worker_key,
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The manager decides it.
    let response = send_json(
        &app,
        "POST",
        &format!("/api/leaves/{leave_id}/approve"),
        &manager_key,
        &serde_json::json!({"note": "enjoy"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["status"], "approved");
    assert_eq!(body_json["data"]["decided_by"], manager_id);
    assert_eq!(body_json["data"]["decision_note"], "enjoy");

    // Decisions are final.
    let response = send_json(
        &app,
        "POST",
        &format!("/api/leaves/{leave_id}/reject"),
        &manager_key,
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_leave_self_decision_rules() {
    let (state, app) = spawn_app().await;
    let (_manager_id, manager_key) = seed_user(&state, &app, "manager", "MANAGER").await;

    // The manager requests leave for themselves.
    let response = send_json(
        &app,
        "POST",
        "/api/leaves",
        &manager_key,
        &serde_json::json!({
            "kind": "sick",
            "start_date": "2027-04-05",
            "end_date": "2027-04-06"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    let own_id = body_json["data"]["id"].as_i64().unwrap();

    // Holding leaves.approve is not enough to decide your own request.
    let response = send_json(
        &app,
        "POST",
        &format!("/api/leaves/{own_id}/approve"),
        &manager_key,
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A different approver may.
    let response = send_json(
        &app,
        "POST",
        &format!("/api/leaves/{own_id}/approve"),
        ADMIN_API_KEY,
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The seeded admin holds system.admin, which does override the
    // self-decision rule.
    let response = send_json(
        &app,
        "POST",
        "/api/leaves",
        ADMIN_API_KEY,
        &serde_json::json!({
            "kind": "unpaid",
            "start_date": "2027-05-03",
            "end_date": "2027-05-04"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    let admin_leave_id = body_json["data"]["id"].as_i64().unwrap();

    let response = send_json(
        &app,
        "POST",
        &format!("/api/leaves/{admin_leave_id}/approve"),
        ADMIN_API_KEY,
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["status"], "approved");
}

#[tokio::test]
async fn test_leave_cancellation() {
    let (state, app) = spawn_app().await;
    let (_worker_id, worker_key) = seed_user(&state, &app, "worker", "EMPLOYEE").await;
    let (_manager_id, manager_key) = seed_user(&state, &app, "manager", "MANAGER").await;

    let response = send_json(
        &app,
        "POST",
        "/api/leaves",
        &worker_key,
        &serde_json::json!({
            "kind": "other",
            "start_date": "2027-07-05",
            "end_date": "2027-07-06"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    let leave_id = body_json["data"]["id"].as_i64().unwrap();

    // Only the requester may cancel.
    let response = send_empty(
        &app,
        "POST",
        &format!("/api/leaves/{leave_id}/cancel"),
        &manager_key,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send_empty(
        &app,
        "POST",
        &format!("/api/leaves/{leave_id}/cancel"),
        &worker_key,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["status"], "cancelled");

    // Cancelling twice is a conflict: the request is no longer pending.
    let response = send_empty(
        &app,
        "POST",
        &format!("/api/leaves/{leave_id}/cancel"),
        &worker_key,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_attendance_day() {
    let (state, app) = spawn_app().await;
    let (_worker_id, worker_key) = seed_user(&state, &app, "worker", "EMPLOYEE").await;
    let (_manager_id, manager_key) = seed_user(&state, &app, "manager", "MANAGER").await;

    // Clocking out before clocking in makes no sense.
    let response = send_empty(&app, "POST", "/api/attendance/clock-out", &worker_key).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send_json(
        &app,
        "POST",
        "/api/attendance/clock-in",
        &worker_key,
        &serde_json::json!({"note": "on site"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["date"], utc_today());
    assert!(body_json["data"]["clock_out"].is_null());

    // One record per day.
    let response = send_json(
        &app,
        "POST",
        "/api/attendance/clock-in",
        &worker_key,
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send_empty(&app, "POST", "/api/attendance/clock-out", &worker_key).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert!(body_json["data"]["clock_out"].is_string());
    assert!(body_json["data"]["worked_minutes"].as_i64().unwrap() >= 0);

    let response = send_empty(&app, "POST", "/api/attendance/clock-out", &worker_key).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Own history.
    let response = send_empty(&app, "GET", "/api/attendance", &worker_key).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"].as_array().unwrap().len(), 1);

    // The day board is a team view.
    let uri = format!("/api/attendance/day/{}", utc_today());
    let response = send_empty(&app, "GET", &uri, &manager_key).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"].as_array().unwrap().len(), 1);

    let response = send_empty(&app, "GET", &uri, &worker_key).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_expense_lifecycle() {
    let (state, app) = spawn_app().await;
    let (_worker_id, worker_key) = seed_user(&state, &app, "worker", "EMPLOYEE").await;
    let (_manager_id, manager_key) = seed_user(&state, &app, "manager", "MANAGER").await;

    let response = send_json(
        &app,
        "POST",
        "/api/expenses",
        &worker_key,
        &serde_json::json!({
            "description": "Taxi to the client",
            "amount_cents": 2350,
            "expense_date": "2027-03-02"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    let expense_id = body_json["data"]["id"].as_i64().unwrap();
    assert_eq!(body_json["data"]["status"], "pending");
    // No currency given: the company default applies.
    assert_eq!(body_json["data"]["currency"], "EUR");

    // Amounts are positive.
    let response = send_json(
        &app,
        "POST",
        "/api/expenses",
        &worker_key,
        &serde_json::json!({
            "description": "Refund",
            "amount_cents": -500,
            "expense_date": "2027-03-02"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Dates are ISO.
    let response = send_json(
        &app,
        "POST",
        "/api/expenses",
        &worker_key,
        &serde_json::json!({
            "description": "Lunch",
            "amount_cents": 1200,
            "expense_date": "03/02/2027"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The team view needs expenses.view_team; the worker only sees their own.
    let response = send_empty(&app, "GET", "/api/expenses/all", &worker_key).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send_empty(&app, "GET", "/api/expenses/all", &manager_key).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"].as_array().unwrap().len(), 1);

    // Managers cannot approve expenses; that is an HR grant.
    let response = send_json(
        &app,
        "POST",
        &format!("/api/expenses/{expense_id}/approve"),
        &manager_key,
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send_json(
        &app,
        "POST",
        &format!("/api/expenses/{expense_id}/approve"),
        ADMIN_API_KEY,
        &serde_json::json!({"note": "within policy"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["status"], "approved");

    // Already decided.
    let response = send_json(
        &app,
        "POST",
        &format!("/api/expenses/{expense_id}/reject"),
        ADMIN_API_KEY,
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Decided reports cannot be withdrawn.
    let response = send_empty(
        &app,
        "DELETE",
        &format!("/api/expenses/{expense_id}"),
        &worker_key,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // A fresh pending report can be withdrawn, but only by its submitter.
    let response = send_json(
        &app,
        "POST",
        "/api/expenses",
        &worker_key,
        &serde_json::json!({
            "description": "Train ticket",
            "amount_cents": 4900,
            "currency": "usd",
            "expense_date": "2027-03-04"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    let second_id = body_json["data"]["id"].as_i64().unwrap();
    // Currency codes are normalized.
    assert_eq!(body_json["data"]["currency"], "USD");

    let response = send_empty(
        &app,
        "DELETE",
        &format!("/api/expenses/{second_id}"),
        &manager_key,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send_empty(
        &app,
        "DELETE",
        &format!("/api/expenses/{second_id}"),
        &worker_key,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send_empty(&app, "GET", "/api/expenses", &worker_key).await;
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_review_lifecycle() {
    let (state, app) = spawn_app().await;
    let (worker_id, worker_key) = seed_user(&state, &app, "worker", "EMPLOYEE").await;
    let (_manager_id, manager_key) = seed_user(&state, &app, "manager", "MANAGER").await;

    // Writing reviews is a manager grant.
    let response = send_json(
        &app,
        "POST",
        "/api/reviews",
        &worker_key,
        &serde_json::json!({"employee_id": worker_id, "period": "2027-H1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Unknown employee.
    let response = send_json(
        &app,
        "POST",
        "/api/reviews",
        &manager_key,
        &serde_json::json!({"employee_id": 99999, "period": "2027-H1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Ratings live on a 1-5 scale.
    let response = send_json(
        &app,
        "POST",
        "/api/reviews",
        &manager_key,
        &serde_json::json!({"employee_id": worker_id, "period": "2027-H1", "rating": 9}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send_json(
        &app,
        "POST",
        "/api/reviews",
        &manager_key,
        &serde_json::json!({
            "employee_id": worker_id,
            "period": "2027-H1",
            "rating": 4,
            "strengths": "Reliable delivery",
            "improvements": "Share more in design discussions"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    let review_id = body_json["data"]["id"].as_i64().unwrap();
    assert_eq!(body_json["data"]["status"], "draft");

    // Drafts are already visible to their subject.
    let response = send_empty(&app, "GET", "/api/reviews", &worker_key).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"].as_array().unwrap().len(), 1);

    // Acknowledging a draft is premature.
    let response = send_empty(
        &app,
        "POST",
        &format!("/api/reviews/{review_id}/acknowledge"),
        &worker_key,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The reviewer amends and submits.
    let response = send_json(
        &app,
        "PUT",
        &format!("/api/reviews/{review_id}"),
        &manager_key,
        &serde_json::json!({
            "employee_id": worker_id,
            "period": "2027-H1",
            "rating": 5,
            "strengths": "Reliable delivery, strong reviews",
            "improvements": "Share more in design discussions"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send_empty(
        &app,
        "POST",
        &format!("/api/reviews/{review_id}/submit"),
        &manager_key,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["status"], "submitted");
    assert!(body_json["data"]["submitted_at"].is_string());

    // Submitted reviews are frozen.
    let response = send_json(
        &app,
        "PUT",
        &format!("/api/reviews/{review_id}"),
        &manager_key,
        &serde_json::json!({"employee_id": worker_id, "period": "2027-H1", "rating": 1}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Only the subject can acknowledge.
    let response = send_empty(
        &app,
        "POST",
        &format!("/api/reviews/{review_id}/acknowledge"),
        &manager_key,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send_empty(
        &app,
        "POST",
        &format!("/api/reviews/{review_id}/acknowledge"),
        &worker_key,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["status"], "acknowledged");
    assert!(body_json["data"]["acknowledged_at"].is_string());

    // A draft with no rating cannot be submitted.
    let response = send_json(
        &app,
        "POST",
        "/api/reviews",
        &manager_key,
        &serde_json::json!({"employee_id": worker_id, "period": "2027-H2"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    let unrated_id = body_json["data"]["id"].as_i64().unwrap();

    let response = send_empty(
        &app,
        "POST",
        &format!("/api/reviews/{unrated_id}/submit"),
        &manager_key,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_gating() {
    let (state, app) = spawn_app().await;
    let (_worker_id, worker_key) = seed_user(&state, &app, "worker", "EMPLOYEE").await;

    let response = send_json(
        &app,
        "POST",
        "/api/leaves",
        &worker_key,
        &serde_json::json!({
            "kind": "vacation",
            "start_date": "2027-03-01",
            "end_date": "2027-03-03"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Everyone gets their own block.
    let response = send_empty(&app, "GET", "/api/dashboard", &worker_key).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["own"]["pending_leave_requests"], 1);
    // No reports.view, no org block.
    assert!(body_json["data"]["organization"].is_null());

    // Reporting holders see the org aggregates too.
    let response = send_empty(&app, "GET", "/api/dashboard", ADMIN_API_KEY).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert!(body_json["data"]["organization"]["headcount"].as_u64().unwrap() >= 2);
    assert_eq!(
        body_json["data"]["organization"]["pending_leave_requests"]
            .as_u64()
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_notification_fanout_and_read_state() {
    let (state, app) = spawn_app().await;
    let (_worker_id, worker_key) = seed_user(&state, &app, "worker", "EMPLOYEE").await;
    let (_manager_id, manager_key) = seed_user(&state, &app, "manager", "MANAGER").await;

    // A submitted leave request notifies every approver.
    let response = send_json(
        &app,
        "POST",
        "/api/leaves",
        &worker_key,
        &serde_json::json!({
            "kind": "vacation",
            "start_date": "2027-03-01",
            "end_date": "2027-03-02"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send_empty(&app, "GET", "/api/notifications/unread-count", &manager_key).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert!(body_json["data"]["count"].as_u64().unwrap() >= 1);

    let response = send_empty(
        &app,
        "GET",
        "/api/notifications?unread_only=true",
        &manager_key,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    let rows = body_json["data"].as_array().unwrap();
    assert!(!rows.is_empty());
    assert_eq!(rows[0]["kind"], "leave_request");
    assert_eq!(rows[0]["read"], false);
    let notification_id = rows[0]["id"].as_i64().unwrap();

    // Mark one, then the rest.
    let response = send_empty(
        &app,
        "POST",
        &format!("/api/notifications/{notification_id}/read"),
        &manager_key,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send_empty(&app, "POST", "/api/notifications/read-all", &manager_key).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send_empty(&app, "GET", "/api/notifications/unread-count", &manager_key).await;
    let body_json = read_body_json(response).await;
    assert_eq!(body_json["data"]["count"], 0);

    // Notifications are private; the worker sees none of the manager's.
    let response = send_empty(&app, "GET", "/api/notifications", &worker_key).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body_json = read_body_json(response).await;
    assert!(body_json["data"].as_array().unwrap().is_empty());
}
