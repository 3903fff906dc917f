use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use employee_shared::models::Employee;
use employee_shared::store::memory::MemoryEmployeeStore;
use employee_shared::store::EmployeeStore;
use employee_shared::test_utils::http_test_utils::{response_to_json, response_to_text};
use employee_shared::test_utils::test_logging::init_test_logging;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use super::FailingStore;
use crate::config::Config;
use crate::routes;

const ALLOWED_ORIGIN: &str = "http://localhost:5173";

// Helper for setting up a test router over a fresh in-memory store
fn test_app() -> (Router, Arc<MemoryEmployeeStore>) {
    init_test_logging();
    let store = Arc::new(MemoryEmployeeStore::new());
    let app = routes::create_router_with_store(store.clone(), &Config::default());
    (app, store)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value.as_str().expect("timestamp should be a string"))
        .unwrap()
        .with_timezone(&Utc)
}

// Creates an employee over HTTP and returns the response body
async fn create(app: &Router, body: Value) -> Value {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/employees", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response_to_json(response).await
}

#[tokio::test]
async fn test_get_employees_empty() {
    let (app, _) = test_app();

    let response = app
        .oneshot(empty_request("GET", "/employees"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_to_json(response).await, json!([]));
}

#[tokio::test]
async fn test_create_employee_defaults() {
    let (app, store) = test_app();

    let body = create(
        &app,
        json!({ "name": "Ann", "email": "ann@x.com", "password": "s3cret" }),
    )
    .await;

    assert!(!body["id"].as_str().unwrap().is_empty());
    assert_eq!(body["name"], "Ann");
    assert_eq!(body["email"], "ann@x.com");
    assert_eq!(body["isEnabled"], true);
    assert!(body["createdAt"].is_string());
    assert!(body["role"].is_null());
    assert!(body.get("password").is_none());

    // The password is stored even though it is never returned
    let stored = store
        .find_by_id(body["id"].as_str().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.password.as_deref(), Some("s3cret"));
}

#[tokio::test]
async fn test_create_employee_keeps_explicit_disabled_flag() {
    let (app, _) = test_app();

    let body = create(
        &app,
        json!({
            "name": "Bob",
            "email": "bob@x.com",
            "isEnabled": false,
            "profilePic": "bob.png",
            "phoneNumber": "555-0100"
        }),
    )
    .await;

    assert_eq!(body["isEnabled"], false);
    assert_eq!(body["profilePic"], "bob.png");
    assert_eq!(body["phoneNumber"], "555-0100");
}

#[tokio::test]
async fn test_create_employee_duplicate_email() {
    let (app, store) = test_app();
    let first = create(&app, json!({ "name": "Ann", "email": "ann@x.com" })).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/employees",
            json!({ "name": "Other Ann", "email": "ann@x.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_to_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("ann@x.com"));

    let all = store.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id.as_deref(), first["id"].as_str());
    assert_eq!(all[0].name, "Ann");
}

#[tokio::test]
async fn test_create_employee_missing_email() {
    let (app, store) = test_app();

    let response = app
        .oneshot(json_request("POST", "/employees", json!({ "name": "Ann" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_create_employee_about_too_long() {
    let (app, store) = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/employees",
            json!({ "name": "Ann", "email": "ann@x.com", "about": "a".repeat(1001) }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_get_employees_lists_created() {
    let (app, _) = test_app();
    create(&app, json!({ "name": "Ann", "email": "ann@x.com", "password": "p1" })).await;
    create(&app, json!({ "name": "Bob", "email": "bob@x.com", "password": "p2" })).await;

    let response = app
        .oneshot(empty_request("GET", "/employees"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_to_json(response).await;
    let employees = body.as_array().unwrap();
    assert_eq!(employees.len(), 2);
    assert!(employees.iter().all(|e| e.get("password").is_none()));

    let mut names: Vec<&str> = employees
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Ann", "Bob"]);
}

#[tokio::test]
async fn test_get_employee_by_id() {
    let (app, _) = test_app();
    let created = create(&app, json!({ "name": "Ann", "email": "ann@x.com" })).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(empty_request("GET", &format!("/employees/{}", id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_to_json(response).await, created);
}

#[tokio::test]
async fn test_get_unknown_employee_returns_null() {
    let (app, _) = test_app();

    let response = app
        .oneshot(empty_request("GET", "/employees/does-not-exist"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_to_json(response).await, Value::Null);
}

#[tokio::test]
async fn test_update_employee_scenario() {
    let (app, _) = test_app();
    let created = create(&app, json!({ "name": "Ann", "email": "ann@x.com" })).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/employees/{}", id),
            json!({ "name": "Ann B", "email": "ann@x.com", "role": "lead" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated = response_to_json(response).await;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["name"], "Ann B");
    assert_eq!(updated["role"], "lead");
    assert_eq!(updated["isEnabled"], true);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert!(timestamp(&updated["updatedAt"]) > timestamp(&created["updatedAt"]));
    assert!(updated.get("password").is_none());
}

#[tokio::test]
async fn test_update_employee_preserves_password_and_flag() {
    let (app, store) = test_app();
    let created = create(
        &app,
        json!({
            "name": "Ann",
            "email": "ann@x.com",
            "password": "s3cret",
            "isEnabled": false,
            "about": "Original bio",
            "phoneNumber": "555-0100"
        }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/employees/{}", id),
            json!({
                "name": "Ann",
                "email": "ann.b@x.com",
                "password": "changed",
                "isEnabled": true
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_to_json(response).await;
    assert_eq!(body["email"], "ann.b@x.com");
    assert_eq!(body["isEnabled"], false);
    // Omitted optional fields are cleared
    assert!(body["about"].is_null());
    assert!(body["phoneNumber"].is_null());

    let stored = store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.password.as_deref(), Some("s3cret"));
    assert_eq!(stored.is_enabled, Some(false));
}

#[tokio::test]
async fn test_update_unknown_employee() {
    let (app, store) = test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/employees/does-not-exist",
            json!({ "name": "Ghost", "email": "ghost@x.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_to_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("does-not-exist"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_update_employee_duplicate_email() {
    let (app, store) = test_app();
    create(&app, json!({ "name": "Ann", "email": "ann@x.com" })).await;
    let bob = create(&app, json!({ "name": "Bob", "email": "bob@x.com" })).await;
    let bob_id = bob["id"].as_str().unwrap();

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/employees/{}", bob_id),
            json!({ "name": "Bob", "email": "ann@x.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let stored = store.find_by_id(bob_id).await.unwrap().unwrap();
    assert_eq!(stored.email, "bob@x.com");
}

#[tokio::test]
async fn test_delete_employee() {
    let (app, store) = test_app();
    let created = create(&app, json!({ "name": "Ann", "email": "ann@x.com" })).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/employees/{}", id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_to_text(response).await, "Employee deleted!");
    assert!(store.find_by_id(id).await.unwrap().is_none());

    // Deleting again is still a success
    let response = app
        .oneshot(empty_request("DELETE", &format!("/employees/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_unknown_employee_leaves_store_unchanged() {
    let mut seeded = Employee::new("Ann", "ann@x.com");
    seeded.id = Some("emp_1".into());
    seeded.is_enabled = Some(true);
    let store = Arc::new(MemoryEmployeeStore::with_data(vec![seeded.clone()]));
    let app = routes::create_router_with_store(store.clone(), &Config::default());

    let response = app
        .oneshot(empty_request("DELETE", "/employees/does-not-exist"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.find_all().await.unwrap(), vec![seeded]);
}

#[tokio::test]
async fn test_store_failure_returns_generic_500() {
    init_test_logging();
    let app = routes::create_router_with_store(Arc::new(FailingStore), &Config::default());

    let response = app
        .oneshot(empty_request("GET", "/employees"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_to_json(response).await;
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let (app, _) = test_app();

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/employees")
        .header(header::ORIGIN, ALLOWED_ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&header::HeaderValue::from_static(ALLOWED_ORIGIN))
    );
}

#[tokio::test]
async fn test_cors_rejects_other_origin() {
    let (app, _) = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/employees")
        .header(header::ORIGIN, "http://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_preflight_from_other_origin_gets_no_allow_origin() {
    let (app, _) = test_app();

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/employees")
        .header(header::ORIGIN, "http://evil.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_routes_nested_under_base_path() {
    init_test_logging();
    let config = Config {
        base_path: "/Prod".into(),
        ..Config::default()
    };
    let app = routes::create_router_with_store(Arc::new(MemoryEmployeeStore::new()), &config);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/Prod/employees"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(empty_request("GET", "/employees"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _) = test_app();

    let response = app
        .oneshot(empty_request("GET", "/departments"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response_to_text(response).await,
        "The requested resource was not found"
    );
}
