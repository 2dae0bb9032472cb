//! API integration tests
//!
//! Drive the REST surface end to end against a seeded in-memory store.

#![cfg(feature = "server")]

use anyhow::Result;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use fieldops::config::LimitsConfig;
use fieldops::database::{Database, Snapshot};
use fieldops::server::app::{create_app, AppState};
use serde_json::{json, Value};

const ADMIN: (&str, &str) = ("1", "admin");
const SUPERVISOR: (&str, &str) = ("2", "supervisor");
const OTHER_SUPERVISOR: (&str, &str) = ("3", "supervisor");
const EMPLOYEE: (&str, &str) = ("4", "employee");

fn seed() -> Result<Snapshot> {
    Ok(serde_json::from_value(json!({
        "users": [
            {"id": 1, "role": "admin", "name": "Root", "email": "root@example.com", "isApproved": true},
            {"id": 2, "role": "supervisor", "name": "Sana", "email": "sana@example.com", "isApproved": true},
            {"id": 3, "role": "supervisor", "name": "Omar", "email": "omar@example.com", "isApproved": true},
            {"id": 4, "role": "employee", "name": "Ayesha", "email": "ayesha@example.com", "isApproved": true},
            {"id": 5, "role": "employee", "name": "Bilal", "email": "bilal@example.com", "isApproved": false}
        ],
        "cities": [{"id": 1, "name": "Lahore"}],
        "locations": [
            {"id": 10, "martName": "Imtiaz", "area": "Gulberg", "cityName": "Lahore", "lat": 31.5, "lng": 74.3},
            {"id": 11, "martName": "Metro", "cityName": "Lahore"}
        ],
        "products": [
            {"id": 101, "name": "Rice 5kg", "weight": 5},
            {"id": "102", "name": "Oil", "weight": "10"}
        ]
    }))?)
}

/// Create a test server over a seeded in-memory store
fn setup_test_server() -> Result<(TestServer, Database)> {
    let db = Database::with_snapshot(seed()?);
    let app = create_app(AppState::new(db.clone(), LimitsConfig::default()), Some("*"))?;
    let server = TestServer::new(app)?;
    Ok((server, db))
}

fn as_user(request: TestRequest, (id, role): (&'static str, &'static str)) -> TestRequest {
    request
        .add_header(HeaderName::from_static("x-user-id"), HeaderValue::from_static(id))
        .add_header(HeaderName::from_static("x-user-role"), HeaderValue::from_static(role))
}

fn weekly_plan(supervisor: i64) -> Value {
    json!({
        "supervisorId": supervisor,
        "periodType": "Weekly",
        "startDate": "2024-01-01",
        "endDate": "2024-01-07",
        "days": {
            "2024-01-03": [11, "10", 10],
            "2024-01-01": ["10"],
            "2024-01-02": []
        }
    })
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let (server, _) = setup_test_server()?;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["service"], "fieldops");
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_identity_is_required() -> Result<()> {
    let (server, _) = setup_test_server()?;

    let response = server.get("/api/v1/journey-plans").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert!(body["message"].is_string());

    let response = as_user(server.get("/api/v1/journey-plans"), EMPLOYEE).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["message"], "Forbidden");

    Ok(())
}

#[tokio::test]
async fn test_journey_plan_lifecycle() -> Result<()> {
    let (server, db) = setup_test_server()?;

    // Create
    let response = as_user(server.post("/api/v1/journey-plans"), ADMIN)
        .json(&weekly_plan(2))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let plan: Value = response.json();
    let plan_id = plan["id"].as_i64().unwrap();
    assert_eq!(plan["periodType"], "weekly");
    assert_eq!(plan["days"]["2024-01-03"], json!(["10", "11"]));
    assert_eq!(plan["daysCount"], 3);
    assert_eq!(plan["selectedDaysCount"], 2);
    assert_eq!(plan["locationsSnapshot"]["10"]["name"], "Imtiaz • Gulberg • Lahore");

    // Resubmitting updates in place
    let mut update = weekly_plan(2);
    update["days"] = json!({"2024-01-05": [11]});
    let response = as_user(server.post("/api/v1/journey-plans"), ADMIN)
        .json(&update)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["id"], plan_id);
    assert_eq!(db.read(|s| s.journey_plans.len()).await?, 1);

    // Admin listing
    let response = as_user(server.get("/api/v1/journey-plans"), ADMIN)
        .add_query_param("supervisorId", 2)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let plans: Vec<Value> = response.json();
    assert_eq!(plans.len(), 1);

    // Supervisor views
    let response = as_user(server.get("/api/v1/journey-plans/my"), SUPERVISOR).await;
    assert_eq!(response.json::<Vec<Value>>().len(), 1);
    let response = as_user(server.get("/api/v1/journey-plans/my"), OTHER_SUPERVISOR).await;
    assert!(response.json::<Vec<Value>>().is_empty());

    // Ownership
    let path = format!("/api/v1/journey-plans/{}", plan_id);
    assert_eq!(as_user(server.get(&path), SUPERVISOR).await.status_code(), StatusCode::OK);
    assert_eq!(as_user(server.get(&path), ADMIN).await.status_code(), StatusCode::OK);
    assert_eq!(
        as_user(server.get(&path), OTHER_SUPERVISOR).await.status_code(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        as_user(server.get("/api/v1/journey-plans/999"), ADMIN).await.status_code(),
        StatusCode::NOT_FOUND
    );

    // Delete
    let response = as_user(server.delete(&path), SUPERVISOR).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let response = as_user(server.delete(&path), ADMIN).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["id"], plan_id);
    assert_eq!(as_user(server.delete(&path), ADMIN).await.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_journey_plan_validation() -> Result<()> {
    let (server, db) = setup_test_server()?;

    let cases = [
        (json!({"startDate": "2024-01-01", "endDate": "2024-01-07", "days": {"2024-01-01": [10]}}), StatusCode::BAD_REQUEST, "supervisorId is required"),
        (json!({"supervisorId": 2, "periodType": "daily", "startDate": "2024-01-01", "endDate": "2024-01-07", "days": {"2024-01-01": [10]}}), StatusCode::BAD_REQUEST, "periodType must be weekly or monthly"),
        (json!({"supervisorId": 2, "startDate": "2024-02-30", "endDate": "2024-03-07", "days": {"2024-03-01": [10]}}), StatusCode::BAD_REQUEST, "Invalid startDate/endDate"),
        (json!({"supervisorId": 2, "startDate": "2024-01-07", "endDate": "2024-01-01", "days": {"2024-01-01": [10]}}), StatusCode::BAD_REQUEST, "endDate must be >= startDate"),
        (json!({"supervisorId": 2, "startDate": "2024-01-01", "endDate": "2024-01-07", "days": {"2024-01-01": [], "2024-01-02": []}}), StatusCode::BAD_REQUEST, "Select at least one location in at least one day"),
        (json!({"supervisorId": 4, "startDate": "2024-01-01", "endDate": "2024-01-07", "days": {"2024-01-01": [10]}}), StatusCode::NOT_FOUND, "Supervisor not found (or not a supervisor)"),
    ];

    for (payload, status, message) in cases {
        let response = as_user(server.post("/api/v1/journey-plans"), ADMIN)
            .json(&payload)
            .await;
        assert_eq!(response.status_code(), status, "payload {}", payload);
        assert_eq!(response.json::<Value>()["message"], message);
    }

    assert!(db.read(|s| s.journey_plans.is_empty()).await?);

    Ok(())
}

#[tokio::test]
async fn test_malformed_input_uses_message_body() -> Result<()> {
    let (server, db) = setup_test_server()?;

    let mut payload = weekly_plan(2);
    payload["periodType"] = json!(5);
    let response = as_user(server.post("/api/v1/journey-plans"), ADMIN)
        .json(&payload)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "periodType must be weekly or monthly");

    // a numeric copiedFrom is stored as its string form
    let mut payload = weekly_plan(2);
    payload["copiedFrom"] = json!(7);
    let response = as_user(server.post("/api/v1/journey-plans"), ADMIN)
        .json(&payload)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["copiedFrom"], "7");

    let response = as_user(server.get("/api/v1/journey-plans/abc"), ADMIN).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["message"].is_string());

    let response = as_user(server.post("/api/v1/admin/users/abc/approve"), ADMIN).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["message"].is_string());

    let response = as_user(server.post("/api/v1/sales"), EMPLOYEE)
        .text("{ not json")
        .content_type("application/json")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["message"].is_string());
    assert!(db.read(|s| s.sales.is_empty()).await?);

    Ok(())
}

#[tokio::test]
async fn test_active_plan_lookup() -> Result<()> {
    let (server, _) = setup_test_server()?;

    as_user(server.post("/api/v1/journey-plans"), ADMIN)
        .json(&weekly_plan(2))
        .await;

    let response = as_user(server.get("/api/v1/journey-plans/my/active"), SUPERVISOR)
        .add_query_param("date", "2024-01-03")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let active: Value = response.json();
    assert_eq!(active["date"], "2024-01-03");
    assert_eq!(active["locationIds"], json!(["10", "11"]));
    assert_eq!(active["locations"].as_array().map(Vec::len), Some(2));

    for outside in ["2023-12-31", "2024-01-08"] {
        let response = as_user(server.get("/api/v1/journey-plans/my/active"), SUPERVISOR)
            .add_query_param("date", outside)
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>(), Value::Null);
    }

    let response = as_user(server.get("/api/v1/journey-plans/my/active"), SUPERVISOR)
        .add_query_param("date", "someday")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn test_sales_recording_and_rollups() -> Result<()> {
    let (server, db) = setup_test_server()?;

    let sales = [
        json!({"productId": 101, "locationId": 10, "quantity": 2, "saleDate": "2024-01-02"}),
        json!({"productId": "101", "locationId": "11", "quantity": "1", "saleDate": "2024-01-03"}),
    ];
    for sale in &sales {
        let response = as_user(server.post("/api/v1/sales"), EMPLOYEE).json(sale).await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }
    let response = as_user(server.post("/api/v1/sales"), ("5", "employee"))
        .json(&json!({"productId": "102", "locationId": 10, "quantity": 1, "saleDate": "2024-01-03"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let sale: Value = response.json();
    assert_eq!(sale["productWeight"], 10.0);
    assert_eq!(sale["totalWeight"], 10.0);
    assert_eq!(sale["locationName"], "Imtiaz - Gulberg");

    // Admin rollup by employee: Ayesha 3 / 15 before Bilal 1 / 10
    let response = as_user(server.get("/api/v1/sales/summary/employees"), ADMIN).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let groups: Vec<Value> = response.json();
    assert_eq!(
        groups,
        vec![
            json!({"employeeId": 4, "employeeName": "Ayesha", "totalQuantity": 3.0, "totalWeight": 15.0}),
            json!({"employeeId": 5, "employeeName": "Bilal", "totalQuantity": 1.0, "totalWeight": 10.0}),
        ]
    );

    let response = as_user(server.get("/api/v1/sales/summary/locations"), ADMIN)
        .add_query_param("from", "2024-01-03")
        .await;
    let groups: Vec<Value> = response.json();
    assert_eq!(groups[0]["locationId"], 10);
    assert_eq!(groups[1]["locationName"], "Metro");

    // Admin listing with filters
    let response = as_user(server.get("/api/v1/sales"), ADMIN)
        .add_query_param("employeeId", 4)
        .add_query_param("to", "2024-01-02")
        .await;
    let rows: Vec<Value> = response.json();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["saleDate"], "2024-01-02");

    let response = as_user(server.get("/api/v1/sales"), ADMIN)
        .add_query_param("from", "January")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Employee's own views
    let response = as_user(server.get("/api/v1/sales/my"), EMPLOYEE).await;
    let mine: Vec<Value> = response.json();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0]["saleDate"], "2024-01-03");

    let response = as_user(server.get("/api/v1/sales/my/summary"), EMPLOYEE).await;
    assert_eq!(
        response.json::<Value>(),
        json!({"employeeId": 4, "totalQuantity": 3.0, "totalWeight": 15.0})
    );

    assert_eq!(db.read(|s| s.sales.len()).await?, 3);

    Ok(())
}

#[tokio::test]
async fn test_sale_rejections() -> Result<()> {
    let (server, db) = setup_test_server()?;

    let cases = [
        (json!({"locationId": 10, "quantity": 1}), StatusCode::BAD_REQUEST),
        (json!({"productId": 101, "locationId": 10, "quantity": 0}), StatusCode::BAD_REQUEST),
        (json!({"productId": 101, "locationId": 10, "quantity": "many"}), StatusCode::BAD_REQUEST),
        (json!({"productId": 101, "locationId": 10, "quantity": 1, "saleDate": "soon"}), StatusCode::BAD_REQUEST),
        (json!({"productId": 999, "locationId": 10, "quantity": 1}), StatusCode::NOT_FOUND),
        (json!({"productId": 101, "locationId": 99, "quantity": 1}), StatusCode::NOT_FOUND),
    ];
    for (payload, status) in cases {
        let response = as_user(server.post("/api/v1/sales"), EMPLOYEE).json(&payload).await;
        assert_eq!(response.status_code(), status, "payload {}", payload);
    }

    let response = as_user(server.post("/api/v1/sales"), ("77", "employee"))
        .json(&json!({"productId": 101, "locationId": 10, "quantity": 1}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = as_user(server.post("/api/v1/sales"), SUPERVISOR)
        .json(&json!({"productId": 101, "locationId": 10, "quantity": 1}))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    assert!(db.read(|s| s.sales.is_empty()).await?);

    Ok(())
}

#[tokio::test]
async fn test_highlights_shape() -> Result<()> {
    let (server, _) = setup_test_server()?;

    let response = as_user(server.get("/api/v1/sales/highlights"), ADMIN).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    for field in ["today", "weekFrom", "weekTo", "monthFrom", "monthTo"] {
        assert!(body[field].is_string(), "{} missing", field);
    }
    assert!(body["weekFrom"].as_str() <= body["today"].as_str());
    assert!(body["topEmployeeThisWeek"].is_null());
    assert!(body["topMartThisMonth"].is_null());

    Ok(())
}

#[tokio::test]
async fn test_admin_user_endpoints() -> Result<()> {
    let (server, _) = setup_test_server()?;

    let response = as_user(server.get("/api/v1/admin/users"), ADMIN)
        .add_query_param("status", "pending")
        .await;
    let pending: Vec<Value> = response.json();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["id"], 5);

    let response = as_user(server.post("/api/v1/admin/users/5/approve"), ADMIN).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["isApproved"], true);

    let response = as_user(server.post("/api/v1/admin/users/2/approve"), ADMIN).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let response = as_user(server.post("/api/v1/admin/users/404/approve"), ADMIN).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = as_user(server.get("/api/v1/admin/stats"), ADMIN).await;
    assert_eq!(
        response.json::<Value>(),
        json!({"pending": 0, "employees": 2, "supervisors": 2, "cities": 1, "locations": 2, "products": 2})
    );

    Ok(())
}
