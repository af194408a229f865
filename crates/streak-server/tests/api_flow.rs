//! End-to-end API flow against the real router and an in-memory database.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use streak_api::auth::{AppState, AppStateInner};
use streak_api::routes;

fn test_app() -> Router {
    let state: AppState = Arc::new(AppStateInner {
        db: streak_db::Database::open_in_memory().unwrap(),
        jwt_secret: "test-secret".into(),
    });
    routes::router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, name: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "name": name, "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_login_and_exists() {
    let app = test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/auth/exists",
        None,
        Some(json!({ "email": "ada@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    register(&app, "Ada", "ada@x.com").await;

    // Duplicate email is a conflict.
    let (status, _) = send(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "name": "Ada", "email": "ada@x.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        "POST",
        "/auth/exists",
        None,
        Some(json!({ "email": "ada@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], json!(true));

    let (status, body) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "ada@x.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());

    let (status, _) = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "ada@x.com", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn habit_routes_require_auth() {
    let app = test_app();
    let (status, _) = send(&app, "GET", "/habits?month=2&year=2024", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn habit_lifecycle() {
    let app = test_app();
    let token = register(&app, "Ada", "ada@x.com").await;

    // Create a habit pinned to March 2024.
    let (status, habit) = send(
        &app,
        "POST",
        "/habits",
        Some(&token),
        Some(json!({ "name": "Exercise", "created_at": "2024-03-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(habit["name"], json!("Exercise"));
    assert_eq!(habit["owner_email"], json!("ada@x.com"));
    let checkmarks = habit["checkmarks"].as_array().unwrap();
    assert_eq!(checkmarks.len(), 31);
    assert!(checkmarks.iter().all(|c| c == &json!(false)));
    let habit_id = habit["id"].as_str().unwrap().to_string();

    // month=2 is March on the zero-based wire month.
    let (status, listed) = send(&app, "GET", "/habits?month=2&year=2024", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (_, listed) = send(&app, "GET", "/habits?month=3&year=2024", Some(&token), None).await;
    assert!(listed.as_array().unwrap().is_empty());

    // Missing or malformed month/year is a validation error, not a crash.
    let (status, body) = send(&app, "GET", "/habits", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("month and year are required"));
    let (status, _) = send(&app, "GET", "/habits?month=abc&year=2024", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Toggle twice returns the slot to its original value.
    let uri = format!("/habits/{}/checkmarks", habit_id);
    let (status, toggled) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "day_index": 4 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["checkmarks"][4], json!(true));

    let (_, toggled) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "day_index": 4 }))).await;
    assert_eq!(toggled["checkmarks"][4], json!(false));

    // Out-of-range index fails validation and leaves the record untouched.
    let (status, _) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "day_index": 31 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, listed) = send(&app, "GET", "/habits?month=2&year=2024", Some(&token), None).await;
    let stored = &listed.as_array().unwrap()[0];
    assert!(stored["checkmarks"].as_array().unwrap().iter().all(|c| c == &json!(false)));

    // Empty name is rejected.
    let (status, _) = send(
        &app,
        "POST",
        "/habits",
        Some(&token),
        Some(json!({ "name": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unparseable explicit date is rejected.
    let (status, body) = send(
        &app,
        "POST",
        "/habits",
        Some(&token),
        Some(json!({ "name": "Read", "created_at": "soon" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("invalid date"));

    // Delete is idempotent.
    let uri = format!("/habits/{}", habit_id);
    let (status, body) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let (status, body) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (_, listed) = send(&app, "GET", "/habits?month=2&year=2024", Some(&token), None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn note_lifecycle() {
    let app = test_app();
    let token = register(&app, "Ada", "ada@x.com").await;

    // Content persists verbatim, newlines and all.
    let (status, note) = send(
        &app,
        "POST",
        "/notes",
        Some(&token),
        Some(json!({
            "local_key": 1700000000000i64,
            "content": "line1\nline2",
            "updated_at": "March 1, 2024 at 09:00 AM",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(note["content"], json!("line1\nline2"));
    assert_eq!(note["local_key"], json!(1700000000000i64));
    let note_id = note["id"].as_str().unwrap().to_string();

    let (status, listed) = send(&app, "GET", "/notes", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Blank content is rejected at this layer, not just in the view.
    let (status, _) = send(
        &app,
        "POST",
        "/notes",
        Some(&token),
        Some(json!({ "local_key": 1i64, "content": " \n ", "updated_at": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Update replaces content and display timestamp; local_key survives.
    let uri = format!("/notes/{}", note_id);
    let (status, updated) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({ "content": "revised", "updated_at": "March 2, 2024 at 10:00 AM" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"], json!("revised"));
    assert_eq!(updated["local_key"], json!(1700000000000i64));

    // Updating a missing note is NotFound and creates nothing.
    let (status, _) = send(
        &app,
        "PUT",
        "/notes/00000000-0000-0000-0000-000000000999",
        Some(&token),
        Some(json!({ "content": "ghost", "updated_at": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, listed) = send(&app, "GET", "/notes", Some(&token), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Delete is idempotent.
    let (status, body) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let (status, _) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn mutating_someone_elses_records_is_forbidden() {
    let app = test_app();
    let ada = register(&app, "Ada", "ada@x.com").await;
    let eve = register(&app, "Eve", "eve@x.com").await;

    let (_, habit) = send(
        &app,
        "POST",
        "/habits",
        Some(&ada),
        Some(json!({ "name": "Exercise" })),
    )
    .await;
    let habit_id = habit["id"].as_str().unwrap().to_string();

    let (_, note) = send(
        &app,
        "POST",
        "/notes",
        Some(&ada),
        Some(json!({ "local_key": 1i64, "content": "mine", "updated_at": "x" })),
    )
    .await;
    let note_id = note["id"].as_str().unwrap().to_string();

    let uri = format!("/habits/{}/checkmarks", habit_id);
    let (status, _) = send(&app, "PUT", &uri, Some(&eve), Some(json!({ "day_index": 0 }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/habits/{}", habit_id);
    let (status, _) = send(&app, "DELETE", &uri, Some(&eve), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/notes/{}", note_id);
    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&eve),
        Some(json!({ "content": "stolen", "updated_at": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "DELETE", &uri, Some(&eve), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Owners are scoped on list, too.
    let (_, listed) = send(&app, "GET", "/notes", Some(&eve), None).await;
    assert!(listed.as_array().unwrap().is_empty());
}
