mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common::{sample_event, seed_event};
use eventhub::api::build_router;
use eventhub::config::Settings;
use eventhub::db::ConnectionManager;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

fn settings(legacy_array_encoding: bool) -> Settings {
    Settings {
        database_url: "postgres://unused".to_string(),
        base_url: "https://events.example.com".to_string(),
        host: "127.0.0.1".to_string(),
        port: 3000,
        max_connections: 1,
        legacy_array_encoding,
    }
}

fn app(db: Arc<ConnectionManager>, legacy: bool) -> Router {
    build_router(db, settings(legacy))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_get_event_by_slug(pool: PgPool) {
    let db = Arc::new(ConnectionManager::from_pool(pool));
    let event = seed_event(&db, "Hackathon 2024").await;

    let (status, body) = send(app(db, false), get("/events/HACKATHON-2024")).await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event fetched successfully");
    assert_eq!(body["event"]["id"], event.id.to_string());
    assert_eq!(body["event"]["slug"], "hackathon-2024");
    assert_eq!(body["event"]["date"], "2024-09-15");
    assert_eq!(body["event"]["agenda"], json!(["Opening keynote", "Hacking"]));
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_get_event_legacy_array_shape(pool: PgPool) {
    let db = Arc::new(ConnectionManager::from_pool(pool));
    seed_event(&db, "Hackathon 2024").await;

    let (status, body) = send(app(db, true), get("/events/hackathon-2024")).await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["tags"], json!([r#"["hackathon","web"]"#]));
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_get_unknown_event_is_bad_request(pool: PgPool) {
    let db = Arc::new(ConnectionManager::from_pool(pool));

    let (status, body) = send(app(db, false), get("/events/ghost-event")).await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Event with slug ghost-event not found");
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_get_blank_slug_is_bad_request(pool: PgPool) {
    let db = Arc::new(ConnectionManager::from_pool(pool));

    let (status, body) = send(app(db, false), get("/events/%20%20")).await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or missing slug parameter");
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_create_event_endpoint(pool: PgPool) {
    let db = Arc::new(ConnectionManager::from_pool(pool));
    let mut payload = sample_event_json();
    payload["agenda"] = json!([r#"["Doors open","Talks"]"#]);

    let (status, body) = send(app(db, false), post_json("/events", payload)).await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["event"]["slug"], "rust-nation-2025");
    assert_eq!(body["event"]["time"], "10:00");
    assert_eq!(body["event"]["agenda"], json!(["Doors open", "Talks"]));
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_create_event_validation_lists_fields(pool: PgPool) {
    let db = Arc::new(ConnectionManager::from_pool(pool));
    let mut payload = sample_event_json();
    payload["mode"] = json!("Virtual");
    payload["tags"] = json!([]);

    let (status, body) = send(app(db, false), post_json("/events", payload)).await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"mode"));
    assert!(fields.contains(&"tags"));
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_patch_event(pool: PgPool) {
    let db = Arc::new(ConnectionManager::from_pool(pool));
    seed_event(&db, "Hackathon 2024").await;

    let request = Request::builder()
        .method("PATCH")
        .uri("/events/hackathon-2024")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"date": "2024-10-01T09:00:00Z"}).to_string()))
        .unwrap();
    let (status, body) = send(app(db, false), request).await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["date"], "2024-10-01");
    assert_eq!(body["event"]["slug"], "hackathon-2024");
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_create_booking_endpoint(pool: PgPool) {
    let db = Arc::new(ConnectionManager::from_pool(pool));
    let event = seed_event(&db, "Hackathon 2024").await;

    let (status, body) = send(
        app(db, false),
        post_json(
            "/bookings",
            json!({"eventId": event.id, "slug": "hackathon-2024", "email": "ada@example.org"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"success": true}));
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_create_booking_unknown_event(pool: PgPool) {
    let db = Arc::new(ConnectionManager::from_pool(pool));

    let (status, body) = send(
        app(db, false),
        post_json(
            "/bookings",
            json!({"eventId": uuid::Uuid::new_v4(), "email": "ada@example.org"}),
        ),
    )
    .await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "event does not exist");
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_create_booking_malformed_event_id(pool: PgPool) {
    let db = Arc::new(ConnectionManager::from_pool(pool));

    let (status, body) = send(
        app(db, false),
        post_json("/bookings", json!({"eventId": "abc", "email": "ada@example.org"})),
    )
    .await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_event_page_renders(pool: PgPool) {
    let db = Arc::new(ConnectionManager::from_pool(pool));
    let event = seed_event(&db, "Hackathon 2024").await;
    eventhub::services::BookingService::new(&db)
        .create_booking(event.id, "ada@example.org")
        .await
        .unwrap();

    let (status, body) = send(app(db, false), get("/events/hackathon-2024/view")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Hackathon 2024</h1>"));
    assert!(body.contains("<li>Opening keynote</li>"));
    assert!(body.contains("Join 1 person who has already booked their spot!"));
    assert!(body.contains("https://events.example.com/images/event1.png"));
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_event_page_not_found(pool: PgPool) {
    let db = Arc::new(ConnectionManager::from_pool(pool));

    let (status, body) = send(app(db, false), get("/events/ghost/view")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Event not found"));
}

#[tokio::test]
async fn test_create_booking_without_email_reports_failure() {
    let db = Arc::new(ConnectionManager::new(None, 1));

    let (status, body) = send(
        app(db, false),
        post_json("/bookings", json!({"eventId": uuid::Uuid::new_v4()})),
    )
    .await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "invalid email");
}

#[tokio::test]
async fn test_create_booking_with_numeric_event_id_reports_failure() {
    let db = Arc::new(ConnectionManager::new(None, 1));

    let (status, body) = send(
        app(db, false),
        post_json("/bookings", json!({"eventId": 42, "email": "ada@example.org"})),
    )
    .await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("eventId"));
}

#[tokio::test]
async fn test_create_event_with_missing_fields_lists_them() {
    let db = Arc::new(ConnectionManager::new(None, 1));

    let (status, body) = send(
        app(db, false),
        post_json("/events", json!({"description": "x"})),
    )
    .await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    for field in [
        "title", "description", "overview", "image", "venue", "location", "date", "time",
        "mode", "audience", "agenda", "organizer", "tags",
    ] {
        assert!(fields.contains(&field), "missing {} in {:?}", field, fields);
    }
}

#[tokio::test]
async fn test_patch_event_with_malformed_body_is_bad_request() {
    let db = Arc::new(ConnectionManager::new(None, 1));
    let request = Request::builder()
        .method("PATCH")
        .uri("/events/hackathon-2024")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"agenda": "not a list"}).to_string()))
        .unwrap();

    let (status, body) = send(app(db, false), request).await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("agenda"));
}

#[tokio::test]
async fn test_health() {
    let db = Arc::new(ConnectionManager::new(None, 1));

    let (status, body) = send(app(db, false), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"status": "ok"}));
}

#[tokio::test]
async fn test_lookup_without_database_url_is_internal_error() {
    let db = Arc::new(ConnectionManager::new(None, 1));

    let (status, body) = send(app(db, false), get("/events/hackathon-2024")).await;
    let body: Value = serde_json::from_str(&body).unwrap();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error while fetching event by slug");
    assert_eq!(body["error"], "internal_error");
}

fn sample_event_json() -> Value {
    let event = sample_event("Rust Nation 2025");
    json!({
        "title": event.title,
        "description": event.description,
        "overview": event.overview,
        "image": event.image,
        "venue": event.venue,
        "location": event.location,
        "date": event.date,
        "time": event.time,
        "mode": event.mode,
        "audience": event.audience,
        "agenda": event.agenda,
        "organizer": event.organizer,
        "tags": event.tags,
    })
}
