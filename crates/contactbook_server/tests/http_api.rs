use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use contactbook_core::{with_contact_service, ContactInput, Store, StoreConfig};
use contactbook_server::config::default_cors_origins;
use contactbook_server::middleware::handle_panic;
use contactbook_server::{build_app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;

fn memory_store() -> Store {
    Store::open(&StoreConfig::in_memory()).unwrap()
}

fn app(store: &Store) -> Router {
    build_app(AppState::new(store.clone()), &default_cors_origins())
}

fn seed(store: &Store, count: usize) {
    for index in 0..count {
        with_contact_service(store, |service| {
            service.add_contact(ContactInput::new(
                format!("Contact {index}"),
                format!("contact{index}@example.com"),
                format!("{:010}", index),
            ))
        })
        .unwrap();
    }
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

async fn get_path(app: Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: Router, uri: &str, body: &str) -> Response {
    send(
        app,
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn delete_path(app: Router, uri: &str) -> Response {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn welcome_message_is_served_at_root() {
    let store = memory_store();
    let response = get_path(app(&store), "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "message": "Welcome to Contact Book API" })
    );
}

#[tokio::test]
async fn list_uses_default_paging() {
    let store = memory_store();
    seed(&store, 12);

    let response = get_path(app(&store), "/contacts").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["contacts"].as_array().unwrap().len(), 10);
    assert_eq!(body["total"], 12);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["contacts"][0]["email"], "contact11@example.com");
}

#[tokio::test]
async fn list_honors_page_and_limit() {
    let store = memory_store();
    seed(&store, 7);

    let response = get_path(app(&store), "/contacts?page=2&limit=3").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["contacts"].as_array().unwrap().len(), 3);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["contacts"][0]["email"], "contact3@example.com");
}

#[tokio::test]
async fn list_on_empty_store_reports_zero_pages() {
    let store = memory_store();
    let body = json_body(get_path(app(&store), "/contacts").await).await;

    assert_eq!(body["contacts"], json!([]));
    assert_eq!(body["total"], 0);
    assert_eq!(body["totalPages"], 0);
}

#[tokio::test]
async fn bad_pagination_is_rejected() {
    let store = memory_store();
    for uri in [
        "/contacts?limit=101",
        "/contacts?limit=0",
        "/contacts?page=-1",
        "/contacts?page=0",
        "/contacts?page=abc",
    ] {
        let response = get_path(app(&store), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Invalid pagination parameters" }),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn add_returns_created_record() {
    let store = memory_store();
    let response = post_json(
        app(&store),
        "/contacts",
        r#"{"name":"  Ada Lovelace ","email":"ada@example.com","phone":"(555) 123-4567"}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert!(body["id"].as_i64().unwrap() >= 1);
    assert_eq!(body["name"], "Ada Lovelace");
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["phone"], "5551234567");
    assert!(body["created_at"].is_string());

    let listed = json_body(get_path(app(&store), "/contacts").await).await;
    assert_eq!(listed["total"], 1);
    assert_eq!(listed["contacts"][0]["id"], body["id"]);
}

#[tokio::test]
async fn add_reports_field_errors() {
    let store = memory_store();
    let response = post_json(
        app(&store),
        "/contacts",
        r#"{"name":"","email":"not-an-email","phone":"12345"}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"]["name"], "Name is required");
    assert_eq!(body["details"]["email"], "Valid email is required");
    assert_eq!(body["details"]["phone"], "Phone must be exactly 10 digits");

    let listed = json_body(get_path(app(&store), "/contacts").await).await;
    assert_eq!(listed["total"], 0);
}

#[tokio::test]
async fn add_rejects_duplicate_email() {
    let store = memory_store();
    let payload = r#"{"name":"Ada","email":"ada@example.com","phone":"5551234567"}"#;

    let first = post_json(app(&store), "/contacts", payload).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(app(&store), "/contacts", payload).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(second).await,
        json!({ "error": "Contact already exists" })
    );
}

#[tokio::test]
async fn add_rejects_malformed_json() {
    let store = memory_store();
    for payload in ["{not json", r#"{"name":42,"email":"a@b.co","phone":"5551234567"}"#] {
        let response = post_json(app(&store), "/contacts", payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Invalid JSON body" }),
            "{payload}"
        );
    }
}

#[tokio::test]
async fn delete_removes_contact() {
    let store = memory_store();
    seed(&store, 1);
    let listed = json_body(get_path(app(&store), "/contacts").await).await;
    let id = listed["contacts"][0]["id"].as_i64().unwrap();

    let response = delete_path(app(&store), &format!("/contacts/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());

    let again = delete_path(app(&store), &format!("/contacts/{id}")).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(again).await, json!({ "error": "Contact not found" }));
}

#[tokio::test]
async fn delete_rejects_invalid_ids() {
    let store = memory_store();
    for uri in ["/contacts/abc", "/contacts/0", "/contacts/-4", "/contacts/%FF"] {
        let response = delete_path(app(&store), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Invalid contact ID" }),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn health_reports_timestamp() {
    let store = memory_store();
    let response = get_path(app(&store), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "OK");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(timestamp.ends_with('Z'));
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn unmatched_routes_and_methods_return_json_404() {
    let store = memory_store();

    let missing = get_path(app(&store), "/nope").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(missing).await, json!({ "error": "Route not found" }));

    let wrong_method = send(
        app(&store),
        Request::put("/contacts").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(wrong_method.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(wrong_method).await,
        json!({ "error": "Route not found" })
    );

    let get_by_id = get_path(app(&store), "/contacts/1").await;
    assert_eq!(get_by_id.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_allows_listed_origins_only() {
    let store = memory_store();

    let allowed = send(
        app(&store),
        Request::get("/contacts")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(
        allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("http://localhost:3000"))
    );
    assert_eq!(
        allowed
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
        Some(&HeaderValue::from_static("true"))
    );

    let denied = send(
        app(&store),
        Request::get("/contacts")
            .header(header::ORIGIN, "https://evil.example")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert!(denied
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn cors_preflight_lists_allowed_methods() {
    let store = memory_store();
    let response = send(
        app(&store),
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/contacts")
            .header(header::ORIGIN, "https://contactsmanagerapp.netlify.app")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let methods = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    for method in ["GET", "POST", "DELETE"] {
        assert!(methods.contains(method), "{methods}");
    }
}

#[tokio::test]
async fn panicking_handler_returns_internal_error() {
    async fn explode() -> &'static str {
        panic!("handler exploded")
    }

    let app = Router::new()
        .route("/explode", get(explode))
        .layer(CatchPanicLayer::custom(handle_panic));

    let response = get_path(app, "/explode").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Internal server error" })
    );
}

#[tokio::test]
async fn file_store_keeps_contacts_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::file(dir.path().join("data").join("contacts.sqlite3"));

    let first = Store::open(&config).unwrap();
    assert!(first.mode().is_persistent());
    let response = post_json(
        app(&first),
        "/contacts",
        r#"{"name":"Ada","email":"ada@example.com","phone":"5551234567"}"#,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    drop(first);

    let reopened = Store::open(&config).unwrap();
    let body = json_body(get_path(app(&reopened), "/contacts").await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["contacts"][0]["email"], "ada@example.com");
}
