// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use contacts_model::{Contact, ContactId};
use contacts_server::{build_router, ApiConfig, AppState};
use contacts_store::{
    ContactStore, MemoryContactStore, SqliteContactStore, StoreError, StoreErrorCode,
};
use serde_json::{json, Value};
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

struct RawResponse {
    status: u16,
    head: String,
    body: String,
}

impl RawResponse {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("json body")
    }

    fn header(&self, name: &str) -> Option<String> {
        let prefix = format!("{}: ", name.to_ascii_lowercase());
        self.head.lines().find_map(|line| {
            line.to_ascii_lowercase()
                .starts_with(&prefix)
                .then(|| line[prefix.len()..].to_string())
        })
    }

    fn error_code(&self) -> Option<String> {
        self.json()
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(Value::as_str)
            .map(ToString::to_string)
    }
}

async fn send_raw(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> RawResponse {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    if let Some(body) = body {
        req.push_str("Content-Type: application/json\r\n");
        req.push_str(&format!("Content-Length: {}\r\n\r\n{body}", body.len()));
    } else {
        req.push_str("\r\n");
    }
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    RawResponse {
        status,
        head: head.to_string(),
        body: body.to_string(),
    }
}

async fn serve(state: AppState) -> std::net::SocketAddr {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

async fn serve_memory() -> std::net::SocketAddr {
    serve(AppState::new(Arc::new(MemoryContactStore::new()))).await
}

#[tokio::test]
async fn create_read_delete_scenario() {
    let addr = serve_memory().await;

    let created = send_raw(
        addr,
        "POST",
        "/api/contacts",
        &[],
        Some(
            r#"{"name":"Ada","surname":"Lovelace","phoneNumber":"+44 20 7946 0958","email":"ada@example.com"}"#,
        ),
    )
    .await;
    assert_eq!(created.status, 201);
    let body = created.json();
    let id = body["id"].as_str().expect("id").to_string();
    assert!(!id.is_empty());
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["surname"], "Lovelace");
    assert_eq!(body["phoneNumber"], "+44 20 7946 0958");
    assert_eq!(body["email"], "ada@example.com");

    let fetched = send_raw(addr, "GET", &format!("/api/contacts/{id}"), &[], None).await;
    assert_eq!(fetched.status, 200);
    assert_eq!(
        fetched.json(),
        json!({
            "id": id.as_str(),
            "name": "Ada",
            "surname": "Lovelace",
            "phoneNumber": "+44 20 7946 0958",
            "email": "ada@example.com"
        })
    );

    let listed = send_raw(addr, "GET", "/api/contacts", &[], None).await;
    assert_eq!(listed.status, 200);
    assert_eq!(listed.json(), json!([body]));

    let deleted = send_raw(addr, "DELETE", &format!("/api/contacts/{id}"), &[], None).await;
    assert_eq!(deleted.status, 204);
    assert!(deleted.body.is_empty());

    let gone = send_raw(addr, "GET", &format!("/api/contacts/{id}"), &[], None).await;
    assert_eq!(gone.status, 404);
    assert_eq!(gone.error_code().as_deref(), Some("ContactNotFound"));
    assert_eq!(gone.json()["error"]["message"], "Contact not found");

    let again = send_raw(addr, "DELETE", &format!("/api/contacts/{id}"), &[], None).await;
    assert_eq!(again.status, 404);
}

#[tokio::test]
async fn empty_collection_lists_as_empty_array() {
    let addr = serve_memory().await;
    let listed = send_raw(addr, "GET", "/api/contacts", &[], None).await;
    assert_eq!(listed.status, 200);
    assert_eq!(listed.json(), json!([]));
}

#[tokio::test]
async fn client_supplied_id_is_ignored_on_create() {
    let addr = serve_memory().await;
    let created = send_raw(
        addr,
        "POST",
        "/api/contacts",
        &[],
        Some(r#"{"id":"forged","name":"Alan","surname":"Turing","phoneNumber":"+1 555-0100"}"#),
    )
    .await;
    assert_eq!(created.status, 201);
    let body = created.json();
    assert_ne!(body["id"], "forged");
    assert_eq!(body["phoneNumber"], "+1 555-0100");

    let forged = send_raw(addr, "GET", "/api/contacts/forged", &[], None).await;
    assert_eq!(forged.status, 404);
}

#[tokio::test]
async fn unknown_ids_return_not_found_on_every_verb() {
    let addr = serve_memory().await;
    let path = "/api/contacts/000000000000000000000000";
    assert_eq!(send_raw(addr, "GET", path, &[], None).await.status, 404);
    assert_eq!(send_raw(addr, "DELETE", path, &[], None).await.status, 404);
    let put = send_raw(
        addr,
        "PUT",
        path,
        &[],
        Some(r#"{"name":"Grace","surname":"Hopper"}"#),
    )
    .await;
    assert_eq!(put.status, 404);
    assert_eq!(put.json()["error"]["details"]["id"], "000000000000000000000000");

    let listed = send_raw(addr, "GET", "/api/contacts", &[], None).await;
    assert_eq!(listed.json(), json!([]));
}

#[tokio::test]
async fn invalid_bodies_are_rejected_without_mutation() {
    let addr = serve_memory().await;
    let cases = [
        (r#"{"name":"","surname":"Lovelace"}"#, "name"),
        (r#"{"name":"Ada","surname":"   "}"#, "surname"),
        (r#"{"name":"Ada"}"#, "surname"),
        (r#"{"name":"Ada","surname":"Lovelace","email":"not-an-email"}"#, "email"),
        (r#"{"name":"Ada","surname":"Lovelace","phoneNumber":"123"}"#, "phoneNumber"),
    ];
    for (body, field) in cases {
        let resp = send_raw(addr, "POST", "/api/contacts", &[], Some(body)).await;
        assert_eq!(resp.status, 400, "{body}");
        let json = resp.json();
        assert_eq!(json["error"]["code"], "ValidationFailed");
        let fields = json["error"]["details"]["field_errors"]
            .as_array()
            .expect("field errors")
            .iter()
            .map(|f| f["field"].as_str().expect("field").to_string())
            .collect::<Vec<_>>();
        assert!(fields.contains(&field.to_string()), "{body}: {fields:?}");
    }

    let both = send_raw(addr, "POST", "/api/contacts", &[], Some(r#"{}"#)).await;
    let messages = both.json()["error"]["details"]["field_errors"]
        .as_array()
        .expect("field errors")
        .iter()
        .map(|f| f["message"].as_str().expect("message").to_string())
        .collect::<Vec<_>>();
    assert_eq!(messages, vec!["Name is required", "Surname is required"]);

    let listed = send_raw(addr, "GET", "/api/contacts", &[], None).await;
    assert_eq!(listed.json(), json!([]));
}

#[tokio::test]
async fn malformed_json_is_invalid_body() {
    let addr = serve_memory().await;
    let resp = send_raw(addr, "POST", "/api/contacts", &[], Some("{not json")).await;
    assert_eq!(resp.status, 400);
    assert_eq!(resp.error_code().as_deref(), Some("InvalidBody"));
    assert!(resp.json()["error"]["request_id"]
        .as_str()
        .expect("request id")
        .starts_with("req-"));
}

#[tokio::test]
async fn oversized_body_is_payload_too_large() {
    let api = ApiConfig {
        max_body_bytes: 64,
        ..ApiConfig::default()
    };
    let addr = serve(AppState::with_config(Arc::new(MemoryContactStore::new()), api)).await;
    let big = format!(r#"{{"name":"{}","surname":"Lovelace"}}"#, "A".repeat(200));
    let resp = send_raw(addr, "POST", "/api/contacts", &[], Some(&big)).await;
    assert_eq!(resp.status, 413);
    assert_eq!(resp.error_code().as_deref(), Some("PayloadTooLarge"));
}

#[tokio::test]
async fn put_fully_replaces_and_keeps_id() {
    let addr = serve_memory().await;
    let created = send_raw(
        addr,
        "POST",
        "/api/contacts",
        &[],
        Some(r#"{"name":"Ada","surname":"Lovelace","phoneNumber":"+44 20 7946 0000","email":"ada@example.com"}"#),
    )
    .await
    .json();
    let id = created["id"].as_str().expect("id").to_string();

    let replaced = send_raw(
        addr,
        "PUT",
        &format!("/api/contacts/{id}"),
        &[],
        Some(r#"{"id":"other","name":"Augusta","surname":"King"}"#),
    )
    .await;
    assert_eq!(replaced.status, 200);
    let body = replaced.json();
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["name"], "Augusta");
    assert_eq!(body["phoneNumber"], Value::Null);
    assert_eq!(body["email"], Value::Null);

    let fetched = send_raw(addr, "GET", &format!("/api/contacts/{id}"), &[], None).await;
    assert_eq!(fetched.json(), body);

    let invalid = send_raw(
        addr,
        "PUT",
        &format!("/api/contacts/{id}"),
        &[],
        Some(r#"{"name":"Augusta","surname":"King","phoneNumber":"123"}"#),
    )
    .await;
    assert_eq!(invalid.status, 400);
    let unchanged = send_raw(addr, "GET", &format!("/api/contacts/{id}"), &[], None).await;
    assert_eq!(unchanged.json(), body);
}

#[tokio::test]
async fn invalid_put_bodies_leave_the_document_unchanged() {
    let addr = serve_memory().await;
    let created = send_raw(
        addr,
        "POST",
        "/api/contacts",
        &[],
        Some(r#"{"name":"Ada","surname":"Lovelace","email":"ada@example.com"}"#),
    )
    .await
    .json();
    let id = created["id"].as_str().expect("id").to_string();
    let path = format!("/api/contacts/{id}");

    let cases = [
        (r#"{"name":"","surname":"King"}"#, "name"),
        (r#"{"name":"Augusta","surname":"  "}"#, "surname"),
        (r#"{"name":"Augusta","surname":"King","email":"not-an-email"}"#, "email"),
    ];
    for (body, field) in cases {
        let resp = send_raw(addr, "PUT", &path, &[], Some(body)).await;
        assert_eq!(resp.status, 400, "{body}");
        assert_eq!(resp.error_code().as_deref(), Some("ValidationFailed"));
        assert_eq!(resp.json()["error"]["details"]["field_errors"][0]["field"], field);

        let unchanged = send_raw(addr, "GET", &path, &[], None).await;
        assert_eq!(unchanged.json(), created, "{body}");
    }

    let unknown = send_raw(
        addr,
        "PUT",
        "/api/contacts/000000000000000000000000",
        &[],
        Some(r#"{"name":"","surname":"King"}"#),
    )
    .await;
    assert_eq!(unknown.status, 400);
}

#[tokio::test]
async fn blank_names_follow_control_character_rule() {
    let addr = serve_memory().await;
    let control = send_raw(
        addr,
        "POST",
        "/api/contacts",
        &[],
        Some(r#"{"name":"\u0001","surname":"X"}"#),
    )
    .await;
    assert_eq!(control.status, 400);
    assert_eq!(control.error_code().as_deref(), Some("ValidationFailed"));

    let nbsp = send_raw(
        addr,
        "POST",
        "/api/contacts",
        &[],
        Some(r#"{"name":"\u00a0","surname":"X"}"#),
    )
    .await;
    assert_eq!(nbsp.status, 201);
    assert_eq!(nbsp.json()["name"], "\u{00a0}");
}

#[tokio::test]
async fn scalar_field_values_are_stored_as_text() {
    let addr = serve_memory().await;
    let created = send_raw(
        addr,
        "POST",
        "/api/contacts",
        &[],
        Some(r#"{"name":123,"surname":true,"phoneNumber":5550100123}"#),
    )
    .await;
    assert_eq!(created.status, 201);
    let body = created.json();
    assert_eq!(body["name"], "123");
    assert_eq!(body["surname"], "true");
    assert_eq!(body["phoneNumber"], "5550100123");

    let structured = send_raw(
        addr,
        "POST",
        "/api/contacts",
        &[],
        Some(r#"{"name":{"first":"Ada"},"surname":"Lovelace"}"#),
    )
    .await;
    assert_eq!(structured.status, 400);
    assert_eq!(structured.error_code().as_deref(), Some("InvalidBody"));
}

#[tokio::test]
async fn undecodable_path_ids_use_the_error_envelope() {
    let addr = serve_memory().await;
    for method in ["GET", "DELETE"] {
        let resp = send_raw(addr, method, "/api/contacts/%FF", &[], None).await;
        assert_eq!(resp.status, 400, "{method}");
        assert_eq!(resp.error_code().as_deref(), Some("InvalidPath"), "{method}");
        assert!(resp.json()["error"]["request_id"]
            .as_str()
            .expect("request id")
            .starts_with("req-"));
    }
    let put = send_raw(
        addr,
        "PUT",
        "/api/contacts/%FF",
        &[],
        Some(r#"{"name":"Ada","surname":"Lovelace"}"#),
    )
    .await;
    assert_eq!(put.status, 400);
    assert_eq!(put.error_code().as_deref(), Some("InvalidPath"));
}

#[tokio::test]
async fn list_preserves_creation_order() {
    let addr = serve_memory().await;
    for name in ["Ada", "Alan", "Grace"] {
        let body = format!(r#"{{"name":"{name}","surname":"X"}}"#);
        assert_eq!(
            send_raw(addr, "POST", "/api/contacts", &[], Some(&body)).await.status,
            201
        );
    }
    let names = send_raw(addr, "GET", "/api/contacts", &[], None)
        .await
        .json()
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["name"].as_str().expect("name").to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Ada", "Alan", "Grace"]);
}

#[tokio::test]
async fn cors_is_open_to_any_origin() {
    let addr = serve_memory().await;
    let preflight = send_raw(
        addr,
        "OPTIONS",
        "/api/contacts",
        &[
            ("Origin", "https://ui.example"),
            ("Access-Control-Request-Method", "POST"),
        ],
        None,
    )
    .await;
    assert_eq!(preflight.status, 204);
    assert_eq!(preflight.header("access-control-allow-origin").as_deref(), Some("*"));
    assert_eq!(
        preflight.header("access-control-allow-methods").as_deref(),
        Some("GET,POST,PUT,DELETE,OPTIONS")
    );

    let simple = send_raw(
        addr,
        "GET",
        "/api/contacts",
        &[("Origin", "https://ui.example")],
        None,
    )
    .await;
    assert_eq!(simple.status, 200);
    assert_eq!(simple.header("access-control-allow-origin").as_deref(), Some("*"));
}

#[tokio::test]
async fn cors_allow_list_echoes_only_known_origins() {
    let api = ApiConfig {
        cors_allowed_origins: vec!["https://ui.example".to_string()],
        ..ApiConfig::default()
    };
    let addr = serve(AppState::with_config(Arc::new(MemoryContactStore::new()), api)).await;
    let allowed = send_raw(addr, "GET", "/api/contacts", &[("Origin", "https://ui.example")], None).await;
    assert_eq!(
        allowed.header("access-control-allow-origin").as_deref(),
        Some("https://ui.example")
    );
    let denied = send_raw(addr, "GET", "/api/contacts", &[("Origin", "https://evil.example")], None).await;
    assert_eq!(denied.status, 200);
    assert_eq!(denied.header("access-control-allow-origin"), None);
}

#[tokio::test]
async fn request_ids_are_echoed_and_generated() {
    let addr = serve_memory().await;
    let echoed = send_raw(addr, "GET", "/api/contacts", &[("x-request-id", "req-client-1")], None).await;
    assert_eq!(echoed.header("x-request-id").as_deref(), Some("req-client-1"));

    let missing = send_raw(addr, "GET", "/api/contacts/nope", &[("x-request-id", "req-client-2")], None).await;
    assert_eq!(missing.json()["error"]["request_id"], "req-client-2");

    let generated = send_raw(addr, "GET", "/healthz", &[], None).await;
    let id = generated.header("x-request-id").expect("request id");
    assert!(id.starts_with("req-"));
    assert_eq!(id.len(), 20);
}

#[tokio::test]
async fn operational_endpoints_report_state() {
    let state = AppState::new(Arc::new(MemoryContactStore::new()));
    let ready = state.ready.clone();
    let addr = serve(state).await;

    let health = send_raw(addr, "GET", "/healthz", &[], None).await;
    assert_eq!((health.status, health.body.as_str()), (200, "ok"));
    assert_eq!(send_raw(addr, "GET", "/readyz", &[], None).await.status, 200);

    ready.store(false, std::sync::atomic::Ordering::Relaxed);
    let not_ready = send_raw(addr, "GET", "/readyz", &[], None).await;
    assert_eq!(not_ready.status, 503);
    assert_eq!(not_ready.error_code().as_deref(), Some("NotReady"));

    let version = send_raw(addr, "GET", "/api/version", &[], None).await.json();
    assert_eq!(version["service"]["name"], "contacts-server");
    assert_eq!(version["store"], "memory");

    let openapi = send_raw(addr, "GET", "/api/openapi.json", &[], None).await.json();
    assert!(openapi["paths"].get("/api/contacts/{id}").is_some());

    send_raw(addr, "GET", "/api/contacts", &[], None).await;
    let metrics = send_raw(addr, "GET", "/metrics", &[], None).await;
    assert_eq!(metrics.status, 200);
    assert!(metrics
        .body
        .contains("contacts_http_requests_total{method=\"GET\",route=\"/api/contacts\",status=\"200\"}"));
    assert!(metrics.body.contains("contacts_store_backend_info{backend=\"memory\"} 1"));
}

struct FailingStore;

#[async_trait]
impl ContactStore for FailingStore {
    async fn find_all(&self) -> Result<Vec<Contact>, StoreError> {
        Err(StoreError::new(StoreErrorCode::Unavailable, "database is locked"))
    }

    async fn find_by_id(&self, _id: &ContactId) -> Result<Option<Contact>, StoreError> {
        Err(StoreError::new(StoreErrorCode::Io, "disk I/O error"))
    }

    async fn exists_by_id(&self, _id: &ContactId) -> Result<bool, StoreError> {
        Err(StoreError::new(StoreErrorCode::Io, "disk I/O error"))
    }

    async fn save(&self, _contact: Contact) -> Result<Contact, StoreError> {
        Err(StoreError::new(StoreErrorCode::Io, "disk I/O error"))
    }

    async fn delete_by_id(&self, _id: &ContactId) -> Result<(), StoreError> {
        Err(StoreError::new(StoreErrorCode::Io, "disk I/O error"))
    }
}

#[tokio::test]
async fn storage_faults_map_to_500_without_leaking_detail() {
    let addr = serve(AppState::new(Arc::new(FailingStore))).await;
    let list = send_raw(addr, "GET", "/api/contacts", &[], None).await;
    assert_eq!(list.status, 500);
    assert_eq!(list.error_code().as_deref(), Some("StorageUnavailable"));
    assert!(!list.body.contains("database is locked"));
    assert_eq!(list.json()["error"]["details"]["class"], "unavailable");

    let create = send_raw(
        addr,
        "POST",
        "/api/contacts",
        &[],
        Some(r#"{"name":"Ada","surname":"Lovelace"}"#),
    )
    .await;
    assert_eq!(create.status, 500);

    let invalid = send_raw(addr, "POST", "/api/contacts", &[], Some(r#"{"name":""}"#)).await;
    assert_eq!(invalid.status, 400);

    for method in ["GET", "DELETE"] {
        let resp = send_raw(addr, method, "/api/contacts/abc", &[], None).await;
        assert_eq!(resp.status, 500, "{method}");
    }
}

#[tokio::test]
async fn sqlite_backend_serves_the_same_contract() {
    let root = tempdir().expect("tmp");
    let store = SqliteContactStore::open(&root.path().join("contacts.sqlite")).expect("open");
    let addr = serve(AppState::new(Arc::new(store))).await;

    let created = send_raw(
        addr,
        "POST",
        "/api/contacts",
        &[],
        Some(r#"{"name":"Ada","surname":"Lovelace","email":"ada@example.com"}"#),
    )
    .await;
    assert_eq!(created.status, 201);
    let id = created.json()["id"].as_str().expect("id").to_string();
    assert_eq!(id.len(), 24);

    let fetched = send_raw(addr, "GET", &format!("/api/contacts/{id}"), &[], None).await;
    assert_eq!(fetched.json()["email"], "ada@example.com");
    assert_eq!(
        send_raw(addr, "DELETE", &format!("/api/contacts/{id}"), &[], None).await.status,
        204
    );
    assert_eq!(
        send_raw(addr, "DELETE", &format!("/api/contacts/{id}"), &[], None).await.status,
        404
    );
}
