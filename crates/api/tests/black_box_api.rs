use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use clientsvc_infra::InMemoryClientStore;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, but backed by the in-memory store and bound
        // to an ephemeral port.
        let app = clientsvc_api::app::build_app(Arc::new(InMemoryClientStore::new()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn valid_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "phone": "+12345678901",
        "email": format!("{name}@example.com"),
    })
}

async fn create_client(
    client: &reqwest::Client,
    base_url: &str,
    body: &serde_json::Value,
) -> reqwest::Response {
    client
        .post(format!("{base_url}/clients"))
        .json(body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_returns_literal_text() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(&srv.base_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Service is healthy");
}

#[tokio::test]
async fn create_returns_201_with_generated_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Any id supplied by the caller must be discarded.
    let submitted_id = "11111111-1111-1111-1111-111111111111";
    let mut body = valid_body("acme");
    body["id"] = json!(submitted_id);

    let res = create_client(&client, &srv.base_url, &body).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert_ne!(id, submitted_id);
    assert_eq!(created["name"], "acme");
    assert_eq!(created["phone"], "+12345678901");
    assert_eq!(created["email"], "acme@example.com");
    // No comment was sent, so the key must be omitted entirely.
    assert!(created.get("comment").is_none());
}

#[tokio::test]
async fn create_with_malformed_json_is_400() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/clients", srv.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_body");
}

#[tokio::test]
async fn create_with_short_phone_is_400_and_inserts_nothing() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut body = valid_body("acme");
    body["phone"] = json!("123");

    let res = create_client(&client, &srv.base_url, &body).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], "invalid_format");

    // Fail-fast: nothing reached the store.
    let res = client
        .get(format!("{}/clients", srv.base_url))
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn create_comment_boundary_is_255_characters() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut at_limit = valid_body("ok");
    at_limit["comment"] = json!("x".repeat(255));
    let res = create_client(&client, &srv.base_url, &at_limit).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let mut over_limit = valid_body("nope");
    over_limit["comment"] = json!("x".repeat(256));
    let res = create_client(&client, &srv.base_url, &over_limit).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], "comment_too_long");
}

#[tokio::test]
async fn get_of_unknown_id_is_404() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!(
            "{}/clients/22222222-2222-2222-2222-222222222222",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // A path id that is not even a UUID cannot match any row either.
    let res = client
        .get(format!("{}/clients/not-a-uuid", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_returns_the_created_record() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let mut body = valid_body("acme");
    body["comment"] = json!("key account");
    let res = create_client(&client, &srv.base_url, &body).await;
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    let res = client
        .get(format!("{}/clients/{id}", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn list_paginates_and_tolerates_out_of_range_offset() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for i in 0..5 {
        let res = create_client(&client, &srv.base_url, &valid_body(&format!("c{i}"))).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .get(format!("{}/clients?limit=2&offset=0", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: serde_json::Value = res.json().await.unwrap();
    assert_eq!(page.as_array().unwrap().len(), 2);

    // Past the end: an empty array, never an error.
    let res = client
        .get(format!("{}/clients?offset=5", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let page: serde_json::Value = res.json().await.unwrap();
    assert_eq!(page, json!([]));
}

#[tokio::test]
async fn list_with_bad_parameter_names_the_offender() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/clients?limit=abc", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: serde_json::Value = res.json().await.unwrap();
    assert!(err["message"].as_str().unwrap().contains("limit"));

    let res = client
        .get(format!("{}/clients?offset=-3", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: serde_json::Value = res.json().await.unwrap();
    assert!(err["message"].as_str().unwrap().contains("offset"));
}

#[tokio::test]
async fn update_of_unknown_id_is_404_and_creates_nothing() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .put(format!(
            "{}/clients/33333333-3333-3333-3333-333333333333",
            srv.base_url
        ))
        .json(&valid_body("ghost"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/clients", srv.base_url))
        .send()
        .await
        .unwrap();
    let listed: serde_json::Value = res.json().await.unwrap();
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_the_path_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = create_client(&client, &srv.base_url, &valid_body("before")).await;
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let res = client
        .put(format!("{}/clients/{id}", srv.base_url))
        .json(&json!({
            "name": "after",
            "phone": "+19876543210",
            "email": "after@example.com",
            "comment": "renamed",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["name"], "after");
    assert_eq!(updated["comment"], "renamed");

    let res = client
        .get(format!("{}/clients/{id}", srv.base_url))
        .send()
        .await
        .unwrap();
    let fetched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_validation_checks_email_before_phone() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = create_client(&client, &srv.base_url, &valid_body("acme")).await;
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap();

    // Both fields invalid: the email failure must win.
    let res = client
        .put(format!("{}/clients/{id}", srv.base_url))
        .json(&json!({ "name": "acme", "phone": "123", "email": "broken" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: serde_json::Value = res.json().await.unwrap();
    assert!(err["message"].as_str().unwrap().contains("email"));

    // Valid email, invalid phone: now the phone failure surfaces.
    let res = client
        .put(format!("{}/clients/{id}", srv.base_url))
        .json(&json!({ "name": "acme", "phone": "123", "email": "ok@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: serde_json::Value = res.json().await.unwrap();
    assert!(err["message"].as_str().unwrap().contains("phone"));
}

#[tokio::test]
async fn delete_then_get_then_delete_again() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = create_client(&client, &srv.base_url, &valid_body("doomed")).await;
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let res = client
        .delete(format!("{}/clients/{id}", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Client deleted");

    let res = client
        .get(format!("{}/clients/{id}", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // End state is the same, but the status code is not idempotent.
    let res = client
        .delete(format!("{}/clients/{id}", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
