//! Integration tests for the TeamOrg backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::db::{init_database, DocumentStore};
use crate::state::SharedState;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let store = DocumentStore::new(pool, "teamorg");
        let document = store
            .initialize_if_absent()
            .await
            .expect("Failed to init document");

        // Create config; the ticker stays off so counters are deterministic
        let config = Config {
            db_path,
            storage_key: "teamorg".to_string(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            tick_interval: None,
        };

        let state = AppState {
            shared: Arc::new(SharedState::new(document, store)),
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn put(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .put(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    /// Create an entry through the modal: navigate, open, apply.
    async fn create(&self, component: &str, fields: Value) -> Value {
        let (status, _) = self
            .post("/api/navigate", json!({ "component": component }))
            .await;
        assert_eq!(status, 200);
        let (status, _) = self.post("/api/modal/open", json!({})).await;
        assert_eq!(status, 200);
        let (status, body) = self
            .post("/api/modal/apply", json!({ "fields": fields }))
            .await;
        assert_eq!(status, 200, "apply failed: {}", body);
        body
    }

    async fn select(&self, collection: &str, id: u64) {
        let (status, _) = self
            .post(
                "/api/select",
                json!({ "collection": collection, "id": id }),
            )
            .await;
        assert_eq!(status, 200);
    }
}

fn header_names(table: &Value) -> Vec<String> {
    table["data"]["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["name"].as_str().unwrap().to_string())
        .collect()
}

fn first_cells(table: &Value) -> Vec<String> {
    table["data"]["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["cells"][0]["value"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_document_get() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/document").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["schemaVersion"], 1);
    assert!(body["data"]["users"]["data"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["users"]["config"]["sort"]["sortBy"], "id");
    assert!(body["revisionId"].is_number());
}

#[tokio::test]
async fn test_document_revision() {
    let fixture = TestFixture::new().await;

    let (_, before) = fixture.get("/api/document/revision").await;
    let before = before["data"]["revisionId"].as_i64().unwrap();

    fixture.create("users", json!({ "name": "Nikos" })).await;

    let (status, after) = fixture.get("/api/document/revision").await;
    assert_eq!(status, 200);
    assert_eq!(after["data"]["revisionId"].as_i64().unwrap(), before + 1);
    assert!(after["data"]["generatedAt"].is_string());
}

#[tokio::test]
async fn test_user_crud_through_modal() {
    let fixture = TestFixture::new().await;

    // Create
    let created = fixture
        .create("users", json!({ "name": "  Nikos ", "pic": "img/user.svg" }))
        .await;
    assert_eq!(created["data"]["state"]["modal"]["state"], "closed");
    assert!(created["data"]["rerender"]
        .as_array()
        .unwrap()
        .contains(&json!("users")));

    let (_, table) = fixture.get("/api/tables/users").await;
    assert_eq!(table["data"]["tableId"], "users-table");
    assert_eq!(header_names(&table), vec!["name", "role", "pic"]);
    assert_eq!(first_cells(&table), vec!["Nikos"]);
    let user_id = table["data"]["rows"][0]["entryId"].as_u64().unwrap();

    // Edit: the open form is pre-filled from the selection
    fixture.select("users", user_id).await;
    let (status, opened) = fixture.post("/api/modal/open", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(opened["data"]["form"]["title"], "Edit User");
    assert_eq!(opened["data"]["form"]["mode"], "edit");
    assert_eq!(opened["data"]["form"]["fields"][0]["value"], "Nikos");

    let (status, _) = fixture
        .post("/api/modal/apply", json!({ "fields": { "name": "Nikos P." } }))
        .await;
    assert_eq!(status, 200);
    let (_, table) = fixture.get("/api/tables/users").await;
    assert_eq!(first_cells(&table), vec!["Nikos P."]);

    // Delete
    fixture.select("users", user_id).await;
    let (status, deleted) = fixture.post("/api/entries/delete", json!({})).await;
    assert_eq!(status, 200);
    assert!(deleted["data"]["state"]["selection"].is_null());
    let (_, table) = fixture.get("/api/tables/users").await;
    assert!(table["data"]["rows"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_leaves_document_unchanged() {
    let fixture = TestFixture::new().await;
    fixture
        .post("/api/navigate", json!({ "component": "roles" }))
        .await;
    fixture.post("/api/modal/open", json!({})).await;

    let (_, before) = fixture.get("/api/document").await;
    let (status, body) = fixture.post("/api/modal/cancel", json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["state"]["modal"]["state"], "closed");

    let (_, after) = fixture.get("/api/document").await;
    assert_eq!(after["revisionId"], before["revisionId"]);

    // Nothing is open anymore
    let (status, body) = fixture
        .post("/api/modal/apply", json!({ "fields": { "name": "Admin" } }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_role_membership_resync() {
    let fixture = TestFixture::new().await;
    for name in ["Alice", "Bob", "Carol"] {
        fixture.create("users", json!({ "name": name })).await;
    }
    fixture
        .create(
            "roles",
            json!({ "name": "Player", "description": "Plays", "members": "Alice, Carol" }),
        )
        .await;

    let (_, doc) = fixture.get("/api/document").await;
    let role_id = doc["data"]["roles"]["data"][0]["id"].as_u64().unwrap();

    // Alice out, Bob in
    fixture.select("roles", role_id).await;
    let (_, opened) = fixture.post("/api/modal/open", json!({})).await;
    assert_eq!(opened["data"]["form"]["fields"][2]["value"], "Alice, Carol");
    let (status, _) = fixture
        .post(
            "/api/modal/apply",
            json!({ "fields": { "name": "Player", "members": "Bob, Carol" } }),
        )
        .await;
    assert_eq!(status, 200);

    let (_, users) = fixture.get("/api/tables/users").await;
    let roles: Vec<_> = users["data"]["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["cells"][1]["value"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(roles, vec!["", "Player", "Player"]);

    // Members column is drawn as icons
    let (_, roles_table) = fixture.get("/api/tables/roles").await;
    let members = &roles_table["data"]["rows"][0]["cells"][2];
    assert_eq!(members["kind"], "icons");
    assert_eq!(members["value"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_member_is_rejected() {
    let fixture = TestFixture::new().await;
    fixture.create("users", json!({ "name": "Alice" })).await;
    fixture
        .post("/api/navigate", json!({ "component": "roles" }))
        .await;
    fixture.post("/api/modal/open", json!({})).await;

    let (_, before) = fixture.get("/api/document").await;
    let (status, body) = fixture
        .post(
            "/api/modal/apply",
            json!({ "fields": { "name": "Coach", "members": "Alice, Mallory" } }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (_, after) = fixture.get("/api/document").await;
    assert_eq!(after["data"], before["data"]);
}

#[tokio::test]
async fn test_table_sort_cycle() {
    let fixture = TestFixture::new().await;
    for name in ["bob", "Alice", "carol"] {
        fixture.create("users", json!({ "name": name })).await;
    }

    let (status, _) = fixture
        .post("/api/tables/users/sort", json!({ "field": "name" }))
        .await;
    assert_eq!(status, 200);
    let (_, table) = fixture.get("/api/tables/users").await;
    assert_eq!(first_cells(&table), vec!["Alice", "bob", "carol"]);
    assert_eq!(table["data"]["headers"][0]["sortMode"], "asc");

    fixture
        .post("/api/tables/users/sort", json!({ "field": "name" }))
        .await;
    let (_, table) = fixture.get("/api/tables/users").await;
    assert_eq!(first_cells(&table), vec!["carol", "bob", "Alice"]);
    assert_eq!(table["data"]["headers"][0]["sortMode"], "desc");

    // Third click falls back to insertion order
    fixture
        .post("/api/tables/users/sort", json!({ "field": "name" }))
        .await;
    let (_, table) = fixture.get("/api/tables/users").await;
    assert_eq!(first_cells(&table), vec!["bob", "Alice", "carol"]);
    assert!(table["data"]["headers"][0]["sortMode"].is_null());

    let (status, body) = fixture
        .post("/api/tables/users/sort", json!({ "field": "nope" }))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_column_menu_toggle_and_reset() {
    let fixture = TestFixture::new().await;

    let (status, menu) = fixture.get("/api/tables/roles/columns?x=40&y=12").await;
    assert_eq!(status, 200);
    assert_eq!(menu["data"]["x"], 40);
    assert_eq!(menu["data"]["items"].as_array().unwrap().len(), 4);
    assert_eq!(menu["data"]["resetOffered"], false);

    let (status, body) = fixture
        .put("/api/tables/roles/columns/2", json!({ "visible": false }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["patches"][0]["tableId"], "roles-table");
    assert_eq!(body["data"]["patches"][0]["visible"], false);

    let (_, table) = fixture.get("/api/tables/roles").await;
    assert_eq!(header_names(&table), vec!["name", "members"]);

    for index in [1, 3] {
        fixture
            .put(
                &format!("/api/tables/roles/columns/{}", index),
                json!({ "visible": false }),
            )
            .await;
    }
    let (_, table) = fixture.get("/api/tables/roles").await;
    assert_eq!(table["data"]["hidden"], true);
    let (_, menu) = fixture.get("/api/tables/roles/columns").await;
    assert_eq!(menu["data"]["resetOffered"], true);

    let (status, body) = fixture
        .post("/api/tables/roles/columns/reset", json!({}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["patches"].as_array().unwrap().len(), 4);
    let (_, table) = fixture.get("/api/tables/roles").await;
    assert_eq!(table["data"]["hidden"], false);

    let (status, body) = fixture
        .put("/api/tables/roles/columns/9", json!({ "visible": true }))
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_unknown_collection() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/tables/topics").await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_feed_join_and_sort() {
    let fixture = TestFixture::new().await;
    fixture.create("users", json!({ "name": "Nikos" })).await;
    fixture.create("users", json!({ "name": "Maria" })).await;
    for (user, content) in [("0", "First"), ("1", "Second"), ("0", "Third")] {
        fixture
            .create("events", json!({ "userId": user, "content": content }))
            .await;
    }

    let (status, feed) = fixture.get("/api/feed").await;
    assert_eq!(status, 200);
    let items = feed["data"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[1]["authorName"], "Maria");
    assert_eq!(items[0]["readByLabel"], "Read by 0");

    let (status, _) = fixture
        .put(
            "/api/feed/sort",
            json!({ "sortBy": "date", "sortMode": "desc" }),
        )
        .await;
    assert_eq!(status, 200);
    let (_, doc) = fixture.get("/api/document").await;
    assert_eq!(doc["data"]["events"]["config"]["sort"]["sortBy"], "date");
    assert_eq!(doc["data"]["events"]["config"]["sort"]["sortMode"], "desc");

    let (_, feed) = fixture.get("/api/feed").await;
    let contents: Vec<_> = feed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["Third", "Second", "First"]);

    // Deleting the author drops their events from the feed
    fixture
        .post("/api/navigate", json!({ "component": "users" }))
        .await;
    fixture.select("users", 0).await;
    fixture.post("/api/entries/delete", json!({})).await;

    let (_, feed) = fixture.get("/api/feed").await;
    let items = feed["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["content"], "Second");
}

#[tokio::test]
async fn test_delete_without_selection_is_noop() {
    let fixture = TestFixture::new().await;
    fixture.create("users", json!({ "name": "Nikos" })).await;

    let (_, before) = fixture.get("/api/document").await;
    let (status, _) = fixture.post("/api/entries/delete", json!({})).await;
    assert_eq!(status, 200);
    let (_, after) = fixture.get("/api/document").await;
    assert_eq!(after["revisionId"], before["revisionId"]);
}

#[tokio::test]
async fn test_import_requires_confirmation_and_validates() {
    let fixture = TestFixture::new().await;
    fixture.create("users", json!({ "name": "Nikos" })).await;
    let (_, exported) = fixture.get("/api/document").await;

    let raw = exported["data"].to_string();

    // Without confirmation nothing happens
    let resp = fixture
        .client
        .post(fixture.url("/api/document/import"))
        .body(raw.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "CONFIRMATION_REQUIRED");

    // Invalid documents are rejected and the current one is kept
    let resp = fixture
        .client
        .post(fixture.url("/api/document/import?confirm=true"))
        .body(r#"{"schemaVersion": 1, "users": 5}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "CORRUPT_DOCUMENT");
    let (_, current) = fixture.get("/api/document").await;
    assert_eq!(current["data"]["users"]["data"][0]["name"], "Nikos");

    // A valid export round-trips
    fixture.create("users", json!({ "name": "Maria" })).await;
    let resp = fixture
        .client
        .post(fixture.url("/api/document/import?confirm=true"))
        .body(raw)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["revisionId"].as_i64().unwrap() > current["revisionId"].as_i64().unwrap());

    let (_, table) = fixture.get("/api/tables/users").await;
    assert_eq!(first_cells(&table), vec!["Nikos"]);
}

#[tokio::test]
async fn test_clear_requires_confirmation() {
    let fixture = TestFixture::new().await;
    fixture.create("users", json!({ "name": "Nikos" })).await;

    let resp = fixture
        .client
        .delete(fixture.url("/api/document"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let (_, doc) = fixture.get("/api/document").await;
    assert_eq!(doc["data"]["users"]["data"].as_array().unwrap().len(), 1);
    let revision_before = doc["revisionId"].as_i64().unwrap();

    let resp = fixture
        .client
        .delete(fixture.url("/api/document?confirm=true"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let (_, doc) = fixture.get("/api/document").await;
    assert!(doc["data"]["users"]["data"].as_array().unwrap().is_empty());
    assert_eq!(doc["data"]["users"]["nextId"], 0);
    assert!(doc["revisionId"].as_i64().unwrap() > revision_before);
}

#[tokio::test]
async fn test_state_and_navigation() {
    let fixture = TestFixture::new().await;

    let (status, state) = fixture.get("/api/state").await;
    assert_eq!(status, 200);
    assert_eq!(state["data"]["active"], "home");

    let (status, body) = fixture.post("/api/modal/open", json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    fixture.create("users", json!({ "name": "Nikos" })).await;
    fixture.select("users", 0).await;
    let (_, body) = fixture
        .post("/api/navigate", json!({ "component": "events" }))
        .await;
    assert_eq!(body["data"]["state"]["active"], "events");
    assert!(body["data"]["state"]["selection"].is_null());

    let (status, _) = fixture
        .post("/api/select", json!({ "collection": "events", "id": 7 }))
        .await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_html_views() {
    let fixture = TestFixture::new().await;
    fixture.create("users", json!({ "name": "<b>Nikos</b>" })).await;
    fixture
        .create(
            "events",
            json!({ "userId": "0", "content": "Match on <i>Sunday</i>" }),
        )
        .await;

    let resp = fixture
        .client
        .get(fixture.url("/views/users"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.starts_with(r#"<table id="users-table">"#));
    assert!(html.contains("&lt;b&gt;Nikos&lt;/b&gt;"));

    let html = fixture
        .client
        .get(fixture.url("/views/events"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Match on <i>Sunday</i>"));
    assert!(html.contains("Read by 0"));
}

#[tokio::test]
async fn test_icons() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/icons").await;
    assert_eq!(status, 200);
    let icons = body["data"].as_array().unwrap();
    assert!(icons.contains(&json!("img/user.svg")));

    // Icons outside the catalogue are refused
    fixture
        .post("/api/navigate", json!({ "component": "users" }))
        .await;
    fixture.post("/api/modal/open", json!({})).await;
    let (status, body) = fixture
        .post(
            "/api/modal/apply",
            json!({ "fields": { "name": "Eve", "pic": "http://evil/x.svg" } }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}
