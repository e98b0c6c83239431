//! Integration tests for the assistant console.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::console::Console;
use crate::db::{init_database, Repository};
use crate::gateway::TimeoutStore;
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
        let store = TimeoutStore::new(Repository::new(pool), Duration::from_secs(5));

        let state = AppState {
            console: Arc::new(Console::new(Arc::new(store))),
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

    async fn create(&self, name: &str, picture: &str) -> Value {
        let resp = self
            .client
            .post(self.url("/api/console/create"))
            .json(&json!({ "name": name, "picture": picture }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }

    async fn view(&self) -> Value {
        let resp = self
            .client
            .get(self.url("/api/console"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["data"].clone()
    }
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
async fn test_empty_console() {
    let fixture = TestFixture::new().await;

    let view = fixture.view().await;
    assert_eq!(view["assistants"], json!([]));
    assert_eq!(view["busy"], false);
    assert!(view.get("selectedId").is_none());
    assert!(view.get("error").is_none());
}

#[tokio::test]
async fn test_assistant_lifecycle() {
    let fixture = TestFixture::new().await;

    // Create
    let body = fixture.create("Ada", "http://x/a.png").await;
    assert_eq!(body["success"], true);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(body["data"]["name"], "Ada");
    assert!(body["data"]["creationDate"].is_string());

    // Refresh from the store
    let resp = fixture
        .client
        .post(fixture.url("/api/console/refresh"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let refreshed: Value = resp.json().await.unwrap();
    let assistants = refreshed["data"]["assistants"].as_array().unwrap();
    assert_eq!(assistants.len(), 1);
    assert_eq!(assistants[0]["id"], id.as_str());
    assert_eq!(assistants[0]["picture"], "http://x/a.png");

    // Select and edit
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/console/select/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let selected: Value = resp.json().await.unwrap();
    assert_eq!(selected["data"]["selectedId"], id.as_str());
    assert_eq!(selected["data"]["editForm"]["name"], "Ada");

    let resp = fixture
        .client
        .put(fixture.url("/api/console/edit-form"))
        .json(&json!({ "name": "Ada L.", "picture": "http://x/a.png" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .post(fixture.url("/api/console/save"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let saved: Value = resp.json().await.unwrap();
    assert_eq!(saved["data"]["assistants"][0]["name"], "Ada L.");
    assert_eq!(saved["data"]["assistants"][0]["picture"], "http://x/a.png");
    assert!(saved["data"].get("selectedId").is_none());

    // Delete
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/assistants/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let deleted: Value = resp.json().await.unwrap();
    assert_eq!(deleted["data"]["assistants"], json!([]));
}

#[tokio::test]
async fn test_patch_updates_only_sent_fields() {
    let fixture = TestFixture::new().await;
    let body = fixture.create("Ada", "http://x/a.png").await;
    let id = body["data"]["id"].as_str().unwrap();

    let resp = fixture
        .client
        .patch(fixture.url(&format!("/api/assistants/{}", id)))
        .json(&json!({ "picture": "http://x/b.png" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    fixture
        .client
        .post(fixture.url("/api/console/refresh"))
        .send()
        .await
        .unwrap();
    let view = fixture.view().await;
    assert_eq!(view["assistants"][0]["name"], "Ada");
    assert_eq!(view["assistants"][0]["picture"], "http://x/b.png");
}

#[tokio::test]
async fn test_validation_errors() {
    let fixture = TestFixture::new().await;

    // Missing picture
    let resp = fixture
        .client
        .post(fixture.url("/api/console/create"))
        .json(&json!({ "name": "Ada", "picture": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let view = fixture.view().await;
    assert_eq!(view["assistants"], json!([]));
    assert_eq!(view["prompt"], "Please fill in all fields!");

    // Clearing a name on update
    let created = fixture.create("Bob", "http://x/b.png").await;
    let id = created["data"]["id"].as_str().unwrap();
    let resp = fixture
        .client
        .patch(fixture.url(&format!("/api/assistants/{}", id)))
        .json(&json!({ "name": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(fixture.view().await["assistants"][0]["name"], "Bob");
}

#[tokio::test]
async fn test_submit_create_uses_buffer() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .put(fixture.url("/api/console/create-form"))
        .json(&json!({ "name": "Grace", "picture": "http://x/g.png" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["createForm"]["name"], "Grace");

    let resp = fixture
        .client
        .post(fixture.url("/api/console/submit-create"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let view = fixture.view().await;
    assert_eq!(view["assistants"][0]["name"], "Grace");
    assert_eq!(view["createForm"]["name"], "");
}

#[tokio::test]
async fn test_not_found_errors() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/console/select/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = fixture
        .client
        .patch(fixture.url("/api/assistants/missing"))
        .json(&json!({ "name": "Ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    // Deleting a missing id is not an error
    let resp = fixture
        .client
        .delete(fixture.url("/api/assistants/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_cancel_without_selection() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/console/cancel"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .put(fixture.url("/api/console/edit-form"))
        .json(&json!({ "name": "x", "picture": "y" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_html_console_forms() {
    let fixture = TestFixture::new().await;

    // Create through the form; the redirect lands back on the page.
    let resp = fixture
        .client
        .post(fixture.url("/console/create"))
        .form(&[("name", "Ada"), ("picture", "http://x/a.png")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("<td>Ada</td>"));

    let id = fixture.view().await["assistants"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Incomplete create shows the prompt
    let html = fixture
        .client
        .post(fixture.url("/console/create"))
        .form(&[("name", ""), ("picture", "http://x/b.png")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Please fill in all fields!"));

    // Select opens the edit panel
    let html = fixture
        .client
        .post(fixture.url(&format!("/console/select/{}", id)))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Edit Assistant"));

    // Save closes it
    let html = fixture
        .client
        .post(fixture.url("/console/save"))
        .form(&[("name", "Ada L."), ("picture", "http://x/a.png")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("<td>Ada L.</td>"));
    assert!(!html.contains("Edit Assistant"));

    // Delete empties the table
    let html = fixture
        .client
        .post(fixture.url(&format!("/console/delete/{}", id)))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!html.contains("Ada L."));
}
