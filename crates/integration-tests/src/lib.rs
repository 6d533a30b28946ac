//! Integration test harness for Cadence.
//!
//! Tests talk to a running server over HTTP; nothing here touches the
//! database directly.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate and start the server
//! cargo run -p cadence-cli -- migrate
//! cargo run -p cadence-server
//!
//! # Run the (ignored) integration tests against it
//! cargo test -p cadence-integration-tests -- --ignored
//! ```
//!
//! Set `CADENCE_BASE_URL` if the server is not on `http://localhost:3000`.
//!
//! Each [`TestUser`] registers a fresh account with a unique email, so tests
//! do not interfere with each other or need cleanup between runs.

use reqwest::{Client, Response};
use serde_json::{Value, json};
use uuid::Uuid;

/// Password used for every throwaway test account.
pub const TEST_PASSWORD: &str = "integration-password";

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CADENCE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A registered account with its own cookie jar.
pub struct TestUser {
    pub client: Client,
    pub email: String,
    base_url: String,
}

impl TestUser {
    /// Register a fresh account with a unique email and leave it logged in.
    ///
    /// # Panics
    ///
    /// Panics if the server is unreachable or registration fails.
    pub async fn register(name: &str) -> Self {
        let email = format!("{}-{}@cadence.test", name.to_lowercase(), Uuid::new_v4());
        Self::register_with_email(name, &email).await
    }

    /// Register an account under a specific email and leave it logged in.
    ///
    /// # Panics
    ///
    /// Panics if the server is unreachable or registration fails.
    pub async fn register_with_email(name: &str, email: &str) -> Self {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");
        let base_url = base_url();
        let email = email.to_string();

        let resp = client
            .post(format!("{base_url}/api/auth/register"))
            .json(&json!({"email": email, "name": name, "password": TEST_PASSWORD}))
            .send()
            .await
            .expect("Failed to register test user");
        assert_eq!(resp.status(), 201, "registration failed for {email}");

        Self {
            client,
            email,
            base_url,
        }
    }

    /// GET an API path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a JSON body to an API path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .expect("POST request failed")
    }

    /// PUT a JSON body to an API path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn put(&self, path: &str, body: &Value) -> Response {
        self.client
            .put(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await
            .expect("PUT request failed")
    }

    /// DELETE an API path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("DELETE request failed")
    }

    /// Create a project and return its ID.
    ///
    /// # Panics
    ///
    /// Panics if project creation fails.
    pub async fn create_project(&self, name: &str) -> i64 {
        let resp = self
            .post(
                "/api/projects",
                &json!({"name": name, "description": "integration test project"}),
            )
            .await;
        assert_eq!(resp.status(), 201, "project creation failed");
        let body: Value = resp.json().await.expect("project response not JSON");
        body["id"].as_i64().expect("project id missing")
    }
}

/// Parse a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not valid JSON.
pub async fn body_json(resp: Response) -> Value {
    resp.json().await.expect("response body not JSON")
}
