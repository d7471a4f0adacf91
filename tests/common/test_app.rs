//! Test application setup utilities
//!
//! Provides a test instance of the application backed by a throwaway
//! SQLite database, plus request helpers that drive the real router.

use axum::{body::Body, http::Request, Router};
use tower::ServiceExt;
use uuid::Uuid;

use staffdesk::{
    api,
    config::{AppConfig, DatabaseConfig},
    db::{self, migrations, AccountRepository},
    middleware,
    middleware::auth::create_access_token,
    models::{Account, Role},
    AppState,
};

/// Test application wrapper for integration testing
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application with a throwaway SQLite database
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a new test application with custom configuration
    pub async fn with_config(config: AppConfig) -> Self {
        let db = db::init_pool(&config.database)
            .await
            .expect("Failed to initialize test database");

        migrations::seed_bootstrap_admin(&db, &config.auth)
            .await
            .expect("Failed to seed bootstrap admin");

        let state = AppState { config, db };

        // Mirror the production router: public routes open, protected
        // routes behind JWT auth and the role guard
        let router = Router::new()
            .nest("/api/v1", api::public_routes())
            .nest(
                "/api/v1",
                api::protected_routes()
                    .layer(axum::middleware::from_fn(
                        middleware::rbac::route_guard_middleware,
                    ))
                    .layer(axum::middleware::from_fn_with_state(
                        state.clone(),
                        middleware::auth::auth_middleware,
                    )),
            )
            .with_state(state.clone());

        Self { router, state }
    }

    /// Bearer token for the bootstrap admin account
    pub async fn admin_token(&self) -> String {
        let account = AccountRepository::new(&self.state.db)
            .find_by_email(Role::Admin, &self.state.config.auth.bootstrap_admin_email)
            .await
            .expect("Failed to fetch bootstrap admin")
            .expect("Bootstrap admin missing");

        self.token_for(&account, Role::Admin)
    }

    /// Create a chef account and return a bearer token for it.
    ///
    /// The password hash is a placeholder; token minting does not verify it.
    pub async fn chef_token(&self) -> String {
        let account = Account::new(
            "Chef User".to_string(),
            format!("chef-{}@example.com", Uuid::new_v4()),
            "placeholder-hash".to_string(),
        );
        AccountRepository::new(&self.state.db)
            .create(Role::Chef, &account)
            .await
            .expect("Failed to create chef account");

        self.token_for(&account, Role::Chef)
    }

    fn token_for(&self, account: &Account, role: Role) -> String {
        create_access_token(
            account,
            role,
            &self.state.config.auth.jwt_secret,
            self.state.config.auth.token_expiry_hours,
        )
        .expect("Failed to create test token")
    }

    /// Make a GET request without authentication
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(request_builder("GET", uri, None).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with JSON body, without authentication
    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.request(
            request_builder("POST", uri, None)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Make an authenticated GET request
    pub async fn get_auth(&self, uri: &str, token: &str) -> TestResponse {
        self.request(
            request_builder("GET", uri, Some(token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Make an authenticated POST request with JSON body
    pub async fn post_json_auth(
        &self,
        uri: &str,
        body: serde_json::Value,
        token: &str,
    ) -> TestResponse {
        self.request(
            request_builder("POST", uri, Some(token))
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Make an authenticated PUT request with JSON body
    pub async fn put_json_auth(
        &self,
        uri: &str,
        body: serde_json::Value,
        token: &str,
    ) -> TestResponse {
        self.put_json_auth_with_headers(uri, body, token, &[]).await
    }

    /// Make an authenticated PUT request with JSON body and extra headers
    pub async fn put_json_auth_with_headers(
        &self,
        uri: &str,
        body: serde_json::Value,
        token: &str,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = request_builder("PUT", uri, Some(token))
            .header("Content-Type", "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Make an authenticated DELETE request
    pub async fn delete_auth(&self, uri: &str, token: &str) -> TestResponse {
        self.delete_auth_with_headers(uri, token, &[]).await
    }

    /// Make an authenticated DELETE request with extra headers
    pub async fn delete_auth_with_headers(
        &self,
        uri: &str,
        token: &str,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = request_builder("DELETE", uri, Some(token));
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// Make an arbitrary request
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

fn request_builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: axum::http::StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: bytes::Bytes,
}

impl TestResponse {
    /// Get the response body as a string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Parse the response body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse response as JSON")
    }

    /// Assert the response status
    pub fn assert_status(&self, expected: axum::http::StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }

    /// Assert the response status is OK (200)
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::OK)
    }

    /// Assert the response status is Created (201)
    pub fn assert_created(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::CREATED)
    }

    /// Assert the response status is Bad Request (400)
    pub fn assert_bad_request(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::BAD_REQUEST)
    }

    /// Assert the response status is Unauthorized (401)
    pub fn assert_unauthorized(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::UNAUTHORIZED)
    }

    /// Assert the response status is Forbidden (403)
    pub fn assert_forbidden(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::FORBIDDEN)
    }

    /// Assert the response status is Not Found (404)
    pub fn assert_not_found(&self) -> &Self {
        self.assert_status(axum::http::StatusCode::NOT_FOUND)
    }
}

/// Create a test configuration with a throwaway SQLite database
pub fn test_config() -> AppConfig {
    // Unique temp file per test to avoid cross-test interference
    let db_path = format!(
        "/tmp/staffdesk_test_{}.db",
        Uuid::new_v4().to_string().replace('-', "")
    );

    AppConfig {
        database: DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", db_path),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        },
        ..AppConfig::default()
    }
}
