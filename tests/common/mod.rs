//! Common test utilities for E2E tests

use linkreach::{AppState, build_router, config};
use tempfile::TempDir;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test server instance
///
/// Spawns the real router against a temporary SQLite database, with
/// wiremock servers standing in for the provider API and the
/// credential issuer.
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
    pub provider_mock: MockServer,
    pub issuer_mock: MockServer,
}

impl TestServer {
    /// Create a new test server with a working credential issuer.
    pub async fn new() -> Self {
        Self::new_inner(true).await
    }

    /// Create a test server whose credential issuer always fails.
    pub async fn with_failing_issuer() -> Self {
        Self::new_inner(false).await
    }

    async fn new_inner(issuer_ok: bool) -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Mock provider API and credential issuer
        let provider_mock = MockServer::start().await;
        let issuer_mock = MockServer::start().await;

        if issuer_ok {
            Mock::given(method("GET"))
                .and(path("/get-unipile-key"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({ "apiKey": "test-api-key" })),
                )
                .mount(&issuer_mock)
                .await;
        } else {
            Mock::given(method("GET"))
                .and(path("/get-unipile-key"))
                .respond_with(ResponseTemplate::new(500))
                .mount(&issuer_mock)
                .await;
        }

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                domain: "test.example.com".to_string(),
                protocol: "https".to_string(),
            },
            database: config::DatabaseConfig {
                path: db_path.clone(),
            },
            provider: config::ProviderConfig {
                base_url: provider_mock.uri(),
                notify_url: Some("https://test.example.com/unipile-webhook".to_string()),
                hosted_auth_expiry_seconds: 3600,
                request_timeout_seconds: 10,
            },
            credential_issuer: config::CredentialIssuerConfig {
                url: format!("{}/get-unipile-key", issuer_mock.uri()),
                bearer_token: "test-issuer-token".to_string(),
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router
        let app = build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait a bit for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
            provider_mock,
            issuer_mock,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Create a test profile record in the database
    pub async fn create_test_profile(&self, id: &str) -> linkreach::data::UserProfile {
        self.state
            .db
            .insert_profile(&linkreach::data::NewUserProfile {
                id: id.to_string(),
                username: Some(format!("user-{id}")),
                email: Some(format!("{id}@example.com")),
                display_name: Some("Test User".to_string()),
            })
            .await
            .unwrap()
    }

    /// Number of requests the credential issuer has served so far.
    pub async fn issuer_request_count(&self) -> usize {
        self.issuer_mock
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}
