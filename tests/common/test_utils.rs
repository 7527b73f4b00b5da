use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header::CONTENT_TYPE},
};
use echo_server::{
    config::{Config, LogsConfig, ServerConfig},
    server,
};
use serde_json::Value;
use tempfile::TempDir;
use tokio::fs;
use tower::ServiceExt; // for `oneshot`

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            body_limit: 4 * 1024 * 1024,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
    }
}

/// Router built from the default test configuration
pub fn create_test_app() -> Router {
    server::router(&create_test_config().server)
}

/// Router that rejects bodies over `body_limit` bytes
pub fn create_limited_app(body_limit: usize) -> Router {
    let mut config = create_test_config();
    config.server.body_limit = body_limit;
    server::router(&config.server)
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Write `content` to `config.yaml` inside `dir` and return its path
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> String {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content)
        .await
        .expect("Failed to write config file");
    config_path.to_string_lossy().to_string()
}

/// Build a `POST /input` request, with an optional content type
pub fn input_request(content_type: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/input");
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    builder.body(body.into()).unwrap()
}

/// Send one request through `app` and collect status and body
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response: Response<Body> = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

/// Send one request and parse the response body as JSON
pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, request).await;
    let value = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "Response body is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&body)
        )
    });
    (status, value)
}

/// Sample configuration YAML overriding every field
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 8080
  body_limit: 1024
  logs:
    level: "debug"
"#;

/// Configuration that sets only the port
pub const PARTIAL_CONFIG_YAML: &str = r#"
server:
  port: 9090
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: "not-a-number"
"#;
