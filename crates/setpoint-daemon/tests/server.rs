mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::seven_output_artifact;
use setpoint_daemon::{DaemonConfig, DaemonError, Server};
use setpoint_model::ModelError;
use std::io::Write;
use tower::ServiceExt;

fn config_with_model(path: std::path::PathBuf) -> DaemonConfig {
    let mut config = DaemonConfig::default();
    config.model.path = path;
    config
}

fn artifact_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let json = serde_json::to_string(&seven_output_artifact()).unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

async fn get(server: &Server, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = server
        .router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[test]
fn missing_model_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_model(dir.path().join("generator.json"));

    match Server::new(config) {
        Err(DaemonError::Model(ModelError::Io { .. })) => {}
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("server must not start without a model"),
    }
}

#[test]
fn corrupt_model_is_fatal() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"not a model").unwrap();

    assert!(matches!(
        Server::new(config_with_model(file.path().to_path_buf())),
        Err(DaemonError::Model(ModelError::Parse(_)))
    ));
}

#[test]
fn invalid_config_is_rejected_before_loading() {
    let file = artifact_file();
    let mut config = config_with_model(file.path().to_path_buf());
    config.model.scale = -1.0;

    assert!(matches!(Server::new(config), Err(DaemonError::Config(_))));
}

#[tokio::test]
async fn health_reports_sessions() {
    let file = artifact_file();
    let server = Server::new(config_with_model(file.path().to_path_buf())).unwrap();

    let (status, body) = get(&server, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["active_sessions"], 0);
    assert_eq!(body["messages_handled"], 0);
}

#[tokio::test]
async fn model_endpoint_describes_bound_schema() {
    let file = artifact_file();
    let mut config = config_with_model(file.path().to_path_buf());
    config.model.precision = Some(0);
    let server = Server::new(config).unwrap();

    let (status, body) = get(&server, "/model").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["latent_dim"], 8);
    assert_eq!(body["inputs"].as_array().unwrap().len(), 23);
    assert_eq!(body["outputs"].as_array().unwrap().len(), 7);
    assert_eq!(body["outputs"][0], "ffte_feed_flow_rate_sp");
    assert_eq!(body["precision"], 0);
    assert_eq!(body["scale"], 100.0);
    assert_eq!(body["protocol"], "resilient");
}

#[tokio::test]
async fn ws_without_upgrade_is_bad_request() {
    let file = artifact_file();
    let server = Server::new(config_with_model(file.path().to_path_buf())).unwrap();

    let (status, body) = get(&server, "/ws").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let file = artifact_file();
    let server = Server::new(config_with_model(file.path().to_path_buf())).unwrap();

    let (status, body) = get(&server, "/api/v1/specs").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}
