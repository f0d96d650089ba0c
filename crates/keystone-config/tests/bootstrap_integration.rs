//! Bootstrap tests against a temp config directory and a mocked Consul agent.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use keystone_config::{
    bootstrap_config_with, BootstrapArgs, ConfigError, MapEnv, ServiceConfig, CONSUL_ADDR_ENV,
    CONSUL_PATH_ENV, CONSUL_TOKEN_ENV,
};
use serde::Deserialize;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize)]
struct Server {
    http: Endpoint,
    grpc: Endpoint,
}

#[derive(Debug, Deserialize)]
struct Endpoint {
    addr: String,
}

const LOCAL_CONFIG: &str = "\
server:
  http:
    addr: 0.0.0.0:8000
  grpc:
    addr: 0.0.0.0:9000
clients:
  subscription:
    endpoint: discovery:///subscription-server
    service_name: subscription-server
    timeout: 5s
";

fn local_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.yaml"), LOCAL_CONFIG).unwrap();
    dir
}

fn args_for(dir: &TempDir) -> BootstrapArgs {
    BootstrapArgs {
        conf: dir.path().to_path_buf(),
        ..BootstrapArgs::default()
    }
}

fn kv(key: &str, value: &str) -> serde_json::Value {
    json!({
        "LockIndex": 0,
        "Key": key,
        "Flags": 0,
        "Value": STANDARD.encode(value),
        "CreateIndex": 10,
        "ModifyIndex": 12
    })
}

#[tokio::test]
async fn test_local_only() {
    let dir = local_dir();

    let config = bootstrap_config_with("svc", &args_for(&dir), Arc::new(MapEnv::new()))
        .await
        .unwrap();

    let server: Server = config.scan_key("server").unwrap();
    assert_eq!(server.http.addr, "0.0.0.0:8000");
    assert_eq!(server.grpc.addr, "0.0.0.0:9000");

    let client: ServiceConfig = config.scan_key("clients.subscription").unwrap();
    assert_eq!(client.timeout, Duration::from_secs(5));
    assert!(client.validate().is_ok());
}

#[tokio::test]
async fn test_missing_local_path() {
    let dir = TempDir::new().unwrap();
    let args = BootstrapArgs {
        conf: dir.path().join("absent"),
        ..BootstrapArgs::default()
    };

    let err = bootstrap_config_with("svc", &args, Arc::new(MapEnv::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[tokio::test]
async fn test_consul_overrides_local() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/kv/configs/svcconfig.yaml"))
        .and(query_param("recurse", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([kv(
            "configs/svcconfig.yaml",
            "server:\n  http:\n    addr: 0.0.0.0:8080\n"
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = local_dir();
    let env = MapEnv::new().with(CONSUL_ADDR_ENV, server.uri());

    let config = bootstrap_config_with("svc", &args_for(&dir), Arc::new(env))
        .await
        .unwrap();

    assert_eq!(config.value("server.http.addr").unwrap(), "0.0.0.0:8080");
    assert_eq!(config.value("server.grpc.addr").unwrap(), "0.0.0.0:9000");
}

#[tokio::test]
async fn test_consul_folder_with_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/kv/configs/iam"))
        .and(header("X-Consul-Token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Key": "configs/iam/", "Value": null},
            kv("configs/iam/data.json", r#"{"data": {"driver": "mysql"}}"#),
            kv("configs/iam/cache.toml", "[data]\nmax_conns = 20\n"),
            kv("configs/iam/README", "skipped"),
        ])))
        .mount(&server)
        .await;

    let dir = local_dir();
    let env = MapEnv::new()
        .with(CONSUL_ADDR_ENV, server.uri())
        .with(CONSUL_PATH_ENV, "configs/iam")
        .with(CONSUL_TOKEN_ENV, "secret");

    let config = bootstrap_config_with("iam", &args_for(&dir), Arc::new(env))
        .await
        .unwrap();

    assert_eq!(config.value("data.driver").unwrap(), "mysql");
    assert_eq!(config.value("data.max_conns"), Some(&json!(20)));
    assert!(config.contains("server.http.addr"));
}

#[tokio::test]
async fn test_consul_missing_path_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/kv/configs/svcconfig.yaml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = local_dir();
    let args = BootstrapArgs {
        consul_addr: Some(server.uri()),
        ..args_for(&dir)
    };

    let config = bootstrap_config_with("svc", &args, Arc::new(MapEnv::new()))
        .await
        .unwrap();
    assert_eq!(config.value("server.http.addr").unwrap(), "0.0.0.0:8000");
}

#[tokio::test]
async fn test_consul_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = local_dir();
    let args = BootstrapArgs {
        consul_addr: Some(server.uri()),
        ..args_for(&dir)
    };

    let err = bootstrap_config_with("svc", &args, Arc::new(MapEnv::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigError::RemoteStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_consul_bad_yaml() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([kv("configs/svcconfig.yaml", "server: [unclosed")])),
        )
        .mount(&server)
        .await;

    let dir = local_dir();
    let args = BootstrapArgs {
        consul_addr: Some(server.uri()),
        ..args_for(&dir)
    };

    let err = bootstrap_config_with("svc", &args, Arc::new(MapEnv::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
