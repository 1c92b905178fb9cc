//! Command tests against a wiremock identity server.

use std::io::Write;

use serde_json::json;
use storegate_access::DenyReason;
use storegate_cli::commands::{build_directory, build_registry, check, read_only};
use storegate_cli::config::StoregateConfig;
use storegate_cli::error::CliError;
use storegate_userstore::PRIMARY_USERSTORE;
use tempfile::NamedTempFile;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UPDATE_SCOPE: &str = "internal_user_mgt_update";

fn feature_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    let document = json!({
        "features": {
            "users": {
                "enabled": true,
                "scopes": {
                    "read": ["internal_user_mgt_view"],
                    "update": [UPDATE_SCOPE]
                }
            }
        }
    });
    file.write_all(document.to_string().as_bytes()).unwrap();
    file
}

fn config(server: &MockServer, features: &NamedTempFile, scopes: &str) -> StoregateConfig {
    StoregateConfig {
        server_url: server.uri(),
        access_token: "cli-token".to_string(),
        granted_scopes: scopes.to_string(),
        feature_config_path: features.path().to_path_buf(),
        request_timeout_secs: 5,
        tls_verify: true,
        primary_userstore: PRIMARY_USERSTORE.to_string(),
    }
}

async fn mount_userstores(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/server/v1/userstores"))
        .and(header("Authorization", "Bearer cli-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "Q1VTVE9N", "name": "CUSTOM" },
            { "id": "T1RIRVI", "name": "OTHER" }
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/server/v1/userstores/Q1VTVE9N"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "Q1VTVE9N",
            "name": "CUSTOM",
            "properties": [{ "name": "READONLY_USER_STORE", "value": "true" }]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/server/v1/userstores/T1RIRVI"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "T1RIRVI",
            "name": "OTHER",
            "properties": [{ "name": "READONLY_USER_STORE", "value": "false" }]
        })))
        .mount(server)
        .await;
}

fn check_args(resource: &str) -> check::CheckArgs {
    check::CheckArgs {
        resource: resource.to_string(),
        feature: "users".to_string(),
        operation: "update".to_string(),
        json: true,
    }
}

#[tokio::test]
async fn test_check_read_only_store() {
    let server = MockServer::start().await;
    mount_userstores(&server).await;
    let features = feature_file();
    let config = config(&server, &features, UPDATE_SCOPE);

    let directory = build_directory(&config).unwrap();
    let registry = build_registry(&config).unwrap();
    let args = check_args("CUSTOM/alice");
    let decision = check::run(&directory, &registry, &args, PRIMARY_USERSTORE)
        .await
        .unwrap();

    assert!(decision.is_read_only);
    assert_eq!(
        decision.reasons,
        vec![DenyReason::ReadOnlyUserstore {
            domain: "CUSTOM".to_string()
        }]
    );

    let json = check::to_json(&decision).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["is_read_only"], true);
    assert_eq!(value["reasons"][0]["domain"], "CUSTOM");
}

#[tokio::test]
async fn test_check_writable_store() {
    let server = MockServer::start().await;
    mount_userstores(&server).await;
    let features = feature_file();
    let config = config(&server, &features, UPDATE_SCOPE);

    let directory = build_directory(&config).unwrap();
    let registry = build_registry(&config).unwrap();
    let args = check_args("OTHER/bob");
    let decision = check::run(&directory, &registry, &args, PRIMARY_USERSTORE)
        .await
        .unwrap();

    assert!(decision.is_allowed());
}

#[tokio::test]
async fn test_check_server_down_denies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/server/v1/userstores"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let features = feature_file();
    let config = config(&server, &features, UPDATE_SCOPE);

    let directory = build_directory(&config).unwrap();
    let registry = build_registry(&config).unwrap();
    let args = check_args("OTHER/bob");
    let decision = check::run(&directory, &registry, &args, PRIMARY_USERSTORE)
        .await
        .unwrap();

    assert!(decision.is_read_only);
}

#[tokio::test]
async fn test_read_only_listing() {
    let server = MockServer::start().await;
    mount_userstores(&server).await;
    let features = feature_file();
    let config = config(&server, &features, "");

    let directory = build_directory(&config).unwrap();
    let resolution = read_only::run(&directory, &config.primary_userstore).await.unwrap();

    assert!(resolution.is_complete());
    assert_eq!(
        resolution.userstores.iter().collect::<Vec<_>>(),
        vec!["CUSTOM", "PRIMARY"]
    );
}

#[tokio::test]
async fn test_read_only_listing_failure_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/server/v1/userstores"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let features = feature_file();
    let config = config(&server, &features, "");

    let directory = build_directory(&config).unwrap();
    let err = read_only::run(&directory, &config.primary_userstore).await.unwrap_err();
    assert!(matches!(err, CliError::Directory(_)));
}

#[test]
fn test_build_registry_missing_file() {
    let server_url = "http://127.0.0.1:1".to_string();
    let config = StoregateConfig {
        server_url,
        access_token: "t".to_string(),
        granted_scopes: String::new(),
        feature_config_path: "/nonexistent/storegate/deployment.json".into(),
        request_timeout_secs: 5,
        tls_verify: true,
        primary_userstore: PRIMARY_USERSTORE.to_string(),
    };
    let err = build_registry(&config).unwrap_err();
    assert!(matches!(err, CliError::Registry(_)));
}
