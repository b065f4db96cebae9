//! Integration tests for the `sep` binary.
//!
//! These tests exercise the full CLI: argument parsing, config loading,
//! document reading, and error reporting. Catalog traffic goes to a local
//! `wiremock` server or to a closed port.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PETSTORE: &str = "\
openapi: 3.0.0
info:
  title: Petstore
  version: 1.0.0
paths:
  /pets/{petId}:
    get:
      operationId: showPet
";

/// Isolated environment: no user config, no ambient token.
struct Sandbox {
    home: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            home: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn write(&self, name: &str, contents: &str) -> std::path::PathBuf {
        let path = self.home.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn sep(&self) -> Command {
        let mut cmd = Command::cargo_bin("sep").unwrap();
        cmd.env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env_remove("SEP_CONFIG")
            .env_remove("SEP_CATALOG_URL")
            .env_remove("EVENT_PORTAL_TOKEN")
            .env_remove("SOL_ADMIN_PWD")
            .env_remove("RUST_LOG");
        cmd
    }

    fn path(&self) -> &Path {
        self.home.path()
    }
}

#[test]
fn help_lists_commands() {
    Sandbox::new()
        .sep()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("import-openapi"))
        .stdout(predicate::str::contains("create-queue"))
        .stdout(predicate::str::contains("generate-openapi"))
        .stdout(predicate::str::contains("generate-asyncapi"));
}

#[test]
fn camel_case_alias_is_accepted() {
    Sandbox::new()
        .sep()
        .args(["importOpenAPI", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--pub"));
}

#[test]
fn version_flag_works() {
    Sandbox::new()
        .sep()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sep"));
}

#[test]
fn swagger_2_is_rejected() {
    let sandbox = Sandbox::new();
    let spec = sandbox.write("swagger.yaml", "swagger: '2.0'\npaths: {}\n");

    sandbox
        .sep()
        .arg("import-openapi")
        .arg(&spec)
        .args(["--token", "t", "--catalog-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unsupported OpenAPI version"));
}

#[test]
fn token_is_required() {
    let sandbox = Sandbox::new();
    let spec = sandbox.write("petstore.yaml", PETSTORE);

    sandbox
        .sep()
        .arg("import-openapi")
        .arg(&spec)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--token"));

    sandbox
        .sep()
        .arg("import-openapi")
        .arg(&spec)
        .args(["--token", ""])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("token is required"));
}

#[test]
fn missing_spec_file_is_reported() {
    let sandbox = Sandbox::new();

    sandbox
        .sep()
        .arg("import-openapi")
        .arg(sandbox.path().join("nope.yaml"))
        .args(["--token", "t"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn create_queue_requires_queue_name() {
    let sandbox = Sandbox::new();
    let spec = sandbox.write("petstore.yaml", PETSTORE);

    sandbox
        .sep()
        .arg("create-queue")
        .arg(&spec)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--queue"));
}

#[test]
fn completion_script_names_binary() {
    Sandbox::new()
        .sep()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sep"));
}

#[test]
fn invalid_config_is_an_error() {
    let sandbox = Sandbox::new();
    let config = sandbox.write("config.toml", "no_such_key = 1\n");

    sandbox
        .sep()
        .arg("--config")
        .arg(&config)
        .args(["generate-openapi", "Pets", "--token", "t"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn unreachable_catalog_fails() {
    let sandbox = Sandbox::new();
    let spec = sandbox.write("petstore.yaml", PETSTORE);

    sandbox
        .sep()
        .arg("import-openapi")
        .arg(&spec)
        .args(["--token", "t", "--catalog-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error:"));
}

#[tokio::test(flavor = "multi_thread")]
async fn generate_openapi_prints_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/eventPortal/applicationDomains"))
        .and(query_param("name", "Pets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [ { "id": "d1", "name": "Pets", "description": "Pet events" } ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/eventPortal/events"))
        .and(query_param("applicationDomainId", "d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "id": "e1",
                    "name": "showPet",
                    "topicName": "GET/pets/{petId}",
                    "consumedApplicationIds": ["a1"]
                },
                {
                    "id": "e2",
                    "name": "unused",
                    "topicName": "DELETE/pets"
                }
            ],
            "meta": { "pagination": { "pageNumber": 1, "nextPage": null } }
        })))
        .mount(&server)
        .await;

    let sandbox = Sandbox::new();
    let mut cmd = sandbox.sep();
    cmd.args(["generate-openapi", "Pets", "--token", "t", "--catalog-url"])
        .arg(server.uri());

    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let document: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(document["openapi"], "3.0.0");
    assert_eq!(document["info"]["title"], "Pets");
    assert_eq!(document["info"]["description"], "Pet events");
    assert_eq!(
        document["paths"]["/pets/{petId}"]["get"]["operationId"],
        "showPet"
    );
    assert!(document["paths"].get("/pets").is_none());
}
