//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves defaults from the config file
//! 2. Reads and parses its input document, if any
//! 3. Builds the catalog or broker client and calls the engine
//! 4. Prints the resulting document, if any
//!
//! # Async Commands
//!
//! Catalog and broker calls are async because they involve network I/O.
//! Each handler creates a `tokio::runtime::Runtime` and blocks on the
//! engine flow, so dispatch itself stays synchronous.

mod completion;
mod create_queue;
mod generate_asyncapi;
mod generate_openapi;
mod import;

pub use completion::completion;
pub use create_queue::create_queue;
pub use generate_asyncapi::generate_asyncapi;
pub use generate_openapi::generate_openapi;
pub use import::import_openapi;

use std::path::Path;

use anyhow::{ensure, Context as _, Result};
use serde_json::Value;

use crate::cli::args::Command;
use crate::engine::Context;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::ImportOpenapi {
            spec_file,
            domain,
            application,
            publish,
            token,
        } => import::import_openapi(
            ctx,
            &spec_file,
            domain.as_deref(),
            application.as_deref(),
            publish,
            &token,
        ),
        Command::CreateQueue {
            spec_file,
            admin_user,
            admin_password,
            host,
            vpn,
            queue,
        } => create_queue::create_queue(
            ctx,
            &spec_file,
            create_queue::BrokerOptions {
                admin_user: admin_user.as_deref(),
                admin_password: &admin_password,
                host: host.as_deref(),
                vpn: vpn.as_deref(),
            },
            &queue,
        ),
        Command::GenerateAsyncapi {
            application,
            asyncapi_version,
            token,
        } => generate_asyncapi::generate_asyncapi(ctx, &application, &asyncapi_version, &token),
        Command::GenerateOpenapi {
            domain_name,
            external_only,
            token,
        } => generate_openapi::generate_openapi(ctx, &domain_name, external_only, &token),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Read an OpenAPI document from a YAML or JSON file.
///
/// YAML merge keys (`<<: *anchor`) are applied before conversion.
pub(crate) fn read_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut yaml: serde_yaml::Value = serde_yaml::from_str(&text)
        .with_context(|| format!("failed to parse {} as YAML or JSON", path.display()))?;
    yaml.apply_merge()
        .with_context(|| format!("failed to apply YAML merge keys in {}", path.display()))?;
    let document: Value = serde_yaml::from_value(yaml)
        .with_context(|| format!("failed to parse {} as YAML or JSON", path.display()))?;
    ensure!(
        document.is_object(),
        "{} does not contain a YAML or JSON mapping",
        path.display()
    );
    Ok(document)
}

/// Reject an empty catalog token before any request is made.
pub(crate) fn require_token(token: &str) -> Result<()> {
    ensure!(
        !token.trim().is_empty(),
        "an event catalog token is required (--token or EVENT_PORTAL_TOKEN)"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_yaml_and_json() {
        let yaml = file_with("openapi: 3.0.0\npaths: {}\n");
        assert_eq!(read_document(yaml.path()).unwrap()["openapi"], "3.0.0");

        let json = file_with(r#"{ "openapi": "3.1.0", "paths": {} }"#);
        assert_eq!(read_document(json.path()).unwrap()["openapi"], "3.1.0");
    }

    #[test]
    fn merge_keys_are_applied() {
        let yaml = file_with(
            r#"
openapi: 3.0.0
components:
  schemas:
    Base: &base
      type: object
    Pet:
      <<: *base
      properties:
        name:
          type: string
"#,
        );

        let document = read_document(yaml.path()).unwrap();
        let pet = &document["components"]["schemas"]["Pet"];
        assert_eq!(pet["type"], "object");
        assert_eq!(pet["properties"]["name"]["type"], "string");
        assert!(pet.get("<<").is_none());
    }

    #[test]
    fn unreadable_and_invalid_files() {
        let err = read_document(Path::new("/nonexistent/spec.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));

        let scalar = file_with("just a string\n");
        assert!(read_document(scalar.path()).is_err());

        let broken = file_with("openapi: [\n");
        let err = read_document(broken.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse"));
    }

    #[test]
    fn blank_token_is_rejected() {
        assert!(require_token("  ").is_err());
        assert!(require_token("abc").is_ok());
    }
}
