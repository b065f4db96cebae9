//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Warnings and errors only
//! - `--config <path>`: Use this config file
//! - `--catalog-url <url>`: Override the catalog base URL
//!
//! Command names also accept the camelCase spellings of the original
//! tooling (`importOpenAPI`, `createQueue`, ...) as aliases.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sep - bridge OpenAPI documents and an event catalog
#[derive(Parser, Debug)]
#[command(name = "sep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Warnings and errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file to use instead of the default locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Event catalog base URL
    #[arg(long, global = true, env = "SEP_CATALOG_URL", value_name = "URL")]
    pub catalog_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import an OpenAPI document into the event catalog
    #[command(
        name = "import-openapi",
        visible_alias = "importOpenAPI",
        long_about = "Import an OpenAPI 3.x document into the event catalog.\n\n\
            Every operation becomes an event whose topic is the upper-case method \
            followed by the path (GET/pets/{id}). The JSON request body of an operation \
            becomes the event's schema, with all $ref references inlined.\n\n\
            Objects that already exist in the same application domain are reused, so \
            running the import twice creates nothing the second time. If any name is \
            taken by another application domain, nothing is created.",
        after_help = "\
EXAMPLES:
    # Import as a subscriber of all events
    sep import-openapi petstore.yaml --domain Pets --application PetClient

    # Import as the publisher of all events
    sep import-openapi petstore.yaml --domain Pets --application PetService --pub"
    )]
    ImportOpenapi {
        /// OpenAPI document (YAML or JSON)
        #[arg(value_name = "SPEC_FILE")]
        spec_file: PathBuf,

        /// Application domain to import into [default: TestDomain]
        #[arg(long)]
        domain: Option<String>,

        /// Application that consumes or produces the events [default: TestApp]
        #[arg(long)]
        application: Option<String>,

        /// Make the application the publisher of the events
        #[arg(long = "pub")]
        publish: bool,

        /// Event catalog API token
        #[arg(long, env = "EVENT_PORTAL_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Create a broker queue subscribed to an OpenAPI document's operations
    #[command(
        name = "create-queue",
        visible_alias = "createQueue",
        long_about = "Create a queue on the message broker and subscribe it to the topic \
            of every operation in an OpenAPI document.\n\n\
            Path placeholders become single-level wildcards, so GET/pets/{id} is \
            subscribed as GET/pets/*.",
        after_help = "\
EXAMPLES:
    sep create-queue petstore.yaml --queue pets --host http://broker:8080 --vpn default"
    )]
    CreateQueue {
        /// OpenAPI document (YAML or JSON)
        #[arg(value_name = "SPEC_FILE")]
        spec_file: PathBuf,

        /// Broker admin user [default: admin]
        #[arg(long)]
        admin_user: Option<String>,

        /// Broker admin password
        #[arg(long, env = "SOL_ADMIN_PWD", hide_env_values = true, default_value = "admin")]
        admin_password: String,

        /// Broker management URL [default: http://localhost:8080]
        #[arg(long)]
        host: Option<String>,

        /// Message VPN [default: default]
        #[arg(long)]
        vpn: Option<String>,

        /// Name of the queue to create
        #[arg(long)]
        queue: String,
    },

    /// Print the AsyncAPI document of an application
    #[command(name = "generate-asyncapi", visible_alias = "generateAsyncAPI")]
    GenerateAsyncapi {
        /// Application name
        #[arg(value_name = "APPLICATION")]
        application: String,

        /// AsyncAPI version to generate
        #[arg(long, default_value = "2.0.0")]
        asyncapi_version: String,

        /// Event catalog API token
        #[arg(long, env = "EVENT_PORTAL_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Print an OpenAPI document for the events of an application domain
    #[command(
        name = "generate-openapi",
        visible_alias = "generateOpenAPI",
        long_about = "Rebuild an OpenAPI document from the events of an application domain.\n\n\
            Events consumed by at least one application are included. Topics of the form \
            METHOD/path become that operation; any other topic becomes a POST on /<topic>. \
            JSON schemas are emitted under components.schemas and referenced as request \
            bodies.",
        after_help = "\
EXAMPLES:
    sep generate-openapi Pets > pets-openapi.json

    # Leave out events that an application of the domain also produces
    sep generate-openapi Pets --external-only"
    )]
    GenerateOpenapi {
        /// Application domain name
        #[arg(value_name = "DOMAIN_NAME")]
        domain_name: String,

        /// Only include events that no application produces
        #[arg(long)]
        external_only: bool,

        /// Event catalog API token
        #[arg(long, env = "EVENT_PORTAL_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    sep completion bash > ~/.local/share/bash-completion/completions/sep

    # Zsh
    sep completion zsh > ~/.zfunc/_sep

    # Fish
    sep completion fish > ~/.config/fish/completions/sep.fish

    # PowerShell
    sep completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn import_defaults() {
        let cli = Cli::try_parse_from(["sep", "import-openapi", "spec.yaml", "--token", "t"]).unwrap();
        let Command::ImportOpenapi {
            spec_file,
            domain,
            application,
            publish,
            token,
        } = cli.command
        else {
            panic!("expected import-openapi");
        };
        assert_eq!(spec_file, PathBuf::from("spec.yaml"));
        assert_eq!(domain, None);
        assert_eq!(application, None);
        assert!(!publish);
        assert_eq!(token, "t");
    }

    #[test]
    fn camel_case_aliases() {
        let cli = Cli::try_parse_from([
            "sep",
            "createQueue",
            "spec.yaml",
            "--queue",
            "q",
            "--admin-password",
            "pw",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::CreateQueue { ref queue, .. } if queue == "q"));

        let cli = Cli::try_parse_from(["sep", "generateOpenAPI", "Shop", "--token", "t"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::GenerateOpenapi { external_only: false, .. }
        ));
    }

    #[test]
    fn queue_is_required() {
        assert!(Cli::try_parse_from(["sep", "create-queue", "spec.yaml"]).is_err());
    }

    #[test]
    fn global_flags_after_command() {
        let cli = Cli::try_parse_from([
            "sep",
            "generate-asyncapi",
            "App",
            "--token",
            "t",
            "--debug",
            "--catalog-url",
            "http://localhost:1",
        ])
        .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.catalog_url.as_deref(), Some("http://localhost:1"));
        assert!(matches!(
            cli.command,
            Command::GenerateAsyncapi { ref asyncapi_version, .. } if asyncapi_version == "2.0.0"
        ));
    }
}
