//! cli
//!
//! Command-line interface layer for sep.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and set up logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, reads input files,
//! builds the catalog or broker client, and hands them to
//! [`crate::engine`]. All transformation logic lives in the engine.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::core::config::Config;
use crate::engine;
use crate::ui::{logging, output::Verbosity};
use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    logging::init(Verbosity::from_flags(cli.quiet, cli.debug));

    let config = Config::load(cli.config.as_deref())?;
    if let Some(path) = config.path() {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    let ctx = engine::Context {
        catalog_url: cli.catalog_url.clone(),
        config,
    };

    commands::dispatch(cli.command, &ctx)
}
