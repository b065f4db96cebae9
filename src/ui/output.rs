//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Generated documents are the only thing written to stdout, so the output
//! of `generate-openapi` and `generate-asyncapi` can be redirected to a
//! file. Progress and status go to stderr through `tracing` (see
//! [`super::logging`]); errors are printed here.

use std::fmt::Display;
use std::io::Write;

use serde_json::Value;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - warnings and errors only
    Quiet,
    /// Normal mode - progress at info level
    Normal,
    /// Debug mode - HTTP calls and pagination too
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags. `--quiet` wins over `--debug`.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    /// Default log level for this verbosity.
    pub fn level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Debug => "debug",
        }
    }
}

/// Render a document as indented JSON.
pub fn render_document(document: &Value) -> String {
    // Serializing a Value cannot fail; fall back to compact form regardless.
    serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string())
}

/// Print a document to stdout as indented JSON.
pub fn print_document(document: &Value) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", render_document(document))?;
    stdout.flush()
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::Quiet.level(), "warn");
    }

    #[test]
    fn document_is_indented_in_key_order() {
        let rendered = render_document(&json!({ "openapi": "3.0.0", "info": { "title": "T" } }));
        assert_eq!(
            rendered,
            "{\n  \"openapi\": \"3.0.0\",\n  \"info\": {\n    \"title\": \"T\"\n  }\n}"
        );
    }
}
