//! ui::logging
//!
//! `tracing` subscriber setup.
//!
//! Log records go to stderr. The level comes from `--quiet`/`--debug`
//! unless `RUST_LOG` is set, in which case it is used as the filter verbatim
//! (for example `RUST_LOG=sep_tools=debug,reqwest=trace`).

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use super::output::Verbosity;

/// Environment variable that overrides the computed filter.
pub const LOG_ENV: &str = "RUST_LOG";

/// Filter directive for a verbosity, honoring `RUST_LOG` when set.
pub fn filter_directive(verbosity: Verbosity, env_override: Option<&str>) -> String {
    match env_override {
        Some(directive) if !directive.trim().is_empty() => directive.to_string(),
        _ => format!("sep_tools={},warn", verbosity.level()),
    }
}

/// Install the global subscriber.
///
/// A second call is a no-op, so tests that run several commands in one
/// process do not fail.
pub fn init(verbosity: Verbosity) {
    let env_override = std::env::var(LOG_ENV).ok();
    let filter = filter_directive(verbosity, env_override.as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity == Verbosity::Debug)
        .without_time()
        .with_filter(EnvFilter::new(filter));

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
