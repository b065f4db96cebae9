//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Document printing, error display, verbosity
//! - [`logging`] - `tracing` subscriber setup for stderr progress logs
//!
//! # Design
//!
//! Documents go to stdout and nothing else does. Everything an operator
//! reads while a command runs is a log record on stderr.

pub mod logging;
pub mod output;
