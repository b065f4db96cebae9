//! core
//!
//! Domain types, catalog entities, and configuration.
//!
//! # Modules
//!
//! - [`types`] - Identifiers, HTTP methods, content types, collections
//! - [`model`] - Catalog entities, draft/resolved status, import graph
//! - [`config`] - Configuration schema and loading

pub mod config;
pub mod model;
pub mod types;
