//! sep-tools - Bridge OpenAPI documents and an event catalog
//!
//! sep-tools turns REST service descriptions (OpenAPI 3.x) into the objects
//! of an event catalog (application domains, applications, schemas and
//! events) and back, provisions broker queues for the operations of an
//! OpenAPI document, and fetches AsyncAPI documents for applications.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - OpenAPI ⇄ catalog transformation: ingest, reconcile, commit, emit
//! - [`core`] - Domain types, catalog entities, configuration
//! - [`catalog`] - Abstraction for the event catalog REST API
//! - [`broker`] - Abstraction for broker queue management (SEMP v2)
//! - [`ui`] - Document output and logging setup
//!
//! # Correctness Invariants
//!
//! sep-tools maintains the following invariants:
//!
//! 1. An import creates nothing if any name belongs to another domain
//! 2. An object that already exists is never created again
//! 3. Stored schemas never contain `$ref`
//! 4. Catalog and broker calls are issued one at a time and never retried

pub mod broker;
pub mod catalog;
pub mod cli;
pub mod core;
pub mod engine;
pub mod ui;
