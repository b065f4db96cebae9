//! catalog
//!
//! Abstraction for the event catalog (the system of record for domains,
//! applications, schemas and events).
//!
//! # Architecture
//!
//! The `CatalogStore` trait defines every call the engine makes against the
//! catalog. The engine only ever sees `&dyn CatalogStore`; commands decide
//! which implementation to hand it.
//!
//! # Modules
//!
//! - `traits`: Core `CatalogStore` trait, listing types, pagination helper
//! - [`http`]: REST implementation with bearer-token authentication
//! - [`mock`]: In-memory implementation for deterministic testing

pub mod http;
pub mod mock;
mod traits;

pub use traits::*;
