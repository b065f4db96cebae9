//! broker
//!
//! Message broker management (queue provisioning).
//!
//! # Modules
//!
//! - `traits`: `BrokerAdmin` trait, queue settings, errors
//! - [`semp`]: SEMP v2 config API client with basic authentication
//! - [`mock`]: In-memory broker for tests

pub mod mock;
pub mod semp;
mod traits;

pub use traits::*;
