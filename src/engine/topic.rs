//! engine::topic
//!
//! Mapping between HTTP operations and catalog topics.
//!
//! A topic is the upper-case method glued to the raw path template:
//! `GET /pets/{id}` becomes `GET/pets/{id}`. Decomposition is the inverse
//! for topics produced this way, and falls back to `post` on the whole topic
//! for anything else.
//!
//! # Example
//!
//! ```
//! use sep_tools::core::types::HttpMethod;
//! use sep_tools::engine::topic::{from_topic, subscription_filter, to_topic};
//!
//! assert_eq!(to_topic(HttpMethod::Get, "/pets/{id}"), "GET/pets/{id}");
//! assert_eq!(
//!     from_topic("GET/pets/{id}"),
//!     (HttpMethod::Get, "/pets/{id}".to_string())
//! );
//! assert_eq!(subscription_filter("GET/pets/{id}"), "GET/pets/*");
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::core::types::HttpMethod;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]+\}").expect("Invalid regex constant"));

/// Build the topic for an operation.
pub fn to_topic(method: HttpMethod, path: &str) -> String {
    format!("{}{}", method.as_upper(), path)
}

/// Split a topic back into method and path.
///
/// The topic is split at its first `/`. If the part before it names one of
/// the eight HTTP methods (any case), the rest, including the `/`, is the
/// path. Otherwise the whole topic becomes a `post` operation on `/<topic>`.
pub fn from_topic(topic: &str) -> (HttpMethod, String) {
    if let Some(index) = topic.find('/') {
        if let Some(method) = HttpMethod::parse(&topic[..index]) {
            return (method, topic[index..].to_string());
        }
    }
    (HttpMethod::Post, format!("/{}", topic))
}

/// Turn a topic into a broker subscription, replacing each `{...}`
/// placeholder with the single-level wildcard `*`.
pub fn subscription_filter(topic: &str) -> String {
    PLACEHOLDER.replace_all(topic, "*").into_owned()
}
