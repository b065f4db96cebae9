//! broker::traits
//!
//! BrokerAdmin trait for provisioning queues on a message broker.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors from broker management calls.
#[derive(Debug, Clone, Error)]
pub enum BrokerError {
    /// The management API answered with something other than 200.
    #[error("{method} {url} returned {status}: {body}")]
    UnexpectedStatus {
        /// HTTP method of the failed call
        method: String,
        /// Full request URL
        url: String,
        /// Status actually returned
        status: u16,
        /// Response body, for the operator
        body: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),
}

/// Queue creation request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSettings {
    pub queue_name: String,
    pub ingress_enabled: bool,
    pub egress_enabled: bool,
    pub permission: String,
}

impl QueueSettings {
    /// An enabled queue that clients may consume from.
    pub fn consumable(queue_name: impl Into<String>) -> Self {
        Self {
            queue_name: queue_name.into(),
            ingress_enabled: true,
            egress_enabled: true,
            permission: "consume".to_string(),
        }
    }
}

/// Management operations on a message VPN.
#[async_trait]
pub trait BrokerAdmin: Send + Sync {
    /// Create a queue.
    async fn create_queue(&self, settings: &QueueSettings) -> Result<(), BrokerError>;

    /// Add one topic subscription to an existing queue.
    async fn add_subscription(&self, queue_name: &str, topic: &str) -> Result<(), BrokerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumable_queue_body() {
        let json = serde_json::to_value(QueueSettings::consumable("api_queue")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "queueName": "api_queue",
                "ingressEnabled": true,
                "egressEnabled": true,
                "permission": "consume",
            })
        );
    }
}
