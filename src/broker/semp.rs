//! broker::semp
//!
//! SEMP v2 config API client.
//!
//! Calls go to `<host>/SEMP/v2/config/msgVpns/<vpn>/...` with basic
//! authentication. Only 200 is accepted.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

use super::traits::{BrokerAdmin, BrokerError, QueueSettings};

/// Broker management client for one message VPN.
pub struct SempClient {
    client: Client,
    host: String,
    vpn: String,
    admin_user: String,
    admin_password: String,
}

// Custom Debug to avoid exposing the password
impl std::fmt::Debug for SempClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SempClient")
            .field("host", &self.host)
            .field("vpn", &self.vpn)
            .field("admin_user", &self.admin_user)
            .finish()
    }
}

impl SempClient {
    /// Create a client. A trailing `/` on `host` is dropped.
    pub fn new(
        host: impl Into<String>,
        vpn: impl Into<String>,
        admin_user: impl Into<String>,
        admin_password: impl Into<String>,
    ) -> Self {
        let host: String = host.into();
        Self {
            client: Client::new(),
            host: host.trim_end_matches('/').to_string(),
            vpn: vpn.into(),
            admin_user: admin_user.into(),
            admin_password: admin_password.into(),
        }
    }

    fn queues_url(&self) -> String {
        format!("{}/SEMP/v2/config/msgVpns/{}/queues", self.host, self.vpn)
    }

    fn subscriptions_url(&self, queue_name: &str) -> String {
        format!("{}/{}/subscriptions", self.queues_url(), queue_name)
    }

    async fn post<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<(), BrokerError> {
        debug!(url, "SEMP request");

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .client
            .post(url)
            .headers(headers)
            .basic_auth(&self.admin_user, Some(&self.admin_password))
            .json(body)
            .send()
            .await
            .map_err(|e| BrokerError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(BrokerError::UnexpectedStatus {
                method: "POST".to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionBody<'a> {
    subscription_topic: &'a str,
}

#[async_trait]
impl BrokerAdmin for SempClient {
    async fn create_queue(&self, settings: &QueueSettings) -> Result<(), BrokerError> {
        self.post(&self.queues_url(), settings).await
    }

    async fn add_subscription(&self, queue_name: &str, topic: &str) -> Result<(), BrokerError> {
        let body = SubscriptionBody {
            subscription_topic: topic,
        };
        self.post(&self.subscriptions_url(queue_name), &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls() {
        let client = SempClient::new("http://localhost:8080/", "default", "admin", "pw");
        assert_eq!(
            client.queues_url(),
            "http://localhost:8080/SEMP/v2/config/msgVpns/default/queues"
        );
        assert_eq!(
            client.subscriptions_url("orders"),
            "http://localhost:8080/SEMP/v2/config/msgVpns/default/queues/orders/subscriptions"
        );
    }

    #[test]
    fn debug_hides_password() {
        let client = SempClient::new("http://h", "v", "admin", "hunter2");
        assert!(!format!("{:?}", client).contains("hunter2"));
    }
}
