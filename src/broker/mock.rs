//! broker::mock
//!
//! In-memory broker for testing queue provisioning.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{BrokerAdmin, BrokerError, QueueSettings};

/// Mock broker recording queues and their subscriptions.
#[derive(Debug, Clone, Default)]
pub struct MockBroker {
    inner: Arc<Mutex<MockBrokerInner>>,
}

#[derive(Debug, Default)]
struct MockBrokerInner {
    queues: BTreeMap<String, Vec<String>>,
    fail_subscription_after: Option<usize>,
}

impl MockBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every subscription after the first `count` succeed.
    pub fn fail_subscription_after(self, count: usize) -> Self {
        self.lock().fail_subscription_after = Some(count);
        self
    }

    /// Subscriptions of a queue, in the order they were added.
    pub fn subscriptions(&self, queue_name: &str) -> Option<Vec<String>> {
        self.lock().queues.get(queue_name).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MockBrokerInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn status(url: String, status: u16, body: &str) -> BrokerError {
        BrokerError::UnexpectedStatus {
            method: "POST".to_string(),
            url,
            status,
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl BrokerAdmin for MockBroker {
    async fn create_queue(&self, settings: &QueueSettings) -> Result<(), BrokerError> {
        let mut inner = self.lock();
        if inner.queues.contains_key(&settings.queue_name) {
            return Err(Self::status(
                format!("queues/{}", settings.queue_name),
                400,
                "ALREADY_EXISTS",
            ));
        }
        inner.queues.insert(settings.queue_name.clone(), Vec::new());
        Ok(())
    }

    async fn add_subscription(&self, queue_name: &str, topic: &str) -> Result<(), BrokerError> {
        let mut inner = self.lock();
        let limit = inner.fail_subscription_after;
        let url = format!("queues/{}/subscriptions", queue_name);
        let subscriptions = inner
            .queues
            .get_mut(queue_name)
            .ok_or_else(|| Self::status(url.clone(), 400, "NOT_FOUND"))?;

        if limit.is_some_and(|n| subscriptions.len() >= n) {
            return Err(Self::status(url, 500, "injected failure"));
        }
        subscriptions.push(topic.to_string());
        Ok(())
    }
}
