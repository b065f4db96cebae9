//! engine::provision
//!
//! Queue provisioning from the events of an OpenAPI document.
//!
//! The queue subscribes to the topic of every operation, with path
//! placeholders widened to wildcards so that `GET/pets/{id}` matches
//! `GET/pets/42`.

use indexmap::IndexSet;
use tracing::info;

use super::topic::subscription_filter;
use super::EngineError;
use crate::broker::{BrokerAdmin, QueueSettings};
use crate::core::model::Ingested;

/// Subscription topics for a set of event drafts, in event order.
///
/// Topics that widen to the same subscription appear once.
pub fn subscriptions(ingested: &Ingested) -> Vec<String> {
    ingested
        .events
        .values()
        .map(|event| subscription_filter(&event.payload.topic_name))
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Create `queue_name` and subscribe it to every event of `ingested`.
///
/// Returns the subscriptions added. The first failing call aborts; a queue
/// created before a failed subscription is left in place.
pub async fn provision(
    ingested: &Ingested,
    queue_name: &str,
    broker: &dyn BrokerAdmin,
) -> Result<Vec<String>, EngineError> {
    broker
        .create_queue(&QueueSettings::consumable(queue_name))
        .await?;
    info!("queue '{}' created", queue_name);

    let topics = subscriptions(ingested);
    for topic in &topics {
        broker.add_subscription(queue_name, topic).await?;
        info!("queue '{}' subscribed to '{}'", queue_name, topic);
    }
    Ok(topics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::mock::MockBroker;
    use crate::broker::BrokerError;
    use crate::engine::ingest::ingest;
    use serde_json::json;

    fn pets() -> Ingested {
        ingest(&json!({
            "openapi": "3.0.0",
            "paths": {
                "/pets": { "get": { "operationId": "listPets" }, "post": { "operationId": "addPet" } },
                "/pets/{petId}": { "get": { "operationId": "getPet" } },
                "/pets/{id}": { "get": { "operationId": "getPetById" } }
            }
        }))
        .unwrap()
    }

    #[test]
    fn subscriptions_are_wildcarded_and_unique() {
        assert_eq!(
            subscriptions(&pets()),
            ["GET/pets", "POST/pets", "GET/pets/*"]
        );
    }

    #[tokio::test]
    async fn creates_queue_then_subscribes() {
        let broker = MockBroker::new();
        let added = provision(&pets(), "pets_queue", &broker).await.unwrap();

        assert_eq!(added.len(), 3);
        assert_eq!(broker.subscriptions("pets_queue"), Some(added));
    }

    #[tokio::test]
    async fn existing_queue_is_fatal() {
        let broker = MockBroker::new();
        provision(&pets(), "q", &broker).await.unwrap();

        let err = provision(&pets(), "q", &broker).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Broker(BrokerError::UnexpectedStatus { status: 400, .. })
        ));
    }

    #[tokio::test]
    async fn failed_subscription_stops_the_rest() {
        let broker = MockBroker::new().fail_subscription_after(1);
        let err = provision(&pets(), "q", &broker).await.unwrap_err();

        assert!(matches!(err, EngineError::Broker(_)));
        assert_eq!(broker.subscriptions("q"), Some(vec!["GET/pets".to_string()]));
    }
}
