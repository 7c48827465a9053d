use std::time::Duration;

use async_trait::async_trait;
use common::WalletEvent;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};

use crate::domain::event_publisher::{EventPublisher, PublicationError};

/// Productor Kafka que publica el evento bajo cada una de sus `partition_keys()` — un
/// único mensaje para eventos de una sola billetera, dos para eventos de transferencia
/// (§4.2: esto garantiza que cada partición observe la transferencia en el orden
/// correcto relativo a las demás operaciones de ese lado).
pub struct KafkaEventPublisher {
    producer: FutureProducer,
    topic: String,
}

const MAX_CONNECT_ATTEMPTS: u32 = 5;

impl KafkaEventPublisher {
    /// Establishes the producer connection, retrying up to 5 times with exponential
    /// backoff (`2^attempt` seconds) before giving up (§4.2). Permanent failure is
    /// propagated so the caller aborts service startup rather than serving traffic
    /// with no working publisher.
    pub async fn new(brokers: &str, topic: String) -> Result<Self, PublicationError> {
        let producer = Self::connect_with_retry(brokers).await?;
        Ok(Self { producer, topic })
    }

    async fn connect_with_retry(brokers: &str) -> Result<FutureProducer, PublicationError> {
        let mut last_err = None;

        for attempt in 0..MAX_CONNECT_ATTEMPTS {
            match Self::build_producer(brokers) {
                Ok(producer) => return Ok(producer),
                Err(e) => {
                    tracing::error!(
                        attempt = attempt + 1,
                        error = %e,
                        "failed to start kafka producer"
                    );
                    last_err = Some(e);
                    if attempt + 1 < MAX_CONNECT_ATTEMPTS {
                        let backoff = Duration::from_secs(2u64.pow(attempt));
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        Err(PublicationError::BrokerUnreachable(format!(
            "kafka producer could not be started after {MAX_CONNECT_ATTEMPTS} attempts: {}",
            last_err.expect("loop always records an error before exhausting attempts")
        )))
    }

    fn build_producer(brokers: &str) -> Result<FutureProducer, rdkafka::error::KafkaError> {
        ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .set("acks", "all")
            .set("enable.idempotence", "true")
            .set("compression.type", "snappy")
            .set("batch.size", "16384")
            .set("linger.ms", "10")
            .create()
    }
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    async fn publish(&self, event: &WalletEvent) -> Result<(), PublicationError> {
        let payload = serde_json::to_string(event)
            .map_err(|e| PublicationError::Serialization(e.to_string()))?;

        for key in event.partition_keys() {
            tracing::info!(event_type = %event.event_type(), key = %key, "publishing event to kafka");

            let record = FutureRecord::to(&self.topic).key(&key).payload(&payload);

            self.producer
                .send(record, Duration::from_secs(5))
                .await
                .map_err(|(e, _)| PublicationError::BrokerUnreachable(e.to_string()))?;
        }

        Ok(())
    }
}
