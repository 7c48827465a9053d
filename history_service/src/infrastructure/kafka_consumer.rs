use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::error::KafkaError;
use rdkafka::message::Message;

use common::WalletEvent;
use tracing::{error, info, warn};

use crate::use_cases::project_event::ProjectEventUseCase;

const PROJECTION_RETRY_DELAY: Duration = Duration::from_secs(5);

/// The Event Consumer (C6): a single long-running cooperative loop polling the shared
/// topic, manually committing offsets only once the Projector has successfully applied
/// a message. Runs as a `tokio::spawn`ed task alongside the HTTP server, not as a
/// separate process.
pub struct EventConsumer {
    consumer: StreamConsumer,
    shutdown: Arc<AtomicBool>,
}

impl EventConsumer {
    pub fn new(brokers: &str, topic: &str, group_id: &str, batch_size: u32) -> Result<Self, KafkaError> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .set("queued.min.messages", batch_size.to_string())
            .create()?;

        consumer.subscribe(&[topic])?;

        Ok(Self {
            consumer,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Shared flag the caller flips to request a graceful stop; the loop checks it
    /// between messages, never mid-message.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    pub async fn run(&self, projector: ProjectEventUseCase) {
        info!("event consumer loop starting");

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                info!("shutdown requested, stopping consumer loop");
                break;
            }

            let message = match self.consumer.recv().await {
                Ok(message) => message,
                Err(e) => {
                    error!(error = %e, "kafka poll error");
                    tokio::time::sleep(PROJECTION_RETRY_DELAY).await;
                    continue;
                }
            };

            let payload = match message.payload() {
                Some(p) => p,
                None => {
                    warn!("received message with empty payload, committing and skipping");
                    self.commit(&message);
                    continue;
                }
            };

            let event: WalletEvent = match serde_json::from_slice(payload) {
                Ok(event) => event,
                Err(e) => {
                    // Poison message: favor liveness over preservation (spec §4.3/§9) —
                    // log and commit so one bad payload never stalls the partition.
                    error!(error = %e, "failed to deserialize event, committing offset anyway");
                    self.commit(&message);
                    continue;
                }
            };

            match projector.execute(&event).await {
                Ok(()) => {
                    self.commit(&message);
                }
                Err(e) => {
                    error!(error = %e, event_type = %event.event_type(), "projection failed, offset not committed");
                    tokio::time::sleep(PROJECTION_RETRY_DELAY).await;
                }
            }
        }

        info!("event consumer loop stopped");
    }

    fn commit(&self, message: &rdkafka::message::BorrowedMessage<'_>) {
        if let Err(e) = self.consumer.commit_message(message, CommitMode::Async) {
            error!(error = %e, "failed to commit offset");
        }
    }
}
