//! Kafka adapter for [`OrderStream`]

use super::stream::{OrderStream, StreamError, StreamMessage};
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::{Offset, TopicPartitionList};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound for a partition seek
const SEEK_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for the order topic
#[derive(Debug, Clone)]
pub struct KafkaSettings {
    pub brokers: Vec<String>,
    pub topic: String,
    pub group_id: String,
}

/// Consumer group member reading the order topic
///
/// Auto commit is off; offsets move only through [`OrderStream::commit`].
pub struct KafkaOrderStream {
    consumer: Arc<StreamConsumer>,
}

impl KafkaOrderStream {
    /// Create the consumer and subscribe to the topic
    ///
    /// Brokers are contacted lazily, so this succeeds even while they are down.
    pub fn connect(settings: &KafkaSettings) -> Result<Self, StreamError> {
        let consumer: StreamConsumer = client_config(settings).create()?;
        consumer.subscribe(&[settings.topic.as_str()])?;

        tracing::info!(
            brokers = %settings.brokers.join(","),
            topic = %settings.topic,
            group = %settings.group_id,
            "Kafka consumer subscribed"
        );

        Ok(Self {
            consumer: Arc::new(consumer),
        })
    }
}

/// librdkafka settings for the order consumer
pub fn client_config(settings: &KafkaSettings) -> ClientConfig {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", settings.brokers.join(","))
        .set("group.id", &settings.group_id)
        .set("enable.auto.commit", "false")
        .set("auto.offset.reset", "earliest")
        // 10 KB .. 10 MB per fetch
        .set("fetch.min.bytes", "10000")
        .set("fetch.max.bytes", "10000000");
    config
}

#[async_trait]
impl OrderStream for KafkaOrderStream {
    async fn fetch(&self) -> Result<StreamMessage, StreamError> {
        let message = self.consumer.recv().await?;
        Ok(StreamMessage {
            topic: message.topic().to_string(),
            partition: message.partition(),
            offset: message.offset(),
            key: message.key().map(<[u8]>::to_vec),
            payload: message.payload().map(<[u8]>::to_vec).unwrap_or_default(),
        })
    }

    async fn commit(&self, message: &StreamMessage) -> Result<(), StreamError> {
        // The committed offset is the next one to read
        let mut tpl = TopicPartitionList::new();
        tpl.add_partition_offset(
            &message.topic,
            message.partition,
            Offset::Offset(message.offset + 1),
        )?;

        let consumer = Arc::clone(&self.consumer);
        tokio::task::spawn_blocking(move || consumer.commit(&tpl, CommitMode::Sync))
            .await
            .map_err(|e| StreamError::Join(e.to_string()))??;
        Ok(())
    }

    async fn rewind(&self, message: &StreamMessage) -> Result<(), StreamError> {
        let consumer = Arc::clone(&self.consumer);
        let topic = message.topic.clone();
        let partition = message.partition;
        let offset = Offset::Offset(message.offset);

        tokio::task::spawn_blocking(move || {
            consumer.seek(&topic, partition, offset, SEEK_TIMEOUT)
        })
        .await
        .map_err(|e| StreamError::Join(e.to_string()))??;

        tracing::debug!(partition, offset = message.offset, "Rewound stream");
        Ok(())
    }
}
