//! Message stream seam

use async_trait::async_trait;
use rdkafka::error::KafkaError;
use thiserror::Error;

/// Owned copy of one fetched record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMessage {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub key: Option<Vec<u8>>,
    pub payload: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] KafkaError),

    /// No further messages will ever be delivered
    #[error("Stream closed")]
    Closed,

    #[error("Blocking stream task failed: {0}")]
    Join(String),
}

/// Source of order messages with explicit acknowledgement
///
/// The position only advances past a message once `commit` succeeds for it.
#[async_trait]
pub trait OrderStream: Send + Sync {
    /// Wait for the next message
    async fn fetch(&self) -> Result<StreamMessage, StreamError>;

    /// Acknowledge `message`; a restart resumes after it
    async fn commit(&self, message: &StreamMessage) -> Result<(), StreamError>;

    /// Make `message` the next one fetched
    async fn rewind(&self, _message: &StreamMessage) -> Result<(), StreamError> {
        Ok(())
    }
}
