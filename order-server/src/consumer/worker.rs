//! Order consumer loop
//!
//! `Fetching -> Decoding -> Processing -> Committing -> Fetching`. A message is
//! committed only after the service has persisted it, so every acknowledged
//! order is durable (at-least-once delivery).

use super::decode::decode_order;
use super::stream::{OrderStream, StreamError, StreamMessage};
use crate::orders::OrderService;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// What one loop iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Persisted and acknowledged
    Committed,
    /// Payload rejected, skipped without acknowledgement
    DecodeFailed,
    /// Store failed, message rewound for redelivery
    ProcessFailed,
    /// Persisted but the acknowledgement failed
    CommitFailed,
    /// Nothing fetched this round
    FetchFailed,
    /// Stream ended for good
    StreamClosed,
}

impl PollOutcome {
    /// Outcomes that pause for `retry_backoff` before the next fetch
    fn needs_backoff(self) -> bool {
        matches!(self, Self::ProcessFailed | Self::FetchFailed)
    }
}

pub struct OrderConsumer<S> {
    stream: S,
    service: OrderService,
    retry_backoff: Duration,
}

impl<S: OrderStream> OrderConsumer<S> {
    pub fn new(stream: S, service: OrderService, retry_backoff: Duration) -> Self {
        Self {
            stream,
            service,
            retry_backoff,
        }
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Fetch and handle exactly one message
    pub async fn poll_once(&self) -> PollOutcome {
        match self.stream.fetch().await {
            Ok(message) => self.handle(message).await,
            Err(StreamError::Closed) => {
                tracing::warn!("Order stream closed");
                PollOutcome::StreamClosed
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch message");
                PollOutcome::FetchFailed
            }
        }
    }

    async fn handle(&self, message: StreamMessage) -> PollOutcome {
        let order = match decode_order(&message.payload) {
            Ok(order) => order,
            Err(e) => {
                // A malformed payload never becomes valid, so no rewind
                tracing::warn!(
                    topic = %message.topic,
                    partition = message.partition,
                    offset = message.offset,
                    error = %e,
                    "Skipping undecodable message"
                );
                return PollOutcome::DecodeFailed;
            }
        };
        let order_uid = order.order_uid.clone();

        if let Err(e) = self.service.process_order(order).await {
            tracing::error!(
                order_uid = %order_uid,
                partition = message.partition,
                offset = message.offset,
                error = %e,
                "Failed to process order, will retry"
            );
            if let Err(e) = self.stream.rewind(&message).await {
                tracing::warn!(offset = message.offset, error = %e, "Failed to rewind stream");
            }
            return PollOutcome::ProcessFailed;
        }

        match self.stream.commit(&message).await {
            Ok(()) => {
                tracing::info!(
                    order_uid = %order_uid,
                    partition = message.partition,
                    offset = message.offset,
                    "Order ingested"
                );
                PollOutcome::Committed
            }
            Err(e) => {
                // Persisted already; redelivery after restart is an idempotent upsert
                tracing::warn!(
                    order_uid = %order_uid,
                    offset = message.offset,
                    error = %e,
                    "Failed to commit message"
                );
                PollOutcome::CommitFailed
            }
        }
    }

    /// Poll until `shutdown` is cancelled or the stream closes
    ///
    /// Cancellation is observed while waiting on the stream and during
    /// backoff. An order interrupted mid-processing is not acknowledged.
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(backoff = ?self.retry_backoff, "Order consumer started");

        loop {
            let outcome = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                outcome = self.poll_once() => outcome,
            };

            match outcome {
                PollOutcome::StreamClosed => break,
                outcome if outcome.needs_backoff() => {
                    tokio::select! {
                        biased;
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(self.retry_backoff) => {}
                    }
                }
                _ => {}
            }
        }

        tracing::info!("Order consumer stopped");
    }
}
