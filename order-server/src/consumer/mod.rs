//! Order stream consumption
//!
//! - [`OrderStream`] - fetch / commit / rewind seam
//! - [`OrderConsumer`] - commit-after-persist loop
//! - [`KafkaOrderStream`] - rdkafka implementation

pub mod decode;
pub mod kafka;
pub mod stream;
pub mod worker;

pub use decode::decode_order;
pub use kafka::{KafkaOrderStream, KafkaSettings};
pub use stream::{OrderStream, StreamError, StreamMessage};
pub use worker::{OrderConsumer, PollOutcome};
