//! Orders domain: cache, service and error taxonomy

pub mod cache;
pub mod error;
pub mod service;

pub use cache::OrderCache;
pub use error::{ErrorKind, OrderError};
pub use service::OrderService;
