//! Utilities shared by the database connector and by outbound service clients

pub mod error;
pub mod retry;

pub use error::{DatabaseError, DatabaseResult};
pub use retry::{RetryConfig, retry_with_backoff, retry_with_backoff_if};
