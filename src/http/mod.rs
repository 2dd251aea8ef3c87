//! Request executor with network-failure retry and response validation.

mod client;
mod retry;
mod validate;

pub use client::RequestExecutor;
pub use retry::{DEFAULT_MAX_ATTEMPTS, TRANSIENT_KINDS, classify_failure, is_transient};
pub use validate::{ErrorBody, validate_response};
