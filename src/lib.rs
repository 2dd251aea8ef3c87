//! Thin helpers for calling a JSON/text HTTP API.
//!
//! - [`options`] builds request options (JSON body, bearer token).
//! - [`http::RequestExecutor`] performs requests, retries transient network
//!   failures and maps non-success responses to [`FetchError`].
//! - [`transport`] is the one-request primitive underneath, backed by reqwest.

pub mod config;
pub mod error;
pub mod http;
pub mod options;
pub mod transport;

pub use config::ExecutorConfig;
pub use error::{FetchError, NETWORK_FAILURE_MESSAGE, Result};
pub use http::{ErrorBody, RequestExecutor};
pub use options::{FetchOptions, build_bearer_get_options, build_bearer_options, build_json_options};
pub use transport::{ReqwestTransport, Transport, TransportError, TransportErrorKind};
