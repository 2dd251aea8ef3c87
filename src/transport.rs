//! The single "perform one HTTP request" primitive the executor is built on.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};
use std::io::ErrorKind;

use crate::options::FetchOptions;

/// Shape of a failed transport attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// No network path: connection refused, DNS failure.
    Connect,
    /// The connection dropped while the request was in flight.
    ConnectionLost,
    /// The request could not be completed for another transport-level reason.
    Request,
    /// The request could not be built, e.g. a malformed URL.
    InvalidRequest,
    Other,
}

/// A transport attempt that did not produce a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_builder() {
            TransportErrorKind::InvalidRequest
        } else if error.is_connect() {
            TransportErrorKind::Connect
        } else if is_connection_lost(&error) {
            TransportErrorKind::ConnectionLost
        } else if error.is_request() || error.is_timeout() || error.is_body() {
            TransportErrorKind::Request
        } else {
            TransportErrorKind::Other
        };

        Self {
            kind,
            message: error.to_string(),
        }
    }
}

/// Walks the source chain looking for an I/O error that means the peer went away.
fn is_connection_lost(error: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = error.source();
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            return matches!(
                io.kind(),
                ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe
                    | ErrorKind::UnexpectedEof
            );
        }
        source = err.source();
    }
    false
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs exactly one request. Any HTTP status counts as success here.
    async fn send(&self, url: &str, options: &FetchOptions) -> Result<Response, TransportError>;
}

/// [`Transport`] backed by a `reqwest::Client`.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, url: &str, options: &FetchOptions) -> Result<Response, TransportError> {
        debug!("{} {}...", options.method(), url);

        let mut request = self
            .client
            .request(options.method().clone(), url)
            .headers(options.headers().clone());

        if let Some(body) = options.body() {
            request = request.body(body.to_owned());
        }

        Ok(request.send().await?)
    }
}
