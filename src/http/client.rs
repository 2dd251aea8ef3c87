//! Request executor: one attempt, bounded retry, then response validation.

use log::{debug, warn};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::retry::classify_failure;
use super::validate::validate_response;
use crate::config::ExecutorConfig;
use crate::error::{FetchError, Result};
use crate::options::FetchOptions;
use crate::transport::{ReqwestTransport, Transport, TransportError};

/// Executes requests over a [`Transport`] with bounded retry and status validation.
#[derive(Clone, Debug)]
pub struct RequestExecutor<T: Transport = ReqwestTransport> {
    transport: T,
    max_attempts: usize,
}

impl RequestExecutor<ReqwestTransport> {
    /// Creates an executor over a fresh reqwest Client built from `config`.
    pub fn new(config: &ExecutorConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(TransportError::from)?;

        Ok(Self::with_transport(ReqwestTransport::new(client), config))
    }
}

impl<T: Transport> RequestExecutor<T> {
    /// A retry bound of 0 is treated as 1.
    pub fn with_transport(transport: T, config: &ExecutorConfig) -> Self {
        Self {
            transport,
            max_attempts: config.max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Single transport attempt. Any HTTP status is a success at this layer.
    pub async fn attempt(&self, url: &str, options: &FetchOptions) -> Result<Response> {
        self.transport
            .send(url, options)
            .await
            .map_err(classify_failure)
    }

    /// Repeats [`attempt`](Self::attempt) until the transport answers, with no delay
    /// in between.
    ///
    /// Once every attempt has failed, the last error is returned; a network error
    /// gets its attempt count set. Earlier errors are dropped.
    pub async fn attempt_with_retry(&self, url: &str, options: &FetchOptions) -> Result<Response> {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            match self.attempt(url, options).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if attempt < self.max_attempts {
                        warn!(
                            "{} {}: attempt {}/{} failed ({}), retrying...",
                            options.method(),
                            url,
                            attempt,
                            self.max_attempts,
                            e
                        );
                    }
                    last_error = Some(e.with_attempts(attempt));
                }
            }
        }

        if let Some(e) = &last_error {
            debug!(
                "{} {}: giving up after {} attempts: {}",
                options.method(),
                url,
                self.max_attempts,
                e
            );
        }

        Err(last_error.unwrap_or_else(|| FetchError::network(self.max_attempts)))
    }

    /// One attempt, then validation. The returned body is unread.
    #[tracing::instrument(skip(self, options))]
    pub async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<Response> {
        let response = self.attempt(url, options).await?;
        validate_response(response).await
    }

    /// Retried attempts, then validation. The returned body is unread.
    #[tracing::instrument(skip(self, options))]
    pub async fn fetch_with_retry(&self, url: &str, options: &FetchOptions) -> Result<Response> {
        let response = self.attempt_with_retry(url, options).await?;
        validate_response(response).await
    }

    #[tracing::instrument(skip(self, options))]
    pub async fn fetch_text(&self, url: &str, options: &FetchOptions) -> Result<String> {
        read_text(self.fetch(url, options).await?).await
    }

    #[tracing::instrument(skip(self, options))]
    pub async fn fetch_json<D: DeserializeOwned>(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> Result<D> {
        read_json(self.fetch(url, options).await?).await
    }

    #[tracing::instrument(skip(self, options))]
    pub async fn fetch_text_with_retry(&self, url: &str, options: &FetchOptions) -> Result<String> {
        read_text(self.fetch_with_retry(url, options).await?).await
    }

    #[tracing::instrument(skip(self, options))]
    pub async fn fetch_json_with_retry<D: DeserializeOwned>(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> Result<D> {
        read_json(self.fetch_with_retry(url, options).await?).await
    }
}

async fn read_text(response: Response) -> Result<String> {
    let text = response.text().await.map_err(TransportError::from)?;
    Ok(text)
}

async fn read_json<D: DeserializeOwned>(response: Response) -> Result<D> {
    let text = read_text(response).await?;
    serde_json::from_str(&text).map_err(FetchError::Decode)
}
