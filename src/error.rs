//! Error values surfaced by the request executor and the request builders.

use reqwest::header::InvalidHeaderValue;
use serde_json::{Map, Value};

use crate::transport::TransportError;

/// Message carried by every [`FetchError::Network`].
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Slow connection to server. Check your internet connection just in case.";

pub type Result<T, E = FetchError> = std::result::Result<T, E>;

/// Everything a fetch operation or a request builder can fail with.
#[derive(Debug)]
pub enum FetchError {
    /// The transport failed in a way that looks like a flaky or missing
    /// network path.
    Network { message: String, attempts: usize },
    /// The server answered 401.
    Unauthorized,
    /// A non-success response whose body was a JSON object.
    Structured(Map<String, Value>),
    /// A non-success response whose body was not a JSON object. Holds the raw body text.
    Message(String),
    /// A bearer builder was given an empty access token.
    MissingAccessToken,
    /// The access token cannot be encoded as a header value.
    InvalidHeader(InvalidHeaderValue),
    /// A request body could not be serialized to JSON.
    Serialization(serde_json::Error),
    /// A transport failure that is not a transient network failure.
    Transport(TransportError),
    /// A success body could not be parsed as the requested JSON type.
    Decode(serde_json::Error),
}

impl FetchError {
    /// Network failure observed after `attempts` transport attempts.
    pub fn network(attempts: usize) -> Self {
        FetchError::Network {
            message: NETWORK_FAILURE_MESSAGE.to_string(),
            attempts,
        }
    }

    /// True for transient network failures only.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Network { .. })
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, FetchError::Unauthorized)
    }

    /// Number of transport attempts behind a network failure.
    pub fn attempts(&self) -> Option<usize> {
        match self {
            FetchError::Network { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    pub(crate) fn with_attempts(self, attempts: usize) -> Self {
        match self {
            FetchError::Network { message, .. } => FetchError::Network { message, attempts },
            other => other,
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network { message, .. } => write!(f, "{}", message),
            FetchError::Unauthorized => {
                write!(f, "Authentication failed: the server rejected the access token")
            }
            FetchError::Structured(body) => {
                let json = serde_json::to_string(body).map_err(|_| std::fmt::Error)?;
                write!(f, "{}", json)
            }
            FetchError::Message(text) => write!(f, "{}", text),
            FetchError::MissingAccessToken => write!(f, "missing access token"),
            FetchError::InvalidHeader(e) => write!(f, "Invalid authorization header: {}", e),
            FetchError::Serialization(e) => write!(f, "Failed to serialize request body: {}", e),
            FetchError::Transport(e) => write!(f, "Request failed: {}", e),
            FetchError::Decode(e) => write!(f, "Failed to parse JSON response: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::InvalidHeader(e) => Some(e),
            FetchError::Serialization(e) | FetchError::Decode(e) => Some(e),
            FetchError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for FetchError {
    fn from(error: TransportError) -> Self {
        FetchError::Transport(error)
    }
}

impl From<InvalidHeaderValue> for FetchError {
    fn from(error: InvalidHeaderValue) -> Self {
        FetchError::InvalidHeader(error)
    }
}
