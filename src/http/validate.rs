//! Turns a completed response into either itself or a typed error.

use log::debug;
use reqwest::{Response, StatusCode};
use serde_json::{Map, Value};

use crate::error::{FetchError, Result};

/// Decoded body of a rejected response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// The body was a JSON object.
    Structured(Map<String, Value>),
    /// Anything else, kept verbatim.
    Raw(String),
}

impl ErrorBody {
    /// Never fails: text that is not a JSON object falls back to [`ErrorBody::Raw`].
    pub fn parse(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => ErrorBody::Structured(map),
            _ => ErrorBody::Raw(text),
        }
    }
}

impl From<ErrorBody> for FetchError {
    fn from(body: ErrorBody) -> Self {
        match body {
            ErrorBody::Structured(map) => FetchError::Structured(map),
            ErrorBody::Raw(text) => FetchError::Message(text),
        }
    }
}

/// Passes 2xx responses through untouched, body unread.
///
/// 401 becomes [`FetchError::Unauthorized`] without reading the body. Any other
/// non-success status reads the body and reports it as an [`ErrorBody`].
pub async fn validate_response(response: Response) -> Result<Response> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        debug!("{} rejected the credentials ({})", response.url(), status);
        return Err(FetchError::Unauthorized);
    }

    if !status.is_success() {
        let url = response.url().clone();
        let text = response.text().await.unwrap_or_else(|e| {
            debug!("Failed to read error body from {}: {}", url, e);
            String::new()
        });
        debug!("{} responded with {}", url, status);
        return Err(ErrorBody::parse(text).into());
    }

    Ok(response)
}
