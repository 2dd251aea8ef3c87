//! Request options and the builders that produce them.
//!
//! Builders only assemble method, headers and body. They never touch the
//! network and carry no retry or status handling of their own.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{FetchError, Result};

/// Method, headers and optional serialized body of one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOptions {
    method: Method,
    headers: HeaderMap,
    body: Option<String>,
}

impl FetchOptions {
    /// Bare options for `method`: no headers, no body.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// JSON request. An absent or JSON-falsy body (`null`, `false`, `0`, `""`)
    /// is sent as `{}`.
    pub fn json<T: Serialize + ?Sized>(method: Method, body: Option<&T>) -> Result<Self> {
        let value = match body {
            Some(body) => serde_json::to_value(body).map_err(FetchError::Serialization)?,
            None => Value::Null,
        };
        let value = if is_falsy(&value) {
            Value::Object(Map::new())
        } else {
            value
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            method,
            headers,
            body: Some(value.to_string()),
        })
    }

    /// Bearer-authenticated read. Sets only the `Authorization` header.
    pub fn bearer_get(access_token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer_header(access_token)?);

        Ok(Self {
            method: Method::GET,
            headers,
            body: None,
        })
    }

    /// Bearer-authenticated write with a JSON body.
    pub fn bearer<T: Serialize + ?Sized>(
        method: Method,
        access_token: &str,
        body: &T,
    ) -> Result<Self> {
        let authorization = bearer_header(access_token)?;
        let body = serde_json::to_string(body).map_err(FetchError::Serialization)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, authorization);

        Ok(Self {
            method,
            headers,
            body: Some(body),
        })
    }

    /// Adds or replaces a single header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Same as [`FetchOptions::json`].
pub fn build_json_options<T: Serialize + ?Sized>(
    method: Method,
    body: Option<&T>,
) -> Result<FetchOptions> {
    FetchOptions::json(method, body)
}

/// Same as [`FetchOptions::bearer_get`].
pub fn build_bearer_get_options(access_token: &str) -> Result<FetchOptions> {
    FetchOptions::bearer_get(access_token)
}

/// Same as [`FetchOptions::bearer`].
pub fn build_bearer_options<T: Serialize + ?Sized>(
    method: Method,
    access_token: &str,
    body: &T,
) -> Result<FetchOptions> {
    FetchOptions::bearer(method, access_token, body)
}

fn bearer_header(access_token: &str) -> Result<HeaderValue> {
    if access_token.is_empty() {
        return Err(FetchError::MissingAccessToken);
    }

    let mut value = HeaderValue::from_str(&format!("Bearer {}", access_token))?;
    value.set_sensitive(true);
    Ok(value)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
