//! Carrier-agnostic request/response records and the outcome envelope every
//! adapter operation returns.
//!
//! The success/failure split is Rust's own [`Result`]. Both sides carry an
//! [`ApiOutcome`], so a caller can inspect the wire exchange whether the call
//! worked or not. Adapters that have no use for the envelope on the failure
//! side can use [`FailureEnvelopeExt::without_failure_envelope`] to turn
//! `Result<ApiOutcome<T>, ApiOutcome<E>>` into `Result<ApiOutcome<T>, E>`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// The common return shape of adapter operations.
pub type ApiResult<T, E = ApiError> = std::result::Result<ApiOutcome<T>, ApiOutcome<E>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub http_method: HttpMethod,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Request {
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            http_method: HttpMethod::Get,
            url: url.into(),
            body: None,
            headers: BTreeMap::new(),
        }
    }

    /// A POST carrying a JSON document. Serializing a `Value` cannot fail, so
    /// the body is always present.
    #[must_use]
    pub fn post_json(url: impl Into<String>, body: &Value) -> Self {
        Self {
            http_method: HttpMethod::Post,
            url: url.into(),
            body: Some(body.to_string()),
            headers: BTreeMap::new(),
        }
        .with_header("Content-Type", "application/json")
        .with_header("Accept", "application/json")
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// The body parsed as JSON, for parsers that need request context.
    #[must_use]
    pub fn json_body(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub body: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Response {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// A decoded payload together with the exchange that produced it. On the
/// failure side `data` holds the error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiOutcome<T> {
    pub data: T,
    pub original_request: Request,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_response: Option<Response>,
}

impl<T> ApiOutcome<T> {
    #[must_use]
    pub const fn new(data: T, original_request: Request, original_response: Option<Response>) -> Self {
        Self {
            data,
            original_request,
            original_response,
        }
    }

    /// Pairs `data` with a request/response the caller already holds.
    #[must_use]
    pub fn from_exchange(data: T, request: &Request, response: &Response) -> Self {
        Self::new(data, request.clone(), Some(response.clone()))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiOutcome<U> {
        ApiOutcome {
            data: f(self.data),
            original_request: self.original_request,
            original_response: self.original_response,
        }
    }

    #[must_use]
    pub const fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    #[must_use]
    pub const fn request(&self) -> &Request {
        &self.original_request
    }

    #[must_use]
    pub const fn response(&self) -> Option<&Response> {
        self.original_response.as_ref()
    }
}

pub trait OutcomeResultExt<T, E> {
    /// Transforms the success payload, keeping the envelope.
    fn map_data<U>(self, f: impl FnOnce(T) -> U) -> std::result::Result<ApiOutcome<U>, E>;

    /// Drops the success envelope, keeping only the payload.
    fn into_data(self) -> std::result::Result<T, E>;
}

impl<T, E> OutcomeResultExt<T, E> for std::result::Result<ApiOutcome<T>, E> {
    fn map_data<U>(self, f: impl FnOnce(T) -> U) -> std::result::Result<ApiOutcome<U>, E> {
        self.map(|outcome| outcome.map(f))
    }

    fn into_data(self) -> std::result::Result<T, E> {
        self.map(ApiOutcome::into_data)
    }
}

pub trait FailureEnvelopeExt<T, E> {
    /// Converts the enveloped failure shape into the bare failure shape.
    fn without_failure_envelope(self) -> std::result::Result<ApiOutcome<T>, E>;
}

impl<T, E> FailureEnvelopeExt<T, E> for ApiResult<T, E> {
    fn without_failure_envelope(self) -> std::result::Result<ApiOutcome<T>, E> {
        self.map_err(ApiOutcome::into_data)
    }
}
