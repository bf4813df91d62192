use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::outcome::Response;

mod extract;

pub use extract::{MessageExtractor, PlainMessage, StatusDescription, StructuredMessages};

pub type Result<T> = std::result::Result<T, ShipkitError>;

const GENERIC_RESPONSE_MESSAGE: &str = "could not process carrier response";

/// Raised while building an options tree or loading credentials. It stops the
/// operation before any request exists, so it never travels inside an outcome.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("missing required attribute: {attribute}")]
    MissingAttribute { attribute: &'static str },

    #[error("invalid {attribute}: {value:?} is not one of [{allowed}]")]
    InvalidValue {
        attribute: &'static str,
        value: String,
        allowed: String,
    },

    #[error("invalid {attribute}: {value:?} must contain only digits")]
    NonNumeric {
        attribute: &'static str,
        value: String,
    },
}

impl ConfigurationError {
    #[must_use]
    pub fn invalid_value(attribute: &'static str, value: &str, allowed: &[&str]) -> Self {
        Self::InvalidValue {
            attribute,
            value: value.to_string(),
            allowed: allowed.join(", "),
        }
    }

    #[must_use]
    pub const fn attribute(&self) -> &'static str {
        match self {
            Self::MissingAttribute { attribute }
            | Self::InvalidValue { attribute, .. }
            | Self::NonNumeric { attribute, .. } => attribute,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("unexpected http status {}", response.status)]
    Http { response: Response },

    #[error("transport failure: {0}")]
    Other(String),
}

impl TransportError {
    #[must_use]
    pub const fn response(&self) -> Option<&Response> {
        match self {
            Self::Http { response } => Some(response),
            Self::Timeout(_) | Self::Connection(_) | Self::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// Timeout, refused connection, or an HTTP failure without a readable
    /// carrier message.
    Transport,
    /// Root marker or envelope fields absent; decoding was not attempted.
    ResponseShape,
    /// The carrier processed the request and reported a domain problem.
    Business,
    /// The envelope was valid but a field could not be decoded.
    Decode,
}

impl ApiErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::ResponseShape => "response_shape",
            Self::Business => "business",
            Self::Decode => "decode",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    #[source]
    cause: Option<TransportError>,
}

impl ApiError {
    /// Builds an error from a transport failure, asking the carrier's
    /// extractor for a readable message first. An extractor that finds
    /// nothing leaves the raw transport message in place.
    #[must_use]
    pub fn transport(cause: TransportError, extractor: &dyn MessageExtractor) -> Self {
        let extracted = cause
            .response()
            .and_then(|response| extractor.extract_message(response))
            .filter(|message| !message.trim().is_empty());
        match extracted {
            Some(message) => Self {
                kind: ApiErrorKind::Business,
                message,
                cause: Some(cause),
            },
            None => Self {
                kind: ApiErrorKind::Transport,
                message: cause.to_string(),
                cause: Some(cause),
            },
        }
    }

    #[must_use]
    pub fn response_shape(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_RESPONSE_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            kind: ApiErrorKind::ResponseShape,
            message,
            cause: None,
        }
    }

    #[must_use]
    pub fn business(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Business,
            message: message.into(),
            cause: None,
        }
    }

    #[must_use]
    pub fn decode(field: &str, detail: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            message: format!("could not decode {field}: {detail}"),
            cause: None,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn cause(&self) -> Option<&TransportError> {
        self.cause.as_ref()
    }
}

#[derive(Debug, Error)]
pub enum ShipkitError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("unknown carrier: {0}")]
    UnknownCarrier(String),

    #[error("carrier already registered: {0}")]
    DuplicateCarrier(String),

    #[error("carrier {carrier} does not support {operation}")]
    UnsupportedOperation { carrier: String, operation: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "http")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ShipkitError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Api(err) => match err.kind() {
                ApiErrorKind::Transport => "TRANSPORT_ERROR",
                ApiErrorKind::ResponseShape => "RESPONSE_SHAPE_ERROR",
                ApiErrorKind::Business => "CARRIER_ERROR",
                ApiErrorKind::Decode => "DECODE_ERROR",
            },
            Self::UnknownCarrier(_) => "UNKNOWN_CARRIER",
            Self::DuplicateCarrier(_) => "DUPLICATE_CARRIER",
            Self::UnsupportedOperation { .. } => "UNSUPPORTED_OPERATION",
            Self::Json(_) => "JSON_ERROR",
            #[cfg(feature = "http")]
            Self::Http(_) => "HTTP_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_payload(
        &self,
        operation: impl Into<String>,
        carrier: Option<String>,
    ) -> ErrorPayload {
        let details = match self {
            Self::Configuration(err) => Some(serde_json::json!({ "attribute": err.attribute() })),
            Self::Api(err) => Some(serde_json::json!({ "kind": err.kind().as_str() })),
            _ => None,
        };
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
            carrier,
            details,
        }
    }
}
