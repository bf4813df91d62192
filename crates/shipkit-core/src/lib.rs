// Configuration problems and carrier failures use two fixed error contracts
// (`ConfigurationError`, `ApiOutcome<ApiError>`); per-function `# Errors`
// sections would only repeat them.
#![allow(
    clippy::missing_errors_doc,
    reason = "fallible APIs share ConfigurationError or ApiOutcome<ApiError>; per-item boilerplate would duplicate contract"
)]

//! One request/response protocol over many shipping carriers.
//!
//! A carrier adapter turns a [`geometry::Shipment`] and a carrier-specific
//! options tree ([`options`]) into a [`outcome::Request`], sends it through a
//! [`adapter::Transport`], and parses the reply into shared results
//! ([`models`]). Both success and failure come back as an
//! [`outcome::ApiOutcome`] carrying the original exchange.

pub mod adapter;
pub mod auth;
pub mod carriers;
pub mod config;
pub mod error;
pub mod geometry;
#[cfg(feature = "http")]
pub mod http;
pub mod models;
pub mod options;
pub mod outcome;
pub mod registry;

pub use adapter::{Capability, Operation, ShippingMethod, Transport, execute};
pub use error::{ApiError, ApiErrorKind, ConfigurationError, Result, ShipkitError};
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use outcome::{ApiOutcome, ApiResult, Request, Response};
pub use registry::{CarrierDescriptor, CarrierRegistry};
