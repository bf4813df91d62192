//! Reference carrier adapters.
//!
//! `freight` quotes and tenders LTL loads with an API key. `parcel` rates,
//! labels and estimates transit for small packages behind a bearer token.

use crate::adapter::ResponseEnvelope;
use crate::error::ApiError;
use crate::models::Money;
use crate::outcome::ApiOutcome;

pub mod freight;
pub mod parcel;

/// Reads a decimal amount the carrier sent as text.
fn parse_money(
    envelope: &ResponseEnvelope<'_>,
    pointer: &str,
    raw: &str,
    currency: &str,
) -> Result<Money, ApiOutcome<ApiError>> {
    Money::from_decimal(raw, currency).ok_or_else(|| {
        envelope.failure(ApiError::decode(
            pointer,
            format!("{raw:?} is not a decimal amount"),
        ))
    })
}

/// Joins a carrier base URL and an endpoint path with exactly one slash.
fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
