//! Small-package carrier behind an OAuth client-credentials token.
//!
//! Every operation except [`RequestToken`] needs a bearer token, which
//! [`ParcelClient`] keeps in a [`TokenCache`] and refreshes only after it
//! expires. Errors arrive as `{"fault": {"status": "...", "description": "..."}}`.
//! Several service codes are reused across origin countries, so parsers
//! resolve them against the origin recorded in the request.

use std::fmt::{Debug, Formatter};

use crate::adapter::{Capability, ShippingMethod, Transport, execute};
use crate::auth::{AccessToken, TokenCache};
use crate::error::{ApiError, StatusDescription};
use crate::geometry::Shipment;
use crate::models::{Label, Rate, Timing};
use crate::outcome::{ApiOutcome, ApiResult};
use crate::registry::CarrierDescriptor;

mod labels;
mod options;
mod rates;
mod request;
mod timings;
mod token;

pub use labels::Labels;
pub use options::{
    DeliveryOption, LabelFormat, PackagingType, ParcelItemAttributes, ParcelItemInput,
    ParcelItemOptions, ParcelPackageAttributes, ParcelPackageInput, ParcelPackageOptions,
    ParcelShipmentAttributes, ParcelShipmentInput, ParcelShipmentOptions, ParcelStructureInput,
    ParcelStructureOptions, PickupType, Signature, SubVersion,
};
pub use rates::Rates;
pub use timings::Timings;
pub use token::RequestToken;

pub const CARRIER_CODE: &str = "parcel";

const FAULT_MESSAGES: StatusDescription = StatusDescription {
    status_pointer: "/fault/status",
    description_pointer: "/fault/description",
};

const US: &[&str] = &["US", "PR"];
const CA: &[&str] = &["CA"];

const fn service(
    name: &'static str,
    service_code: &'static str,
    domestic: bool,
    international: bool,
    origin_countries: &'static [&'static str],
) -> ShippingMethod {
    ShippingMethod {
        carrier: CARRIER_CODE,
        name,
        service_code,
        domestic,
        international,
        multi_package: true,
        origin_countries,
    }
}

pub const SHIPPING_METHODS: &[ShippingMethod] = &[
    service("Next Day Air", "01", true, false, US),
    service("2nd Day Air", "02", true, false, US),
    service("Ground", "03", true, false, US),
    service("Worldwide Express", "07", false, true, US),
    service("Worldwide Expedited", "08", false, true, US),
    service("Standard", "11", true, true, &[]),
    service("3 Day Select", "12", true, false, US),
    service("Next Day Air Saver", "13", true, false, US),
    service("Express", "07", true, true, CA),
    service("Expedited", "02", true, true, CA),
    service("Express Saver", "13", true, true, CA),
    service("Worldwide Saver", "65", false, true, &[]),
];

pub const DESCRIPTOR: CarrierDescriptor = CarrierDescriptor {
    code: CARRIER_CODE,
    name: "Reference Parcel",
    capabilities: &[
        Capability::Authentication,
        Capability::Rates,
        Capability::Labels,
        Capability::Timings,
    ],
    shipping_methods: SHIPPING_METHODS,
};

#[derive(Clone, PartialEq, Eq)]
pub struct ParcelCredentials {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl ParcelCredentials {
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        super::endpoint(&self.base_url, path)
    }
}

impl Debug for ParcelCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParcelCredentials")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Credentials, a transport and the token cache for that credential set.
///
/// Safe to share between threads; concurrent callers that find the token
/// expired trigger a single refresh.
#[derive(Debug)]
pub struct ParcelClient<T> {
    credentials: ParcelCredentials,
    transport: T,
    tokens: TokenCache,
}

impl<T: Transport> ParcelClient<T> {
    pub fn new(credentials: ParcelCredentials, transport: T) -> Self {
        Self {
            credentials,
            transport,
            tokens: TokenCache::new(),
        }
    }

    pub const fn credentials(&self) -> &ParcelCredentials {
        &self.credentials
    }

    pub const fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    /// The cached token, or a fresh one when none is valid. A failed token
    /// request is returned as is.
    pub fn access_token(&self) -> Result<AccessToken, ApiOutcome<ApiError>> {
        self.tokens.token(|| {
            execute(
                &RequestToken::new(&self.credentials),
                &self.transport,
                &(),
                &(),
            )
            .map(ApiOutcome::into_data)
        })
    }

    pub fn rates(
        &self,
        shipment: &Shipment,
        options: &ParcelShipmentOptions,
    ) -> ApiResult<Vec<Rate>> {
        let token = self.access_token()?;
        execute(
            &Rates::new(&self.credentials, &token),
            &self.transport,
            shipment,
            options,
        )
    }

    pub fn labels(
        &self,
        shipment: &Shipment,
        options: &ParcelShipmentOptions,
        shipping_method: &ShippingMethod,
    ) -> ApiResult<Vec<Label>> {
        let token = self.access_token()?;
        execute(
            &Labels::new(&self.credentials, &token, shipping_method),
            &self.transport,
            shipment,
            options,
        )
    }

    pub fn timings(
        &self,
        shipment: &Shipment,
        options: &ParcelShipmentOptions,
    ) -> ApiResult<Vec<Timing>> {
        let token = self.access_token()?;
        execute(
            &Timings::new(&self.credentials, &token),
            &self.transport,
            shipment,
            options,
        )
    }
}

#[cfg(test)]
mod tests;
