//! LTL freight carrier authenticated by a static API key.
//!
//! Requests are JSON documents describing the load: handling units
//! (structures) holding packages holding items. Errors arrive as
//! `{"errors": [{"message": "..."}]}`.

use std::fmt::{Debug, Formatter};

use crate::adapter::{Capability, ShippingMethod, Transport, execute};
use crate::error::StructuredMessages;
use crate::geometry::Shipment;
use crate::models::{Rate, ShipmentConfirmation};
use crate::outcome::ApiResult;
use crate::registry::CarrierDescriptor;

mod loads;
mod options;
mod rates;
mod request;

pub use loads::CreateLoad;
pub use options::{
    Accessorial, DockType, FreightClass, FreightItemAttributes, FreightItemInput,
    FreightItemOptions, FreightPackageAttributes, FreightPackageInput, FreightPackageOptions,
    HandlingUnit, HandlingUnitAttributes, HandlingUnitInput, HandlingUnitOptions, LoadAttributes,
    LoadInput, LoadOptions, Packaging,
};
pub use rates::RateQuote;

pub const CARRIER_CODE: &str = "freight";
pub(crate) const API_KEY_HEADER: &str = "x-api-key";

const ERROR_MESSAGES: StructuredMessages = StructuredMessages {
    pointer: "/errors",
    field: "message",
};

const fn ltl(
    name: &'static str,
    service_code: &'static str,
    international: bool,
    origin_countries: &'static [&'static str],
) -> ShippingMethod {
    ShippingMethod {
        carrier: CARRIER_CODE,
        name,
        service_code,
        domestic: !international,
        international,
        multi_package: true,
        origin_countries,
    }
}

pub const SHIPPING_METHODS: &[ShippingMethod] = &[
    ltl("LTL Standard", "LTL_STD", false, &["US", "CA"]),
    ltl("LTL Guaranteed", "LTL_GTD", false, &["US", "CA"]),
    ltl("LTL Expedited", "LTL_EXP", false, &["US"]),
    ltl("Volume LTL", "VOLUME", false, &["US"]),
    ltl("Cross-Border LTL", "LTL_XB", true, &["US", "CA", "MX"]),
];

pub const DESCRIPTOR: CarrierDescriptor = CarrierDescriptor {
    code: CARRIER_CODE,
    name: "Reference LTL Freight",
    capabilities: &[Capability::Rates, Capability::Loads],
    shipping_methods: SHIPPING_METHODS,
};

#[derive(Clone, PartialEq, Eq)]
pub struct FreightCredentials {
    pub base_url: String,
    pub api_key: String,
}

impl FreightCredentials {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        super::endpoint(&self.base_url, path)
    }
}

impl Debug for FreightCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreightCredentials")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Credentials bound to a transport.
#[derive(Debug)]
pub struct FreightClient<T> {
    credentials: FreightCredentials,
    transport: T,
}

impl<T: Transport> FreightClient<T> {
    pub const fn new(credentials: FreightCredentials, transport: T) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    pub const fn credentials(&self) -> &FreightCredentials {
        &self.credentials
    }

    pub fn rate_quote(&self, shipment: &Shipment, options: &LoadOptions) -> ApiResult<Vec<Rate>> {
        execute(
            &RateQuote::new(&self.credentials),
            &self.transport,
            shipment,
            options,
        )
    }

    pub fn create_load(
        &self,
        shipment: &Shipment,
        options: &LoadOptions,
    ) -> ApiResult<ShipmentConfirmation> {
        execute(
            &CreateLoad::new(&self.credentials),
            &self.transport,
            shipment,
            options,
        )
    }
}
