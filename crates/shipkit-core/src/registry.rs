use serde::Serialize;

use crate::adapter::{Capability, ShippingMethod, find_shipping_method};
use crate::carriers::{freight, parcel};
use crate::error::{Result, ShipkitError};

/// Static facts about one carrier integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarrierDescriptor {
    pub code: &'static str,
    pub name: &'static str,
    pub capabilities: &'static [Capability],
    pub shipping_methods: &'static [ShippingMethod],
}

impl CarrierDescriptor {
    #[must_use]
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    #[must_use]
    pub fn shipping_method(
        &self,
        service_code: &str,
        origin_country: Option<&str>,
    ) -> Option<&'static ShippingMethod> {
        find_shipping_method(self.shipping_methods, service_code, origin_country)
    }

    /// Methods sold from `origin_country`, or every method when `None`.
    pub fn shipping_methods_from<'a>(
        &self,
        origin_country: Option<&'a str>,
    ) -> impl Iterator<Item = &'static ShippingMethod> + 'a {
        self.shipping_methods
            .iter()
            .filter(move |method| origin_country.is_none_or(|country| method.ships_from(country)))
    }
}

/// Carriers known to the process, in registration order.
#[derive(Debug, Clone, Default)]
pub struct CarrierRegistry {
    carriers: Vec<CarrierDescriptor>,
}

impl CarrierRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self {
            carriers: vec![freight::DESCRIPTOR, parcel::DESCRIPTOR],
        }
    }

    pub fn register(&mut self, descriptor: CarrierDescriptor) -> Result<()> {
        if self.get(descriptor.code).is_some() {
            return Err(ShipkitError::DuplicateCarrier(descriptor.code.to_string()));
        }
        self.carriers.push(descriptor);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&CarrierDescriptor> {
        self.carriers
            .iter()
            .find(|carrier| carrier.code.eq_ignore_ascii_case(code))
    }

    pub fn require(&self, code: &str) -> Result<&CarrierDescriptor> {
        self.get(code)
            .ok_or_else(|| ShipkitError::UnknownCarrier(code.to_string()))
    }

    pub fn supporting(&self, capability: Capability) -> impl Iterator<Item = &CarrierDescriptor> {
        self.carriers
            .iter()
            .filter(move |carrier| carrier.supports(capability))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CarrierDescriptor> {
        self.carriers.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.carriers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }
}
