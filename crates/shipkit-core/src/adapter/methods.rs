use serde::Serialize;

/// A carrier service as listed in the carrier's static catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShippingMethod {
    pub carrier: &'static str,
    pub name: &'static str,
    pub service_code: &'static str,
    pub domestic: bool,
    pub international: bool,
    pub multi_package: bool,
    /// Origin countries (ISO alpha-2) the method is sold from; empty means
    /// any origin.
    pub origin_countries: &'static [&'static str],
}

impl ShippingMethod {
    #[must_use]
    pub fn ships_from(&self, country_code: &str) -> bool {
        self.origin_countries.is_empty()
            || self
                .origin_countries
                .iter()
                .any(|origin| origin.eq_ignore_ascii_case(country_code))
    }
}

/// Resolves a service code found in a response back to its catalog entry.
///
/// Codes match exactly. With an origin country, only methods sold from that
/// origin qualify, which disambiguates codes a carrier reuses across regions.
#[must_use]
pub fn find_shipping_method<'a>(
    methods: &'a [ShippingMethod],
    service_code: &str,
    origin_country: Option<&str>,
) -> Option<&'a ShippingMethod> {
    methods
        .iter()
        .filter(|method| method.service_code == service_code)
        .find(|method| origin_country.is_none_or(|country| method.ships_from(country)))
}
