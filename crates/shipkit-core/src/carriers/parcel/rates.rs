use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::adapter::{Capability, Operation, ResponseEnvelope, find_shipping_method};
use crate::auth::AccessToken;
use crate::carriers::parse_money;
use crate::error::{ApiError, MessageExtractor};
use crate::geometry::Shipment;
use crate::models::Rate;
use crate::outcome::{ApiResult, Request, Response};

use super::options::ParcelShipmentOptions;
use super::request::{authorized_post, origin_country, shipment_body};
use super::{CARRIER_CODE, FAULT_MESSAGES, ParcelCredentials, SHIPPING_METHODS};

const ROOT: &str = "rateResponse";
const ORIGIN_POINTER: &str = "/rateRequest/shipFrom/countryCode";

/// Rates every service available between the two addresses.
#[derive(Debug, Clone, Copy)]
pub struct Rates<'a> {
    credentials: &'a ParcelCredentials,
    token: &'a AccessToken,
}

impl<'a> Rates<'a> {
    #[must_use]
    pub const fn new(credentials: &'a ParcelCredentials, token: &'a AccessToken) -> Self {
        Self { credentials, token }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatedShipment {
    service_code: String,
    currency: String,
    total_charges: String,
    #[serde(default)]
    negotiated_charges: Option<String>,
    #[serde(default)]
    charges: Vec<Charge>,
    #[serde(default)]
    transit_days: Option<u32>,
    #[serde(default)]
    warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Charge {
    code: String,
    amount: String,
}

impl Operation for Rates<'_> {
    type Input = Shipment;
    type Options = ParcelShipmentOptions;
    type Output = Vec<Rate>;

    const CARRIER: &'static str = CARRIER_CODE;
    const CAPABILITY: Capability = Capability::Rates;

    fn serialize(&self, shipment: &Shipment, options: &ParcelShipmentOptions) -> Request {
        let attributes = options.attributes();
        let mut rate_request = shipment_body(shipment, options);
        rate_request.insert("requestOption".to_string(), json!("Shop"));
        if attributes.negotiated_rates {
            rate_request.insert("negotiatedRates".to_string(), json!(true));
        }
        let path = format!("api/rating/v{}/shop", attributes.sub_version);
        authorized_post(
            self.credentials,
            self.token,
            &path,
            &json!({ "rateRequest": rate_request }),
        )
    }

    fn parse(&self, request: &Request, response: &Response) -> ApiResult<Vec<Rate>> {
        let envelope = ResponseEnvelope::open(request, response, ROOT, &FAULT_MESSAGES)?;
        let origin = origin_country(request, ORIGIN_POINTER);
        let count = envelope.array_len("/ratedShipments")?;
        let mut rates = Vec::with_capacity(count);
        for index in 0..count {
            let pointer = format!("/ratedShipments/{index}");
            let rated = envelope.field::<RatedShipment>(&pointer)?;
            let shipping_method =
                find_shipping_method(SHIPPING_METHODS, &rated.service_code, origin.as_deref())
                    .copied()
                    .ok_or_else(|| {
                        envelope.failure(ApiError::decode(
                            &format!("{pointer}/serviceCode"),
                            format!("unknown service code {:?}", rated.service_code),
                        ))
                    })?;
            let total = parse_money(
                &envelope,
                &format!("{pointer}/totalCharges"),
                &rated.total_charges,
                &rated.currency,
            )?;
            let negotiated_total = rated
                .negotiated_charges
                .as_deref()
                .map(|raw| {
                    parse_money(
                        &envelope,
                        &format!("{pointer}/negotiatedCharges"),
                        raw,
                        &rated.currency,
                    )
                })
                .transpose()?;
            let mut amounts = BTreeMap::new();
            for (charge_index, charge) in rated.charges.iter().enumerate() {
                let amount = parse_money(
                    &envelope,
                    &format!("{pointer}/charges/{charge_index}/amount"),
                    &charge.amount,
                    &rated.currency,
                )?;
                amounts.insert(charge.code.clone(), amount);
            }
            rates.push(Rate {
                shipping_method,
                amounts,
                total,
                negotiated_total,
                remote_service_id: Some(rated.service_code),
                transit_days: rated.transit_days,
                delivery_date: None,
                warnings: rated.warnings,
                errors: Vec::new(),
                data: envelope.root().pointer(&pointer).cloned().unwrap_or(Value::Null),
            });
        }
        envelope.succeed(rates)
    }

    fn message_extractor(&self) -> &dyn MessageExtractor {
        &FAULT_MESSAGES
    }
}
