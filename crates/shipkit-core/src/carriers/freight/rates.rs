use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::adapter::{Capability, Operation, ResponseEnvelope, find_shipping_method};
use crate::carriers::parse_money;
use crate::error::{ApiError, MessageExtractor};
use crate::geometry::Shipment;
use crate::models::Rate;
use crate::outcome::{ApiResult, Request, Response};

use super::options::LoadOptions;
use super::request::load_body;
use super::{API_KEY_HEADER, CARRIER_CODE, ERROR_MESSAGES, FreightCredentials, SHIPPING_METHODS};

const ROOT: &str = "rateQuoteResponse";
const DEFAULT_CURRENCY: &str = "USD";

/// Quotes a load against every LTL service the account can buy.
#[derive(Debug, Clone, Copy)]
pub struct RateQuote<'a> {
    credentials: &'a FreightCredentials,
}

impl<'a> RateQuote<'a> {
    #[must_use]
    pub const fn new(credentials: &'a FreightCredentials) -> Self {
        Self { credentials }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteLine {
    service_code: String,
    total: String,
    #[serde(default)]
    charges: Vec<Charge>,
    #[serde(default)]
    transit_days: Option<u32>,
    #[serde(default)]
    delivery_date: Option<NaiveDate>,
    #[serde(default)]
    warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Charge {
    code: String,
    amount: String,
}

impl Operation for RateQuote<'_> {
    type Input = Shipment;
    type Options = LoadOptions;
    type Output = Vec<Rate>;

    const CARRIER: &'static str = CARRIER_CODE;
    const CAPABILITY: Capability = Capability::Rates;

    fn serialize(&self, shipment: &Shipment, options: &LoadOptions) -> Request {
        let body = Value::Object(load_body(shipment, options));
        Request::post_json(self.credentials.endpoint("v2/rates"), &body)
            .with_header(API_KEY_HEADER, self.credentials.api_key.as_str())
    }

    fn parse(&self, request: &Request, response: &Response) -> ApiResult<Vec<Rate>> {
        let envelope = ResponseEnvelope::open(request, response, ROOT, &ERROR_MESSAGES)?;
        let currency = envelope
            .optional::<String>("/currency")?
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        let quote_id = envelope.optional::<String>("/quoteId")?;

        let count = envelope.array_len("/rates")?;
        let mut rates = Vec::with_capacity(count);
        for index in 0..count {
            let pointer = format!("/rates/{index}");
            let line = envelope.field::<QuoteLine>(&pointer)?;
            let shipping_method = find_shipping_method(SHIPPING_METHODS, &line.service_code, None)
                .copied()
                .ok_or_else(|| {
                    envelope.failure(ApiError::decode(
                        &format!("{pointer}/serviceCode"),
                        format!("unknown service code {:?}", line.service_code),
                    ))
                })?;
            let total = parse_money(&envelope, &format!("{pointer}/total"), &line.total, &currency)?;
            let mut amounts = BTreeMap::new();
            for (charge_index, charge) in line.charges.iter().enumerate() {
                let amount = parse_money(
                    &envelope,
                    &format!("{pointer}/charges/{charge_index}/amount"),
                    &charge.amount,
                    &currency,
                )?;
                amounts.insert(charge.code.clone(), amount);
            }
            rates.push(Rate {
                shipping_method,
                amounts,
                total,
                negotiated_total: None,
                remote_service_id: quote_id.clone(),
                transit_days: line.transit_days,
                delivery_date: line.delivery_date,
                warnings: line.warnings,
                errors: Vec::new(),
                data: envelope.root().pointer(&pointer).cloned().unwrap_or(Value::Null),
            });
        }
        envelope.succeed(rates)
    }

    fn message_extractor(&self) -> &dyn MessageExtractor {
        &ERROR_MESSAGES
    }
}
