use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Map, json};

use crate::adapter::{Capability, Operation, ResponseEnvelope, find_shipping_method};
use crate::auth::AccessToken;
use crate::error::{ApiError, MessageExtractor};
use crate::geometry::Shipment;
use crate::models::Timing;
use crate::outcome::{ApiResult, Request, Response};

use super::options::ParcelShipmentOptions;
use super::request::{address, authorized_post, origin_country};
use super::{CARRIER_CODE, FAULT_MESSAGES, ParcelCredentials, SHIPPING_METHODS};

const ROOT: &str = "transitResponse";
const ORIGIN_POINTER: &str = "/transitRequest/shipFrom/countryCode";

/// Estimated pickup and delivery dates per service.
#[derive(Debug, Clone, Copy)]
pub struct Timings<'a> {
    credentials: &'a ParcelCredentials,
    token: &'a AccessToken,
}

impl<'a> Timings<'a> {
    #[must_use]
    pub const fn new(credentials: &'a ParcelCredentials, token: &'a AccessToken) -> Self {
        Self { credentials, token }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransitService {
    service_code: String,
    pickup_date: NaiveDate,
    delivery_date: NaiveDate,
    #[serde(default)]
    guaranteed: bool,
    #[serde(default)]
    business_days: Option<u32>,
    #[serde(default)]
    delivery_time: Option<String>,
    #[serde(default)]
    delivery_day_of_week: Option<String>,
}

impl Operation for Timings<'_> {
    type Input = Shipment;
    type Options = ParcelShipmentOptions;
    type Output = Vec<Timing>;

    const CARRIER: &'static str = CARRIER_CODE;
    const CAPABILITY: Capability = Capability::Timings;

    fn serialize(&self, shipment: &Shipment, options: &ParcelShipmentOptions) -> Request {
        let attributes = options.attributes();
        let mut transit_request = Map::new();
        transit_request.insert("shipFrom".to_string(), address(&shipment.origin));
        transit_request.insert("shipTo".to_string(), address(&shipment.destination));
        if let Some(date) = shipment.pickup_date {
            transit_request.insert("pickupDate".to_string(), json!(date.to_string()));
        }
        transit_request.insert(
            "weight".to_string(),
            json!({ "unit": "LBS", "value": shipment.total_weight_lbs() }),
        );
        transit_request.insert(
            "numberOfPackages".to_string(),
            json!(shipment.all_packages().count()),
        );
        let path = format!("api/shipments/v{}/transittimes", attributes.sub_version);
        authorized_post(
            self.credentials,
            self.token,
            &path,
            &json!({ "transitRequest": transit_request }),
        )
    }

    fn parse(&self, request: &Request, response: &Response) -> ApiResult<Vec<Timing>> {
        let envelope = ResponseEnvelope::open(request, response, ROOT, &FAULT_MESSAGES)?;
        let origin = origin_country(request, ORIGIN_POINTER);
        let count = envelope.array_len("/services")?;
        let mut timings = Vec::with_capacity(count);
        for index in 0..count {
            let pointer = format!("/services/{index}");
            let service = envelope.field::<TransitService>(&pointer)?;
            let shipping_method =
                find_shipping_method(SHIPPING_METHODS, &service.service_code, origin.as_deref())
                    .copied()
                    .ok_or_else(|| {
                        envelope.failure(ApiError::decode(
                            &format!("{pointer}/serviceCode"),
                            format!("unknown service code {:?}", service.service_code),
                        ))
                    })?;
            let mut properties = BTreeMap::new();
            if let Some(time) = service.delivery_time {
                properties.insert("delivery_time".to_string(), time);
            }
            if let Some(day) = service.delivery_day_of_week {
                properties.insert("delivery_day_of_week".to_string(), day);
            }
            timings.push(Timing {
                shipping_method,
                pickup: service.pickup_date,
                delivery: service.delivery_date,
                guaranteed: service.guaranteed,
                business_days: service.business_days,
                properties,
            });
        }
        envelope.succeed(timings)
    }

    fn message_extractor(&self) -> &dyn MessageExtractor {
        &FAULT_MESSAGES
    }
}
