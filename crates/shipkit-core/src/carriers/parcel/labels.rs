use serde::Deserialize;
use serde_json::json;

use crate::adapter::{Capability, Operation, ResponseEnvelope, ShippingMethod};
use crate::auth::AccessToken;
use crate::carriers::parse_money;
use crate::error::MessageExtractor;
use crate::geometry::Shipment;
use crate::models::Label;
use crate::outcome::{ApiResult, Request, Response};

use super::options::ParcelShipmentOptions;
use super::request::{authorized_post, shipment_body};
use super::{CARRIER_CODE, FAULT_MESSAGES, ParcelCredentials};

const ROOT: &str = "shipmentResponse";

/// Buys postage for a chosen service and returns one label per package.
#[derive(Debug, Clone, Copy)]
pub struct Labels<'a> {
    credentials: &'a ParcelCredentials,
    token: &'a AccessToken,
    shipping_method: &'a ShippingMethod,
}

impl<'a> Labels<'a> {
    #[must_use]
    pub const fn new(
        credentials: &'a ParcelCredentials,
        token: &'a AccessToken,
        shipping_method: &'a ShippingMethod,
    ) -> Self {
        Self {
            credentials,
            token,
            shipping_method,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageResult {
    tracking_number: String,
    label_image: String,
    #[serde(default)]
    charges: Option<String>,
}

impl Operation for Labels<'_> {
    type Input = Shipment;
    type Options = ParcelShipmentOptions;
    type Output = Vec<Label>;

    const CARRIER: &'static str = CARRIER_CODE;
    const CAPABILITY: Capability = Capability::Labels;

    fn serialize(&self, shipment: &Shipment, options: &ParcelShipmentOptions) -> Request {
        let attributes = options.attributes();
        let mut shipment_request = shipment_body(shipment, options);
        shipment_request.insert(
            "service".to_string(),
            json!(self.shipping_method.service_code),
        );
        shipment_request.insert(
            "labelFormat".to_string(),
            json!(attributes.label_format.as_str()),
        );
        if attributes.negotiated_rates {
            shipment_request.insert("negotiatedRates".to_string(), json!(true));
        }
        let path = format!("api/shipments/v{}/ship", attributes.sub_version);
        authorized_post(
            self.credentials,
            self.token,
            &path,
            &json!({ "shipmentRequest": shipment_request }),
        )
    }

    fn parse(&self, request: &Request, response: &Response) -> ApiResult<Vec<Label>> {
        let envelope = ResponseEnvelope::open(request, response, ROOT, &FAULT_MESSAGES)?;
        let shipment_id = envelope.optional::<String>("/shipmentId")?;
        let label_format = envelope
            .optional::<String>("/labelFormat")?
            .unwrap_or_else(|| "PDF".to_string());
        let currency = envelope
            .optional::<String>("/currency")?
            .unwrap_or_else(|| "USD".to_string());
        let shipment_cost = envelope
            .optional::<String>("/totalCharges")?
            .map(|raw| parse_money(&envelope, "/totalCharges", &raw, &currency))
            .transpose()?;

        let count = envelope.array_len("/packages")?;
        let mut labels = Vec::with_capacity(count);
        for index in 0..count {
            let pointer = format!("/packages/{index}");
            let result = envelope.field::<PackageResult>(&pointer)?;
            let cost = result
                .charges
                .as_deref()
                .map(|raw| parse_money(&envelope, &format!("{pointer}/charges"), raw, &currency))
                .transpose()?;
            labels.push(Label {
                tracking_number: result.tracking_number,
                shipment_id: shipment_id.clone(),
                label_format: label_format.clone(),
                label_data: result.label_image,
                cost,
                shipment_cost: shipment_cost.clone(),
                data: serde_json::Value::Null,
            });
        }
        envelope.succeed(labels)
    }

    fn message_extractor(&self) -> &dyn MessageExtractor {
        &FAULT_MESSAGES
    }
}
