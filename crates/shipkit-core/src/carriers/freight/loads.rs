use serde::Deserialize;
use serde_json::{Value, json};

use crate::adapter::{Capability, Operation, ResponseEnvelope, find_shipping_method};
use crate::error::{ApiError, MessageExtractor};
use crate::geometry::Shipment;
use crate::models::{ShipmentConfirmation, ShipmentDocument};
use crate::outcome::{ApiResult, Request, Response};

use super::options::LoadOptions;
use super::request::load_body;
use super::{API_KEY_HEADER, CARRIER_CODE, ERROR_MESSAGES, FreightCredentials, SHIPPING_METHODS};

const ROOT: &str = "createLoadResponse";

/// Tenders a load to the carrier, returning the load id and its bill of
/// lading.
#[derive(Debug, Clone, Copy)]
pub struct CreateLoad<'a> {
    credentials: &'a FreightCredentials,
}

impl<'a> CreateLoad<'a> {
    #[must_use]
    pub const fn new(credentials: &'a FreightCredentials) -> Self {
        Self { credentials }
    }
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(rename = "type")]
    document_type: String,
    format: String,
    data: String,
}

impl Operation for CreateLoad<'_> {
    type Input = Shipment;
    type Options = LoadOptions;
    type Output = ShipmentConfirmation;

    const CARRIER: &'static str = CARRIER_CODE;
    const CAPABILITY: Capability = Capability::Loads;

    fn serialize(&self, shipment: &Shipment, options: &LoadOptions) -> Request {
        let attributes = options.attributes();
        let mut body = load_body(shipment, options);
        if let Some(instructions) = &attributes.delivery_instructions {
            body.insert("deliveryInstructions".to_string(), json!(instructions));
        }
        if let Some(date) = attributes.must_arrive_by {
            body.insert("mustArriveBy".to_string(), json!(date.to_string()));
        }
        if let Some(po_number) = &attributes.po_number {
            body.insert("poNumber".to_string(), json!(po_number));
        }
        Request::post_json(self.credentials.endpoint("v2/loads"), &Value::Object(body))
            .with_header(API_KEY_HEADER, self.credentials.api_key.as_str())
    }

    fn parse(&self, request: &Request, response: &Response) -> ApiResult<ShipmentConfirmation> {
        let envelope = ResponseEnvelope::open(request, response, ROOT, &ERROR_MESSAGES)?;
        let id = envelope.field::<String>("/loadId")?;
        let bol_number = envelope.optional::<String>("/bolNumber")?;
        let pickup_number = envelope.optional::<String>("/pickupNumber")?;
        let shipping_method = envelope
            .optional::<String>("/serviceCode")?
            .map(|code| {
                find_shipping_method(SHIPPING_METHODS, &code, None)
                    .copied()
                    .ok_or_else(|| {
                        envelope.failure(ApiError::decode(
                            "/serviceCode",
                            format!("unknown service code {code:?}"),
                        ))
                    })
            })
            .transpose()?;
        let documents = envelope
            .optional::<Vec<Document>>("/documents")?
            .unwrap_or_default()
            .into_iter()
            .map(|document| ShipmentDocument {
                document_type: document.document_type,
                format: document.format,
                data: document.data,
            })
            .collect();

        envelope.succeed(ShipmentConfirmation {
            id,
            bol_number,
            pickup_number,
            shipping_method,
            documents,
            data: envelope.root().clone(),
        })
    }

    fn message_extractor(&self) -> &dyn MessageExtractor {
        &ERROR_MESSAGES
    }
}
