use std::sync::{Mutex, PoisonError};

use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::adapter::Operation;
use crate::auth::TokenState;
use crate::error::{ApiErrorKind, ConfigurationError, TransportError};
use crate::geometry::EntityId;
use crate::outcome::{Request, Response};

fn credentials() -> ParcelCredentials {
    ParcelCredentials::new("https://parcel.test", "client-1", "secret-1")
}

fn token() -> AccessToken {
    let issued_at = Utc
        .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    AccessToken::new("tok-1", issued_at, 3600)
}

fn shipment(origin: &str) -> Shipment {
    serde_json::from_value(json!({
        "origin": { "country_code": origin, "postal_code": "M5V 2T6", "city": "Toronto" },
        "destination": { "country_code": "US", "postal_code": "10001" },
        "pickup_date": "2024-03-04",
        "structures": [{
            "id": 1,
            "packages": [
                { "id": 10, "weight_lbs": 5.5, "length_in": 12.0, "width_in": 10.0, "height_in": 4.0,
                  "items": [{ "id": 100, "weight_lbs": 5.5, "description": "books" }] },
                { "id": 11, "weight_lbs": 2.0, "length_in": 8.0, "width_in": 6.0, "height_in": 2.0 }
            ]
        }],
        "packages": [
            { "id": 20, "weight_lbs": 1.0, "length_in": 4.0, "width_in": 4.0, "height_in": 4.0 }
        ]
    }))
    .expect("valid shipment fixture")
}

fn options() -> ParcelShipmentOptions {
    let input: ParcelShipmentInput = serde_json::from_value(json!({
        "shipper_number": "A1B2C3",
        "negotiated_rates": true,
        "delivery_options": ["SAT"],
        "structures": [{
            "id": 1,
            "packages": [{
                "id": 10,
                "packaging_type": "04",
                "signature": "2",
                "items": [{ "id": 100, "commodity_code": "490199", "origin_country": "CA" }]
            }]
        }]
    }))
    .expect("valid options input");
    ParcelShipmentOptions::try_from(input).expect("valid options")
}

fn body(request: &Request) -> Value {
    request.json_body().expect("json body")
}

#[test]
fn rate_request_resolves_options_for_every_package() {
    let request = Rates::new(&credentials(), &token()).serialize(&shipment("CA"), &options());
    assert_eq!(request.url, "https://parcel.test/api/rating/v2205/shop");
    assert_eq!(request.header("authorization"), Some("Bearer tok-1"));

    let body = body(&request);
    let rate_request = &body["rateRequest"];
    assert_eq!(rate_request["shipperNumber"], "A1B2C3");
    assert_eq!(rate_request["pickupType"], "01");
    assert_eq!(rate_request["negotiatedRates"], true);
    assert_eq!(rate_request["deliveryOptions"], json!(["SAT"]));
    assert_eq!(rate_request["shipDate"], "20240304");
    assert_eq!(rate_request["numberOfPieces"], 3);

    let packages = &rate_request["packages"];
    assert_eq!(packages[0]["packagingType"], "04");
    assert_eq!(packages[0]["signature"], "2");
    assert_eq!(packages[0]["commodities"][0]["commodityCode"], "490199");
    assert_eq!(packages[1]["packagingType"], "02");
    assert!(packages[1].get("signature").is_none());
    assert_eq!(packages[2]["id"], "20");
    assert_eq!(packages[2]["packagingType"], "02");
}

#[test]
fn missing_shipper_number_fails_construction() {
    let err = ParcelShipmentOptions::try_from(ParcelShipmentInput::default())
        .expect_err("shipper number required");
    assert_eq!(
        err,
        ConfigurationError::MissingAttribute {
            attribute: "shipper_number"
        }
    );
}

#[test]
fn unset_codes_fall_back_to_their_defaults() {
    assert_eq!(SubVersion::default(), SubVersion::V2205);
    assert_eq!(PickupType::default().as_str(), "01");
    assert_eq!(LabelFormat::default().as_str(), "PDF");
    assert_eq!(PackagingType::default().as_str(), "02");
}

#[rstest]
#[case("1701", SubVersion::V1701)]
#[case("1707", SubVersion::V1707)]
#[case("2108", SubVersion::V2108)]
#[case("2205", SubVersion::V2205)]
fn sub_version_selects_endpoint(#[case] code: &str, #[case] expected: SubVersion) {
    let input = ParcelShipmentInput {
        shipper_number: Some("A1B2C3".to_string()),
        sub_version: Some(code.to_string()),
        ..ParcelShipmentInput::default()
    };
    let options = ParcelShipmentOptions::try_from(input).expect("declared sub version");
    assert_eq!(options.attributes().sub_version, expected);
    let request = Timings::new(&credentials(), &token()).serialize(&shipment("US"), &options);
    assert_eq!(
        request.url,
        format!("https://parcel.test/api/shipments/v{code}/transittimes")
    );
}

#[rstest]
#[case(Some("2301"), &[], "sub_version")]
#[case(None, &["SAT", "TELEPORT"], "delivery_option")]
fn undeclared_shipment_codes_name_their_attribute(
    #[case] sub_version: Option<&str>,
    #[case] delivery_options: &[&str],
    #[case] attribute: &str,
) {
    let input = ParcelShipmentInput {
        shipper_number: Some("A1B2C3".to_string()),
        sub_version: sub_version.map(str::to_string),
        delivery_options: delivery_options
            .iter()
            .map(|code| (*code).to_string())
            .collect(),
        ..ParcelShipmentInput::default()
    };
    let err = ParcelShipmentOptions::try_from(input).expect_err("undeclared code");
    assert_eq!(err.attribute(), attribute);
}

#[test]
fn undeclared_codes_are_rejected_with_their_attribute() {
    let input = ParcelShipmentInput {
        shipper_number: Some("A1B2C3".to_string()),
        pickup_type: Some("99".to_string()),
        ..ParcelShipmentInput::default()
    };
    let err = ParcelShipmentOptions::try_from(input).expect_err("undeclared pickup type");
    assert_eq!(err.attribute(), "pickup_type");

    let input = ParcelPackageInput {
        id: EntityId::Number(1),
        packaging_type: None,
        signature: None,
        reference: None,
        items: vec![ParcelItemInput {
            id: EntityId::Number(2),
            commodity_code: Some("49.01".to_string()),
            origin_country: None,
        }],
    };
    let err = ParcelPackageOptions::try_from(input).expect_err("non-numeric commodity code");
    assert_eq!(err.attribute(), "commodity_code");
}

#[test]
fn shared_service_code_resolves_by_request_origin() {
    let response = Response::new(
        200,
        json!({
            "rateResponse": {
                "ratedShipments": [{
                    "serviceCode": "07",
                    "currency": "CAD",
                    "totalCharges": "88.10",
                    "negotiatedCharges": "80.00",
                    "charges": [{ "code": "FUEL", "amount": "8.10" }]
                }]
            }
        })
        .to_string(),
    );
    let credentials = credentials();
    let token = token();
    let operation = Rates::new(&credentials, &token);

    let from_canada = operation.serialize(&shipment("CA"), &options());
    let rates = operation
        .parse(&from_canada, &response)
        .expect("rates")
        .into_data();
    assert_eq!(rates[0].shipping_method.name, "Express");
    assert_eq!(rates[0].total.cents, 8_810);
    assert_eq!(rates[0].total.currency, "CAD");
    assert_eq!(rates[0].negotiated_total.as_ref().map(|money| money.cents), Some(8_000));

    let from_us = operation.serialize(&shipment("US"), &options());
    let rates = operation.parse(&from_us, &response).expect("rates").into_data();
    assert_eq!(rates[0].shipping_method.name, "Worldwide Express");
}

#[test]
fn fault_body_becomes_business_failure() {
    let credentials = credentials();
    let token = token();
    let operation = Rates::new(&credentials, &token);
    let request = operation.serialize(&shipment("US"), &options());
    let response = Response::new(
        200,
        r#"{"fault": {"status": "111210", "description": "The requested service is unavailable between the selected locations."}}"#,
    );
    let failure = operation.parse(&request, &response).expect_err("fault");
    assert_eq!(failure.data.kind(), ApiErrorKind::Business);
    assert_eq!(
        failure.data.message(),
        "111210: The requested service is unavailable between the selected locations."
    );
}

#[test]
fn label_response_yields_one_label_per_package() {
    let credentials = credentials();
    let token = token();
    let ground = SHIPPING_METHODS
        .iter()
        .find(|method| method.name == "Ground")
        .expect("ground service");
    let operation = Labels::new(&credentials, &token, ground);
    let request = operation.serialize(&shipment("US"), &options());
    let body = body(&request);
    assert_eq!(body["shipmentRequest"]["service"], "03");
    assert_eq!(body["shipmentRequest"]["labelFormat"], "PDF");
    assert_eq!(request.url, "https://parcel.test/api/shipments/v2205/ship");

    let response = Response::new(
        200,
        json!({
            "shipmentResponse": {
                "shipmentId": "1Z999AA1",
                "currency": "USD",
                "totalCharges": "31.40",
                "packages": [
                    { "trackingNumber": "1Z999AA10000000001", "labelImage": "R0lGOD", "charges": "15.70" },
                    { "trackingNumber": "1Z999AA10000000002", "labelImage": "R0lGOE" }
                ]
            }
        })
        .to_string(),
    );
    let labels = operation.parse(&request, &response).expect("labels").into_data();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0].tracking_number, "1Z999AA10000000001");
    assert_eq!(labels[0].cost.as_ref().map(|money| money.cents), Some(1_570));
    assert_eq!(labels[1].cost, None);
    assert_eq!(labels[1].shipment_id.as_deref(), Some("1Z999AA1"));
    assert_eq!(labels[1].shipment_cost.as_ref().map(|money| money.cents), Some(3_140));
}

#[test]
fn transit_response_decodes_timings() {
    let credentials = credentials();
    let token = token();
    let operation = Timings::new(&credentials, &token);
    let request = operation.serialize(&shipment("US"), &options());
    assert_eq!(body(&request)["transitRequest"]["numberOfPackages"], 3);
    let response = Response::new(
        200,
        json!({
            "transitResponse": {
                "services": [{
                    "serviceCode": "03",
                    "pickupDate": "2024-03-04",
                    "deliveryDate": "2024-03-07",
                    "businessDays": 3,
                    "guaranteed": true,
                    "deliveryTime": "23:00:00"
                }]
            }
        })
        .to_string(),
    );
    let timings = operation.parse(&request, &response).expect("timings").into_data();
    assert_eq!(timings[0].shipping_method.name, "Ground");
    assert_eq!(timings[0].delivery.to_string(), "2024-03-07");
    assert!(timings[0].guaranteed);
    assert_eq!(timings[0].properties["delivery_time"], "23:00:00");
}

#[test]
fn transit_service_without_delivery_date_names_the_field() {
    let credentials = credentials();
    let token = token();
    let operation = Timings::new(&credentials, &token);
    let request = operation.serialize(&shipment("US"), &options());
    let response = Response::new(
        200,
        r#"{"transitResponse": {"services": [{"serviceCode": "03", "pickupDate": "2024-03-04"}]}}"#,
    );
    let failure = operation.parse(&request, &response).expect_err("missing delivery date");
    assert_eq!(failure.data.kind(), ApiErrorKind::Decode);
    assert!(failure.data.message().starts_with("could not decode /services/0"));
    assert!(failure.data.message().contains("deliveryDate"));
}

#[test]
fn token_response_decodes_issue_time_in_millis() {
    let credentials = credentials();
    let operation = RequestToken::new(&credentials);
    let request = operation.serialize(&(), &());
    assert_eq!(request.url, "https://parcel.test/security/v1/oauth/token");
    assert_eq!(body(&request)["clientId"], "client-1");

    let response = Response::new(
        200,
        r#"{"token": {"accessToken": "tok-9", "expiresIn": 14399, "issuedAt": 1709294400000}}"#,
    );
    let token = operation.parse(&request, &response).expect("token").into_data();
    assert_eq!(token.value(), "tok-9");
    assert_eq!(token.expires_in(), 14_399);
    assert_eq!(token.issued_at(), self::token().issued_at());
}

/// Answers token requests and rate requests, counting each.
struct Carrier {
    seen: Mutex<Vec<String>>,
    token_expires_in: u64,
}

impl Carrier {
    fn new(token_expires_in: u64) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            token_expires_in,
        }
    }

    fn calls_to(&self, fragment: &str) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|url| url.contains(fragment))
            .count()
    }
}

impl Transport for Carrier {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.url.clone());
        if request.url.ends_with("/oauth/token") {
            let issued_at = Utc::now().timestamp_millis();
            return Ok(Response::new(
                200,
                json!({
                    "token": {
                        "accessToken": "tok-live",
                        "expiresIn": self.token_expires_in,
                        "issuedAt": issued_at,
                    }
                })
                .to_string(),
            ));
        }
        if request.header("authorization") != Some("Bearer tok-live") {
            return Err(TransportError::Http {
                response: Response::new(
                    401,
                    r#"{"fault": {"status": "250002", "description": "Invalid Authentication Information."}}"#,
                ),
            });
        }
        Ok(Response::new(
            200,
            r#"{"rateResponse": {"ratedShipments": [{"serviceCode": "03", "currency": "USD", "totalCharges": "9.99"}]}}"#,
        ))
    }
}

#[test]
fn client_reuses_a_valid_token() {
    let client = ParcelClient::new(credentials(), Carrier::new(3600));
    assert_eq!(client.tokens().state_at(Utc::now()), TokenState::NoToken);

    for _ in 0..3 {
        let rates = client
            .rates(&shipment("US"), &options())
            .expect("rates")
            .into_data();
        assert_eq!(rates[0].total.cents, 999);
    }

    assert_eq!(client.transport.calls_to("/oauth/token"), 1);
    assert_eq!(client.transport.calls_to("/rating/"), 3);
    assert_eq!(client.tokens().state_at(Utc::now()), TokenState::TokenValid);
}

#[test]
fn client_refreshes_an_expired_token() {
    let client = ParcelClient::new(credentials(), Carrier::new(0));
    client.rates(&shipment("US"), &options()).expect("first call");
    client.rates(&shipment("US"), &options()).expect("second call");
    assert_eq!(client.transport.calls_to("/oauth/token"), 2);
}

#[test]
fn unauthorized_response_uses_fault_description() {
    let carrier = Carrier::new(3600);
    let failure = execute(
        &Rates::new(&credentials(), &token()),
        &carrier,
        &shipment("US"),
        &options(),
    )
    .expect_err("unauthorized");
    assert_eq!(failure.data.kind(), ApiErrorKind::Business);
    assert_eq!(
        failure.data.message(),
        "250002: Invalid Authentication Information."
    );
    assert_eq!(failure.response().map(|response| response.status), Some(401));
}

#[test]
fn credentials_debug_hides_secret() {
    let rendered = format!("{:?}", credentials());
    assert!(rendered.contains("client-1"));
    assert!(!rendered.contains("secret-1"));
}
