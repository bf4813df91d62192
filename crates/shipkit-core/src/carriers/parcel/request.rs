use serde_json::{Map, Value, json};

use crate::auth::AccessToken;
use crate::geometry::{Location, Package, Shipment};
use crate::outcome::Request;

use super::ParcelCredentials;
use super::options::{ParcelPackageOptions, ParcelShipmentOptions};

/// A JSON POST to a versioned endpoint, carrying the bearer token.
pub(super) fn authorized_post(
    credentials: &ParcelCredentials,
    token: &AccessToken,
    path: &str,
    body: &Value,
) -> Request {
    Request::post_json(credentials.endpoint(path), body)
        .with_header("Authorization", format!("Bearer {}", token.value()))
}

/// Shipper, addresses and per-package detail shared by rate and label
/// requests.
pub(super) fn shipment_body(shipment: &Shipment, options: &ParcelShipmentOptions) -> Map<String, Value> {
    let attributes = options.attributes();
    let mut body = Map::new();
    body.insert(
        "shipperNumber".to_string(),
        json!(attributes.shipper_number.trim()),
    );
    body.insert("pickupType".to_string(), json!(attributes.pickup_type.as_str()));
    if let Some(context) = &attributes.customer_context {
        body.insert("customerContext".to_string(), json!(context));
    }
    if !attributes.delivery_options.is_empty() {
        body.insert(
            "deliveryOptions".to_string(),
            Value::Array(
                attributes
                    .delivery_options
                    .iter()
                    .map(|option| json!(option.as_str()))
                    .collect(),
            ),
        );
    }
    body.insert("shipFrom".to_string(), address(&shipment.origin));
    body.insert("shipTo".to_string(), address(&shipment.destination));
    if let Some(date) = shipment.pickup_date {
        body.insert("shipDate".to_string(), json!(date.format("%Y%m%d").to_string()));
    }
    let packages = shipment
        .all_packages()
        .map(|(structure, package)| {
            parcel_package(package, &options.options_for_package(structure, package))
        })
        .collect::<Vec<_>>();
    body.insert("numberOfPieces".to_string(), json!(packages.len()));
    body.insert("packages".to_string(), Value::Array(packages));
    body
}

fn parcel_package(package: &Package, options: &ParcelPackageOptions) -> Value {
    let attributes = options.attributes();
    let mut body = Map::new();
    body.insert("id".to_string(), json!(package.id.to_string()));
    body.insert(
        "packagingType".to_string(),
        json!(attributes.packaging_type.as_str()),
    );
    body.insert("weight".to_string(), json!({ "unit": "LBS", "value": package.weight_lbs }));
    body.insert(
        "dimensions".to_string(),
        json!({
            "unit": "IN",
            "length": package.length_in,
            "width": package.width_in,
            "height": package.height_in,
        }),
    );
    if let Some(signature) = attributes.signature {
        body.insert("signature".to_string(), json!(signature.as_str()));
    }
    if let Some(reference) = &attributes.reference {
        body.insert("reference".to_string(), json!(reference));
    }
    if !package.items.is_empty() {
        let commodities = package
            .items
            .iter()
            .map(|item| {
                let item_options = options.options_for(item);
                let attributes = item_options.attributes();
                let mut commodity = Map::new();
                commodity.insert("id".to_string(), json!(item.id.to_string()));
                commodity.insert("quantity".to_string(), json!(item.quantity));
                commodity.insert("weight".to_string(), json!(item.weight_lbs));
                if let Some(description) = &item.description {
                    commodity.insert("description".to_string(), json!(description));
                }
                if let Some(code) = &attributes.commodity_code {
                    commodity.insert("commodityCode".to_string(), json!(code));
                }
                if let Some(country) = &attributes.origin_country {
                    commodity.insert("originCountry".to_string(), json!(country));
                }
                Value::Object(commodity)
            })
            .collect::<Vec<_>>();
        body.insert("commodities".to_string(), Value::Array(commodities));
    }
    Value::Object(body)
}

pub(super) fn address(location: &Location) -> Value {
    let mut body = Map::new();
    if let Some(name) = &location.company_name {
        body.insert("name".to_string(), json!(name));
    }
    if let Some(phone) = &location.phone {
        body.insert("phone".to_string(), json!(phone));
    }
    body.insert("addressLines".to_string(), json!(location.address_lines));
    if let Some(city) = &location.city {
        body.insert("city".to_string(), json!(city));
    }
    if let Some(region) = &location.region {
        body.insert("stateProvinceCode".to_string(), json!(region));
    }
    body.insert("postalCode".to_string(), json!(location.postal_code));
    body.insert("countryCode".to_string(), json!(location.country_code));
    Value::Object(body)
}

/// Origin country recorded in a request built by this module, used to tell
/// apart service codes the carrier reuses across regions.
pub(super) fn origin_country(request: &Request, pointer: &str) -> Option<String> {
    request
        .json_body()?
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}
