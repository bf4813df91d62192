use serde_json::{Map, Value, json};

use crate::geometry::{Location, Package, Shipment, Structure};

use super::options::{FreightPackageOptions, LoadOptions};

/// The shipment section shared by quote and tender requests.
pub(super) fn load_body(shipment: &Shipment, options: &LoadOptions) -> Map<String, Value> {
    let attributes = options.attributes();
    let mut body = Map::new();
    body.insert("accountId".to_string(), json!(attributes.account_id.trim()));
    body.insert("scac".to_string(), json!(attributes.scac.trim()));
    body.insert("origin".to_string(), location(&shipment.origin));
    body.insert("destination".to_string(), location(&shipment.destination));
    if let Some(date) = shipment.pickup_date {
        body.insert("pickupDate".to_string(), json!(date.to_string()));
    }
    body.insert("dockType".to_string(), json!(attributes.dock_type.as_str()));
    body.insert(
        "accessorials".to_string(),
        Value::Array(
            attributes
                .accessorials
                .iter()
                .map(|accessorial| json!(accessorial.as_str()))
                .collect(),
        ),
    );
    body.insert(
        "handlingUnits".to_string(),
        Value::Array(
            shipment
                .structures
                .iter()
                .map(|structure| handling_unit(structure, options))
                .collect(),
        ),
    );
    if !shipment.packages.is_empty() {
        body.insert(
            "looseFreight".to_string(),
            Value::Array(
                shipment
                    .packages
                    .iter()
                    .map(|package| {
                        freight_package(package, &options.options_for_package(None, package))
                    })
                    .collect(),
            ),
        );
    }
    body.insert(
        "totalWeightLbs".to_string(),
        json!(shipment.total_weight_lbs()),
    );
    body
}

fn handling_unit(structure: &Structure, options: &LoadOptions) -> Value {
    let unit_options = options.options_for_structure(structure);
    let attributes = unit_options.attributes();
    json!({
        "id": structure.id.to_string(),
        "type": attributes.unit_type.as_str(),
        "stackable": attributes.stackable,
        "weightLbs": structure.weight_lbs(),
        "packages": structure
            .packages
            .iter()
            .map(|package| {
                freight_package(package, &options.options_for_package(Some(structure), package))
            })
            .collect::<Vec<_>>(),
    })
}

fn freight_package(package: &Package, options: &FreightPackageOptions) -> Value {
    let attributes = options.attributes();
    let description = attributes
        .description
        .as_deref()
        .or(package.description.as_deref());
    let mut body = Map::new();
    body.insert("id".to_string(), json!(package.id.to_string()));
    body.insert("packaging".to_string(), json!(attributes.packaging.as_str()));
    body.insert("weightLbs".to_string(), json!(package.weight_lbs));
    body.insert(
        "dimensionsIn".to_string(),
        json!({
            "length": package.length_in,
            "width": package.width_in,
            "height": package.height_in,
        }),
    );
    if let Some(description) = description {
        body.insert("description".to_string(), json!(description));
    }
    body.insert("items".to_string(), items(package, options));
    Value::Object(body)
}

fn items(package: &Package, options: &FreightPackageOptions) -> Value {
    Value::Array(
        package
            .items
            .iter()
            .map(|item| {
                let item_options = options.options_for(item);
                let attributes = item_options.attributes();
                let mut body = Map::new();
                body.insert("id".to_string(), json!(item.id.to_string()));
                body.insert("quantity".to_string(), json!(item.quantity));
                body.insert("weightLbs".to_string(), json!(item.weight_lbs));
                if let Some(description) = &item.description {
                    body.insert("description".to_string(), json!(description));
                }
                if let Some(class) = attributes.freight_class {
                    body.insert("freightClass".to_string(), json!(class.as_str()));
                }
                if let Some(code) = &attributes.nmfc_code {
                    body.insert("nmfcCode".to_string(), json!(code));
                }
                if let Some(sub_class) = &attributes.sub_class {
                    body.insert("nmfcSubClass".to_string(), json!(sub_class));
                }
                body.insert("hazmat".to_string(), json!(attributes.hazmat));
                Value::Object(body)
            })
            .collect(),
    )
}

fn location(location: &Location) -> Value {
    let mut body = Map::new();
    body.insert("countryCode".to_string(), json!(location.country_code));
    body.insert("postalCode".to_string(), json!(location.postal_code));
    if let Some(city) = &location.city {
        body.insert("city".to_string(), json!(city));
    }
    if let Some(region) = &location.region {
        body.insert("state".to_string(), json!(region));
    }
    if !location.address_lines.is_empty() {
        body.insert("addressLines".to_string(), json!(location.address_lines));
    }
    if let Some(company) = &location.company_name {
        body.insert("companyName".to_string(), json!(company));
    }
    if let Some(phone) = &location.phone {
        body.insert("phone".to_string(), json!(phone));
    }
    Value::Object(body)
}
