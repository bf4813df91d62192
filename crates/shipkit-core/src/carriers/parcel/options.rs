use serde::Deserialize;

use crate::error::ConfigurationError;
use crate::geometry::EntityId;
use crate::options::{
    ItemOptions, OptionsNode, ShipmentOptions, Validate, enumerated, parse_all, parse_optional,
    require_digits, require_non_empty, require_present,
};

pub type ParcelItemOptions = ItemOptions<ParcelItemAttributes>;
pub type ParcelPackageOptions = OptionsNode<ParcelPackageAttributes, ParcelItemOptions>;
/// Parcel structures carry no attributes of their own.
pub type ParcelStructureOptions = OptionsNode<(), ParcelPackageOptions>;
pub type ParcelShipmentOptions = ShipmentOptions<ParcelShipmentAttributes, (), ParcelPackageOptions>;

enumerated! {
    /// API revision placed in every endpoint path.
    #[derive(Default)]
    pub enum SubVersion ("sub_version") {
        V1701 => "1701",
        V1707 => "1707",
        V2108 => "2108",
        #[default]
        V2205 => "2205",
    }
}

enumerated! {
    #[derive(Default)]
    pub enum PickupType ("pickup_type") {
        #[default]
        DailyPickup => "01",
        CustomerCounter => "03",
        OneTimePickup => "06",
        LetterCenter => "19",
        AirServiceCenter => "20",
    }
}

enumerated! {
    pub enum DeliveryOption ("delivery_option") {
        SaturdayDelivery => "SAT",
        DirectDeliveryOnly => "DDO",
        HoldForPickup => "HFP",
        CarbonNeutral => "CN",
    }
}

enumerated! {
    #[derive(Default)]
    pub enum LabelFormat ("label_format") {
        #[default]
        Pdf => "PDF",
        Png => "PNG",
        Gif => "GIF",
        Zpl => "ZPL",
    }
}

enumerated! {
    #[derive(Default)]
    pub enum PackagingType ("packaging_type") {
        Letter => "01",
        #[default]
        CustomerSupplied => "02",
        Tube => "03",
        Pak => "04",
        ExpressBox => "21",
        Pallet => "30",
    }
}

enumerated! {
    pub enum Signature ("signature") {
        Required => "2",
        AdultRequired => "3",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParcelShipmentAttributes {
    pub shipper_number: String,
    pub sub_version: SubVersion,
    pub pickup_type: PickupType,
    pub delivery_options: Vec<DeliveryOption>,
    pub label_format: LabelFormat,
    pub negotiated_rates: bool,
    /// Echoed back by the carrier; useful to correlate requests.
    pub customer_context: Option<String>,
}

impl Validate for ParcelShipmentAttributes {
    fn validate(&self) -> Result<(), ConfigurationError> {
        require_non_empty("shipper_number", &self.shipper_number)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParcelPackageAttributes {
    pub packaging_type: PackagingType,
    pub signature: Option<Signature>,
    pub reference: Option<String>,
}

impl Validate for ParcelPackageAttributes {
    fn validate(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParcelItemAttributes {
    /// Harmonized tariff code, digits only.
    pub commodity_code: Option<String>,
    pub origin_country: Option<String>,
}

impl Validate for ParcelItemAttributes {
    fn validate(&self) -> Result<(), ConfigurationError> {
        require_digits("commodity_code", self.commodity_code.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParcelShipmentInput {
    #[serde(default)]
    pub shipper_number: Option<String>,
    #[serde(default)]
    pub sub_version: Option<String>,
    #[serde(default)]
    pub pickup_type: Option<String>,
    #[serde(default)]
    pub delivery_options: Vec<String>,
    #[serde(default)]
    pub label_format: Option<String>,
    #[serde(default)]
    pub negotiated_rates: bool,
    #[serde(default)]
    pub customer_context: Option<String>,
    #[serde(default)]
    pub structures: Vec<ParcelStructureInput>,
    #[serde(default)]
    pub packages: Vec<ParcelPackageInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParcelStructureInput {
    pub id: EntityId,
    #[serde(default)]
    pub packages: Vec<ParcelPackageInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParcelPackageInput {
    pub id: EntityId,
    #[serde(default)]
    pub packaging_type: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub items: Vec<ParcelItemInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParcelItemInput {
    pub id: EntityId,
    #[serde(default)]
    pub commodity_code: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
}

impl TryFrom<ParcelShipmentInput> for ParcelShipmentOptions {
    type Error = ConfigurationError;

    fn try_from(input: ParcelShipmentInput) -> Result<Self, Self::Error> {
        let attributes = ParcelShipmentAttributes {
            shipper_number: require_present("shipper_number", input.shipper_number)?,
            sub_version: parse_optional(input.sub_version.as_deref())?.unwrap_or_default(),
            pickup_type: parse_optional(input.pickup_type.as_deref())?.unwrap_or_default(),
            delivery_options: parse_all(&input.delivery_options)?,
            label_format: parse_optional(input.label_format.as_deref())?.unwrap_or_default(),
            negotiated_rates: input.negotiated_rates,
            customer_context: input.customer_context,
        };
        let structures = input
            .structures
            .into_iter()
            .map(|structure| {
                let packages = package_options(structure.packages)?;
                ParcelStructureOptions::new(structure.id, (), packages)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let options = Self::new(attributes, structures)?;
        if input.packages.is_empty() {
            return Ok(options);
        }
        #[allow(deprecated)]
        let options = options.with_package_options(package_options(input.packages)?);
        Ok(options)
    }
}

fn package_options(
    packages: Vec<ParcelPackageInput>,
) -> Result<Vec<ParcelPackageOptions>, ConfigurationError> {
    packages
        .into_iter()
        .map(ParcelPackageOptions::try_from)
        .collect()
}

impl TryFrom<ParcelPackageInput> for ParcelPackageOptions {
    type Error = ConfigurationError;

    fn try_from(input: ParcelPackageInput) -> Result<Self, Self::Error> {
        let attributes = ParcelPackageAttributes {
            packaging_type: parse_optional(input.packaging_type.as_deref())?.unwrap_or_default(),
            signature: parse_optional(input.signature.as_deref())?,
            reference: input.reference,
        };
        let items = input
            .items
            .into_iter()
            .map(|item| {
                ParcelItemOptions::new(
                    item.id,
                    ParcelItemAttributes {
                        commodity_code: item.commodity_code,
                        origin_country: item.origin_country,
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(input.id, attributes, items)
    }
}
