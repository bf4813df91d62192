use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::ConfigurationError;
use crate::geometry::EntityId;
use crate::options::{
    ItemOptions, OptionsNode, ShipmentOptions, Validate, enumerated, parse_all, parse_optional,
    require_digits, require_non_empty, require_present,
};

pub type FreightItemOptions = ItemOptions<FreightItemAttributes>;
pub type FreightPackageOptions = OptionsNode<FreightPackageAttributes, FreightItemOptions>;
pub type HandlingUnitOptions = OptionsNode<HandlingUnitAttributes, FreightPackageOptions>;
pub type LoadOptions =
    ShipmentOptions<LoadAttributes, HandlingUnitAttributes, FreightPackageOptions>;

enumerated! {
    #[derive(Default)]
    pub enum DockType ("dock_type") {
        #[default]
        Business => "BUSINESS",
        Residential => "RESIDENTIAL",
        ConstructionSite => "CONSTRUCTION_SITE",
        Tradeshow => "TRADESHOW",
    }
}

enumerated! {
    pub enum Accessorial ("accessorial") {
        LiftgatePickup => "LIFTGATE_PICKUP",
        LiftgateDelivery => "LIFTGATE_DELIVERY",
        InsidePickup => "INSIDE_PICKUP",
        InsideDelivery => "INSIDE_DELIVERY",
        AppointmentDelivery => "APPOINTMENT",
        NotifyBeforeDelivery => "NOTIFY",
        LimitedAccess => "LIMITED_ACCESS",
    }
}

enumerated! {
    #[derive(Default)]
    pub enum HandlingUnit ("handling_unit") {
        #[default]
        Pallet => "PALLET",
        Skid => "SKID",
        Crate => "CRATE",
        Loose => "LOOSE",
    }
}

enumerated! {
    #[derive(Default)]
    pub enum Packaging ("packaging") {
        #[default]
        Pallets => "Pallets",
        Boxes => "Boxes",
        Crates => "Crates",
        Drums => "Drums",
        Bundles => "Bundles",
        Rolls => "Rolls",
        Totes => "Totes",
        Pieces => "Pieces",
    }
}

enumerated! {
    /// NMFC density class.
    pub enum FreightClass ("freight_class") {
        Class50 => "50",
        Class55 => "55",
        Class60 => "60",
        Class65 => "65",
        Class70 => "70",
        Class77_5 => "77.5",
        Class85 => "85",
        Class92_5 => "92.5",
        Class100 => "100",
        Class110 => "110",
        Class125 => "125",
        Class150 => "150",
        Class175 => "175",
        Class200 => "200",
        Class250 => "250",
        Class300 => "300",
        Class400 => "400",
        Class500 => "500",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadAttributes {
    pub account_id: String,
    /// Standard carrier alpha code of the carrier to tender to.
    pub scac: String,
    pub dock_type: DockType,
    pub accessorials: Vec<Accessorial>,
    pub delivery_instructions: Option<String>,
    pub must_arrive_by: Option<NaiveDate>,
    pub po_number: Option<String>,
}

impl Validate for LoadAttributes {
    fn validate(&self) -> Result<(), ConfigurationError> {
        require_non_empty("account_id", &self.account_id)?;
        require_non_empty("scac", &self.scac)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlingUnitAttributes {
    pub unit_type: HandlingUnit,
    pub stackable: bool,
}

impl Validate for HandlingUnitAttributes {
    fn validate(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreightPackageAttributes {
    pub packaging: Packaging,
    pub description: Option<String>,
}

impl Validate for FreightPackageAttributes {
    fn validate(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreightItemAttributes {
    pub freight_class: Option<FreightClass>,
    pub nmfc_code: Option<String>,
    pub sub_class: Option<String>,
    pub hazmat: bool,
}

impl Validate for FreightItemAttributes {
    fn validate(&self) -> Result<(), ConfigurationError> {
        require_digits("nmfc_code", self.nmfc_code.as_deref())?;
        require_digits("sub_class", self.sub_class.as_deref())
    }
}

/// Caller-facing description of a [`LoadOptions`] tree. Enumerated values
/// stay as text here and are checked when the tree is built.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadInput {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub scac: Option<String>,
    #[serde(default)]
    pub dock_type: Option<String>,
    #[serde(default)]
    pub accessorials: Vec<String>,
    #[serde(default)]
    pub delivery_instructions: Option<String>,
    #[serde(default)]
    pub must_arrive_by: Option<NaiveDate>,
    #[serde(default)]
    pub po_number: Option<String>,
    #[serde(default)]
    pub handling_units: Vec<HandlingUnitInput>,
    /// Package options keyed directly under the load.
    #[serde(default)]
    pub packages: Vec<FreightPackageInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlingUnitInput {
    pub id: EntityId,
    #[serde(default)]
    pub unit_type: Option<String>,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default)]
    pub packages: Vec<FreightPackageInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FreightPackageInput {
    pub id: EntityId,
    #[serde(default)]
    pub packaging: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<FreightItemInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FreightItemInput {
    pub id: EntityId,
    #[serde(default)]
    pub freight_class: Option<String>,
    #[serde(default)]
    pub nmfc_code: Option<String>,
    #[serde(default)]
    pub sub_class: Option<String>,
    #[serde(default)]
    pub hazmat: bool,
}

impl TryFrom<LoadInput> for LoadOptions {
    type Error = ConfigurationError;

    fn try_from(input: LoadInput) -> Result<Self, Self::Error> {
        let attributes = LoadAttributes {
            account_id: require_present("account_id", input.account_id)?,
            scac: require_present("scac", input.scac)?,
            dock_type: parse_optional(input.dock_type.as_deref())?.unwrap_or_default(),
            accessorials: parse_all(&input.accessorials)?,
            delivery_instructions: input.delivery_instructions,
            must_arrive_by: input.must_arrive_by,
            po_number: input.po_number,
        };
        let units = input
            .handling_units
            .into_iter()
            .map(HandlingUnitOptions::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let options = Self::new(attributes, units)?;
        if input.packages.is_empty() {
            return Ok(options);
        }
        let packages = input
            .packages
            .into_iter()
            .map(FreightPackageOptions::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        #[allow(deprecated)]
        let options = options.with_package_options(packages);
        Ok(options)
    }
}

impl TryFrom<HandlingUnitInput> for HandlingUnitOptions {
    type Error = ConfigurationError;

    fn try_from(input: HandlingUnitInput) -> Result<Self, Self::Error> {
        let attributes = HandlingUnitAttributes {
            unit_type: parse_optional(input.unit_type.as_deref())?.unwrap_or_default(),
            stackable: input.stackable,
        };
        let packages = input
            .packages
            .into_iter()
            .map(FreightPackageOptions::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(input.id, attributes, packages)
    }
}

impl TryFrom<FreightPackageInput> for FreightPackageOptions {
    type Error = ConfigurationError;

    fn try_from(input: FreightPackageInput) -> Result<Self, Self::Error> {
        let attributes = FreightPackageAttributes {
            packaging: parse_optional(input.packaging.as_deref())?.unwrap_or_default(),
            description: input.description,
        };
        let items = input
            .items
            .into_iter()
            .map(FreightItemOptions::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(input.id, attributes, items)
    }
}

impl TryFrom<FreightItemInput> for FreightItemOptions {
    type Error = ConfigurationError;

    fn try_from(input: FreightItemInput) -> Result<Self, Self::Error> {
        Self::new(
            input.id,
            FreightItemAttributes {
                freight_class: parse_optional(input.freight_class.as_deref())?,
                nmfc_code: input.nmfc_code,
                sub_class: input.sub_class,
                hazmat: input.hazmat,
            },
        )
    }
}
