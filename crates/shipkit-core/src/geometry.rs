//! Boundary model of the physical shipment.
//!
//! Options resolution only needs stable identifiers ([`Identified`]). The
//! remaining fields are the handful the reference adapters put on the wire;
//! they are taken as given, with no unit conversion.

use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of a geometry entity, unique among its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

pub trait Identified {
    fn id(&self) -> &EntityId;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub country_code: String,
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address_lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub weight_lbs: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: EntityId,
    pub weight_lbs: f64,
    pub length_in: f64,
    pub width_in: f64,
    pub height_in: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub id: EntityId,
    #[serde(default)]
    pub packages: Vec<Package>,
}

impl Structure {
    #[must_use]
    pub fn weight_lbs(&self) -> f64 {
        self.packages.iter().map(|package| package.weight_lbs).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub origin: Location,
    pub destination: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_date: Option<NaiveDate>,
    #[serde(default)]
    pub structures: Vec<Structure>,
    /// Packages not grouped into a structure.
    #[serde(default)]
    pub packages: Vec<Package>,
}

impl Shipment {
    /// Every package with its owning structure: structured packages first,
    /// then ungrouped ones, each in declaration order.
    pub fn all_packages(&self) -> impl Iterator<Item = (Option<&Structure>, &Package)> {
        self.structures
            .iter()
            .flat_map(|structure| {
                structure
                    .packages
                    .iter()
                    .map(move |package| (Some(structure), package))
            })
            .chain(self.packages.iter().map(|package| (None, package)))
    }

    #[must_use]
    pub fn total_weight_lbs(&self) -> f64 {
        self.all_packages()
            .map(|(_, package)| package.weight_lbs)
            .sum()
    }

    #[must_use]
    pub fn is_international(&self) -> bool {
        !self
            .origin
            .country_code
            .eq_ignore_ascii_case(&self.destination.country_code)
    }
}

impl Identified for Structure {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Identified for Package {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl Identified for Item {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(country: &str) -> Location {
        Location {
            country_code: country.to_string(),
            postal_code: "00000".to_string(),
            city: None,
            region: None,
            address_lines: Vec::new(),
            company_name: None,
            phone: None,
        }
    }

    fn package(id: &str, weight: f64) -> Package {
        Package {
            id: EntityId::from(id),
            weight_lbs: weight,
            length_in: 48.0,
            width_in: 40.0,
            height_in: 36.0,
            description: None,
            items: Vec::new(),
        }
    }

    #[test]
    fn entity_id_deserializes_numbers_and_strings() {
        let ids: Vec<EntityId> = serde_json::from_str(r#"[7, "pallet-1"]"#).expect("parse ids");
        assert_eq!(ids, vec![EntityId::Number(7), EntityId::from("pallet-1")]);
        assert_ne!(EntityId::Number(7), EntityId::from("7"));
        assert_eq!(EntityId::Number(7).to_string(), "7");
    }

    #[test]
    fn all_packages_lists_structured_packages_before_loose_ones() {
        let shipment = Shipment {
            id: None,
            origin: location("US"),
            destination: location("CA"),
            pickup_date: None,
            structures: vec![Structure {
                id: EntityId::from("s1"),
                packages: vec![package("p1", 100.0), package("p2", 50.0)],
            }],
            packages: vec![package("p3", 25.0)],
        };
        let ids = shipment
            .all_packages()
            .map(|(structure, package)| {
                (
                    structure.map(|s| s.id.to_string()),
                    package.id.to_string(),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(
            ids,
            vec![
                (Some("s1".to_string()), "p1".to_string()),
                (Some("s1".to_string()), "p2".to_string()),
                (None, "p3".to_string()),
            ]
        );
        assert!((shipment.total_weight_lbs() - 175.0).abs() < f64::EPSILON);
        assert!(shipment.is_international());
    }
}
