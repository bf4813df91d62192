use std::borrow::Cow;

use rstest::rstest;

use super::enumerated;
use super::*;
use crate::error::ConfigurationError;
use crate::geometry::{EntityId, Identified, Item, Package, Structure};

enumerated! {
    enum Wrapping ("wrapping") {
        Pallets => "Pallets",
        Boxes => "Boxes",
        Crates => "Crates",
    }
}

impl Default for Wrapping {
    fn default() -> Self {
        Self::Pallets
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct AccountAttributes {
    account: String,
}

impl Validate for AccountAttributes {
    fn validate(&self) -> Result<(), ConfigurationError> {
        require_non_empty("account", &self.account)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct UnitAttributes {
    stackable: bool,
}

impl Validate for UnitAttributes {
    fn validate(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct WrapAttributes {
    wrapping: Wrapping,
    note: Option<String>,
}

impl Validate for WrapAttributes {
    fn validate(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct CodeAttributes {
    code: Option<String>,
}

impl Validate for CodeAttributes {
    fn validate(&self) -> Result<(), ConfigurationError> {
        require_digits("code", self.code.as_deref())
    }
}

type TestItemOptions = ItemOptions<CodeAttributes>;
type TestPackageOptions = OptionsNode<WrapAttributes, TestItemOptions>;
type TestStructureOptions = OptionsNode<UnitAttributes, TestPackageOptions>;
type TestShipmentOptions = ShipmentOptions<AccountAttributes, UnitAttributes, TestPackageOptions>;

fn item(id: &str) -> Item {
    Item {
        id: EntityId::from(id),
        description: None,
        weight_lbs: 1.0,
        quantity: 1,
    }
}

fn package(id: &str, items: &[&str]) -> Package {
    Package {
        id: EntityId::from(id),
        weight_lbs: 100.0,
        length_in: 48.0,
        width_in: 40.0,
        height_in: 40.0,
        description: None,
        items: items.iter().map(|id| item(id)).collect(),
    }
}

fn structure(id: &str, packages: Vec<Package>) -> Structure {
    Structure {
        id: EntityId::from(id),
        packages,
    }
}

fn package_options(id: &str, wrapping: Wrapping, note: &str) -> TestPackageOptions {
    OptionsNode::new(
        id,
        WrapAttributes {
            wrapping,
            note: Some(note.to_string()),
        },
        Vec::new(),
    )
    .expect("valid package options")
}

fn account() -> AccountAttributes {
    AccountAttributes {
        account: "acct-1".to_string(),
    }
}

fn boxed_package(id: EntityId) -> TestPackageOptions {
    OptionsNode::new(
        id,
        WrapAttributes {
            wrapping: Wrapping::Boxes,
            note: None,
        },
        Vec::new(),
    )
    .expect("valid boxed default")
}

#[test]
fn every_unlisted_child_resolves_to_a_default_with_its_id() {
    let listed = TestItemOptions::new(
        "i1",
        CodeAttributes {
            code: Some("100".to_string()),
        },
    )
    .expect("valid item options");
    let options = TestPackageOptions::new("p1", WrapAttributes::default(), vec![listed.clone()])
        .expect("valid package options");
    let pkg = package("p1", &["i1", "i2", "i3"]);

    assert!(matches!(options.options_for(&pkg.items[0]), Cow::Borrowed(found) if *found == listed));
    for child in &pkg.items[1..] {
        let resolved = options.options_for(child);
        assert!(matches!(resolved, Cow::Owned(_)));
        assert_eq!(resolved.id(), &child.id);
        assert_eq!(resolved.attributes(), &CodeAttributes::default());
    }
}

#[test]
fn duplicate_ids_resolve_to_the_first_entry() {
    let options = TestStructureOptions::new(
        "s1",
        UnitAttributes::default(),
        vec![
            package_options("p1", Wrapping::Crates, "first"),
            package_options("p1", Wrapping::Boxes, "second"),
        ],
    )
    .expect("valid structure options");
    let resolved = options.options_for(&package("p1", &[]));
    assert_eq!(resolved.attributes().wrapping, Wrapping::Crates);
    assert_eq!(resolved.attributes().note.as_deref(), Some("first"));
}

#[test]
fn second_package_falls_back_to_declared_default() {
    let shipment_structure = structure("s1", vec![package("p1", &[]), package("p2", &[])]);
    let options = TestShipmentOptions::new(
        account(),
        vec![
            TestStructureOptions::new(
                "s1",
                UnitAttributes::default(),
                vec![package_options("p1", Wrapping::Crates, "listed")],
            )
            .expect("valid structure options"),
        ],
    )
    .expect("valid shipment options");

    let second = &shipment_structure.packages[1];
    let resolved = options.options_for_package(Some(&shipment_structure), second);
    assert_eq!(resolved.id(), &second.id);
    assert_eq!(resolved.attributes().wrapping, Wrapping::Pallets);
    assert_eq!(resolved.attributes().note, None);
}

#[test]
fn defaults_chain_down_every_level() {
    let options = TestShipmentOptions::new(account(), Vec::new()).expect("valid shipment options");
    let shipment_structure = structure("s9", vec![package("p9", &["i9"])]);

    let structure_options = options.options_for_structure(&shipment_structure);
    assert_eq!(structure_options.id(), &EntityId::from("s9"));
    let pkg = &shipment_structure.packages[0];
    let package_options = structure_options.options_for(pkg);
    assert_eq!(package_options.attributes().wrapping, Wrapping::Pallets);
    let item_options = package_options.options_for(&pkg.items[0]);
    assert_eq!(item_options.id(), &EntityId::from("i9"));
    assert_eq!(item_options.attributes().code, None);
}

#[test]
#[allow(deprecated)]
fn flattened_package_options_resolve_loose_packages_like_nested_ones() {
    let nested = TestShipmentOptions::new(
        account(),
        vec![
            TestStructureOptions::new(
                "s1",
                UnitAttributes::default(),
                vec![package_options("p1", Wrapping::Crates, "crated")],
            )
            .expect("valid structure options"),
        ],
    )
    .expect("valid nested options");
    let flattened = TestShipmentOptions::new(account(), Vec::new())
        .expect("valid flattened options")
        .with_package_options(vec![package_options("p1", Wrapping::Crates, "crated")]);

    let pkg = package("p1", &[]);
    let via_structure = nested.options_for_package(Some(&structure("s1", vec![pkg.clone()])), &pkg);
    let via_flattened = flattened.options_for_package(None, &pkg);
    assert_eq!(via_structure.attributes(), via_flattened.attributes());
    assert_eq!(via_structure.id(), via_flattened.id());
}

#[test]
#[allow(deprecated)]
fn structured_entry_wins_over_flattened_entry() {
    let pkg = package("p1", &[]);
    let owner = structure("s1", vec![pkg.clone()]);
    let options = TestShipmentOptions::new(
        account(),
        vec![
            TestStructureOptions::new(
                "s1",
                UnitAttributes::default(),
                vec![package_options("p1", Wrapping::Crates, "structured")],
            )
            .expect("valid structure options"),
        ],
    )
    .expect("valid shipment options")
    .with_package_options(vec![package_options("p1", Wrapping::Boxes, "flattened")]);

    let resolved = options.options_for_package(Some(&owner), &pkg);
    assert_eq!(resolved.attributes().note.as_deref(), Some("structured"));

    let unlisted_owner = structure("s2", vec![pkg.clone()]);
    let resolved = options.options_for_package(Some(&unlisted_owner), &pkg);
    assert_eq!(resolved.attributes().note.as_deref(), Some("flattened"));
}

#[test]
fn child_factories_are_replaceable_per_level() {
    let node = TestStructureOptions::new("s1", UnitAttributes::default(), Vec::new())
        .expect("valid structure options")
        .with_child_factory(boxed_package);
    assert_eq!(
        node.options_for(&package("p1", &[])).attributes().wrapping,
        Wrapping::Boxes
    );

    let shipment = TestShipmentOptions::new(account(), Vec::new())
        .expect("valid shipment options")
        .with_package_factory(boxed_package);
    let loose = package("loose", &[]);
    let resolved = shipment.options_for_package(None, &loose);
    assert_eq!(resolved.attributes().wrapping, Wrapping::Boxes);
    assert_eq!(resolved.id(), &loose.id);
}

#[test]
fn construction_rejects_missing_required_attribute() {
    let err = TestShipmentOptions::new(
        AccountAttributes {
            account: "   ".to_string(),
        },
        Vec::new(),
    )
    .expect_err("blank account must be rejected");
    assert_eq!(err, ConfigurationError::MissingAttribute { attribute: "account" });
}

#[rstest]
#[case("12a")]
#[case("")]
#[case("-5")]
#[case("1.5")]
fn construction_rejects_non_numeric_codes(#[case] code: &str) {
    let err = TestItemOptions::new(
        "i1",
        CodeAttributes {
            code: Some(code.to_string()),
        },
    )
    .expect_err("non-numeric code must be rejected");
    assert!(matches!(err, ConfigurationError::NonNumeric { attribute: "code", .. }));
}

#[rstest]
#[case("Pallets", Wrapping::Pallets)]
#[case("Boxes", Wrapping::Boxes)]
#[case("Crates", Wrapping::Crates)]
fn every_declared_code_parses(#[case] raw: &str, #[case] expected: Wrapping) {
    assert_eq!(raw.parse::<Wrapping>().expect("declared code"), expected);
    assert_eq!(expected.as_str(), raw);
}

#[test]
fn undeclared_code_fails_with_attribute_and_allowed_values() {
    let err = "NotARealType"
        .parse::<Wrapping>()
        .expect_err("undeclared code must be rejected");
    assert_eq!(
        err,
        ConfigurationError::InvalidValue {
            attribute: "wrapping",
            value: "NotARealType".to_string(),
            allowed: "Pallets, Boxes, Crates".to_string(),
        }
    );
    assert_eq!(err.attribute(), Wrapping::ATTRIBUTE);
    assert!(serde_json::from_str::<Wrapping>("\"pallets\"").is_err());
    assert_eq!(
        serde_json::from_str::<Wrapping>("\"Boxes\"").expect("serde parse"),
        Wrapping::Boxes
    );
}

#[test]
fn options_trees_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TestShipmentOptions>();
}
