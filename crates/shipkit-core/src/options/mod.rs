//! Per-entity operation options, resolved by geometry identifier.
//!
//! A tree mirrors the shipment: [`ShipmentOptions`] holds structure-level
//! [`OptionsNode`]s, which hold package-level nodes, which hold
//! [`ItemOptions`]. Each carrier plugs in its own attribute types. Every node
//! validates its attributes when constructed and is immutable afterwards, so
//! serializers can look options up freely and never re-check them.

mod enumerated;
mod node;
mod shipment;
mod validate;

pub(crate) use enumerated::enumerated;
pub use node::{ChildFactory, ChildOptions, DefaultOptions, ItemOptions, OptionsNode};
pub use shipment::ShipmentOptions;
pub use validate::{
    Validate, parse_all, parse_optional, require_digits, require_non_empty, require_present,
};

#[cfg(test)]
mod tests;
