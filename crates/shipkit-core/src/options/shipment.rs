use std::borrow::Cow;

use crate::error::ConfigurationError;
use crate::geometry::{Identified, Package, Structure};

use super::node::{ChildFactory, ChildOptions, DefaultOptions, OptionsNode};
use super::validate::Validate;

/// Root of an options tree: shipment attributes, structure options, and the
/// flattened package list some carriers accept in place of structures.
///
/// Package lookup order is fixed:
/// 1. an entry under the explicitly configured options of the package's
///    structure;
/// 2. an entry in the flattened package list;
/// 3. the default the structure level produces for that package.
#[derive(Debug, Clone)]
pub struct ShipmentOptions<A, SA, P> {
    attributes: A,
    structures: ChildOptions<OptionsNode<SA, P>>,
    packages: ChildOptions<P>,
}

impl<A, SA, P> ShipmentOptions<A, SA, P>
where
    A: Validate,
    SA: Default,
    P: DefaultOptions,
{
    pub fn new(
        attributes: A,
        structure_options: Vec<OptionsNode<SA, P>>,
    ) -> Result<Self, ConfigurationError> {
        attributes.validate()?;
        Ok(Self {
            attributes,
            structures: ChildOptions::new(
                structure_options,
                <OptionsNode<SA, P> as DefaultOptions>::default_for,
            ),
            packages: ChildOptions::new(Vec::new(), P::default_for),
        })
    }
}

impl<A, SA, P> ShipmentOptions<A, SA, P> {
    /// Package options keyed directly under the shipment.
    #[deprecated(note = "list package options under their structure options")]
    #[must_use]
    pub fn with_package_options(mut self, package_options: Vec<P>) -> Self {
        self.packages.set_entries(package_options);
        self
    }

    #[must_use]
    pub fn with_structure_factory(mut self, factory: ChildFactory<OptionsNode<SA, P>>) -> Self {
        self.structures.set_factory(factory);
        self
    }

    /// Default used for packages that belong to no structure.
    #[must_use]
    pub fn with_package_factory(mut self, factory: ChildFactory<P>) -> Self {
        self.packages.set_factory(factory);
        self
    }

    #[must_use]
    pub const fn attributes(&self) -> &A {
        &self.attributes
    }

    #[must_use]
    pub const fn structure_options(&self) -> &ChildOptions<OptionsNode<SA, P>> {
        &self.structures
    }

    #[must_use]
    pub const fn package_options(&self) -> &ChildOptions<P> {
        &self.packages
    }
}

impl<A, SA, P> ShipmentOptions<A, SA, P>
where
    SA: Clone,
    P: Identified + Clone,
{
    pub fn options_for_structure(&self, structure: &Structure) -> Cow<'_, OptionsNode<SA, P>> {
        self.structures.resolve(structure.id())
    }

    /// Options for `package`, which belongs to `structure` or, when `None`,
    /// sits directly on the shipment.
    pub fn options_for_package(
        &self,
        structure: Option<&Structure>,
        package: &Package,
    ) -> Cow<'_, P> {
        let listed = structure
            .and_then(|structure| self.structures.find(structure.id()))
            .and_then(|node| node.children().find(package.id()));
        if let Some(found) = listed {
            return Cow::Borrowed(found);
        }
        if let Some(found) = self.packages.find(package.id()) {
            return Cow::Borrowed(found);
        }
        let fallback = match structure {
            Some(structure) => self
                .options_for_structure(structure)
                .children()
                .default_for(package.id()),
            None => self.packages.default_for(package.id()),
        };
        Cow::Owned(fallback)
    }
}
