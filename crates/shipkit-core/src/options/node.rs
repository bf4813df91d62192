use std::borrow::Cow;

use crate::error::ConfigurationError;
use crate::geometry::{EntityId, Identified};

use super::validate::Validate;

/// Builds the options used for a child that has no explicit entry.
pub type ChildFactory<C> = fn(EntityId) -> C;

/// Options that can stand in for a child nobody configured: the identifier is
/// set and every attribute takes its declared default.
pub trait DefaultOptions: Sized {
    fn default_for(id: EntityId) -> Self;
}

/// Child options of one level, looked up by entity identifier.
#[derive(Debug, Clone)]
pub struct ChildOptions<C> {
    entries: Vec<C>,
    factory: ChildFactory<C>,
}

impl<C> ChildOptions<C> {
    #[must_use]
    pub fn new(entries: Vec<C>, factory: ChildFactory<C>) -> Self {
        Self { entries, factory }
    }

    #[must_use]
    pub fn entries(&self) -> &[C] {
        &self.entries
    }

    #[must_use]
    pub fn default_for(&self, id: &EntityId) -> C {
        (self.factory)(id.clone())
    }

    pub(super) fn set_factory(&mut self, factory: ChildFactory<C>) {
        self.factory = factory;
    }

    pub(super) fn set_entries(&mut self, entries: Vec<C>) {
        self.entries = entries;
    }
}

impl<C: Identified> ChildOptions<C> {
    /// First entry with this identifier, in insertion order.
    #[must_use]
    pub fn find(&self, id: &EntityId) -> Option<&C> {
        self.entries.iter().find(|entry| entry.id() == id)
    }
}

impl<C: Identified + Clone> ChildOptions<C> {
    #[must_use]
    pub fn resolve(&self, id: &EntityId) -> Cow<'_, C> {
        match self.find(id) {
            Some(entry) => Cow::Borrowed(entry),
            None => Cow::Owned(self.default_for(id)),
        }
    }
}

/// One structure or package level of an options tree.
#[derive(Debug, Clone)]
pub struct OptionsNode<A, C> {
    id: EntityId,
    attributes: A,
    children: ChildOptions<C>,
}

impl<A, C> OptionsNode<A, C>
where
    A: Validate,
    C: DefaultOptions,
{
    pub fn new(
        id: impl Into<EntityId>,
        attributes: A,
        children: Vec<C>,
    ) -> Result<Self, ConfigurationError> {
        attributes.validate()?;
        Ok(Self {
            id: id.into(),
            attributes,
            children: ChildOptions::new(children, C::default_for),
        })
    }
}

impl<A, C> OptionsNode<A, C> {
    /// Replaces the type used for children without an explicit entry.
    #[must_use]
    pub fn with_child_factory(mut self, factory: ChildFactory<C>) -> Self {
        self.children.set_factory(factory);
        self
    }

    #[must_use]
    pub const fn attributes(&self) -> &A {
        &self.attributes
    }

    #[must_use]
    pub const fn children(&self) -> &ChildOptions<C> {
        &self.children
    }
}

impl<A, C: Identified + Clone> OptionsNode<A, C> {
    /// Options for one of this node's children. Never fails: an unlisted
    /// child gets a fresh default carrying only its identifier.
    pub fn options_for<E: Identified + ?Sized>(&self, child: &E) -> Cow<'_, C> {
        self.children.resolve(child.id())
    }
}

impl<A, C> Identified for OptionsNode<A, C> {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl<A: Default, C: DefaultOptions> DefaultOptions for OptionsNode<A, C> {
    fn default_for(id: EntityId) -> Self {
        Self {
            id,
            attributes: A::default(),
            children: ChildOptions::new(Vec::new(), C::default_for),
        }
    }
}

/// Leaf options, one per item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemOptions<A> {
    id: EntityId,
    attributes: A,
}

impl<A: Validate> ItemOptions<A> {
    pub fn new(id: impl Into<EntityId>, attributes: A) -> Result<Self, ConfigurationError> {
        attributes.validate()?;
        Ok(Self {
            id: id.into(),
            attributes,
        })
    }
}

impl<A> ItemOptions<A> {
    #[must_use]
    pub const fn attributes(&self) -> &A {
        &self.attributes
    }
}

impl<A> Identified for ItemOptions<A> {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl<A: Default> DefaultOptions for ItemOptions<A> {
    fn default_for(id: EntityId) -> Self {
        Self {
            id,
            attributes: A::default(),
        }
    }
}
