//! # Resource Trait
//!
//! The contract every native resource type satisfies so the codec can bind it
//! from and to a wire document without knowing the concrete type.
//!
//! You normally don't implement [`Resource`] by hand: the
//! [`resource!`](crate::resource) macro declares the struct, generates the field
//! accessors and the [`FieldDescriptor`] table, and implements both
//! [`Resource`] and [`ResourceType`].
//!
//! # Relationships are handles
//!
//! Relationship fields don't own the resources they point at. They hold
//! [`ResourceHandle`]s into the [`ResourceGraph`](crate::framework::ResourceGraph)
//! that owns every resource of a document. Two relationships pointing at the
//! same `(type, id)` hold the same handle, so they observe the same instance.

use std::any::Any;
use std::collections::BTreeSet;
use std::fmt::Debug;

use serde_json::{Map, Value};

use crate::document::Links;
use crate::framework::descriptor::FieldDescriptor;
use crate::framework::error::FieldError;

/// Index of a resource inside a [`ResourceGraph`](crate::framework::ResourceGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceHandle(pub(crate) usize);

impl ResourceHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The value of a relationship field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    One(ResourceHandle),
    Many(Vec<ResourceHandle>),
}

/// State shared by every resource: identity, links, meta and the set of
/// relationships the caller wants dropped on the next encode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceBase {
    pub id: Option<String>,
    pub links: Option<Links>,
    pub meta: Option<Map<String, Value>>,
    nullable_relationships: BTreeSet<String>,
}

impl ResourceBase {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Object-safe view of a registered resource type.
pub trait Resource: Any + Debug + Send + Sync {
    fn base(&self) -> &ResourceBase;

    fn base_mut(&mut self) -> &mut ResourceBase;

    /// Ordered field table of the concrete type.
    fn descriptors(&self) -> &'static [FieldDescriptor];

    /// Current value of an attribute field, `None` when unset.
    fn read_attribute(&self, field: &str) -> Option<Result<Value, serde_json::Error>>;

    /// Converts `value` into the attribute's native type and stores it.
    fn write_attribute(&mut self, field: &str, value: Value) -> Result<(), FieldError>;

    /// Current value of a relationship field, `None` when unset.
    fn read_relationship(&self, field: &str) -> Option<Relation>;

    fn write_relationship(&mut self, field: &str, relation: Relation) -> Result<(), FieldError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Full path of the concrete type, used in errors and logs.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn id(&self) -> Option<&str> {
        self.base().id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.base_mut().id = Some(id);
    }

    fn links(&self) -> Option<&Links> {
        self.base().links.as_ref()
    }

    fn meta(&self) -> Option<&Map<String, Value>> {
        self.base().meta.as_ref()
    }

    /// Marks a relationship to be left out of the next encode, whatever the
    /// field currently holds.
    fn add_relationship_to_null(&mut self, relationship: &str) {
        self.base_mut()
            .nullable_relationships
            .insert(relationship.to_string());
    }

    fn reset_nullable_relationships(&mut self) {
        self.base_mut().nullable_relationships.clear();
    }

    fn nullable_relationships(&self) -> &BTreeSet<String> {
        &self.base().nullable_relationships
    }

    fn is_relationship_nulled(&self, relationship: &str) -> bool {
        self.base().nullable_relationships.contains(relationship)
    }
}

/// Static side of a resource type: how to build an empty one and its fields.
pub trait ResourceType: Resource + Default + Sized {
    const FIELDS: &'static [FieldDescriptor];

    fn construct() -> Box<dyn Resource> {
        Box::new(Self::default())
    }
}

/// Field table of `T`, in declaration order.
pub fn describe<T: ResourceType>() -> &'static [FieldDescriptor] {
    T::FIELDS
}

/// Last path segment of a type name (e.g. `Article` for `crate::model::Article`).
pub(crate) fn short_type_name(type_name: &'static str) -> &'static str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}

impl<'a> dyn Resource + 'a {
    pub fn downcast_ref<T: Resource>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Resource>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn is<T: Resource>(&self) -> bool {
        self.as_any().is::<T>()
    }
}
