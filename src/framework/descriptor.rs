//! Field descriptor tables.
//!
//! Each registered resource type exposes an ordered, `'static` table of
//! [`FieldDescriptor`]s, one per declared field. The table is produced at compile
//! time by the [`resource!`](crate::resource) macro, so it is computed once and
//! shared by every decode and encode pass.
//!
//! Relationship descriptors also record the native type they point at, so a
//! linkage of another type is rejected instead of being bound.

use std::any::TypeId;

/// What kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// An attribute converted through serde.
    Scalar,
    /// A to-one relationship.
    Resource,
    /// A to-many relationship.
    ResourceList,
}

/// Describes one native field of a resource type.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Native field name; the key used by the generated accessors.
    pub field: &'static str,
    /// Name of the member under `attributes`.
    pub wire_name: &'static str,
    /// Key under `relationships`, present iff the field is a relationship.
    pub relationship: Option<&'static str>,
    pub kind: ValueKind,
    /// `TypeId::of` the related type, present iff the field is a relationship.
    pub target: Option<fn() -> TypeId>,
}

impl FieldDescriptor {
    pub const fn attribute(field: &'static str, wire_name: &'static str) -> Self {
        Self {
            field,
            wire_name,
            relationship: None,
            kind: ValueKind::Scalar,
            target: None,
        }
    }

    pub const fn to_one(
        field: &'static str,
        relationship: &'static str,
        target: fn() -> TypeId,
    ) -> Self {
        Self {
            field,
            wire_name: field,
            relationship: Some(relationship),
            kind: ValueKind::Resource,
            target: Some(target),
        }
    }

    pub const fn to_many(
        field: &'static str,
        relationship: &'static str,
        target: fn() -> TypeId,
    ) -> Self {
        Self {
            field,
            wire_name: field,
            relationship: Some(relationship),
            kind: ValueKind::ResourceList,
            target: Some(target),
        }
    }

    pub fn is_relationship(&self) -> bool {
        self.relationship.is_some()
    }

    /// The key under `relationships`, falling back to the wire name.
    pub fn relationship_wire_name(&self) -> &'static str {
        self.relationship.unwrap_or(self.wire_name)
    }

    /// The native type a relationship points at.
    pub fn target_type(&self) -> Option<TypeId> {
        self.target.map(|of| of())
    }

    /// Whether a resource of `type_id` may be held by this field. Attributes
    /// accept nothing.
    pub fn accepts(&self, type_id: TypeId) -> bool {
        self.target_type() == Some(type_id)
    }
}

impl PartialEq for FieldDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.wire_name == other.wire_name
            && self.relationship == other.relationship
            && self.kind == other.kind
            && self.target_type() == other.target_type()
    }
}

impl Eq for FieldDescriptor {}

/// Splits a descriptor table into attributes and relationships, keeping order.
pub fn partition(
    fields: &'static [FieldDescriptor],
) -> (Vec<&'static FieldDescriptor>, Vec<&'static FieldDescriptor>) {
    fields.iter().partition(|d| !d.is_relationship())
}
