//! # Document Encoder
//!
//! The inverse of the [decoder](crate::codec::decoder): native resources become
//! resource objects of the form
//!
//! ```json
//! {"type": "articles", "id": "1", "attributes": {...}, "relationships": {...}}
//! ```
//!
//! Relationships are always emitted as linkages (`{type, id}`), never with
//! attributes. A relationship whose wire name was passed to
//! [`add_relationship_to_null`](crate::framework::Resource::add_relationship_to_null)
//! is left out whatever the field holds.

use std::any::TypeId;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::framework::descriptor::{partition, ValueKind};
use crate::framework::resource::short_type_name;
use crate::framework::{EncodeError, Registry, Relation, Resource, ResourceGraph, ResourceHandle};

/// Encodes resources against a registry.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'r> {
    registry: &'r Registry,
}

impl<'r> Encoder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Encodes one resource object. `graph` resolves the handles held by its
    /// relationship fields.
    pub fn encode_resource(
        &self,
        graph: &ResourceGraph,
        resource: &dyn Resource,
        include_attributes: bool,
    ) -> Result<Value, EncodeError> {
        let mut node = self.linkage(resource)?;
        let (attributes, relationships) = partition(resource.descriptors());

        if include_attributes {
            let mut values = Map::new();
            for descriptor in attributes {
                if let Some(value) = resource.read_attribute(descriptor.field) {
                    values.insert(descriptor.wire_name.to_string(), value?);
                }
            }
            node.insert("attributes".to_string(), Value::Object(values));
        }

        let mut links = Map::new();
        for descriptor in relationships {
            let name = descriptor.relationship_wire_name();
            if resource.is_relationship_nulled(name) {
                debug!(
                    entity_type = short_type_name(resource.type_name()),
                    relationship = name,
                    "Omitting nulled relationship"
                );
                continue;
            }
            let targets: Vec<&dyn Resource> = match resource.read_relationship(descriptor.field) {
                Some(Relation::One(handle)) => match resolve(graph, handle) {
                    Some(target) => vec![target],
                    None => continue,
                },
                Some(Relation::Many(handles)) => {
                    let targets: Vec<&dyn Resource> =
                        handles.iter().filter_map(|h| resolve(graph, *h)).collect();
                    check_homogeneous(&targets)?;
                    targets
                }
                None => continue,
            };
            if let Some(stray) = targets
                .iter()
                .find(|target| !descriptor.accepts(target.as_any().type_id()))
            {
                warn!(
                    entity_type = short_type_name(resource.type_name()),
                    relationship = name,
                    found = short_type_name(stray.type_name()),
                    "Skipping relationship to a resource of the wrong type"
                );
                continue;
            }

            let data = match descriptor.kind {
                ValueKind::Resource => match targets.first() {
                    Some(target) => Value::Object(self.linkage(*target)?),
                    None => continue,
                },
                _ => {
                    let linkages = targets
                        .into_iter()
                        .map(|target| self.linkage(target).map(Value::Object))
                        .collect::<Result<Vec<_>, _>>()?;
                    Value::Array(linkages)
                }
            };
            links.insert(name.to_string(), json!({ "data": data }));
        }
        if !links.is_empty() {
            node.insert("relationships".to_string(), Value::Object(links));
        }

        Ok(Value::Object(node))
    }

    /// Encodes a homogeneous sequence of resources as an array.
    ///
    /// Fails with [`EncodeError::HeterogeneousCollection`] when the runtime
    /// types differ. An empty sequence encodes as `[]`.
    pub fn encode_resources(
        &self,
        graph: &ResourceGraph,
        resources: &[&dyn Resource],
        include_attributes: bool,
    ) -> Result<Value, EncodeError> {
        check_homogeneous(resources)?;
        let nodes = resources
            .iter()
            .map(|resource| self.encode_resource(graph, *resource, include_attributes))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(nodes))
    }

    fn linkage(&self, resource: &dyn Resource) -> Result<Map<String, Value>, EncodeError> {
        let wire_type = self.registry.reverse_resolve(resource)?;
        let mut node = Map::new();
        node.insert("type".to_string(), Value::String(wire_type.to_string()));
        if let Some(id) = resource.id() {
            node.insert("id".to_string(), Value::String(id.to_string()));
        }
        Ok(node)
    }
}

fn resolve(graph: &ResourceGraph, handle: ResourceHandle) -> Option<&dyn Resource> {
    let resource = graph.get(handle);
    if resource.is_none() {
        debug!(handle = handle.index(), "Skipping dangling relationship handle");
    }
    resource
}

fn check_homogeneous(resources: &[&dyn Resource]) -> Result<(), EncodeError> {
    let Some(first) = resources.first() else {
        return Ok(());
    };
    let expected: TypeId = first.as_any().type_id();
    match resources.iter().find(|r| r.as_any().type_id() != expected) {
        Some(other) => Err(EncodeError::HeterogeneousCollection {
            expected: short_type_name(first.type_name()),
            found: short_type_name(other.type_name()),
        }),
        None => Ok(()),
    }
}
