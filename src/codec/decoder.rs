//! # Document Decoder
//!
//! Turns a parsed wire document into a [`Document`] whose resources live in one
//! [`ResourceGraph`].
//!
//! ## Order of work
//!
//! 1. `included` is decoded first, so every side-loaded resource is in the
//!    graph before primary data refers to it.
//! 2. `data` (array or object) is decoded against the same graph.
//! 3. `links`, `meta` and `errors` are mapped independently.
//!
//! ## Included matching
//!
//! Matching is a key lookup in the graph. A relationship linkage interns a
//! placeholder for its `(type, id)`; when the full resource arrives later it
//! fills that placeholder in place. A resource whose key is already complete
//! is discarded in favor of the existing instance. Either way, every
//! reference to the same `(type, id)` ends up holding the same handle.
//!
//! ## Failure policy
//!
//! Only a root that is not an object aborts the decode. Unregistered types,
//! malformed sections and attributes that don't convert are logged and skipped.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::codec::mapper::{map_errors, map_links, map_meta, value_kind};
use crate::document::{Document, PrimaryData};
use crate::framework::descriptor::{partition, FieldDescriptor, ValueKind};
use crate::framework::resource::short_type_name;
use crate::framework::{
    DecodeError, Insertion, Registry, Relation, Resource, ResourceGraph, ResourceHandle,
    ResourceKey, TypeHandle,
};

/// Decodes documents against a registry.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r Registry,
}

impl<'r> Decoder<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn decode(&self, tree: &Value) -> Result<Document, DecodeError> {
        let root = tree
            .as_object()
            .ok_or(DecodeError::MalformedRoot(value_kind(tree)))?;

        let mut document = Document::new();

        if let Some(included) = root.get("included") {
            document.included = self.decode_included(&mut document.graph, included);
        }

        match root.get("data") {
            Some(Value::Array(items)) => {
                let handles = items
                    .iter()
                    .filter_map(|item| self.decode_one(&mut document.graph, item))
                    .collect();
                document.data = Some(PrimaryData::Collection(handles));
            }
            Some(item @ Value::Object(_)) => {
                document.data = self
                    .decode_one(&mut document.graph, item)
                    .map(PrimaryData::Single);
            }
            Some(Value::Null) | None => {}
            Some(other) => debug!(kind = value_kind(other), "Ignoring malformed data"),
        }

        document.links = root.get("links").and_then(map_links);
        document.meta = root.get("meta").and_then(map_meta);
        document.errors = root.get("errors").and_then(map_errors);

        debug!(
            resources = document.graph.len(),
            included = document.included.as_ref().map_or(0, Vec::len),
            "Decoded document"
        );
        Ok(document)
    }

    fn decode_included(
        &self,
        graph: &mut ResourceGraph,
        included: &Value,
    ) -> Option<Vec<ResourceHandle>> {
        let Some(items) = included.as_array() else {
            debug!(kind = value_kind(included), "included is not an array");
            return None;
        };
        let mut handles: Vec<ResourceHandle> = Vec::with_capacity(items.len());
        for item in items {
            if let Some(handle) = self.decode_one(graph, item) {
                if !handles.contains(&handle) {
                    handles.push(handle);
                }
            }
        }
        Some(handles)
    }

    /// Decodes one resource object into `graph`.
    ///
    /// Returns `None` when the object is skipped: not an object, no `type`, or a
    /// `type` that is not registered.
    pub fn decode_one(&self, graph: &mut ResourceGraph, value: &Value) -> Option<ResourceHandle> {
        let Some(object) = value.as_object() else {
            debug!(kind = value_kind(value), "Skipping resource that is not an object");
            return None;
        };
        let ty = self.resolve_type(object)?;
        let entity_type = short_type_name(ty.type_name());
        let id = object.get("id").and_then(id_string);

        // A complete resource with this key wins. The newcomer is never bound.
        if let Some(id) = &id {
            let existing = graph.find(&ResourceKey::new(ty.type_id(), id.as_str()));
            if let Some(handle) = existing.filter(|h| !graph.is_placeholder(*h)) {
                debug!(entity_type, %id, "Duplicate resource, keeping first");
                return Some(handle);
            }
        }

        let mut resource = ty.instantiate();
        if let Some(id) = id {
            resource.set_id(id);
        }
        resource.base_mut().links = object.get("links").and_then(map_links);
        resource.base_mut().meta = object.get("meta").and_then(map_meta);

        let (attributes, relationships) = partition(ty.fields());
        if let Some(values) = object.get("attributes").and_then(Value::as_object) {
            bind_attributes(resource.as_mut(), &attributes, values, entity_type);
        }
        if let Some(values) = object.get("relationships").and_then(Value::as_object) {
            self.bind_relationships(graph, resource.as_mut(), &relationships, values, entity_type);
        }

        let insertion = graph.insert_complete(resource);
        if let Insertion::Filled(handle) = insertion {
            debug!(entity_type, handle = handle.index(), "Filled linkage placeholder");
        }
        Some(insertion.handle())
    }

    fn resolve_type(&self, object: &Map<String, Value>) -> Option<&'r TypeHandle> {
        let Some(wire_type) = object.get("type").and_then(Value::as_str) else {
            debug!("Skipping resource without a type");
            return None;
        };
        let ty = self.registry.resolve(wire_type);
        if ty.is_none() {
            debug!(wire_type, "Skipping unregistered resource type");
        }
        ty
    }

    /// Binds every relationship present in `values`.
    ///
    /// Linkages are checked against the field's target type before anything is
    /// interned: one linkage of the wrong type leaves the whole field unset.
    fn bind_relationships(
        &self,
        graph: &mut ResourceGraph,
        resource: &mut dyn Resource,
        descriptors: &[&FieldDescriptor],
        values: &Map<String, Value>,
        entity_type: &str,
    ) {
        for descriptor in descriptors {
            let name = descriptor.relationship_wire_name();
            let Some(data) = values.get(name).and_then(|r| r.get("data")) else {
                continue;
            };
            let linkages: Vec<(&TypeHandle, String)> = match (descriptor.kind, data) {
                (_, Value::Null) => continue,
                (ValueKind::Resource, Value::Object(_)) => {
                    self.linkage(data).into_iter().collect()
                }
                (ValueKind::ResourceList, Value::Array(items)) => {
                    items.iter().filter_map(|item| self.linkage(item)).collect()
                }
                (_, other) => {
                    debug!(
                        entity_type,
                        relationship = name,
                        kind = value_kind(other),
                        "Skipping relationship with wrong arity"
                    );
                    continue;
                }
            };

            if let Some((ty, id)) = linkages
                .iter()
                .find(|(ty, _)| !descriptor.accepts(ty.type_id()))
            {
                warn!(
                    entity_type,
                    relationship = name,
                    found = short_type_name(ty.type_name()),
                    %id,
                    "Skipping relationship to a resource of the wrong type"
                );
                continue;
            }

            let mut handles = linkages
                .iter()
                .map(|(ty, id)| graph.intern_linkage(ty, id));
            let relation = match descriptor.kind {
                ValueKind::Resource => match handles.next() {
                    Some(handle) => Relation::One(handle),
                    None => continue,
                },
                _ => Relation::Many(handles.collect()),
            };
            if let Err(e) = resource.write_relationship(descriptor.field, relation) {
                warn!(entity_type, relationship = name, error = %e, "Skipping relationship");
            }
        }
    }

    /// Resolves a `{type, id}` linkage object. Unregistered types and linkages
    /// without an id are dropped.
    fn linkage(&self, value: &Value) -> Option<(&'r TypeHandle, String)> {
        let object = value.as_object()?;
        let ty = self.resolve_type(object)?;
        let Some(id) = object.get("id").and_then(id_string) else {
            debug!(
                entity_type = short_type_name(ty.type_name()),
                "Skipping linkage without an id"
            );
            return None;
        };
        Some((ty, id))
    }
}

fn bind_attributes(
    resource: &mut dyn Resource,
    descriptors: &[&FieldDescriptor],
    values: &Map<String, Value>,
    entity_type: &str,
) {
    for descriptor in descriptors {
        match values.get(descriptor.wire_name) {
            None | Some(Value::Null) => {}
            Some(value) => {
                if let Err(e) = resource.write_attribute(descriptor.field, value.clone()) {
                    warn!(
                        entity_type,
                        attribute = descriptor.wire_name,
                        error = %e,
                        "Skipping attribute"
                    );
                }
            }
        }
    }
}

/// Resource ids are strings on the wire, but numeric ids are common enough to
/// accept.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{register_all, Article, Comment, Person};
    use serde_json::json;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        register_all(&mut registry);
        registry
    }

    #[test]
    fn root_must_be_an_object() {
        let registry = registry();
        let err = Decoder::new(&registry).decode(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedRoot("array")));
    }

    #[test]
    fn binds_id_attributes_and_resource_links() {
        let registry = registry();
        let document = Decoder::new(&registry)
            .decode(&json!({
                "data": {
                    "type": "articles",
                    "id": 1,
                    "attributes": {"title": "Rails is Omakase"},
                    "links": {"self": "http://example.com/articles/1"},
                    "meta": {"views": 10}
                }
            }))
            .unwrap();

        let article = document.resource_as::<Article>().unwrap();
        assert_eq!(article.id(), Some("1"));
        assert_eq!(article.title.as_deref(), Some("Rails is Omakase"));
        assert_eq!(
            article.links().and_then(|l| l.self_link.as_deref()),
            Some("http://example.com/articles/1")
        );
        assert_eq!(article.meta().unwrap().get("views"), Some(&json!(10)));
    }

    #[test]
    fn bad_attribute_does_not_abort_the_resource() {
        let registry = registry();
        let document = Decoder::new(&registry)
            .decode(&json!({
                "data": {
                    "type": "people",
                    "id": "9",
                    "attributes": {"name": ["not", "a", "string"], "twitter": "dgeb", "age": null}
                }
            }))
            .unwrap();

        let person = document.resource_as::<Person>().unwrap();
        assert!(person.name.is_none());
        assert_eq!(person.twitter.as_deref(), Some("dgeb"));
        assert!(person.age.is_none());
    }

    #[test]
    fn forward_references_are_filled_in_place() {
        let registry = registry();
        let document = Decoder::new(&registry)
            .decode(&json!({
                "data": {
                    "type": "articles",
                    "id": "1",
                    "relationships": {
                        "author": {"data": {"type": "people", "id": "9"}},
                        "comments": {"data": [
                            {"type": "comments", "id": "5"},
                            {"type": "comments", "id": "12"},
                            {"type": "unknown", "id": "1"},
                            {"type": "comments"}
                        ]}
                    }
                },
                "included": [
                    {
                        "type": "comments",
                        "id": "12",
                        "attributes": {"body": "I like XML better"},
                        "relationships": {"author": {"data": {"type": "people", "id": "9"}}}
                    },
                    {"type": "people", "id": "9", "attributes": {"name": "Dan Gebhardt"}}
                ]
            }))
            .unwrap();

        let article = document.resource_as::<Article>().unwrap();
        let author = article.author.unwrap();
        assert_eq!(
            document.get::<Person>(author).unwrap().name.as_deref(),
            Some("Dan Gebhardt")
        );
        assert!(!document.graph.is_placeholder(author));

        let comments = article.comments.as_ref().unwrap();
        assert_eq!(comments.len(), 2);
        assert!(document.graph.is_placeholder(comments[0]));
        let comment = document.get::<Comment>(comments[1]).unwrap();
        assert_eq!(comment.body.as_deref(), Some("I like XML better"));
        assert_eq!(comment.writer, Some(author));
    }

    #[test]
    fn arity_mismatch_leaves_relationship_unset() {
        let registry = registry();
        let document = Decoder::new(&registry)
            .decode(&json!({
                "data": {
                    "type": "articles",
                    "id": "1",
                    "relationships": {
                        "author": {"data": [{"type": "people", "id": "9"}]},
                        "comments": {"data": {"type": "comments", "id": "5"}}
                    }
                }
            }))
            .unwrap();

        let article = document.resource_as::<Article>().unwrap();
        assert!(article.author.is_none());
        assert!(article.comments.is_none());
    }

    #[test]
    fn linkage_of_the_wrong_type_leaves_field_unset() {
        let registry = registry();
        let document = Decoder::new(&registry)
            .decode(&json!({
                "data": {
                    "type": "articles",
                    "id": "1",
                    "relationships": {
                        "author": {"data": {"type": "comments", "id": "5"}},
                        "comments": {"data": [
                            {"type": "comments", "id": "5"},
                            {"type": "people", "id": "9"}
                        ]}
                    }
                }
            }))
            .unwrap();

        let article = document.resource_as::<Article>().unwrap();
        assert!(article.author.is_none());
        assert!(article.comments.is_none());
        assert_eq!(document.graph.len(), 1, "rejected linkages are not interned");
    }

    #[test]
    fn duplicate_of_included_leaves_no_orphans() {
        let registry = registry();
        let document = Decoder::new(&registry)
            .decode(&json!({
                "data": {
                    "type": "articles",
                    "id": "1",
                    "relationships": {"author": {"data": {"type": "people", "id": "77"}}}
                },
                "included": [{"type": "articles", "id": "1", "attributes": {"title": "First"}}]
            }))
            .unwrap();

        assert_eq!(document.graph.len(), 1);
        let article = document.resource_as::<Article>().unwrap();
        assert_eq!(article.title.as_deref(), Some("First"));
        assert!(article.author.is_none());
        assert!(document.graph.find_as::<Person>("77").is_none());
    }

    #[test]
    fn renamed_relationship_binds_its_field() {
        let registry = registry();
        let document = Decoder::new(&registry)
            .decode(&json!({
                "data": {
                    "type": "comments",
                    "id": "5",
                    "relationships": {
                        "author": {"data": {"type": "people", "id": "2"}},
                        "writer": {"data": {"type": "people", "id": "3"}}
                    }
                }
            }))
            .unwrap();

        let comment = document.resource_as::<Comment>().unwrap();
        let writer = comment.writer.unwrap();
        assert_eq!(document.get::<Person>(writer).and_then(|p| p.id()), Some("2"));
        assert!(document.graph.find_as::<Person>("3").is_none());
    }

    #[test]
    fn null_and_unregistered_data_are_absent() {
        let registry = registry();
        let decoder = Decoder::new(&registry);

        let document = decoder.decode(&json!({"data": null})).unwrap();
        assert!(document.data.is_none());

        let document = decoder
            .decode(&json!({"data": {"type": "unicorns", "id": "1"}}))
            .unwrap();
        assert!(document.data.is_none());
        assert!(document.graph.is_empty());
    }

    #[test]
    fn included_lists_each_resource_once() {
        let registry = registry();
        let document = Decoder::new(&registry)
            .decode(&json!({
                "included": [
                    {"type": "people", "id": "9", "attributes": {"name": "Dan"}},
                    {"type": "people", "id": "9", "attributes": {"name": "Not Dan"}},
                    "garbage"
                ]
            }))
            .unwrap();

        let included = document.included.as_ref().unwrap();
        assert_eq!(included.len(), 1);
        assert_eq!(
            document.get::<Person>(included[0]).unwrap().name.as_deref(),
            Some("Dan")
        );
    }
}
