//! Document-level types: the decoded envelope and its auxiliary sections.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::framework::{Resource, ResourceGraph, ResourceHandle};

/// Top-level or resource-level `links`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Links {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Where in the request an error originated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
}

/// One entry of the top-level `errors` array. Every member is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ErrorLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

/// Primary data: a single resource or a collection, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryData {
    Single(ResourceHandle),
    Collection(Vec<ResourceHandle>),
}

/// A decoded (or to-be-encoded) document.
///
/// The document owns its [`ResourceGraph`]; `data` and `included` are handles
/// into it. Relationship fields of the resources point into the same graph, so
/// the included resource a relationship refers to and the matching `included`
/// entry are one and the same instance.
#[derive(Debug, Default)]
pub struct Document {
    pub graph: ResourceGraph,
    pub data: Option<PrimaryData>,
    pub included: Option<Vec<ResourceHandle>>,
    pub links: Option<Links>,
    pub meta: Option<Map<String, Value>>,
    pub errors: Option<Vec<ErrorObject>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `resource` to the graph and makes it the single primary resource.
    pub fn set_resource<T: Resource>(&mut self, resource: T) -> ResourceHandle {
        let handle = self.graph.add(resource);
        self.data = Some(PrimaryData::Single(handle));
        handle
    }

    /// Adds `resource` to the graph and appends it to the primary collection,
    /// turning `data` into a collection if needed.
    pub fn push_resource<T: Resource>(&mut self, resource: T) -> ResourceHandle {
        let handle = self.graph.add(resource);
        match &mut self.data {
            Some(PrimaryData::Collection(handles)) => handles.push(handle),
            _ => self.data = Some(PrimaryData::Collection(vec![handle])),
        }
        handle
    }

    /// Adds `resource` to the graph and lists it under `included`.
    pub fn include<T: Resource>(&mut self, resource: T) -> ResourceHandle {
        let handle = self.graph.add(resource);
        self.included.get_or_insert_with(Vec::new).push(handle);
        handle
    }

    /// The primary resource when `data` is a single object.
    pub fn resource(&self) -> Option<&dyn Resource> {
        match self.data {
            Some(PrimaryData::Single(handle)) => self.graph.get(handle),
            _ => None,
        }
    }

    /// The primary resources when `data` is an array.
    pub fn resources(&self) -> Option<Vec<&dyn Resource>> {
        match &self.data {
            Some(PrimaryData::Collection(handles)) => {
                Some(handles.iter().filter_map(|h| self.graph.get(*h)).collect())
            }
            _ => None,
        }
    }

    pub fn included_resources(&self) -> Option<Vec<&dyn Resource>> {
        self.included
            .as_ref()
            .map(|handles| handles.iter().filter_map(|h| self.graph.get(*h)).collect())
    }

    pub fn resource_as<T: Resource>(&self) -> Option<&T> {
        self.resource()?.downcast_ref::<T>()
    }

    /// Primary collection members of type `T`, in document order.
    pub fn resources_as<T: Resource>(&self) -> Option<Vec<&T>> {
        match &self.data {
            Some(PrimaryData::Collection(handles)) => Some(self.graph.get_all_as(handles)),
            _ => None,
        }
    }

    /// Follows a handle held by a relationship field.
    pub fn get<T: Resource>(&self, handle: ResourceHandle) -> Option<&T> {
        self.graph.get_as(handle)
    }

    pub fn has_links(&self) -> bool {
        self.links.is_some()
    }

    pub fn has_meta(&self) -> bool {
        self.meta.is_some()
    }

    pub fn has_errors(&self) -> bool {
        self.errors.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Article, Person};

    #[test]
    fn primary_data_is_single_or_collection() {
        let mut document = Document::new();
        document.push_resource(Article::default());
        document.push_resource(Article::default());
        assert_eq!(document.resources().map(|r| r.len()), Some(2));
        assert!(document.resource().is_none());

        document.set_resource(Article::default());
        assert!(document.resource_as::<Article>().is_some());
        assert!(document.resources().is_none());
        assert_eq!(document.graph.len(), 3);
    }

    #[test]
    fn included_and_auxiliary_sections() {
        let mut document = Document::new();
        assert!(!document.has_links() && !document.has_meta() && !document.has_errors());
        assert!(document.included_resources().is_none());

        let handle = document.include(Person::default());
        assert_eq!(document.included, Some(vec![handle]));
        assert!(document.get::<Person>(handle).is_some());
        assert!(document.get::<Article>(handle).is_none());
    }

    #[test]
    fn links_serialize_without_absent_members() {
        let links = Links {
            self_link: Some("http://example.com/articles".into()),
            next: Some("http://example.com/articles?page[offset]=2".into()),
            ..Links::default()
        };
        assert_eq!(
            serde_json::to_value(&links).unwrap(),
            serde_json::json!({
                "self": "http://example.com/articles",
                "next": "http://example.com/articles?page[offset]=2"
            })
        );
    }
}
