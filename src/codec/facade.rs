//! # Facade
//!
//! [`JsonApi`] owns the [`Registry`] and the [`CodecConfig`] and is the only
//! piece that sees a whole document at once.
//!
//! ```rust
//! use jsonapi_graph::model::{Article, Person};
//! use jsonapi_graph::JsonApi;
//!
//! let mut api = JsonApi::new();
//! api.register::<Article>("articles").register::<Person>("people");
//!
//! let document = api
//!     .decode_str(r#"{"data": {"type": "articles", "id": "1", "attributes": {"title": "Hi"}}}"#)
//!     .unwrap();
//! let article = document.resource_as::<Article>().unwrap();
//! assert_eq!(article.title.as_deref(), Some("Hi"));
//!
//! let text = api.encode_string(&document).unwrap();
//! assert!(text.starts_with(r#"{"data":{"type":"articles","id":"1""#));
//! ```
//!
//! Build the facade once and share it (`&JsonApi` or `Arc<JsonApi>`);
//! decoding and encoding only read it.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::codec::decoder::Decoder;
use crate::codec::encoder::Encoder;
use crate::config::CodecConfig;
use crate::document::{Document, PrimaryData};
use crate::framework::{
    DecodeError, EncodeError, Registry, Resource, ResourceGraph, ResourceHandle, ResourceType,
};

/// Entry point for decoding and encoding documents.
#[derive(Debug, Clone, Default)]
pub struct JsonApi {
    registry: Registry,
    config: CodecConfig,
}

impl JsonApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            registry: Registry::new(),
            config,
        }
    }

    /// Registers `T` under `wire_name`. See [`Registry::register`].
    pub fn register<T: ResourceType>(&mut self, wire_name: impl Into<String>) -> &mut Self {
        self.registry.register::<T>(wire_name);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn decoder(&self) -> Decoder<'_> {
        Decoder::new(&self.registry)
    }

    pub fn encoder(&self) -> Encoder<'_> {
        Encoder::new(&self.registry)
    }

    pub fn decode(&self, tree: &Value) -> Result<Document, DecodeError> {
        self.decoder().decode(tree)
    }

    pub fn decode_str(&self, text: &str) -> Result<Document, DecodeError> {
        let tree: Value = serde_json::from_str(text)?;
        self.decode(&tree)
    }

    /// Builds the top-level document: `data`, `included`, then `links`, `meta`
    /// and `errors`, each only when present.
    pub fn encode(&self, document: &Document) -> Result<Value, EncodeError> {
        let encoder = self.encoder();
        let graph = &document.graph;
        let mut root = Map::new();

        match &document.data {
            Some(PrimaryData::Single(handle)) => {
                if let Some(resource) = lookup(graph, *handle, "data") {
                    root.insert(
                        "data".to_string(),
                        encoder.encode_resource(graph, resource, true)?,
                    );
                }
            }
            Some(PrimaryData::Collection(handles)) => {
                let resources: Vec<&dyn Resource> = handles
                    .iter()
                    .filter_map(|h| lookup(graph, *h, "data"))
                    .collect();
                root.insert(
                    "data".to_string(),
                    encoder.encode_resources(graph, &resources, true)?,
                );
            }
            None => {}
        }

        if self.config.encode_included {
            if let Some(included) = &document.included {
                // Side-loaded resources may mix types, so each is encoded alone.
                let nodes = included
                    .iter()
                    .filter_map(|h| lookup(graph, *h, "included"))
                    .map(|resource| encoder.encode_resource(graph, resource, true))
                    .collect::<Result<Vec<_>, _>>()?;
                root.insert("included".to_string(), Value::Array(nodes));
            }
        }

        if self.config.encode_document_members {
            if let Some(links) = &document.links {
                root.insert("links".to_string(), serde_json::to_value(links)?);
            }
            if let Some(meta) = &document.meta {
                root.insert("meta".to_string(), Value::Object(meta.clone()));
            }
            if let Some(errors) = &document.errors {
                root.insert("errors".to_string(), serde_json::to_value(errors)?);
            }
        }

        debug!(members = root.len(), "Encoded document");
        Ok(Value::Object(root))
    }

    pub fn encode_string(&self, document: &Document) -> Result<String, EncodeError> {
        let tree = self.encode(document)?;
        Ok(serde_json::to_string(&tree)?)
    }
}

/// Resolves a handle listed by the document, logging the ones the graph lacks.
fn lookup<'g>(
    graph: &'g ResourceGraph,
    handle: ResourceHandle,
    section: &'static str,
) -> Option<&'g dyn Resource> {
    let resource = graph.get(handle);
    if resource.is_none() {
        warn!(section, handle = handle.index(), "Skipping handle that is not in the graph");
    }
    resource
}
