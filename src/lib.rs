#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # jsonapi-graph
//!
//! > **A typed resource graph ↔ JSON:API document codec.**
//!
//! Register native Rust types against wire type-names, decode a JSON:API
//! document into deduplicated native resources with their relationships wired
//! up, and encode native resources back into a document.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Handles instead of shared pointers
//!
//! A JSON:API document is a graph: an article's `author` and the matching
//! entry of `included` are the same person. Decoded resources live in one
//! arena, the [`ResourceGraph`](framework::ResourceGraph), and relationship
//! fields hold [`ResourceHandle`](framework::ResourceHandle)s into it. Two
//! references to the same `(type, id)` hold the same handle, so they see the
//! same instance.
//!
//! ### Field tables at compile time
//!
//! The [`resource!`] macro declares a resource struct together with its
//! ordered [`FieldDescriptor`](framework::FieldDescriptor) table and typed
//! accessors. Attribute values go through `serde`, so any
//! `Serialize + DeserializeOwned` type works as an attribute.
//!
//! ### Lenient decoding
//!
//! Only a document whose root is not an object fails to decode. Unregistered
//! resource types, malformed `links`/`meta`/`errors` and attributes that don't
//! fit their field are logged through `tracing` and skipped.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: Resource traits, the declaration macro, the type registry and the arena.
//! - **Key items**: [`Resource`](framework::Resource), [`Registry`](framework::Registry),
//!   [`ResourceGraph`](framework::ResourceGraph).
//!
//! ### 2. The Codec ([`codec`])
//! - **Role**: Decoder, encoder, the links/meta/errors mapper and the [`JsonApi`] facade.
//!
//! ### 3. The Envelope ([`document`])
//! - **Role**: [`Document`](document::Document), [`Links`](document::Links),
//!   [`ErrorObject`](document::ErrorObject).
//!
//! ### 4. Setup ([`config`], [`lifecycle`])
//! - **Role**: [`CodecConfig`](config::CodecConfig) and
//!   [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### 5. Samples ([`model`])
//! - **Role**: `Article`, `Person`, `Comment` and `Product`, used by the tests.
//!
//! ## 🚀 Quick Start
//!
//! ```rust
//! use jsonapi_graph::model::{Article, Person};
//! use jsonapi_graph::JsonApi;
//!
//! let mut api = JsonApi::new();
//! api.register::<Article>("articles").register::<Person>("people");
//!
//! let document = api
//!     .decode(&serde_json::json!({
//!         "data": {
//!             "type": "articles",
//!             "id": "1",
//!             "relationships": {"author": {"data": {"type": "people", "id": "9"}}}
//!         },
//!         "included": [{"type": "people", "id": "9", "attributes": {"name": "Dan"}}]
//!     }))
//!     .unwrap();
//!
//! let article = document.resource_as::<Article>().unwrap();
//! let author = document.get::<Person>(article.author.unwrap()).unwrap();
//! assert_eq!(author.name.as_deref(), Some("Dan"));
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! RUST_LOG=debug cargo test
//! ```

pub mod codec;
pub mod config;
pub mod document;
pub mod framework;
pub mod lifecycle;
pub mod model;

pub use codec::JsonApi;
pub use config::CodecConfig;
pub use document::{Document, ErrorObject, Links, PrimaryData};

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
