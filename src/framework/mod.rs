//! Resource type machinery shared by the decoder and the encoder.
//!
//! # Main Components
//!
//! - [`Resource`] / [`ResourceType`] - Traits every native resource implements
//! - [`resource!`](crate::resource) - Declares a resource struct and its field table
//! - [`Registry`] - Wire type-name ↔ native type mapping
//! - [`ResourceGraph`] - Arena owning decoded resources, addressed by [`ResourceHandle`]
//! - [`error`] - Decode, encode and per-field errors

pub mod descriptor;
pub mod error;
pub mod graph;
pub mod macros;
pub mod registry;
pub mod resource;

// Re-export core types for convenience
pub use descriptor::{FieldDescriptor, ValueKind};
pub use error::{DecodeError, EncodeError, FieldError, NotRegisteredError};
pub use graph::{Insertion, ResourceGraph, ResourceKey};
pub use registry::{Registry, TypeHandle};
pub use resource::{describe, Relation, Resource, ResourceBase, ResourceHandle, ResourceType};
