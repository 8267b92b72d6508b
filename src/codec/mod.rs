//! Decoding and encoding of wire documents.
//!
//! # Main Components
//!
//! - [`JsonApi`] - Facade owning the registry and configuration
//! - [`Decoder`] - Wire tree → [`Document`](crate::document::Document)
//! - [`Encoder`] - Native resources → resource objects
//! - [`mapper`] - `links`, `meta` and `errors` sections

pub mod decoder;
pub mod encoder;
pub mod facade;
pub mod mapper;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use facade::JsonApi;
