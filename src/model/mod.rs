//! Sample resource types declared with [`resource!`](crate::resource).
//!
//! They model the blog example used throughout the JSON:API documentation
//! (`articles`, `people`, `comments`) plus a `products` catalog.

pub mod article;
pub mod comment;
pub mod person;
pub mod product;

pub use article::*;
pub use comment::*;
pub use person::*;
pub use product::*;

use crate::framework::Registry;

/// Registers every sample type under its conventional wire name.
pub fn register_all(registry: &mut Registry) {
    registry
        .register::<Article>("articles")
        .register::<Person>("people")
        .register::<Comment>("comments")
        .register::<Product>("products");
}
