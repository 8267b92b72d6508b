//! Process-level setup for applications embedding the codec.

pub mod tracing;

pub use self::tracing::setup_tracing;
