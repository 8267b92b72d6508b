//! # Observability & Tracing
//!
//! The codec logs through `tracing`; [`setup_tracing`] installs a compact
//! `tracing-subscriber` formatter for binaries and tests.
//!
//! ## What Gets Traced
//!
//! - **Registration**: `DEBUG Registered` and `INFO Replaced registration` when a
//!   wire name is taken over by another type
//! - **Decode**: skipped resources (unregistered or missing `type`), dropped
//!   linkages, malformed sections, duplicate resources (all `DEBUG`)
//! - **Soft failures**: attributes or relationships that don't fit their field
//!   (`WARN`, with `entity_type` and `error`)
//! - **Encode**: nulled relationships and dangling handles (`DEBUG`)
//!
//! ## Usage Examples
//!
//! ```bash
//! # Only soft failures
//! RUST_LOG=warn cargo test
//!
//! # Everything the decoder skips
//! RUST_LOG=jsonapi_graph::codec=debug cargo test
//! ```
//!
//! With `RUST_LOG=debug` a decode that drops an unknown type looks like:
//!
//! ```text
//! DEBUG Skipping unregistered resource type wire_type="unicorns"
//! DEBUG Filled linkage placeholder entity_type="Person" handle=0
//! DEBUG Decoded document resources=3 included=1
//! ```

/// Installs the global subscriber, filtered by `RUST_LOG`.
///
/// Calling it again once a subscriber is installed does nothing, so every test
/// can call it.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type carries the context
        .compact()
        .try_init();
}
