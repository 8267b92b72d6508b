//! Codec configuration.
//!
//! [`CodecConfig`] derives `Deserialize`, so a host application can load it from
//! whatever configuration source it already uses. Missing keys take their
//! defaults.

use serde::{Deserialize, Serialize};

/// Controls which top-level members [`JsonApi::encode`](crate::JsonApi::encode)
/// emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Emit the `included` array (default: true)
    #[serde(default = "default_true")]
    pub encode_included: bool,

    /// Emit top-level `links`, `meta` and `errors` (default: true)
    #[serde(default = "default_true")]
    pub encode_document_members: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            encode_included: true,
            encode_document_members: true,
        }
    }
}
