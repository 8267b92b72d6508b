//! # Codec Errors
//!
//! Every error the codec can report lives here, one enum per concern.
//!
//! Only two situations are fatal for a caller: a document whose root is not an
//! object ([`DecodeError`]) and an encode that cannot name a resource's wire type
//! ([`EncodeError`]). Everything else (unknown resource types while decoding,
//! malformed auxiliary sections, a single badly typed attribute) is logged and
//! absorbed, so a partially broken response still decodes.

use thiserror::Error;

/// Errors that abort a whole decode.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The document root is not a JSON object. Carries the kind that was found.
    #[error("document root must be an object, found {0}")]
    MalformedRoot(&'static str),

    /// The wire text is not valid JSON.
    #[error("invalid JSON document: {0}")]
    Syntax(#[from] serde_json::Error),
}

/// A native type was never registered, so its wire type-name is unknown.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("resource type {0} is not registered")]
pub struct NotRegisteredError(pub &'static str);

/// Errors that abort encoding of a resource or collection.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The exact runtime type of a resource has no wire type-name.
    #[error(transparent)]
    UnregisteredType(#[from] NotRegisteredError),

    /// A collection mixes resources of different runtime types.
    #[error("collection of {expected} contains a {found}")]
    HeterogeneousCollection {
        expected: &'static str,
        found: &'static str,
    },

    /// Rendering the encoded tree as text failed.
    #[error("could not render document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-field failures while reading or writing a resource field.
///
/// The decoder treats all of these as soft: the field is skipped and the rest
/// of the resource is still bound.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("no field named {0}")]
    UnknownField(String),

    #[error("field {0} is a relationship, not an attribute")]
    NotAnAttribute(&'static str),

    #[error("field {0} is an attribute, not a relationship")]
    NotARelationship(&'static str),

    /// A to-many linkage was offered to a to-one field or the other way round.
    #[error("field {0} does not accept this relationship arity")]
    ArityMismatch(&'static str),

    /// The wire value does not convert into the field's native type.
    #[error("field {field} has an incompatible value: {source}")]
    Mismatch {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
