//! Links, meta and errors.
//!
//! Every member is extracted on its own: a missing or badly typed member never
//! prevents the others from being read. A section that is not an object (or,
//! for `errors`, not an array) maps to `None`.

use serde_json::{Map, Value};
use tracing::debug;

use crate::document::{ErrorLinks, ErrorObject, ErrorSource, Links};

/// Reads a string member. Numbers are accepted and rendered as strings, since
/// servers commonly send `"status": 404`.
fn string_member(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => {
            debug!(key, kind = value_kind(other), "Ignoring non-string member");
            None
        }
        None => None,
    }
}

/// Short name of a JSON value's kind, for logs and errors.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn map_links(value: &Value) -> Option<Links> {
    let Some(object) = value.as_object() else {
        debug!(kind = value_kind(value), "links is not an object");
        return None;
    };
    Some(Links {
        self_link: string_member(object, "self"),
        related: string_member(object, "related"),
        first: string_member(object, "first"),
        last: string_member(object, "last"),
        prev: string_member(object, "prev"),
        next: string_member(object, "next"),
    })
}

pub fn map_meta(value: &Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(object) => Some(object.clone()),
        other => {
            debug!(kind = value_kind(other), "meta is not an object");
            None
        }
    }
}

pub fn map_errors(value: &Value) -> Option<Vec<ErrorObject>> {
    let Some(items) = value.as_array() else {
        debug!(kind = value_kind(value), "errors is not an array");
        return None;
    };
    let errors = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match item.as_object() {
            Some(object) => Some(map_error(object)),
            None => {
                debug!(index, "Skipping error entry that is not an object");
                None
            }
        })
        .collect();
    Some(errors)
}

fn map_error(object: &Map<String, Value>) -> ErrorObject {
    let source = object
        .get("source")
        .and_then(Value::as_object)
        .map(|source| ErrorSource {
            parameter: string_member(source, "parameter"),
            pointer: string_member(source, "pointer"),
        });
    let links = object
        .get("links")
        .and_then(Value::as_object)
        .map(|links| ErrorLinks {
            about: string_member(links, "about"),
        });

    ErrorObject {
        id: string_member(object, "id"),
        status: string_member(object, "status"),
        code: string_member(object, "code"),
        title: string_member(object, "title"),
        detail: string_member(object, "detail"),
        source,
        links,
        meta: object.get("meta").and_then(map_meta),
    }
}
