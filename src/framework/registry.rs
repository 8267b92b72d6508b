//! # Type Registry
//!
//! Maps wire type-names (`"articles"`, `"people"`) to native resource types and
//! back.
//!
//! The registry is an ordinary value. Build it once at startup through `&mut`
//! access, then share it immutably: every decode and encode only reads it, so
//! the borrow checker is what guarantees registration happens-before use. If
//! registration must continue while documents are being processed, wrap it in a
//! `RwLock` at the call site.
//!
//! Registration is lenient: registering a wire name again replaces the previous
//! mapping (last writer wins) without an error.

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use crate::framework::descriptor::FieldDescriptor;
use crate::framework::error::NotRegisteredError;
use crate::framework::resource::{short_type_name, Resource, ResourceType};

/// Everything the codec needs to know about a native resource type.
#[derive(Debug, Clone, Copy)]
pub struct TypeHandle {
    type_id: TypeId,
    type_name: &'static str,
    construct: fn() -> Box<dyn Resource>,
    fields: &'static [FieldDescriptor],
}

impl TypeHandle {
    pub fn of<T: ResourceType>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            construct: T::construct,
            fields: T::FIELDS,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// A fresh, empty instance of the type.
    pub fn instantiate(&self) -> Box<dyn Resource> {
        (self.construct)()
    }

    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }
}

/// Wire type-name ↔ native type mapping.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    by_wire: BTreeMap<String, TypeHandle>,
    by_type: HashMap<TypeId, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under `wire_name`.
    pub fn register<T: ResourceType>(&mut self, wire_name: impl Into<String>) -> &mut Self {
        self.register_handle(wire_name, TypeHandle::of::<T>())
    }

    pub fn register_handle(&mut self, wire_name: impl Into<String>, handle: TypeHandle) -> &mut Self {
        let wire_name = wire_name.into();
        let entity_type = short_type_name(handle.type_name);

        if let Some(previous) = self.by_wire.insert(wire_name.clone(), handle) {
            if previous.type_id != handle.type_id {
                info!(
                    wire_name = %wire_name,
                    previous = short_type_name(previous.type_name),
                    entity_type,
                    "Replaced registration"
                );
                self.forget_reverse(&previous, &wire_name);
            }
        }
        self.by_type.insert(handle.type_id, wire_name.clone());
        debug!(wire_name = %wire_name, entity_type, "Registered");
        self
    }

    /// Native type registered for `wire_name`, if any.
    pub fn resolve(&self, wire_name: &str) -> Option<&TypeHandle> {
        self.by_wire.get(wire_name)
    }

    /// Wire type-name of a resource's exact runtime type.
    pub fn reverse_resolve(&self, resource: &dyn Resource) -> Result<&str, NotRegisteredError> {
        self.wire_name_of(resource.as_any().type_id())
            .ok_or_else(|| NotRegisteredError(resource.type_name()))
    }

    /// Wire type-name of an exact native type.
    pub fn wire_name_of(&self, type_id: TypeId) -> Option<&str> {
        self.by_type.get(&type_id).map(String::as_str)
    }

    /// Field table of the type registered under `wire_name`.
    pub fn describe(&self, wire_name: &str) -> Option<&'static [FieldDescriptor]> {
        self.resolve(wire_name).map(TypeHandle::fields)
    }

    pub fn contains(&self, wire_name: &str) -> bool {
        self.by_wire.contains_key(wire_name)
    }

    pub fn wire_names(&self) -> impl Iterator<Item = &str> {
        self.by_wire.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_wire.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_wire.is_empty()
    }

    // A displaced type keeps a reverse mapping only if another wire name still
    // points at it.
    fn forget_reverse(&mut self, previous: &TypeHandle, wire_name: &str) {
        if self.by_type.get(&previous.type_id).map(String::as_str) != Some(wire_name) {
            return;
        }
        let fallback = self
            .by_wire
            .iter()
            .find(|(_, h)| h.type_id == previous.type_id)
            .map(|(name, _)| name.clone());
        match fallback {
            Some(name) => {
                self.by_type.insert(previous.type_id, name);
            }
            None => {
                self.by_type.remove(&previous.type_id);
            }
        }
    }
}
