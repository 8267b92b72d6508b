//! # Resource Graph
//!
//! The arena that owns every resource of a document.
//!
//! Resources are stored in insertion order and addressed by [`ResourceHandle`].
//! Resources with an id are also indexed by `(runtime type, id)`, which is what
//! gives relationships their shared-reference semantics: asking for the same key
//! twice yields the same handle.
//!
//! A slot can be a *linkage placeholder*: a resource built from a relationship's
//! `{type, id}` before (or without) its full representation. When the full
//! resource shows up later in the same document it replaces the placeholder in
//! place, so every relationship already holding the handle now sees the
//! complete resource.

use std::any::TypeId;
use std::collections::HashMap;

use tracing::debug;

use crate::framework::registry::TypeHandle;
use crate::framework::resource::{short_type_name, Resource, ResourceHandle};

/// Identity of a resource inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub type_id: TypeId,
    pub id: String,
}

impl ResourceKey {
    pub fn new(type_id: TypeId, id: impl Into<String>) -> Self {
        Self {
            type_id,
            id: id.into(),
        }
    }

    pub fn of(resource: &dyn Resource) -> Option<Self> {
        let id = resource.id()?;
        Some(Self::new(resource.as_any().type_id(), id))
    }
}

#[derive(Debug)]
struct Slot {
    resource: Box<dyn Resource>,
    placeholder: bool,
}

/// Outcome of [`ResourceGraph::insert_complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// A new slot was created.
    Added(ResourceHandle),
    /// A linkage placeholder was replaced by the full resource.
    Filled(ResourceHandle),
    /// A complete resource with the same key already existed and was kept.
    Existing(ResourceHandle),
}

impl Insertion {
    pub fn handle(self) -> ResourceHandle {
        match self {
            Insertion::Added(h) | Insertion::Filled(h) | Insertion::Existing(h) => h,
        }
    }
}

/// Owning store of resources, addressed by handle.
#[derive(Debug, Default)]
pub struct ResourceGraph {
    slots: Vec<Slot>,
    index: HashMap<ResourceKey, ResourceHandle>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Adds a resource the caller built, typically before encoding.
    ///
    /// If another resource with the same key is already indexed, the new one is
    /// still stored but lookups by key keep returning the first.
    pub fn add<T: Resource>(&mut self, resource: T) -> ResourceHandle {
        self.push(Box::new(resource), false)
    }

    pub fn add_boxed(&mut self, resource: Box<dyn Resource>) -> ResourceHandle {
        self.push(resource, false)
    }

    /// Stores a fully decoded resource, merging with an existing entry of the
    /// same key: placeholders are filled, complete entries win.
    pub fn insert_complete(&mut self, resource: Box<dyn Resource>) -> Insertion {
        let Some(key) = ResourceKey::of(resource.as_ref()) else {
            return Insertion::Added(self.push(resource, false));
        };
        match self.index.get(&key).copied() {
            Some(handle) if self.slots[handle.0].placeholder => {
                self.slots[handle.0] = Slot {
                    resource,
                    placeholder: false,
                };
                Insertion::Filled(handle)
            }
            Some(handle) => {
                debug!(
                    entity_type = short_type_name(resource.type_name()),
                    id = %key.id,
                    "Duplicate resource, keeping first"
                );
                Insertion::Existing(handle)
            }
            None => Insertion::Added(self.push(resource, false)),
        }
    }

    /// Returns the handle for a `{type, id}` linkage, creating a placeholder
    /// through `ty` when the key is not known yet.
    pub fn intern_linkage(&mut self, ty: &TypeHandle, id: &str) -> ResourceHandle {
        let key = ResourceKey::new(ty.type_id(), id);
        if let Some(handle) = self.index.get(&key) {
            return *handle;
        }
        let mut placeholder = ty.instantiate();
        placeholder.set_id(id.to_string());
        self.push(placeholder, true)
    }

    pub fn find(&self, key: &ResourceKey) -> Option<ResourceHandle> {
        self.index.get(key).copied()
    }

    pub fn find_as<T: Resource>(&self, id: &str) -> Option<&T> {
        let handle = self.find(&ResourceKey::new(TypeId::of::<T>(), id))?;
        self.get_as(handle)
    }

    pub fn get(&self, handle: ResourceHandle) -> Option<&dyn Resource> {
        self.slots.get(handle.0).map(|slot| slot.resource.as_ref())
    }

    pub fn get_mut(&mut self, handle: ResourceHandle) -> Option<&mut dyn Resource> {
        self.slots
            .get_mut(handle.0)
            .map(|slot| slot.resource.as_mut())
    }

    pub fn get_as<T: Resource>(&self, handle: ResourceHandle) -> Option<&T> {
        self.get(handle)?.downcast_ref::<T>()
    }

    pub fn get_as_mut<T: Resource>(&mut self, handle: ResourceHandle) -> Option<&mut T> {
        self.get_mut(handle)?.downcast_mut::<T>()
    }

    /// Resolves a list of handles, skipping any that are not in this graph.
    pub fn get_all_as<T: Resource>(&self, handles: &[ResourceHandle]) -> Vec<&T> {
        handles.iter().filter_map(|h| self.get_as(*h)).collect()
    }

    /// True when the slot only holds a `{type, id}` linkage.
    pub fn is_placeholder(&self, handle: ResourceHandle) -> bool {
        self.slots.get(handle.0).is_some_and(|slot| slot.placeholder)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceHandle, &dyn Resource)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (ResourceHandle(i), slot.resource.as_ref()))
    }

    fn push(&mut self, resource: Box<dyn Resource>, placeholder: bool) -> ResourceHandle {
        let handle = ResourceHandle(self.slots.len());
        if let Some(key) = ResourceKey::of(resource.as_ref()) {
            self.index.entry(key).or_insert(handle);
        }
        self.slots.push(Slot {
            resource,
            placeholder,
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::resource::ResourceBase;
    use crate::model::{Article, Person};

    fn person(id: &str, name: &str) -> Box<dyn Resource> {
        Box::new(Person {
            base: ResourceBase::with_id(id),
            name: Some(name.into()),
            ..Person::default()
        })
    }

    #[test]
    fn linkage_is_interned_once_per_key() {
        let mut graph = ResourceGraph::new();
        let people = TypeHandle::of::<Person>();
        let a = graph.intern_linkage(&people, "9");
        let b = graph.intern_linkage(&people, "9");
        let c = graph.intern_linkage(&people, "10");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(graph.is_placeholder(a));
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn placeholder_is_filled_in_place() {
        let mut graph = ResourceGraph::new();
        let handle = graph.intern_linkage(&TypeHandle::of::<Person>(), "9");

        let inserted = graph.insert_complete(person("9", "Dan Gebhardt"));
        assert_eq!(inserted, Insertion::Filled(handle));
        assert!(!graph.is_placeholder(handle));
        let dan = graph.get_as::<Person>(handle).unwrap();
        assert_eq!(dan.name.as_deref(), Some("Dan Gebhardt"));
    }

    #[test]
    fn first_complete_resource_wins() {
        let mut graph = ResourceGraph::new();
        let first = graph.insert_complete(person("9", "Dan")).handle();
        let second = graph.insert_complete(person("9", "Someone else"));
        assert_eq!(second, Insertion::Existing(first));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.find_as::<Person>("9").unwrap().name.as_deref(), Some("Dan"));
    }

    #[test]
    fn keys_distinguish_runtime_types() {
        let mut graph = ResourceGraph::new();
        let person = graph.intern_linkage(&TypeHandle::of::<Person>(), "1");
        let article = graph.intern_linkage(&TypeHandle::of::<Article>(), "1");
        assert_ne!(person, article);
        assert!(graph.get_as::<Article>(person).is_none());
    }

    #[test]
    fn iter_walks_slots_in_insertion_order() {
        let mut graph = ResourceGraph::new();
        let mut fresh = TypeHandle::of::<Article>().instantiate();
        fresh.set_id("1".to_string());
        let article = graph.add_boxed(fresh);
        let dan = graph.add(Person {
            base: ResourceBase::with_id("9"),
            ..Person::default()
        });
        let linkage = graph.intern_linkage(&TypeHandle::of::<Person>(), "10");

        let seen: Vec<_> = graph
            .iter()
            .map(|(handle, resource)| (handle, resource.id().map(str::to_string)))
            .collect();
        assert_eq!(
            seen,
            vec![
                (article, Some("1".to_string())),
                (dan, Some("9".to_string())),
                (linkage, Some("10".to_string())),
            ]
        );
        assert!(graph.find_as::<Article>("1").is_some());
    }

    #[test]
    fn resources_without_id_are_never_merged() {
        let mut graph = ResourceGraph::new();
        let a = graph.insert_complete(Box::new(Person::default())).handle();
        let b = graph.insert_complete(Box::new(Person::default())).handle();
        assert_ne!(a, b);
    }
}
