//! # Declaring Resource Types
//!
//! [`resource!`](crate::resource) turns a plain struct declaration into a
//! registered-ready resource type. Each field is tagged after its type with how
//! it maps onto the wire document:
//!
//! | Tag | Field type | Wire location |
//! |-----|------------|---------------|
//! | `attribute` | `Option<T>` (`T: Serialize + DeserializeOwned`) | `attributes.<field>` |
//! | `attribute("name")` | same | `attributes.name` |
//! | `has_one(T)` / `has_one(T, "name")` | `Option<ResourceHandle>` | `relationships.<name>.data` (object) |
//! | `has_many(T)` / `has_many(T, "name")` | `Option<Vec<ResourceHandle>>` | `relationships.<name>.data` (array) |
//!
//! `T` is the related resource type. The decoder refuses linkages whose wire
//! type resolves to anything else, and the encoder refuses handles to anything
//! else.
//!
//! The macro adds a `pub base: ResourceBase` field holding the id, links, meta and
//! nulled relationships, implements [`Resource`](crate::framework::Resource) and
//! [`ResourceType`](crate::framework::ResourceType), and emits the
//! [`FieldDescriptor`](crate::framework::FieldDescriptor) table in declaration
//! order. The struct must derive `Debug` and `Default`.
//!
//! ```rust
//! use std::any::TypeId;
//!
//! use jsonapi_graph::framework::{describe, Resource, ResourceHandle};
//! use jsonapi_graph::model::{Comment, Person};
//!
//! jsonapi_graph::resource! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct Post {
//!         pub title: Option<String> => attribute,
//!         pub body: Option<String> => attribute("body-text"),
//!         pub writer: Option<ResourceHandle> => has_one(Person, "author"),
//!         pub replies: Option<Vec<ResourceHandle>> => has_many(Comment),
//!     }
//! }
//!
//! let fields = describe::<Post>();
//! assert_eq!(fields[1].wire_name, "body-text");
//! assert_eq!(fields[2].relationship_wire_name(), "author");
//! assert!(fields[2].accepts(TypeId::of::<Person>()));
//! assert_eq!(fields[3].relationship_wire_name(), "replies");
//!
//! let mut post = Post::default();
//! post.write_attribute("title", serde_json::json!("Hello")).unwrap();
//! assert_eq!(post.title.as_deref(), Some("Hello"));
//! ```

/// Declares a resource struct and its field descriptor table.
///
/// See the [module documentation](crate::framework::macros) for the field tags.
#[macro_export]
macro_rules! resource {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty => $kind:ident $(( $($arg:tt)* ))?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            pub base: $crate::framework::ResourceBase,
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::framework::ResourceType for $name {
            const FIELDS: &'static [$crate::framework::FieldDescriptor] = &[
                $( $crate::__resource_field!(@describe $kind, $field $(, $($arg)*)?) ),*
            ];
        }

        impl $crate::framework::Resource for $name {
            fn base(&self) -> &$crate::framework::ResourceBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut $crate::framework::ResourceBase {
                &mut self.base
            }

            fn descriptors(&self) -> &'static [$crate::framework::FieldDescriptor] {
                <Self as $crate::framework::ResourceType>::FIELDS
            }

            fn read_attribute(
                &self,
                field: &str,
            ) -> Option<Result<$crate::__private::serde_json::Value, $crate::__private::serde_json::Error>> {
                match field {
                    $( stringify!($field) => $crate::__resource_field!(@read $kind, self.$field), )*
                    _ => None,
                }
            }

            #[allow(unused_variables)]
            fn write_attribute(
                &mut self,
                field: &str,
                value: $crate::__private::serde_json::Value,
            ) -> Result<(), $crate::framework::FieldError> {
                match field {
                    $( stringify!($field) => $crate::__resource_field!(@write $kind, $field, self.$field, value), )*
                    _ => Err($crate::framework::FieldError::UnknownField(field.to_string())),
                }
            }

            fn read_relationship(&self, field: &str) -> Option<$crate::framework::Relation> {
                match field {
                    $( stringify!($field) => $crate::__resource_field!(@relation $kind, self.$field), )*
                    _ => None,
                }
            }

            #[allow(unused_variables)]
            fn write_relationship(
                &mut self,
                field: &str,
                relation: $crate::framework::Relation,
            ) -> Result<(), $crate::framework::FieldError> {
                match field {
                    $( stringify!($field) => $crate::__resource_field!(@link $kind, $field, self.$field, relation), )*
                    _ => Err($crate::framework::FieldError::UnknownField(field.to_string())),
                }
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}

/// Per-field expansion rules used by [`resource!`](crate::resource).
#[doc(hidden)]
#[macro_export]
macro_rules! __resource_field {
    // Descriptors
    (@describe attribute, $field:ident) => {
        $crate::framework::FieldDescriptor::attribute(stringify!($field), stringify!($field))
    };
    (@describe attribute, $field:ident, $wire:literal) => {
        $crate::framework::FieldDescriptor::attribute(stringify!($field), $wire)
    };
    (@describe has_one, $field:ident, $target:ty, $wire:literal) => {
        $crate::framework::FieldDescriptor::to_one(
            stringify!($field),
            $wire,
            ::std::any::TypeId::of::<$target>,
        )
    };
    (@describe has_one, $field:ident, $target:ty) => {
        $crate::framework::FieldDescriptor::to_one(
            stringify!($field),
            stringify!($field),
            ::std::any::TypeId::of::<$target>,
        )
    };
    (@describe has_many, $field:ident, $target:ty, $wire:literal) => {
        $crate::framework::FieldDescriptor::to_many(
            stringify!($field),
            $wire,
            ::std::any::TypeId::of::<$target>,
        )
    };
    (@describe has_many, $field:ident, $target:ty) => {
        $crate::framework::FieldDescriptor::to_many(
            stringify!($field),
            stringify!($field),
            ::std::any::TypeId::of::<$target>,
        )
    };

    // Attribute reads
    (@read attribute, $slot:expr) => {
        $slot.as_ref().map($crate::__private::serde_json::to_value)
    };
    (@read has_one, $slot:expr) => {
        None
    };
    (@read has_many, $slot:expr) => {
        None
    };

    // Attribute writes
    (@write attribute, $field:ident, $slot:expr, $value:expr) => {
        match $crate::__private::serde_json::from_value($value) {
            Ok(parsed) => {
                $slot = Some(parsed);
                Ok(())
            }
            Err(source) => Err($crate::framework::FieldError::Mismatch {
                field: stringify!($field),
                source,
            }),
        }
    };
    (@write has_one, $field:ident, $slot:expr, $value:expr) => {
        Err($crate::framework::FieldError::NotAnAttribute(stringify!($field)))
    };
    (@write has_many, $field:ident, $slot:expr, $value:expr) => {
        Err($crate::framework::FieldError::NotAnAttribute(stringify!($field)))
    };

    // Relationship reads
    (@relation attribute, $slot:expr) => {
        None
    };
    (@relation has_one, $slot:expr) => {
        $slot.map($crate::framework::Relation::One)
    };
    (@relation has_many, $slot:expr) => {
        $slot.clone().map($crate::framework::Relation::Many)
    };

    // Relationship writes
    (@link attribute, $field:ident, $slot:expr, $relation:expr) => {
        Err($crate::framework::FieldError::NotARelationship(stringify!($field)))
    };
    (@link has_one, $field:ident, $slot:expr, $relation:expr) => {
        match $relation {
            $crate::framework::Relation::One(handle) => {
                $slot = Some(handle);
                Ok(())
            }
            $crate::framework::Relation::Many(_) => {
                Err($crate::framework::FieldError::ArityMismatch(stringify!($field)))
            }
        }
    };
    (@link has_many, $field:ident, $slot:expr, $relation:expr) => {
        match $relation {
            $crate::framework::Relation::Many(handles) => {
                $slot = Some(handles);
                Ok(())
            }
            $crate::framework::Relation::One(_) => {
                Err($crate::framework::FieldError::ArityMismatch(stringify!($field)))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::any::TypeId;

    use crate::framework::{describe, FieldError, Relation, Resource, ResourceHandle, ValueKind};
    use serde_json::json;

    crate::resource! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Widget {
            name: Option<String> => attribute,
            weight: Option<f64> => attribute("weight-kg"),
            tags: Option<Vec<String>> => attribute,
            owner: Option<ResourceHandle> => has_one(Empty, "maker"),
            parts: Option<Vec<ResourceHandle>> => has_many(Widget),
        }
    }

    crate::resource! {
        #[derive(Debug, Default)]
        struct Empty {}
    }

    #[test]
    fn descriptor_table_follows_declaration_order() {
        let fields = describe::<Widget>();
        let names: Vec<_> = fields.iter().map(|d| d.field).collect();
        assert_eq!(names, vec!["name", "weight", "tags", "owner", "parts"]);
        assert_eq!(fields[1].wire_name, "weight-kg");
        assert_eq!(fields[3].relationship_wire_name(), "maker");
        assert_eq!(fields[3].kind, ValueKind::Resource);
        assert_eq!(fields[4].relationship_wire_name(), "parts");
        assert_eq!(fields[4].kind, ValueKind::ResourceList);
        assert_eq!(fields[3].target_type(), Some(TypeId::of::<Empty>()));
        assert_eq!(fields[4].target_type(), Some(TypeId::of::<Widget>()));
        assert!(fields[0].target_type().is_none());
        assert!(describe::<Empty>().is_empty());
    }

    #[test]
    fn attributes_convert_through_serde() {
        let mut widget = Widget::default();
        widget.write_attribute("weight", json!(2.5)).unwrap();
        widget.write_attribute("tags", json!(["a", "b"])).unwrap();
        assert_eq!(widget.weight, Some(2.5));
        assert_eq!(widget.tags, Some(vec!["a".to_string(), "b".to_string()]));

        assert_eq!(widget.read_attribute("weight").unwrap().unwrap(), json!(2.5));
        assert!(widget.read_attribute("name").is_none());
    }

    #[test]
    fn mismatched_attribute_leaves_field_untouched() {
        let mut widget = Widget::default();
        widget.name = Some("bolt".into());
        let err = widget.write_attribute("name", json!(42)).unwrap_err();
        assert!(matches!(err, FieldError::Mismatch { field: "name", .. }));
        assert_eq!(widget.name.as_deref(), Some("bolt"));
    }

    #[test]
    fn relationships_enforce_arity() {
        let mut widget = Widget::default();
        widget
            .write_relationship("owner", Relation::One(ResourceHandle(3)))
            .unwrap();
        assert_eq!(widget.read_relationship("owner"), Some(Relation::One(ResourceHandle(3))));

        let err = widget
            .write_relationship("parts", Relation::One(ResourceHandle(1)))
            .unwrap_err();
        assert!(matches!(err, FieldError::ArityMismatch("parts")));
        assert!(widget.read_relationship("parts").is_none());

        assert!(matches!(
            widget.write_attribute("owner", json!("x")),
            Err(FieldError::NotAnAttribute("owner"))
        ));
        assert!(matches!(
            widget.write_relationship("name", Relation::Many(vec![])),
            Err(FieldError::NotARelationship("name"))
        ));
        assert!(matches!(
            widget.write_attribute("missing", json!(1)),
            Err(FieldError::UnknownField(_))
        ));
    }
}
