use crate::framework::{ResourceBase, ResourceHandle};
use crate::model::Person;

crate::resource! {
    /// A comment on an article, registered as `comments`.
    ///
    /// The commenter is held in `writer` but travels as the `author`
    /// relationship on the wire.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Comment {
        pub body: Option<String> => attribute,
        pub writer: Option<ResourceHandle> => has_one(Person, "author"),
    }
}

impl Comment {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            base: ResourceBase::with_id(id),
            body: Some(body.into()),
            ..Self::default()
        }
    }
}
