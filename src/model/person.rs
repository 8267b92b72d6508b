use crate::framework::ResourceBase;

crate::resource! {
    /// An author or commenter, registered as `people`.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Person {
        pub name: Option<String> => attribute,
        pub twitter: Option<String> => attribute,
        pub age: Option<u32> => attribute,
    }
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            base: ResourceBase::with_id(id),
            name: Some(name.into()),
            ..Self::default()
        }
    }
}
