use crate::framework::{ResourceBase, ResourceHandle};
use crate::model::{Comment, Person};

crate::resource! {
    /// A blog article, registered as `articles`.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Article {
        pub title: Option<String> => attribute,
        pub author: Option<ResourceHandle> => has_one(Person),
        pub comments: Option<Vec<ResourceHandle>> => has_many(Comment),
    }
}

impl Article {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            base: ResourceBase::with_id(id),
            title: Some(title.into()),
            ..Self::default()
        }
    }
}
