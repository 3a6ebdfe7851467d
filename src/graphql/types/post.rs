use crate::domain::Post as DomainPost;
use async_graphql::{Object, ID};

/// GraphQL representation of a Post
#[derive(Clone)]
pub struct Post {
    pub inner: DomainPost,
}

impl From<DomainPost> for Post {
    fn from(post: DomainPost) -> Self {
        Self { inner: post }
    }
}

#[Object]
impl Post {
    /// The unique identifier for the post
    async fn id(&self) -> ID {
        ID(self.inner.id.unwrap_or_default().to_string())
    }

    /// The post's title
    async fn title(&self) -> &str {
        &self.inner.title
    }

    /// The post's body text
    async fn content(&self) -> &str {
        &self.inner.content
    }

    /// Identifier of the authoring user
    async fn author_id(&self) -> ID {
        ID(self.inner.author_id.to_string())
    }
}
