use crate::domain::User as DomainUser;
use async_graphql::{Object, ID};

/// GraphQL representation of a User.
///
/// Relation fields resolve from the eagerly-attached relation data; no field
/// here goes back to storage. A relation the originating query did not
/// attach resolves to null.
#[derive(Clone)]
pub struct User {
    pub inner: DomainUser,
}

impl From<DomainUser> for User {
    fn from(user: DomainUser) -> Self {
        Self { inner: user }
    }
}

#[Object]
impl User {
    /// The unique identifier for the user
    async fn id(&self) -> ID {
        ID(self.inner.id.unwrap_or_default().to_string())
    }

    /// The user's display name
    async fn name(&self) -> &str {
        &self.inner.name
    }

    /// The user's account balance
    async fn balance(&self) -> f64 {
        self.inner.balance
    }

    /// The user's profile, when attached; null when absent or not loaded
    async fn profile(&self) -> Option<super::profile::Profile> {
        self.inner.profile.clone().map(Into::into)
    }

    /// Posts authored by the user, when attached
    async fn posts(&self) -> Option<Vec<super::post::Post>> {
        self.inner
            .posts
            .as_ref()
            .map(|posts| posts.iter().cloned().map(Into::into).collect())
    }

    /// Authors this user subscribes to, when attached
    async fn user_subscribed_to(&self) -> Option<Vec<User>> {
        self.inner
            .subscribed_to
            .as_ref()
            .map(|users| users.iter().cloned().map(Into::into).collect())
    }

    /// Users subscribed to this user, when attached
    async fn subscribed_to_user(&self) -> Option<Vec<User>> {
        self.inner
            .subscribers
            .as_ref()
            .map(|users| users.iter().cloned().map(Into::into).collect())
    }
}
