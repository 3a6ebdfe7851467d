#[cfg(feature = "db")]
pub mod database;
pub mod in_memory;

#[cfg(feature = "db")]
pub use database::DatabaseStorage;
pub use in_memory::InMemoryStorage;

use crate::domain::{MemberTierId, MemberType, Post, Profile, User};
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Relation-include specification for user reads.
///
/// A single find call returns the user together with the requested relations
/// so nested field resolution needs no further storage access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserInclude {
    pub profile: bool,
    pub posts: bool,
    pub subscriptions: bool,
}

impl UserInclude {
    /// Bare rows, no relations attached.
    pub fn none() -> Self {
        Self::default()
    }

    /// Profile (with its member type) and posts, as the plural user listing
    /// attaches them.
    pub fn with_profile_and_posts() -> Self {
        Self {
            profile: true,
            posts: true,
            subscriptions: false,
        }
    }

    /// Everything, including both subscription directions.
    pub fn full() -> Self {
        Self {
            profile: true,
            posts: true,
            subscriptions: true,
        }
    }
}

/// Storage trait over the five logical tables backing the API.
///
/// The GraphQL layer only reads; the create/link operations exist for
/// seeding and tests.
#[async_trait]
pub trait Storage: Send + Sync {
    // Member tier reference data
    async fn get_member_types(&self) -> Result<Vec<MemberType>>;
    async fn get_member_type_by_id(&self, id: MemberTierId) -> Result<Option<MemberType>>;

    // User operations
    async fn create_user(&self, user: &mut User) -> Result<()>;
    async fn get_users(&self, include: UserInclude) -> Result<Vec<User>>;
    async fn get_user_by_id(&self, id: Uuid, include: UserInclude) -> Result<Option<User>>;
    /// Authors the given user subscribes to (given id on the subscriber side).
    async fn get_subscribed_to(&self, subscriber_id: Uuid) -> Result<Vec<User>>;
    /// Subscribers of the given user (given id on the author side).
    async fn get_subscribers(&self, author_id: Uuid) -> Result<Vec<User>>;
    async fn add_subscription(&self, subscriber_id: Uuid, author_id: Uuid) -> Result<()>;

    // Profile operations
    async fn create_profile(&self, profile: &mut Profile) -> Result<()>;
    async fn get_profiles(&self) -> Result<Vec<Profile>>;
    async fn get_profile_by_id(&self, id: Uuid) -> Result<Option<Profile>>;

    // Post operations
    async fn create_post(&self, post: &mut Post) -> Result<()>;
    async fn get_posts(&self) -> Result<Vec<Post>>;
    async fn get_post_by_id(&self, id: Uuid) -> Result<Option<Post>>;
}
