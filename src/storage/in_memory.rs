use super::{Storage, UserInclude};
use crate::domain::{MemberTierId, MemberType, Post, Profile, Subscription, User};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// In-memory storage implementation for development/testing.
///
/// Member tier reference data is seeded at construction; everything else
/// starts empty.
pub struct InMemoryStorage {
    member_types: Arc<Mutex<HashMap<MemberTierId, MemberType>>>,
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    profiles: Arc<Mutex<HashMap<Uuid, Profile>>>,
    posts: Arc<Mutex<HashMap<Uuid, Post>>>,
    subscriptions: Arc<Mutex<Vec<Subscription>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        let mut member_types = HashMap::new();
        member_types.insert(
            MemberTierId::Basic,
            MemberType {
                id: MemberTierId::Basic,
                discount: 0.0,
                posts_limit_per_month: 20,
            },
        );
        member_types.insert(
            MemberTierId::Business,
            MemberType {
                id: MemberTierId::Business,
                discount: 7.5,
                posts_limit_per_month: 100,
            },
        );

        Self {
            member_types: Arc::new(Mutex::new(member_types)),
            users: Arc::new(Mutex::new(HashMap::new())),
            profiles: Arc::new(Mutex::new(HashMap::new())),
            posts: Arc::new(Mutex::new(HashMap::new())),
            subscriptions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Authors followed by the given subscriber, as bare rows.
    fn authors_followed_by(&self, subscriber_id: Uuid) -> Vec<User> {
        let edges = self.subscriptions.lock().unwrap();
        let users = self.users.lock().unwrap();
        edges
            .iter()
            .filter(|e| e.subscriber_id == subscriber_id)
            .filter_map(|e| users.get(&e.author_id).cloned())
            .collect()
    }

    /// Subscribers of the given author, as bare rows.
    fn subscribers_of(&self, author_id: Uuid) -> Vec<User> {
        let edges = self.subscriptions.lock().unwrap();
        let users = self.users.lock().unwrap();
        edges
            .iter()
            .filter(|e| e.author_id == author_id)
            .filter_map(|e| users.get(&e.subscriber_id).cloned())
            .collect()
    }

    fn attach_relations(&self, mut user: User, include: UserInclude) -> User {
        let user_id = match user.id {
            Some(id) => id,
            None => return user,
        };

        if include.profile {
            let mut profile = {
                let profiles = self.profiles.lock().unwrap();
                profiles.values().find(|p| p.user_id == user_id).cloned()
            };
            if let Some(profile) = profile.as_mut() {
                let tiers = self.member_types.lock().unwrap();
                profile.member_type = tiers.get(&profile.member_type_id).cloned();
            }
            user.profile = profile;
        }

        if include.posts {
            let posts = self.posts.lock().unwrap();
            user.posts = Some(
                posts
                    .values()
                    .filter(|p| p.author_id == user_id)
                    .cloned()
                    .collect(),
            );
        }

        if include.subscriptions {
            user.subscribed_to = Some(self.authors_followed_by(user_id));
            user.subscribers = Some(self.subscribers_of(user_id));
        }

        user
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn get_member_types(&self) -> Result<Vec<MemberType>> {
        let tiers = self.member_types.lock().unwrap();
        Ok(tiers.values().cloned().collect())
    }

    async fn get_member_type_by_id(&self, id: MemberTierId) -> Result<Option<MemberType>> {
        let tiers = self.member_types.lock().unwrap();
        Ok(tiers.get(&id).cloned())
    }

    async fn create_user(&self, user: &mut User) -> Result<()> {
        let id = Uuid::new_v4();
        user.id = Some(id);

        // Stored rows stay bare; relations are attached on read
        let mut stored = user.clone();
        stored.profile = None;
        stored.posts = None;
        stored.subscribed_to = None;
        stored.subscribers = None;

        let mut users = self.users.lock().unwrap();
        users.insert(id, stored);

        debug!("Created user: {} with id {}", user.name, id);
        Ok(())
    }

    async fn get_users(&self, include: UserInclude) -> Result<Vec<User>> {
        let bare: Vec<User> = {
            let users = self.users.lock().unwrap();
            users.values().cloned().collect()
        };
        Ok(bare
            .into_iter()
            .map(|user| self.attach_relations(user, include))
            .collect())
    }

    async fn get_user_by_id(&self, id: Uuid, include: UserInclude) -> Result<Option<User>> {
        let bare = {
            let users = self.users.lock().unwrap();
            users.get(&id).cloned()
        };
        Ok(bare.map(|user| self.attach_relations(user, include)))
    }

    async fn get_subscribed_to(&self, subscriber_id: Uuid) -> Result<Vec<User>> {
        Ok(self.authors_followed_by(subscriber_id))
    }

    async fn get_subscribers(&self, author_id: Uuid) -> Result<Vec<User>> {
        Ok(self.subscribers_of(author_id))
    }

    async fn add_subscription(&self, subscriber_id: Uuid, author_id: Uuid) -> Result<()> {
        let edge = Subscription {
            subscriber_id,
            author_id,
        };

        let mut edges = self.subscriptions.lock().unwrap();
        if !edges.contains(&edge) {
            edges.push(edge);
            debug!("Added subscription: {} -> {}", subscriber_id, author_id);
        }
        Ok(())
    }

    async fn create_profile(&self, profile: &mut Profile) -> Result<()> {
        let id = Uuid::new_v4();
        profile.id = Some(id);

        let mut stored = profile.clone();
        stored.member_type = None;

        let mut profiles = self.profiles.lock().unwrap();
        profiles.insert(id, stored);

        debug!("Created profile for user {} with id {}", profile.user_id, id);
        Ok(())
    }

    async fn get_profiles(&self) -> Result<Vec<Profile>> {
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles.values().cloned().collect())
    }

    async fn get_profile_by_id(&self, id: Uuid) -> Result<Option<Profile>> {
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles.get(&id).cloned())
    }

    async fn create_post(&self, post: &mut Post) -> Result<()> {
        let id = Uuid::new_v4();
        post.id = Some(id);

        let mut posts = self.posts.lock().unwrap();
        posts.insert(id, post.clone());

        debug!("Created post: {} with id {}", post.title, id);
        Ok(())
    }

    async fn get_posts(&self) -> Result<Vec<Post>> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.values().cloned().collect())
    }

    async fn get_post_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn user(storage: &InMemoryStorage, name: &str) -> User {
        let mut user = User::new(name, 0.0);
        storage.create_user(&mut user).await.unwrap();
        user
    }

    #[tokio::test]
    async fn member_tiers_are_seeded() {
        let storage = InMemoryStorage::new();

        let tiers = storage.get_member_types().await.unwrap();
        assert_eq!(tiers.len(), 2);

        for tier in MemberTierId::ALL {
            let found = storage.get_member_type_by_id(tier).await.unwrap().unwrap();
            assert_eq!(found.id, tier);
        }
    }

    #[tokio::test]
    async fn bare_user_reads_leave_relations_unloaded() {
        let storage = InMemoryStorage::new();
        let author = user(&storage, "Author").await;

        let mut post = Post::new("Title", "Content", author.id.unwrap());
        storage.create_post(&mut post).await.unwrap();

        let found = storage
            .get_user_by_id(author.id.unwrap(), UserInclude::none())
            .await
            .unwrap()
            .unwrap();
        assert!(found.posts.is_none());
        assert!(found.profile.is_none());
    }

    #[tokio::test]
    async fn include_attaches_profile_with_member_type_and_posts() {
        let storage = InMemoryStorage::new();
        let author = user(&storage, "Author").await;

        let mut profile = Profile::new(true, 1990, author.id.unwrap(), MemberTierId::Business);
        storage.create_profile(&mut profile).await.unwrap();
        let mut post = Post::new("Title", "Content", author.id.unwrap());
        storage.create_post(&mut post).await.unwrap();

        let found = storage
            .get_user_by_id(author.id.unwrap(), UserInclude::with_profile_and_posts())
            .await
            .unwrap()
            .unwrap();

        let attached_profile = found.profile.unwrap();
        assert_eq!(attached_profile.member_type_id, MemberTierId::Business);
        assert_eq!(
            attached_profile.member_type.unwrap().id,
            MemberTierId::Business
        );
        assert_eq!(found.posts.unwrap().len(), 1);
        // Subscriptions were not requested
        assert!(found.subscribed_to.is_none());
        assert!(found.subscribers.is_none());
    }

    #[tokio::test]
    async fn subscription_edges_are_directed() {
        let storage = InMemoryStorage::new();
        let subscriber = user(&storage, "Subscriber").await;
        let author = user(&storage, "Author").await;

        storage
            .add_subscription(subscriber.id.unwrap(), author.id.unwrap())
            .await
            .unwrap();

        let followed = storage
            .get_subscribed_to(subscriber.id.unwrap())
            .await
            .unwrap();
        assert_eq!(followed.len(), 1);
        assert_eq!(followed[0].id, author.id);

        let fans = storage.get_subscribers(author.id.unwrap()).await.unwrap();
        assert_eq!(fans.len(), 1);
        assert_eq!(fans[0].id, subscriber.id);

        // No implied symmetry
        assert!(storage
            .get_subscribed_to(author.id.unwrap())
            .await
            .unwrap()
            .is_empty());
        assert!(storage
            .get_subscribers(subscriber.id.unwrap())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn duplicate_subscription_edges_collapse() {
        let storage = InMemoryStorage::new();
        let subscriber = user(&storage, "Subscriber").await;
        let author = user(&storage, "Author").await;

        storage
            .add_subscription(subscriber.id.unwrap(), author.id.unwrap())
            .await
            .unwrap();
        storage
            .add_subscription(subscriber.id.unwrap(), author.id.unwrap())
            .await
            .unwrap();

        let fans = storage.get_subscribers(author.id.unwrap()).await.unwrap();
        assert_eq!(fans.len(), 1);
    }

    #[tokio::test]
    async fn missing_rows_read_as_none() {
        let storage = InMemoryStorage::new();

        assert!(storage
            .get_user_by_id(Uuid::new_v4(), UserInclude::full())
            .await
            .unwrap()
            .is_none());
        assert!(storage
            .get_post_by_id(Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
        assert!(storage
            .get_profile_by_id(Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
    }
}
