use crate::domain::{MemberTierId, Post, Profile, User};
use crate::error::{AppError, Result};
use crate::storage::Storage;
use tracing::info;
use uuid::Uuid;

fn assigned_id(user: &User) -> Result<Uuid> {
    user.id
        .ok_or_else(|| AppError::MissingField(format!("id for user '{}'", user.name)))
}

/// Populate the store with a small demo graph so the endpoint is explorable
/// out of the box: three users, two profiles, three posts, and a few
/// subscription edges.
pub async fn seed_demo_data(storage: &dyn Storage) -> Result<()> {
    let mut alice = User::new("Alice", 120.5);
    storage.create_user(&mut alice).await?;
    let mut bob = User::new("Bob", 42.0);
    storage.create_user(&mut bob).await?;
    let mut carol = User::new("Carol", 0.0);
    storage.create_user(&mut carol).await?;

    let alice_id = assigned_id(&alice)?;
    let bob_id = assigned_id(&bob)?;
    let carol_id = assigned_id(&carol)?;

    let mut alice_profile = Profile::new(false, 1988, alice_id, MemberTierId::Business);
    storage.create_profile(&mut alice_profile).await?;
    let mut bob_profile = Profile::new(true, 1995, bob_id, MemberTierId::Basic);
    storage.create_profile(&mut bob_profile).await?;

    let mut first = Post::new("Hello, world", "First post on the platform.", alice_id);
    storage.create_post(&mut first).await?;
    let mut second = Post::new("On balance", "Thoughts about account balances.", alice_id);
    storage.create_post(&mut second).await?;
    let mut third = Post::new("Quiet start", "Bob's introduction.", bob_id);
    storage.create_post(&mut third).await?;

    // Carol follows both authors; Alice follows Bob
    storage.add_subscription(carol_id, alice_id).await?;
    storage.add_subscription(carol_id, bob_id).await?;
    storage.add_subscription(alice_id, bob_id).await?;

    info!("Seeded demo data: 3 users, 2 profiles, 3 posts, 3 subscriptions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryStorage, UserInclude};

    #[tokio::test]
    async fn demo_seed_produces_a_connected_graph() {
        let storage = InMemoryStorage::new();
        seed_demo_data(&storage).await.unwrap();

        let users = storage
            .get_users(UserInclude::with_profile_and_posts())
            .await
            .unwrap();
        assert_eq!(users.len(), 3);

        let with_profiles = users.iter().filter(|u| u.profile.is_some()).count();
        assert_eq!(with_profiles, 2);

        let posts = storage.get_posts().await.unwrap();
        assert_eq!(posts.len(), 3);
    }
}
