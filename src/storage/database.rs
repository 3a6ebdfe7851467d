use super::{Storage, UserInclude};
use crate::db::DatabaseManager;
use crate::domain::{MemberTierId, MemberType, Post, Profile, Subscription, User};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// libsql-backed storage over the membership tables.
pub struct DatabaseStorage {
    manager: DatabaseManager,
}

impl DatabaseStorage {
    pub fn new(manager: DatabaseManager) -> Self {
        Self { manager }
    }
}

fn db_err(context: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Database {
        message: format!("{context}: {err}"),
    }
}

fn parse_uuid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| db_err("Invalid UUID in row", e))
}

fn user_from_row(row: &libsql::Row) -> Result<User> {
    let id: String = row.get(0).map_err(|e| db_err("Failed to get user id", e))?;
    let name: String = row.get(1).map_err(|e| db_err("Failed to get user name", e))?;
    let balance: f64 = row
        .get(2)
        .map_err(|e| db_err("Failed to get user balance", e))?;

    let mut user = User::new(name, balance);
    user.id = Some(parse_uuid(&id)?);
    Ok(user)
}

fn profile_from_row(row: &libsql::Row) -> Result<Profile> {
    let id: String = row.get(0).map_err(|e| db_err("Failed to get profile id", e))?;
    let is_male: i64 = row
        .get(1)
        .map_err(|e| db_err("Failed to get profile is_male", e))?;
    let year_of_birth: i64 = row
        .get(2)
        .map_err(|e| db_err("Failed to get profile year_of_birth", e))?;
    let user_id: String = row
        .get(3)
        .map_err(|e| db_err("Failed to get profile user_id", e))?;
    let member_type_id: String = row
        .get(4)
        .map_err(|e| db_err("Failed to get profile member_type_id", e))?;

    let mut profile = Profile::new(
        is_male != 0,
        year_of_birth as i32,
        parse_uuid(&user_id)?,
        member_type_id.parse::<MemberTierId>()?,
    );
    profile.id = Some(parse_uuid(&id)?);
    Ok(profile)
}

fn post_from_row(row: &libsql::Row) -> Result<Post> {
    let id: String = row.get(0).map_err(|e| db_err("Failed to get post id", e))?;
    let title: String = row.get(1).map_err(|e| db_err("Failed to get post title", e))?;
    let content: String = row
        .get(2)
        .map_err(|e| db_err("Failed to get post content", e))?;
    let author_id: String = row
        .get(3)
        .map_err(|e| db_err("Failed to get post author_id", e))?;

    let mut post = Post::new(title, content, parse_uuid(&author_id)?);
    post.id = Some(parse_uuid(&id)?);
    Ok(post)
}

fn member_type_from_row(row: &libsql::Row) -> Result<MemberType> {
    let id: String = row.get(0).map_err(|e| db_err("Failed to get tier id", e))?;
    let discount: f64 = row
        .get(1)
        .map_err(|e| db_err("Failed to get tier discount", e))?;
    let posts_limit: i64 = row
        .get(2)
        .map_err(|e| db_err("Failed to get tier posts limit", e))?;

    Ok(MemberType {
        id: id.parse::<MemberTierId>()?,
        discount,
        posts_limit_per_month: posts_limit as i32,
    })
}

impl DatabaseStorage {
    async fn query_users(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Vec<User>> {
        let conn = self.manager.get_connection().await?;
        let mut rows = conn
            .query(sql, params)
            .await
            .map_err(|e| db_err("Failed to query users", e))?;

        let mut users = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| db_err("Failed to read row", e))?
        {
            users.push(user_from_row(&row)?);
        }
        Ok(users)
    }

    async fn load_member_types(&self) -> Result<HashMap<MemberTierId, MemberType>> {
        let tiers = self.get_member_types().await?;
        Ok(tiers.into_iter().map(|t| (t.id, t)).collect())
    }

    async fn load_subscriptions(&self) -> Result<Vec<Subscription>> {
        let conn = self.manager.get_connection().await?;
        let mut rows = conn
            .query("SELECT subscriber_id, author_id FROM subscriptions", ())
            .await
            .map_err(|e| db_err("Failed to query subscriptions", e))?;

        let mut edges = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| db_err("Failed to read row", e))?
        {
            let subscriber_id: String = row
                .get(0)
                .map_err(|e| db_err("Failed to get subscriber_id", e))?;
            let author_id: String = row
                .get(1)
                .map_err(|e| db_err("Failed to get author_id", e))?;
            edges.push(Subscription {
                subscriber_id: parse_uuid(&subscriber_id)?,
                author_id: parse_uuid(&author_id)?,
            });
        }
        Ok(edges)
    }

    /// Attach the requested relations to a set of bare user rows by loading
    /// the related tables once and stitching in memory.
    async fn attach_relations(
        &self,
        mut users: Vec<User>,
        include: UserInclude,
    ) -> Result<Vec<User>> {
        if include.profile {
            let tiers = self.load_member_types().await?;
            let mut by_user: HashMap<Uuid, Profile> = HashMap::new();
            for mut profile in self.get_profiles().await? {
                profile.member_type = tiers.get(&profile.member_type_id).cloned();
                by_user.insert(profile.user_id, profile);
            }
            for user in &mut users {
                user.profile = user.id.and_then(|id| by_user.get(&id).cloned());
            }
        }

        if include.posts {
            let mut by_author: HashMap<Uuid, Vec<Post>> = HashMap::new();
            for post in self.get_posts().await? {
                by_author.entry(post.author_id).or_default().push(post);
            }
            for user in &mut users {
                let own = user
                    .id
                    .and_then(|id| by_author.remove(&id))
                    .unwrap_or_default();
                user.posts = Some(own);
            }
        }

        if include.subscriptions {
            let edges = self.load_subscriptions().await?;
            let all = self
                .query_users("SELECT id, name, balance FROM users", ())
                .await?;
            let by_id: HashMap<Uuid, User> = all
                .into_iter()
                .filter_map(|u| u.id.map(|id| (id, u)))
                .collect();

            for user in &mut users {
                let user_id = match user.id {
                    Some(id) => id,
                    None => continue,
                };
                user.subscribed_to = Some(
                    edges
                        .iter()
                        .filter(|e| e.subscriber_id == user_id)
                        .filter_map(|e| by_id.get(&e.author_id).cloned())
                        .collect(),
                );
                user.subscribers = Some(
                    edges
                        .iter()
                        .filter(|e| e.author_id == user_id)
                        .filter_map(|e| by_id.get(&e.subscriber_id).cloned())
                        .collect(),
                );
            }
        }

        Ok(users)
    }
}

#[async_trait]
impl Storage for DatabaseStorage {
    async fn get_member_types(&self) -> Result<Vec<MemberType>> {
        let conn = self.manager.get_connection().await?;
        let mut rows = conn
            .query(
                "SELECT id, discount, posts_limit_per_month FROM member_types",
                (),
            )
            .await
            .map_err(|e| db_err("Failed to query member types", e))?;

        let mut tiers = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| db_err("Failed to read row", e))?
        {
            tiers.push(member_type_from_row(&row)?);
        }
        Ok(tiers)
    }

    async fn get_member_type_by_id(&self, id: MemberTierId) -> Result<Option<MemberType>> {
        let conn = self.manager.get_connection().await?;
        let mut rows = conn
            .query(
                "SELECT id, discount, posts_limit_per_month FROM member_types WHERE id = ?",
                libsql::params![id.as_str()],
            )
            .await
            .map_err(|e| db_err("Failed to query member type", e))?;

        match rows
            .next()
            .await
            .map_err(|e| db_err("Failed to read row", e))?
        {
            Some(row) => Ok(Some(member_type_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn create_user(&self, user: &mut User) -> Result<()> {
        let id = Uuid::new_v4();
        user.id = Some(id);

        let conn = self.manager.get_connection().await?;
        conn.execute(
            "INSERT INTO users (id, name, balance) VALUES (?, ?, ?)",
            libsql::params![id.to_string(), user.name.clone(), user.balance],
        )
        .await
        .map_err(|e| db_err("Failed to insert user", e))?;

        debug!("Created user: {} with id {}", user.name, id);
        Ok(())
    }

    async fn get_users(&self, include: UserInclude) -> Result<Vec<User>> {
        let users = self
            .query_users("SELECT id, name, balance FROM users", ())
            .await?;
        self.attach_relations(users, include).await
    }

    async fn get_user_by_id(&self, id: Uuid, include: UserInclude) -> Result<Option<User>> {
        let users = self
            .query_users(
                "SELECT id, name, balance FROM users WHERE id = ?",
                libsql::params![id.to_string()],
            )
            .await?;
        Ok(self.attach_relations(users, include).await?.pop())
    }

    async fn get_subscribed_to(&self, subscriber_id: Uuid) -> Result<Vec<User>> {
        self.query_users(
            "SELECT u.id, u.name, u.balance FROM users u \
             JOIN subscriptions s ON s.author_id = u.id \
             WHERE s.subscriber_id = ?",
            libsql::params![subscriber_id.to_string()],
        )
        .await
    }

    async fn get_subscribers(&self, author_id: Uuid) -> Result<Vec<User>> {
        self.query_users(
            "SELECT u.id, u.name, u.balance FROM users u \
             JOIN subscriptions s ON s.subscriber_id = u.id \
             WHERE s.author_id = ?",
            libsql::params![author_id.to_string()],
        )
        .await
    }

    async fn add_subscription(&self, subscriber_id: Uuid, author_id: Uuid) -> Result<()> {
        let conn = self.manager.get_connection().await?;
        conn.execute(
            "INSERT OR IGNORE INTO subscriptions (subscriber_id, author_id) VALUES (?, ?)",
            libsql::params![subscriber_id.to_string(), author_id.to_string()],
        )
        .await
        .map_err(|e| db_err("Failed to insert subscription", e))?;

        debug!("Added subscription: {} -> {}", subscriber_id, author_id);
        Ok(())
    }

    async fn create_profile(&self, profile: &mut Profile) -> Result<()> {
        let id = Uuid::new_v4();
        profile.id = Some(id);

        let conn = self.manager.get_connection().await?;
        conn.execute(
            "INSERT INTO profiles (id, is_male, year_of_birth, user_id, member_type_id) \
             VALUES (?, ?, ?, ?, ?)",
            libsql::params![
                id.to_string(),
                profile.is_male as i64,
                profile.year_of_birth as i64,
                profile.user_id.to_string(),
                profile.member_type_id.as_str()
            ],
        )
        .await
        .map_err(|e| db_err("Failed to insert profile", e))?;

        debug!("Created profile for user {} with id {}", profile.user_id, id);
        Ok(())
    }

    async fn get_profiles(&self) -> Result<Vec<Profile>> {
        let conn = self.manager.get_connection().await?;
        let mut rows = conn
            .query(
                "SELECT id, is_male, year_of_birth, user_id, member_type_id FROM profiles",
                (),
            )
            .await
            .map_err(|e| db_err("Failed to query profiles", e))?;

        let mut profiles = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| db_err("Failed to read row", e))?
        {
            profiles.push(profile_from_row(&row)?);
        }
        Ok(profiles)
    }

    async fn get_profile_by_id(&self, id: Uuid) -> Result<Option<Profile>> {
        let conn = self.manager.get_connection().await?;
        let mut rows = conn
            .query(
                "SELECT id, is_male, year_of_birth, user_id, member_type_id \
                 FROM profiles WHERE id = ?",
                libsql::params![id.to_string()],
            )
            .await
            .map_err(|e| db_err("Failed to query profile", e))?;

        match rows
            .next()
            .await
            .map_err(|e| db_err("Failed to read row", e))?
        {
            Some(row) => Ok(Some(profile_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn create_post(&self, post: &mut Post) -> Result<()> {
        let id = Uuid::new_v4();
        post.id = Some(id);

        let conn = self.manager.get_connection().await?;
        conn.execute(
            "INSERT INTO posts (id, title, content, author_id) VALUES (?, ?, ?, ?)",
            libsql::params![
                id.to_string(),
                post.title.clone(),
                post.content.clone(),
                post.author_id.to_string()
            ],
        )
        .await
        .map_err(|e| db_err("Failed to insert post", e))?;

        debug!("Created post: {} with id {}", post.title, id);
        Ok(())
    }

    async fn get_posts(&self) -> Result<Vec<Post>> {
        let conn = self.manager.get_connection().await?;
        let mut rows = conn
            .query("SELECT id, title, content, author_id FROM posts", ())
            .await
            .map_err(|e| db_err("Failed to query posts", e))?;

        let mut posts = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| db_err("Failed to read row", e))?
        {
            posts.push(post_from_row(&row)?);
        }
        Ok(posts)
    }

    async fn get_post_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        let conn = self.manager.get_connection().await?;
        let mut rows = conn
            .query(
                "SELECT id, title, content, author_id FROM posts WHERE id = ?",
                libsql::params![id.to_string()],
            )
            .await
            .map_err(|e| db_err("Failed to query post", e))?;

        match rows
            .next()
            .await
            .map_err(|e| db_err("Failed to read row", e))?
        {
            Some(row) => Ok(Some(post_from_row(&row)?)),
            None => Ok(None),
        }
    }
}
