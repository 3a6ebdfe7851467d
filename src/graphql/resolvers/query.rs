use crate::domain::MemberTierId;
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::{MemberType, Post, Profile, User};
use crate::storage::UserInclude;
use async_graphql::{Context, FieldResult, Object, ID};
use uuid::Uuid;

/// Root query object for GraphQL.
///
/// Each field maps its arguments onto a single storage call. An identifier
/// that parses to no row reads as null (or an empty list), never as an
/// error; storage faults propagate and the engine scopes them to the field.
pub struct Query;

#[Object]
impl Query {
    /// Get all membership tiers
    async fn member_types(&self, ctx: &Context<'_>) -> FieldResult<Vec<MemberType>> {
        let context = ctx.data::<GraphQLContext>()?;

        match context.storage.get_member_types().await {
            Ok(tiers) => Ok(tiers.into_iter().map(|t| t.into()).collect()),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a membership tier by its identifier
    async fn member_type(
        &self,
        ctx: &Context<'_>,
        id: MemberTierId,
    ) -> FieldResult<Option<MemberType>> {
        let context = ctx.data::<GraphQLContext>()?;

        match context.storage.get_member_type_by_id(id).await {
            Ok(tier) => Ok(tier.map(|t| t.into())),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all posts
    async fn posts(&self, ctx: &Context<'_>) -> FieldResult<Vec<Post>> {
        let context = ctx.data::<GraphQLContext>()?;

        match context.storage.get_posts().await {
            Ok(posts) => Ok(posts.into_iter().map(|p| p.into()).collect()),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a post by ID
    async fn post(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<Post>> {
        let context = ctx.data::<GraphQLContext>()?;
        let post_id = match Uuid::parse_str(&id) {
            Ok(parsed) => parsed,
            // A malformed identifier matches no row
            Err(_) => return Ok(None),
        };

        match context.storage.get_post_by_id(post_id).await {
            Ok(post) => Ok(post.map(|p| p.into())),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all users with profile (and its tier) and posts attached
    async fn users(&self, ctx: &Context<'_>) -> FieldResult<Vec<User>> {
        let context = ctx.data::<GraphQLContext>()?;

        match context
            .storage
            .get_users(UserInclude::with_profile_and_posts())
            .await
        {
            Ok(users) => Ok(users.into_iter().map(|u| u.into()).collect()),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by ID with all relations attached
    async fn user(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<User>> {
        let context = ctx.data::<GraphQLContext>()?;
        let user_id = match Uuid::parse_str(&id) {
            Ok(parsed) => parsed,
            Err(_) => return Ok(None),
        };

        match context.storage.get_user_by_id(user_id, UserInclude::full()).await {
            Ok(user) => Ok(user.map(|u| u.into())),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the authors the given user subscribes to
    async fn user_subscribed_to(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Vec<User>> {
        let context = ctx.data::<GraphQLContext>()?;
        let subscriber_id = match Uuid::parse_str(&id) {
            Ok(parsed) => parsed,
            Err(_) => return Ok(Vec::new()),
        };

        match context.storage.get_subscribed_to(subscriber_id).await {
            Ok(users) => Ok(users.into_iter().map(|u| u.into()).collect()),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the subscribers of the given user
    async fn subscribed_to_user(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Vec<User>> {
        let context = ctx.data::<GraphQLContext>()?;
        let author_id = match Uuid::parse_str(&id) {
            Ok(parsed) => parsed,
            Err(_) => return Ok(Vec::new()),
        };

        match context.storage.get_subscribers(author_id).await {
            Ok(users) => Ok(users.into_iter().map(|u| u.into()).collect()),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all profiles
    async fn profiles(&self, ctx: &Context<'_>) -> FieldResult<Vec<Profile>> {
        let context = ctx.data::<GraphQLContext>()?;

        match context.storage.get_profiles().await {
            Ok(profiles) => Ok(profiles.into_iter().map(|p| p.into()).collect()),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a profile by ID
    async fn profile(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<Profile>> {
        let context = ctx.data::<GraphQLContext>()?;
        let profile_id = match Uuid::parse_str(&id) {
            Ok(parsed) => parsed,
            Err(_) => return Ok(None),
        };

        match context.storage.get_profile_by_id(profile_id).await {
            Ok(profile) => Ok(profile.map(|p| p.into())),
            Err(e) => Err(e.into()),
        }
    }
}
