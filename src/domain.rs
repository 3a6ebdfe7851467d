use async_graphql::Enum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AppError;

/// Membership tier identifiers.
///
/// Defined once and consumed both by the GraphQL schema (as the
/// `MemberTypeId` enum) and by the storage filter path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum)]
#[graphql(name = "MemberTypeId")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberTierId {
    Basic,
    Business,
}

impl MemberTierId {
    pub const ALL: [MemberTierId; 2] = [MemberTierId::Basic, MemberTierId::Business];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberTierId::Basic => "BASIC",
            MemberTierId::Business => "BUSINESS",
        }
    }
}

impl fmt::Display for MemberTierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberTierId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "BASIC" => Ok(MemberTierId::Basic),
            "BUSINESS" => Ok(MemberTierId::Business),
            other => Err(AppError::UnknownMemberTier(other.to_string())),
        }
    }
}

/// Immutable reference data describing a membership tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberType {
    pub id: MemberTierId,
    pub discount: f64,
    pub posts_limit_per_month: i32,
}

/// A platform user.
///
/// Relation fields are `None` until a read attaches them via an include
/// specification; attached-but-empty collections stay `Some(vec![])` so the
/// API can distinguish "not loaded" from "loaded and empty".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Option<Uuid>,
    pub name: String,
    pub balance: f64,
    pub profile: Option<Profile>,
    pub posts: Option<Vec<Post>>,
    /// Authors this user subscribes to.
    pub subscribed_to: Option<Vec<User>>,
    /// Users subscribed to this user.
    pub subscribers: Option<Vec<User>>,
}

impl User {
    pub fn new(name: impl Into<String>, balance: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            balance,
            profile: None,
            posts: None,
            subscribed_to: None,
            subscribers: None,
        }
    }
}

/// A user's profile. Belongs to exactly one user and references one tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Option<Uuid>,
    pub is_male: bool,
    pub year_of_birth: i32,
    pub user_id: Uuid,
    pub member_type_id: MemberTierId,
    pub member_type: Option<MemberType>,
}

impl Profile {
    pub fn new(is_male: bool, year_of_birth: i32, user_id: Uuid, member_type_id: MemberTierId) -> Self {
        Self {
            id: None,
            is_male,
            year_of_birth,
            user_id,
            member_type_id,
            member_type: None,
        }
    }
}

/// A post authored by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
}

impl Post {
    pub fn new(title: impl Into<String>, content: impl Into<String>, author_id: Uuid) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            author_id,
        }
    }
}

/// Directed subscription edge: subscriber follows author. No symmetry is
/// implied between the two directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub subscriber_id: Uuid,
    pub author_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_ids_round_trip_through_strings() {
        for tier in MemberTierId::ALL {
            let parsed: MemberTierId = tier.as_str().parse().unwrap();
            assert_eq!(parsed, tier);
        }
    }

    #[test]
    fn unknown_tier_is_rejected() {
        assert!("GOLD".parse::<MemberTierId>().is_err());
    }
}
