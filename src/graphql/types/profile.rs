use crate::domain::{MemberTierId, Profile as DomainProfile};
use async_graphql::{Object, ID};

/// GraphQL representation of a Profile
#[derive(Clone)]
pub struct Profile {
    pub inner: DomainProfile,
}

impl From<DomainProfile> for Profile {
    fn from(profile: DomainProfile) -> Self {
        Self { inner: profile }
    }
}

#[Object]
impl Profile {
    /// The unique identifier for the profile
    async fn id(&self) -> ID {
        ID(self.inner.id.unwrap_or_default().to_string())
    }

    async fn is_male(&self) -> bool {
        self.inner.is_male
    }

    async fn year_of_birth(&self) -> i32 {
        self.inner.year_of_birth
    }

    /// Identifier of the owning user
    async fn user_id(&self) -> ID {
        ID(self.inner.user_id.to_string())
    }

    /// Identifier of the referenced membership tier
    async fn member_type_id(&self) -> MemberTierId {
        self.inner.member_type_id
    }

    /// The referenced membership tier, when eagerly attached; null otherwise
    async fn member_type(&self) -> Option<super::member_type::MemberType> {
        self.inner.member_type.clone().map(Into::into)
    }
}
