use crate::domain::{MemberTierId, MemberType as DomainMemberType};
use async_graphql::Object;

/// GraphQL representation of a membership tier
#[derive(Clone)]
pub struct MemberType {
    pub inner: DomainMemberType,
}

impl From<DomainMemberType> for MemberType {
    fn from(member_type: DomainMemberType) -> Self {
        Self { inner: member_type }
    }
}

#[Object]
impl MemberType {
    /// The tier identifier
    async fn id(&self) -> MemberTierId {
        self.inner.id
    }

    /// Discount rate granted by this tier
    async fn discount(&self) -> f64 {
        self.inner.discount
    }

    /// How many posts a member of this tier may publish per month
    async fn posts_limit_per_month(&self) -> i32 {
        self.inner.posts_limit_per_month
    }
}
