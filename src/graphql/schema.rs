use crate::graphql::resolvers::Query;
use crate::storage::Storage;
use async_graphql::{EmptyMutation, EmptySubscription, Schema};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// GraphQL context containing shared application state
pub struct GraphQLContext {
    pub storage: Arc<dyn Storage>,
}

/// Per-request context threaded opaquely into resolver execution.
///
/// Resolvers do not consume it today; it carries request-scoped data for
/// cross-cutting concerns (tracing, auth) without changing resolver
/// signatures.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub received_at: DateTime<Utc>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            received_at: Utc::now(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The complete GraphQL schema
pub type GraphQLSchema = Schema<Query, EmptyMutation, EmptySubscription>;

/// Create a new GraphQL schema with the given storage
pub fn create_schema(storage: Arc<dyn Storage>) -> GraphQLSchema {
    Schema::build(Query, EmptyMutation, EmptySubscription)
        .data(GraphQLContext { storage })
        .finish()
}
