use axum::{
    http::Method,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Extension, Router,
};
use hyper::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

use crate::graphql::{
    resolvers::Query,
    schema::{GraphQLContext, GraphQLSchema, RequestContext},
};
use crate::storage::Storage;
use async_graphql::{http::GraphiQLSource, EmptyMutation, EmptySubscription, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "memberhub",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GraphQL handler for `POST /`
async fn graphql_handler(
    Extension(schema): Extension<GraphQLSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let request_ctx = RequestContext::new();
    debug!(request_id = %request_ctx.request_id, "executing GraphQL request");

    let request = req.into_inner().data(request_ctx);
    schema.execute(request).await.into()
}

/// GraphiQL IDE endpoint
async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/").finish())
}

/// Create the HTTP server with all routes, including GraphQL
pub fn create_server(storage: Arc<dyn Storage>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    // Build GraphQL schema and attach storage in context
    let schema: GraphQLSchema = Schema::build(Query, EmptyMutation, EmptySubscription)
        .data(GraphQLContext { storage })
        .finish();

    Router::new()
        .route("/", post(graphql_handler))
        .route("/health", get(health))
        .route("/graphiql", get(graphiql))
        .layer(Extension(schema))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Start the HTTP server on the specified address
pub async fn start_server(storage: Arc<dyn Storage>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_server(storage);

    println!("🚀 HTTP server running on http://{addr}");
    println!("💚 Health check: http://{addr}/health");
    println!("🔎 GraphQL:      POST http://{addr}/");
    println!("🧪 GraphiQL UI:  http://{addr}/graphiql");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
