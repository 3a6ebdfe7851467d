use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use memberhub::seed::seed_demo_data;
use memberhub::server::create_server;
use memberhub::storage::{InMemoryStorage, Storage};
use serde_json::{json, Value};
use tower::ServiceExt;

fn graphql_request(body: Value) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))?)
}

async fn response_json(response: axum::response::Response) -> Result<Value> {
    let bytes = hyper::body::to_bytes(response.into_body()).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn post_root_returns_member_types_envelope() -> Result<()> {
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
    let app = create_server(storage);

    let request = graphql_request(json!({
        "query": "{ memberTypes { id discount } }"
    }))?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await?;
    assert!(body.get("errors").is_none(), "unexpected errors: {body}");

    let tiers = body["data"]["memberTypes"].as_array().unwrap();
    assert_eq!(tiers.len(), 2);
    for tier in tiers {
        assert!(tier["id"].is_string());
        assert!(tier["discount"].is_number());
    }
    Ok(())
}

#[tokio::test]
async fn syntactically_invalid_query_reports_errors_in_band() -> Result<()> {
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
    let app = create_server(storage);

    let request = graphql_request(json!({ "query": "{ memberTypes" }))?;
    let response = app.oneshot(request).await?;
    // GraphQL-level failures still ride an HTTP 200
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await?;
    assert!(!body["errors"].as_array().unwrap().is_empty());
    assert!(body.get("data").map_or(true, Value::is_null));
    Ok(())
}

#[tokio::test]
async fn variables_are_accepted_over_http() -> Result<()> {
    let storage = Arc::new(InMemoryStorage::new());
    seed_demo_data(storage.as_ref()).await?;
    let app = create_server(storage);

    let request = graphql_request(json!({
        "query": "query($tier: MemberTypeId!) { memberType(id: $tier) { id postsLimitPerMonth } }",
        "variables": { "tier": "BUSINESS" }
    }))?;
    let response = app.oneshot(request).await?;

    let body = response_json(response).await?;
    assert!(body.get("errors").is_none(), "unexpected errors: {body}");
    assert_eq!(body["data"]["memberType"]["id"], "BUSINESS");
    Ok(())
}

#[tokio::test]
async fn seeded_users_resolve_with_relations_over_http() -> Result<()> {
    let storage = Arc::new(InMemoryStorage::new());
    seed_demo_data(storage.as_ref()).await?;
    let app = create_server(storage);

    let request = graphql_request(json!({
        "query": "{ users { name balance posts { title } profile { memberType { id } } } }"
    }))?;
    let response = app.oneshot(request).await?;

    let body = response_json(response).await?;
    assert!(body.get("errors").is_none(), "unexpected errors: {body}");

    let users = body["data"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 3);
    for user in users {
        assert!(user["posts"].is_array());
        assert!(user["profile"].is_object() || user["profile"].is_null());
    }
    Ok(())
}

#[tokio::test]
async fn health_route_reports_service_status() -> Result<()> {
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
    let app = create_server(storage);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await?;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "memberhub");
    Ok(())
}
