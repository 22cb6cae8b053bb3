//! Non-GraphQL HTTP handlers

use axum::Json;
use serde_json::{json, Value as JsonValue};

/// Liveness check
pub async fn health_handler() -> Json<JsonValue> {
    Json(json!({
        "status": "ok",
        "service": "agora",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Root handler listing the available endpoints
pub async fn root_handler(graphql_endpoint: String, graphiql: bool) -> Json<JsonValue> {
    Json(json!({
        "service": "Agora GraphQL gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "graphql": graphql_endpoint,
            "graphiql": graphiql.then_some("/graphiql"),
            "schema": "/schema.graphql",
            "health": "/health"
        }
    }))
}
