//! GraphQL schema state and HTTP handlers

use crate::context::GatewayContext;
use crate::errors::{GatewayResponse, SchemaBuildError};
use crate::registry::SchemaRegistry;
use agora_config::GraphQLConfig;
use agora_web::{BearerToken, RequestId};
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::GraphQLRequest;
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

/// The executable gateway schema
pub type GatewaySchema = async_graphql::dynamic::Schema;

/// Shared state of the GraphQL routes
#[derive(Clone)]
pub struct GraphQLState {
    pub schema: GatewaySchema,
    /// Merged SDL document served at `/schema.graphql`
    pub sdl: Arc<str>,
    /// Path the GraphiQL IDE posts queries to
    pub endpoint: Arc<str>,
}

impl GraphQLState {
    /// Build the schema from a populated registry
    pub fn from_registry(
        registry: &SchemaRegistry,
        config: &GraphQLConfig,
    ) -> Result<Self, SchemaBuildError> {
        Ok(Self {
            schema: registry.build(config)?,
            sdl: registry.sdl().into(),
            endpoint: config.endpoint.as_str().into(),
        })
    }

    /// Execute one request with the given per-request context
    pub async fn execute(
        &self,
        request: async_graphql::Request,
        context: GatewayContext,
    ) -> GatewayResponse {
        let response = self.schema.execute(request.data(context)).await;
        if response.is_err() {
            tracing::debug!("GraphQL request finished with {} errors", response.errors.len());
        }
        GatewayResponse::from(response)
    }
}

/// GraphQL handler for Axum, accepting both GET and POST
pub async fn graphql_handler(
    State(state): State<GraphQLState>,
    BearerToken(token): BearerToken,
    request_id: Option<RequestId>,
    request: GraphQLRequest,
) -> Json<GatewayResponse> {
    let request = request.into_inner();
    tracing::debug!(
        operation = request.operation_name.as_deref().unwrap_or("<anonymous>"),
        "Executing GraphQL request"
    );

    let context =
        GatewayContext::new(token).with_request_id(request_id.map(RequestId::into_inner));
    Json(state.execute(request, context).await)
}

/// GraphiQL IDE pointed at the GraphQL endpoint
pub async fn graphiql(State(state): State<GraphQLState>) -> Html<String> {
    Html(GraphiQLSource::build().endpoint(&state.endpoint).finish())
}

/// The merged SDL document as plain text
pub async fn schema_sdl(State(state): State<GraphQLState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.sdl.to_string(),
    )
}

/// Routes for the GraphQL endpoint, the IDE and the SDL document
pub fn graphql_router(state: GraphQLState, config: &GraphQLConfig) -> Router {
    let mut router = Router::new()
        .route(
            &config.endpoint,
            get(graphql_handler).post(graphql_handler),
        )
        .route("/schema.graphql", get(schema_sdl));

    if config.enable_graphiql {
        router = router.route("/graphiql", get(graphiql));
    }

    router.with_state(state)
}
