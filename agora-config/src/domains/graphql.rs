//! GraphQL endpoint configuration

use crate::error::ConfigResult;
use crate::validation::{validate_not_reserved, validate_positive, validate_route_path, Validatable};
use serde::{Deserialize, Serialize};

/// Routes the gateway serves besides the GraphQL endpoint
pub const RESERVED_PATHS: &[&str] = &["/", "/health", "/graphiql", "/schema.graphql"];

/// GraphQL endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphQLConfig {
    /// Path of the GraphQL endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Serve the GraphiQL IDE at `/graphiql`
    #[serde(default = "crate::domains::utils::default_true")]
    pub enable_graphiql: bool,

    /// Allow introspection queries
    #[serde(default = "crate::domains::utils::default_true")]
    pub enable_introspection: bool,

    /// Maximum query depth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_query_depth: Option<usize>,

    /// Maximum query complexity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_query_complexity: Option<usize>,
}

impl Default for GraphQLConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            enable_graphiql: true,
            enable_introspection: true,
            max_query_depth: Some(15),
            max_query_complexity: Some(1000),
        }
    }
}

impl Validatable for GraphQLConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_route_path(&self.endpoint, "endpoint", self.domain_name())?;
        validate_not_reserved(&self.endpoint, RESERVED_PATHS, "endpoint", self.domain_name())?;

        if let Some(depth) = self.max_query_depth {
            validate_positive(depth, "max_query_depth", self.domain_name())?;
        }

        if let Some(complexity) = self.max_query_complexity {
            validate_positive(complexity, "max_query_complexity", self.domain_name())?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "graphql"
    }
}

fn default_endpoint() -> String {
    "/graphql".to_string()
}
