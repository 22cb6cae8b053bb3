//! Domain-specific configuration modules

pub mod backends;
pub mod graphql;
pub mod http;
pub mod logging;
pub mod server;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main gateway configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listening endpoint configuration
    #[serde(default)]
    pub server: server::ServerConfig,

    /// Outbound HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Backend REST services fronted by the gateway
    #[serde(default)]
    pub backends: backends::BackendsConfig,

    /// GraphQL endpoint configuration
    #[serde(default)]
    pub graphql: graphql::GraphQLConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl GatewayConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.http.validate()?;
        self.backends.validate()?;
        self.graphql.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = GatewayConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
