//! Domain-driven configuration management for the Agora gateway
//!
//! Configuration is split by functional domain (server, outbound HTTP,
//! backend services, GraphQL and logging), each with defaults, validation
//! and environment variable overrides.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    backends::{BackendFamily, BackendsConfig, ForumServiceConfig, ServiceConfig},
    graphql::GraphQLConfig,
    http::HttpConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    server::{CorsConfig, ServerConfig},
    GatewayConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;
