//! Listening endpoint configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Whether to attach an `X-Request-ID` to every request
    #[serde(default = "crate::domains::utils::default_true")]
    pub enable_request_id: bool,

    /// Whether to log every inbound HTTP request
    #[serde(default = "crate::domains::utils::default_true")]
    pub enable_tracing: bool,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins, `*` allows any origin
    #[serde(default = "default_cors_origins")]
    pub allowed_origins: Vec<String>,

    /// Allowed methods
    #[serde(default = "default_cors_methods")]
    pub allowed_methods: Vec<String>,

    /// Allowed headers
    #[serde(default = "default_cors_headers")]
    pub allowed_headers: Vec<String>,

    /// Whether to allow credentials
    #[serde(default = "crate::domains::utils::default_false")]
    pub allow_credentials: bool,

    /// Max age for preflight requests
    #[serde(with = "crate::domains::utils::serde_duration", default = "default_cors_max_age")]
    pub max_age: Duration,
}

impl ServerConfig {
    /// Socket address string the listener binds to
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            cors: CorsConfig::default(),
            enable_request_id: true,
            enable_tracing: true,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_cors_origins(),
            allowed_methods: default_cors_methods(),
            allowed_headers: default_cors_headers(),
            allow_credentials: false,
            max_age: default_cors_max_age(),
        }
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.bind_address, "bind_address", self.domain_name())?;
        validate_positive(self.port, "port", self.domain_name())?;
        self.cors.validate()?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server"
    }
}

impl Validatable for CorsConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.allowed_origins.is_empty() {
            return Err(self.validation_error("allowed_origins cannot be empty"));
        }

        if self.allowed_origins.iter().any(|o| o == "*") && self.allow_credentials {
            return Err(self.validation_error(
                "Cannot use wildcard origin '*' with allow_credentials: true",
            ));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server.cors"
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_cors_methods() -> Vec<String> {
    ["GET", "HEAD", "PUT", "POST", "DELETE", "PATCH"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

fn default_cors_headers() -> Vec<String> {
    ["content-type", "authorization", "accept", "x-request-id"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

fn default_cors_max_age() -> Duration {
    Duration::from_secs(3600)
}
