//! Configuration loading and environment variable handling

use crate::domains::GatewayConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "AGORA".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML or JSON file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<GatewayConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let mut config: GatewayConfig = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<GatewayConfig> {
        let mut config = GatewayConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<GatewayConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut GatewayConfig) -> ConfigResult<()> {
        self.apply_legacy_overrides(config)?;
        self.apply_server_overrides(&mut config.server)?;
        self.apply_http_overrides(&mut config.http)?;
        self.apply_backend_overrides(&mut config.backends)?;
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    /// Unprefixed `PORT` and `SHOW_URLS`, kept for existing deployments
    fn apply_legacy_overrides(&self, config: &mut GatewayConfig) -> ConfigResult<()> {
        if let Ok(port) = std::env::var("PORT") {
            config.server.port = parse_var("PORT", &port)?;
        }

        // Any non-empty value turns URL logging on
        if let Ok(show_urls) = std::env::var("SHOW_URLS") {
            config.http.show_urls = !show_urls.is_empty();
        }

        Ok(())
    }

    /// Apply server config overrides
    fn apply_server_overrides(
        &self,
        config: &mut crate::domains::server::ServerConfig,
    ) -> ConfigResult<()> {
        if let Ok(bind) = self.get_env_var("SERVER_BIND_ADDRESS") {
            config.bind_address = bind;
        }

        if let Ok(port) = self.get_env_var("SERVER_PORT") {
            config.port = parse_var("SERVER_PORT", &port)?;
        }

        Ok(())
    }

    /// Apply HTTP config overrides
    fn apply_http_overrides(
        &self,
        config: &mut crate::domains::http::HttpConfig,
    ) -> ConfigResult<()> {
        if let Ok(timeout) = self.get_env_var("HTTP_TIMEOUT") {
            let seconds: u64 = parse_var("HTTP_TIMEOUT", &timeout)?;
            config.timeout = std::time::Duration::from_secs(seconds);
        }

        if let Ok(user_agent) = self.get_env_var("HTTP_USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Ok(verify_ssl) = self.get_env_var("HTTP_VERIFY_SSL") {
            config.verify_ssl = parse_var("HTTP_VERIFY_SSL", &verify_ssl)?;
        }

        if let Ok(show_urls) = self.get_env_var("HTTP_SHOW_URLS") {
            config.show_urls = parse_var("HTTP_SHOW_URLS", &show_urls)?;
        }

        if let Ok(forward) = self.get_env_var("HTTP_FORWARD_TOKEN") {
            config.forward_token = parse_var("HTTP_FORWARD_TOKEN", &forward)?;
        }

        Ok(())
    }

    /// Apply backend service overrides
    fn apply_backend_overrides(
        &self,
        config: &mut crate::domains::backends::BackendsConfig,
    ) -> ConfigResult<()> {
        if let Ok(host) = self.get_env_var("FORUM_HOST") {
            config.forum.host = host;
        }

        if let Ok(port) = self.get_env_var("FORUM_PORT") {
            config.forum.port = parse_var("FORUM_PORT", &port)?;
        }

        if let Ok(entry_point) = self.get_env_var("FORUM_ENTRY_POINT") {
            config.forum.entry_point = entry_point;
        }

        if let Ok(host) = self.get_env_var("TICKET_HOST") {
            config.ticket.host = host;
        }

        if let Ok(port) = self.get_env_var("TICKET_PORT") {
            config.ticket.port = parse_var("TICKET_PORT", &port)?;
        }

        if let Ok(entry_point) = self.get_env_var("TICKET_ENTRY_POINT") {
            config.ticket.entry_point = entry_point;
        }

        Ok(())
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_var<T>(name: &str, value: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| ConfigError::EnvError(format!("Invalid {}: {}", name, e)))
}
