//! Configuration validation traits and utilities

use crate::error::{ConfigError, ConfigResult};

/// Trait for validatable configuration
pub trait Validatable {
    /// Validate the configuration
    fn validate(&self) -> ConfigResult<()>;

    /// Get the domain name for error reporting
    fn domain_name(&self) -> &'static str;

    /// Helper to create a domain-specific validation error
    fn validation_error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::DomainError {
            domain: self.domain_name().to_string(),
            message: message.into(),
        }
    }
}

/// Validate a required string field
pub fn validate_required_string(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} cannot be empty", field_name),
        });
    }
    Ok(())
}

/// Validate a positive number
pub fn validate_positive<T>(value: T, field_name: &str, domain: &str) -> ConfigResult<()>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must be greater than 0, got {}", field_name, value),
        });
    }
    Ok(())
}

/// Validate a URL
pub fn validate_url(url: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    validate_required_string(url, field_name, domain)?;

    url::Url::parse(url).map_err(|e| ConfigError::DomainError {
        domain: domain.to_string(),
        message: format!("{} has invalid URL format: {}", field_name, e),
    })?;

    Ok(())
}

/// Validate that a string is one of the allowed choices
pub fn validate_enum_choice(value: &str, choices: &[&str], field_name: &str, domain: &str) -> ConfigResult<()> {
    if !choices.contains(&value) {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must be one of {:?}, got '{}'", field_name, choices, value),
        });
    }
    Ok(())
}

/// Validate a route path served by the gateway
pub fn validate_route_path(path: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if !path.starts_with('/') || path.len() < 2 {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must be an absolute path like '/graphql', got '{}'", field_name, path),
        });
    }
    Ok(())
}

/// Validate that a route path does not shadow one of the fixed routes
pub fn validate_not_reserved(path: &str, reserved: &[&str], field_name: &str, domain: &str) -> ConfigResult<()> {
    if reserved.contains(&path) {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} '{}' is already served by the gateway", field_name, path),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_string() {
        assert!(validate_required_string("localhost", "host", "test").is_ok());
        assert!(validate_required_string("", "host", "test").is_err());
        assert!(validate_required_string("   ", "host", "test").is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(1u16, "port", "test").is_ok());
        assert!(validate_positive(0u16, "port", "test").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://localhost:4000/api/v1", "url", "test").is_ok());
        assert!(validate_url("not a url", "url", "test").is_err());
    }

    #[test]
    fn test_validate_enum_choice() {
        assert!(validate_enum_choice("http", &["http", "https"], "scheme", "test").is_ok());
        assert!(validate_enum_choice("ftp", &["http", "https"], "scheme", "test").is_err());
    }

    #[test]
    fn test_validate_route_path() {
        assert!(validate_route_path("/graphql", "endpoint", "test").is_ok());
        assert!(validate_route_path("graphql", "endpoint", "test").is_err());
        assert!(validate_route_path("/", "endpoint", "test").is_err());
    }

    #[test]
    fn test_validate_not_reserved() {
        let reserved = ["/health", "/graphiql"];
        assert!(validate_not_reserved("/graphql", &reserved, "endpoint", "test").is_ok());
        assert!(validate_not_reserved("/health", &reserved, "endpoint", "test").is_err());
    }
}
