//! Logging initialisation for the Agora gateway
//!
//! Installs a global `tracing` subscriber built from [`LoggingConfig`].
//! `RUST_LOG`, when set, takes precedence over the configured level.

pub mod init;

pub use agora_config::{LogFormat, LogLevel, LoggingConfig};
pub use init::{build_env_filter, default_directives, init_logging, init_simple_tracing};
