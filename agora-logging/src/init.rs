use agora_config::{LogFormat, LoggingConfig};
use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Noisy dependencies kept at `warn` unless `RUST_LOG` says otherwise
const QUIET_TARGETS: &[&str] = &["hyper", "h2", "reqwest", "rustls"];

/// Filter directives derived from the configured level
pub fn default_directives(config: &LoggingConfig) -> String {
    let mut directives = vec![config.level.as_str().to_string()];
    directives.extend(QUIET_TARGETS.iter().map(|target| format!("{}=warn", target)));
    directives.join(",")
}

/// Build the env filter, preferring `RUST_LOG` when it is set and valid
///
/// Targets in `always_on` log at `info` whatever the level or `RUST_LOG`
/// says.
pub fn build_env_filter(config: &LoggingConfig, always_on: &[&str]) -> EnvFilter {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(config)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    always_on
        .iter()
        .filter_map(|target| format!("{}=info", target).parse::<Directive>().ok())
        .fold(filter, EnvFilter::add_directive)
}

/// Initialize logging from configuration
pub fn init_logging(config: &LoggingConfig, always_on: &[&str]) -> Result<()> {
    let env_filter = build_env_filter(config, always_on);

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
    };

    // Use try_init to avoid panic if global subscriber already set
    if tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

/// Initialize plain console tracing at the given level
pub fn init_simple_tracing(log_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(log_level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_config::LogLevel;

    #[test]
    fn test_default_directives() {
        let config = LoggingConfig {
            level: LogLevel::Debug,
            ..Default::default()
        };
        let directives = default_directives(&config);

        assert!(directives.starts_with("debug,"));
        assert!(directives.contains("hyper=warn"));
        assert!(directives.contains("reqwest=warn"));
    }

    #[test]
    fn test_rust_log_takes_precedence() {
        temp_env::with_var("RUST_LOG", Some("trace"), || {
            let filter = build_env_filter(&LoggingConfig::default(), &[]);
            let directives = filter.to_string();
            assert!(directives.contains("trace"));
            assert!(!directives.contains("hyper=warn"));
        });
    }

    #[test]
    fn test_always_on_targets_survive_quiet_levels() {
        let config = LoggingConfig {
            level: LogLevel::Warn,
            ..Default::default()
        };

        temp_env::with_var_unset("RUST_LOG", || {
            let directives = build_env_filter(&config, &["agora_http::urls"]).to_string();
            assert!(directives.contains("agora_http::urls=info"), "{directives}");
        });

        temp_env::with_var("RUST_LOG", Some("error"), || {
            let directives = build_env_filter(&config, &["agora_http::urls"]).to_string();
            assert!(directives.contains("agora_http::urls=info"), "{directives}");
        });
    }

    #[test]
    fn test_repeated_init_is_harmless() {
        let config = LoggingConfig {
            format: LogFormat::Json,
            ..Default::default()
        };
        assert!(init_logging(&config, &[]).is_ok());
        assert!(init_logging(&LoggingConfig::default(), &["agora_http::urls"]).is_ok());
        assert!(init_simple_tracing("warn").is_ok());
    }
}
