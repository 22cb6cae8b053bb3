//! Agora gateway binary
//!
//! Serves a single GraphQL endpoint in front of the forum and ticket REST
//! services.

use agora_config::{ConfigLoader, GatewayConfig};
use agora_server::Server;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agora", author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Listening port, overrides configuration and environment
    #[arg(short, long)]
    port: Option<u16>,

    /// Bind address, overrides configuration and environment
    #[arg(short, long)]
    bind: Option<String>,

    /// Log every backend URL before it is requested
    #[arg(long)]
    show_urls: bool,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,

    /// Print the merged GraphQL schema and exit
    #[arg(long)]
    print_schema: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::new().load(cli.config.as_ref())?;
    apply_cli_overrides(&mut config, &cli);
    config.validate_all()?;

    if cli.print_config {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    let always_on: &[&str] = if config.http.show_urls {
        &[agora_http::URL_LOG_TARGET]
    } else {
        &[]
    };
    agora_logging::init_logging(&config.logging, always_on)?;

    let server = Server::new(config)?;

    if cli.print_schema {
        println!("{}", server.sdl());
        return Ok(());
    }

    server.start().await
}

/// Apply command line overrides on top of file and environment settings
fn apply_cli_overrides(config: &mut GatewayConfig, cli: &Cli) {
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if let Some(bind) = &cli.bind {
        config.server.bind_address = bind.clone();
    }

    if cli.show_urls {
        config.http.show_urls = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["agora", "--port", "8088", "--bind", "127.0.0.1", "--show-urls"]);
        let mut config = GatewayConfig::default();
        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.server.listen_address(), "127.0.0.1:8088");
        assert!(config.http.show_urls);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let cli = Cli::parse_from(["agora"]);
        let mut config = GatewayConfig::default();
        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.server.port, 5000);
        assert!(!config.http.show_urls);
    }
}
