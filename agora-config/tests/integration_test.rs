//! Integration tests for agora-config

use agora_config::*;
use std::io::Write;
use std::time::Duration;
use temp_env::with_vars;

#[test]
fn test_default_config_validation() {
    let config = GatewayConfig::default();
    assert!(config.validate_all().is_ok());
}

#[test]
fn test_config_loader_from_env() {
    let vars = vec![
        ("AGORA_HTTP_TIMEOUT", Some("60")),
        ("AGORA_SERVER_PORT", Some("8080")),
        ("AGORA_LOG_LEVEL", Some("debug")),
        ("AGORA_FORUM_HOST", Some("forum.internal")),
        ("AGORA_TICKET_PORT", Some("9100")),
        ("PORT", None),
        ("SHOW_URLS", None),
    ];

    with_vars(vars, || {
        let loader = ConfigLoader::new();
        let config = loader.from_env().unwrap();

        assert_eq!(config.http.timeout, Duration::from_secs(60));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(
            config.backends.base_url(BackendFamily::Threads),
            "http://forum.internal:4000/api/v1/threads"
        );
        assert_eq!(
            config.backends.base_url(BackendFamily::Tickets),
            "http://localhost:9100/api/v1/tickets"
        );
    });
}

#[test]
fn test_legacy_port_and_show_urls() {
    let vars = vec![
        ("PORT", Some("7000")),
        ("SHOW_URLS", Some("1")),
        ("AGORA_SERVER_PORT", None),
        ("AGORA_HTTP_SHOW_URLS", None),
    ];

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();
        assert_eq!(config.server.port, 7000);
        assert!(config.http.show_urls);
    });
}

#[test]
fn test_prefixed_vars_win_over_legacy() {
    let vars = vec![
        ("PORT", Some("7000")),
        ("AGORA_SERVER_PORT", Some("7100")),
        ("SHOW_URLS", Some("yes")),
        ("AGORA_HTTP_SHOW_URLS", Some("false")),
    ];

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();
        assert_eq!(config.server.port, 7100);
        assert!(!config.http.show_urls);
    });
}

#[test]
fn test_invalid_env_value_is_reported() {
    with_vars(vec![("AGORA_SERVER_PORT", Some("not-a-port"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
        assert!(err.to_string().contains("SERVER_PORT"));
    });
}

#[test]
fn test_custom_prefix() {
    with_vars(vec![("GATEWAY_SERVER_PORT", Some("6100")), ("PORT", None)], || {
        let config = ConfigLoader::with_prefix("GATEWAY").from_env().unwrap();
        assert_eq!(config.server.port, 6100);
    });
}

#[test]
fn test_yaml_config_serialization() {
    let yaml = GatewayConfig::generate_sample();

    let parsed: GatewayConfig = serde_yaml::from_str(&yaml).unwrap();
    assert!(parsed.validate_all().is_ok());
    assert_eq!(parsed.server.port, 5000);
}

#[test]
fn test_comprehensive_config_from_file() {
    let yaml = r#"
server:
  bind_address: "127.0.0.1"
  port: 5500
  cors:
    allowed_origins: ["https://forum.example.com"]

http:
  timeout: 10
  show_urls: true

backends:
  forum:
    host: forum.example.com
    port: 4000
    entry_point: api/v1
    threads_path: threads
    entries_path: entrys
  ticket:
    scheme: https
    host: tickets.example.com
    port: 443
    entry_point: api/v1/tickets

graphql:
  endpoint: /graphql
  enable_graphiql: false
  max_query_depth: 8

logging:
  level: warn
  format: json
"#;

    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    with_vars(
        vec![
            ("PORT", None::<&str>),
            ("SHOW_URLS", None),
            ("AGORA_SERVER_PORT", None),
            ("AGORA_HTTP_SHOW_URLS", None),
        ],
        || {
            let config = ConfigLoader::new().from_file(file.path()).unwrap();

            assert_eq!(config.server.listen_address(), "127.0.0.1:5500");
            assert_eq!(config.http.timeout, Duration::from_secs(10));
            assert!(config.http.show_urls);
            assert_eq!(
                config.backends.base_url(BackendFamily::Entries),
                "http://forum.example.com:4000/api/v1/entrys"
            );
            assert_eq!(
                config.backends.base_url(BackendFamily::Tickets),
                "https://tickets.example.com:443/api/v1/tickets"
            );
            assert!(!config.graphql.enable_graphiql);
            assert_eq!(config.graphql.max_query_depth, Some(8));
            assert_eq!(config.logging.format, LogFormat::Json);
        },
    );
}

#[test]
fn test_json_config_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(br#"{ "server": { "port": 5600 } }"#).unwrap();

    with_vars(vec![("PORT", None::<&str>), ("AGORA_SERVER_PORT", None)], || {
        let config = ConfigLoader::new().load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 5600);
    });
}

#[test]
fn test_invalid_file_config_rejected() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(b"graphql:\n  endpoint: graphql\n").unwrap();

    let result = ConfigLoader::new().from_file(file.path());
    assert!(matches!(result, Err(ConfigError::DomainError { .. })));
}

#[test]
fn test_endpoint_on_a_fixed_route_is_rejected() {
    let mut config = GatewayConfig::default();
    config.graphql.endpoint = "/health".to_string();

    let err = config.validate_all().unwrap_err();
    assert!(matches!(err, ConfigError::DomainError { ref domain, .. } if domain == "graphql"));
}
