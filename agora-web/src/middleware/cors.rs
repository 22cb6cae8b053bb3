use agora_config::CorsConfig;
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

/// Create CORS layer with the default configuration
pub fn cors_layer() -> CorsLayer {
    cors_layer_with_config(&CorsConfig::default())
}

/// Create CORS layer from configuration
///
/// Entries that do not parse as origins, methods or header names are
/// skipped with a warning rather than failing startup.
pub fn cors_layer_with_config(config: &CorsConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        cors = cors.allow_origin(Any);
        tracing::debug!("CORS configured to allow any origin");
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|method| method.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|header| header.parse().ok())
        .collect();
    cors = cors.allow_headers(headers);

    if config.allow_credentials {
        cors = cors.allow_credentials(true);
    }

    cors.max_age(config.max_age)
}
