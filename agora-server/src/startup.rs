//! Server startup and shutdown logic

use agora_config::{BackendFamily, GatewayConfig};
use agora_graphql::{graphql_router, register_defaults, GraphQLState, SchemaRegistry};
use agora_http::{HttpClient, HttpClientConfig, HttpManager};
use agora_web::{cors_layer_with_config, request_id_middleware};
use anyhow::{Context, Result};
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Server application struct
pub struct Server {
    config: GatewayConfig,
    state: GraphQLState,
}

impl Server {
    /// Create a server talking to backends over HTTP
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = HttpManager::with_config(HttpClientConfig::from(&config.http))
            .context("Failed to create backend HTTP client")?;
        Self::with_client(config, Arc::new(client))
    }

    /// Create a server with a specific backend client
    pub fn with_client(config: GatewayConfig, client: Arc<dyn HttpClient>) -> Result<Self> {
        let mut registry = SchemaRegistry::new(client).forward_token(config.http.forward_token);
        register_defaults(&mut registry, &config.backends)
            .context("Failed to register gateway resources")?;

        let state = GraphQLState::from_registry(&registry, &config.graphql)
            .context("Failed to build gateway schema")?;

        Ok(Self { config, state })
    }

    /// The merged SDL document
    pub fn sdl(&self) -> &str {
        &self.state.sdl
    }

    /// Build the complete application router
    pub fn build_app(&self) -> Router {
        let endpoint = self.config.graphql.endpoint.clone();
        let graphiql = self.config.graphql.enable_graphiql;

        let mut app = graphql_router(self.state.clone(), &self.config.graphql)
            .route("/health", get(crate::handlers::health_handler))
            .route(
                "/",
                get(move || crate::handlers::root_handler(endpoint.clone(), graphiql)),
            );

        if self.config.server.enable_tracing {
            app = app.layer(TraceLayer::new_for_http());
        }

        if self.config.server.enable_request_id {
            app = app.layer(middleware::from_fn(request_id_middleware));
        }

        app.layer(cors_layer_with_config(&self.config.server.cors))
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let app = self.build_app();
        let addr = self.config.server.listen_address();

        self.log_config_summary();

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        tracing::info!("Agora gateway listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Log configuration summary
    fn log_config_summary(&self) {
        tracing::info!("=== Agora Gateway Configuration ===");
        tracing::info!("Bind Address: {}", self.config.server.listen_address());
        tracing::info!("GraphQL endpoint: {}", self.config.graphql.endpoint);
        tracing::info!(
            "GraphiQL: {}",
            if self.config.graphql.enable_graphiql { "Enabled (/graphiql)" } else { "Disabled" }
        );
        for family in BackendFamily::all() {
            tracing::info!("Backend {}: {}", family, self.config.backends.base_url(*family));
        }
        tracing::info!("Backend timeout: {}s", self.config.http.timeout.as_secs());
        tracing::info!(
            "Token forwarding: {}",
            if self.config.http.forward_token { "Enabled" } else { "Disabled" }
        );
        tracing::info!(
            "URL logging: {}",
            if self.config.http.show_urls { "Enabled" } else { "Disabled" }
        );
        tracing::info!("===================================");
    }
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
