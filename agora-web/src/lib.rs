//! # Agora Web Utilities
//!
//! Reusable web middleware and extractors for the gateway's HTTP surface.
//!
//! ## Features
//!
//! - **Middleware**: CORS built from configuration, request IDs forwarded to
//!   backend calls
//! - **Extractors**: bearer token lifted from the `Authorization` header
//!
//! ## Example
//!
//! ```rust,no_run
//! use axum::{middleware::from_fn, routing::get, Router};
//! use agora_config::CorsConfig;
//! use agora_web::{cors_layer_with_config, request_id_middleware, BearerToken};
//!
//! async fn whoami(BearerToken(token): BearerToken) -> String {
//!     token.unwrap_or_default()
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let app: Router = Router::new()
//!     .route("/whoami", get(whoami))
//!     .layer(from_fn(request_id_middleware))
//!     .layer(cors_layer_with_config(&CorsConfig::default()));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await.unwrap();
//! axum::serve(listener, app).await.unwrap();
//! # }
//! ```

pub mod extractors;
pub mod middleware;

pub use extractors::BearerToken;
pub use middleware::{
    cors_layer, cors_layer_with_config, request_id_middleware, RequestId, REQUEST_ID_HEADER,
};
