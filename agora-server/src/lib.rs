//! Agora gateway server
//!
//! Wires configuration, the backend HTTP client, the schema registry and the
//! web middleware into one axum application.

pub mod handlers;
pub mod startup;

// Re-export main components
pub use startup::Server;
