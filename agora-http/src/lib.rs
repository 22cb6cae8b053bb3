//! HTTP client functionality for Agora
//!
//! Resolvers reach backend REST services exclusively through this crate:
//! [`general_request`] issues one call and [`get_request`] attaches filter
//! parameters built by [`add_params`]. Failures are returned as
//! [`HttpError`] values, never folded into a successful payload.

pub mod client;
pub mod config;
pub mod errors;
pub mod query;
pub mod types;

// Re-export main types for convenience
pub use client::{HttpClient, HttpManager, URL_LOG_TARGET};
pub use config::HttpClientConfig;
pub use errors::HttpError;
pub use query::{add_params, is_truthy, param_text};
pub use types::{BackendRequest, HttpMethod};

use serde_json::Value as JsonValue;

/// Issue a single request against a backend service
///
/// Returns the parsed JSON body, or the `{statusCode, headers, body}` envelope
/// when `full_response` is set.
pub async fn general_request(
    client: &dyn HttpClient,
    url: &str,
    method: HttpMethod,
    body: Option<JsonValue>,
    full_response: bool,
) -> Result<JsonValue, HttpError> {
    let mut request = BackendRequest::new(url, method).full_response(full_response);
    if let Some(body) = body {
        request = request.body(body);
    }
    client.call(request).await
}

/// Issue a GET against `url/path` with the given query parameters
pub async fn get_request<'a, I, K>(
    client: &dyn HttpClient,
    url: &str,
    path: &str,
    params: I,
) -> Result<JsonValue, HttpError>
where
    I: IntoIterator<Item = (K, &'a JsonValue)>,
    K: AsRef<str>,
{
    let query_url = add_params(&join_path(url, path), params);
    general_request(client, &query_url, HttpMethod::Get, None, false).await
}

/// Join a relative path onto a base URL, leaving the base untouched for an empty path
pub fn join_path(base: &str, path: &str) -> String {
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}
