//! HTTP types and enums

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// HTTP methods used against backend services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Get the string representation of the HTTP method
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A single call against a backend service
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub url: String,
    pub method: HttpMethod,
    pub body: Option<JsonValue>,
    /// Return the `{statusCode, headers, body}` envelope instead of the body
    pub full_response: bool,
    /// Sent as `Authorization: Bearer <token>` when present
    pub bearer_token: Option<String>,
    /// Correlation ID of the inbound request, sent as `X-Request-ID`
    pub request_id: Option<String>,
}

impl BackendRequest {
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            body: None,
            full_response: false,
            bearer_token: None,
            request_id: None,
        }
    }

    pub fn body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    pub fn full_response(mut self, full_response: bool) -> Self {
        self.full_response = full_response;
        self
    }

    pub fn bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    pub fn request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }
}
