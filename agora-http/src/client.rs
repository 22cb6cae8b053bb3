//! HTTP client implementation

use crate::config::HttpClientConfig;
use crate::errors::HttpError;
use crate::types::{BackendRequest, HttpMethod};
use reqwest::Client;
use serde_json::{json, Map, Value as JsonValue};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Target of the per-call URL lines enabled by `show_urls`
pub const URL_LOG_TARGET: &str = "agora_http::urls";

/// HTTP client trait for calling backend services
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    async fn call(&self, request: BackendRequest) -> Result<JsonValue, HttpError>;
}

/// Canned response served in offline mode
#[derive(Debug, Clone)]
struct MockResponse {
    status: u16,
    body: JsonValue,
}

/// HTTP Manager for backend requests with mock support
#[derive(Debug, Clone)]
pub struct HttpManager {
    client: Client,
    offline: bool,
    mocks: BTreeMap<String, MockResponse>,
    config: HttpClientConfig,
}

impl HttpManager {
    /// Create a new HttpManager in online mode with default configuration
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HttpManager with specific configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self, HttpError> {
        debug!(
            "Creating HttpManager with timeout: {}s",
            config.timeout.as_secs()
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .redirect(reqwest::redirect::Policy::limited(
                config.max_redirects as usize,
            ))
            .build()?;

        Ok(Self {
            client,
            offline: false,
            mocks: BTreeMap::new(),
            config,
        })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Set offline mode
    pub fn set_offline(&mut self) {
        self.offline = true;
        debug!("HttpManager set to offline mode");
    }

    /// Set online mode
    pub fn set_online(&mut self) {
        self.offline = false;
        debug!("HttpManager set to online mode");
    }

    /// Add a successful mock response, served in offline mode
    pub fn add_mock(&mut self, method: HttpMethod, url: &str, body: JsonValue) {
        self.add_mock_status(method, url, 200, body);
    }

    /// Add a mock response with an explicit status code
    pub fn add_mock_status(&mut self, method: HttpMethod, url: &str, status: u16, body: JsonValue) {
        let key = mock_key(method, url);
        self.mocks.insert(key, MockResponse { status, body });
        debug!("Added HTTP mock for {} {}", method, url);
    }

    /// Clear all mocks
    pub fn clear_mocks(&mut self) {
        self.mocks.clear();
        debug!("Cleared all HTTP mocks");
    }

    fn find_mock(&self, method: HttpMethod, url: &str) -> Option<&MockResponse> {
        if let Some(mock) = self.mocks.get(&mock_key(method, url)) {
            debug!("Found matching mock response for {} {}", method, url);
            return Some(mock);
        }

        // Partial URL matches, the longest mock URL wins
        let (_, mock) = self
            .mocks
            .iter()
            .filter_map(|(key, mock)| {
                let (mock_method, mock_url) = key.split_once(':')?;
                let matches = mock_method.eq_ignore_ascii_case(method.as_str())
                    && (url.contains(mock_url) || mock_url.contains(url));
                matches.then_some((mock_url.len(), mock))
            })
            .max_by_key(|(len, _)| *len)?;

        debug!("Found partial matching mock response for {} {}", method, url);
        Some(mock)
    }

    fn mock_response(&self, request: &BackendRequest) -> Result<JsonValue, HttpError> {
        let mock = self
            .find_mock(request.method, &request.url)
            .ok_or_else(|| HttpError::NoMock(mock_key(request.method, &request.url)))?;

        if !(200..300).contains(&mock.status) {
            return Err(HttpError::Status {
                status: mock.status,
                body: mock.body.clone(),
            });
        }

        if request.full_response {
            Ok(json!({
                "statusCode": mock.status,
                "headers": {},
                "body": mock.body,
            }))
        } else {
            Ok(mock.body.clone())
        }
    }
}

#[async_trait::async_trait]
impl HttpClient for HttpManager {
    async fn call(&self, request: BackendRequest) -> Result<JsonValue, HttpError> {
        if self.config.show_urls {
            info!(target: URL_LOG_TARGET, "{}", request.url);
        }
        debug!("{} {}", request.method, request.url);

        if self.offline {
            return self.mock_response(&request);
        }

        // Parsing percent-encodes the URL the same way encodeURI does
        let url = url::Url::parse(&request.url)
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", request.url, e)))?;

        let mut builder = self.client.request(request.method.into(), url);

        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }

        if let Some(request_id) = &request.request_id {
            builder = builder.header(REQUEST_ID_HEADER, request_id);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();

        let headers: Map<String, JsonValue> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), JsonValue::String(v.to_string())))
            })
            .collect();

        let bytes = response.bytes().await?;
        let body = parse_body(&bytes);

        if !status.is_success() {
            warn!("{} {} failed with status {}", request.method, request.url, status);
            return Err(HttpError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!("{} {} -> {}", request.method, request.url, status.as_u16());

        if request.full_response {
            Ok(json!({
                "statusCode": status.as_u16(),
                "headers": headers,
                "body": body,
            }))
        } else {
            Ok(body)
        }
    }
}

fn mock_key(method: HttpMethod, url: &str) -> String {
    format!("{}:{}", method.as_str(), url)
}

/// Parse a response body as JSON, falling back to text
fn parse_body(bytes: &[u8]) -> JsonValue {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return JsonValue::Null;
    }

    match serde_json::from_slice(bytes) {
        Ok(json) => json,
        Err(_) => {
            debug!("Response body is not JSON, returning it as text");
            JsonValue::String(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
