//! REST endpoints backing root fields

use crate::errors::ResolveError;
use crate::resolver::{FieldCall, FieldResolver};
use agora_http::{add_params, join_path, param_text, BackendRequest, HttpClient, HttpMethod};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// Root operation type a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RootKind {
    Query,
    Mutation,
}

impl RootKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            RootKind::Query => "Query",
            RootKind::Mutation => "Mutation",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "Query" => Some(RootKind::Query),
            "Mutation" => Some(RootKind::Mutation),
            _ => None,
        }
    }
}

impl fmt::Display for RootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Argument(String),
}

/// Relative path with `{argument}` placeholders
///
/// An unmatched `{` is kept as literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = raw;

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|i| open + i) else {
                break;
            };
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            segments.push(Segment::Argument(rest[open + 1..close].to_string()));
            rest = &rest[close + 1..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Argument names referenced by the template, in order
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Argument(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn references(&self, argument: &str) -> bool {
        self.placeholders().any(|name| name == argument)
    }

    /// Substitute placeholders with the call's argument values
    pub fn render(&self, call: &FieldCall) -> Result<String, ResolveError> {
        let mut path = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Argument(name) => {
                    let value = call
                        .argument(name)
                        .ok_or_else(|| ResolveError::MissingArgument(name.clone()))?;
                    path.push_str(&param_text(value));
                }
            }
        }
        Ok(path)
    }
}

impl From<&str> for PathTemplate {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// How one root field maps onto a backend REST call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub root: RootKind,
    pub field: String,
    pub method: HttpMethod,
    pub path: PathTemplate,
    /// Argument sent as the JSON request body
    pub body: Option<String>,
    /// Whether leftover arguments become query parameters
    pub list: bool,
}

impl Endpoint {
    pub fn query(field: impl Into<String>, path: &str) -> Self {
        Self {
            root: RootKind::Query,
            field: field.into(),
            method: HttpMethod::Get,
            path: PathTemplate::parse(path),
            body: None,
            list: false,
        }
    }

    pub fn mutation(field: impl Into<String>, method: HttpMethod, path: &str) -> Self {
        Self {
            root: RootKind::Mutation,
            field: field.into(),
            method,
            path: PathTemplate::parse(path),
            body: None,
            list: false,
        }
    }

    /// GET of the collection itself, filtered by query parameters
    pub fn list(field: impl Into<String>) -> Self {
        Self {
            list: true,
            ..Self::query(field, "")
        }
    }

    pub fn with_body(mut self, argument: impl Into<String>) -> Self {
        self.body = Some(argument.into());
        self
    }

    /// Build the outbound request for a call against `base_url`
    pub fn request(&self, base_url: &str, call: &FieldCall) -> Result<BackendRequest, ResolveError> {
        let path = self.path.render(call)?;
        let mut url = join_path(base_url, &path);

        if self.list {
            let params = call.arguments.iter().filter(|(name, _)| {
                !self.path.references(name) && self.body.as_deref() != Some(name.as_str())
            });
            url = add_params(&url, params);
        }

        let mut request = BackendRequest::new(url, self.method);

        if let Some(argument) = &self.body {
            let body = call
                .argument(argument)
                .cloned()
                .ok_or_else(|| ResolveError::MissingArgument(argument.clone()))?;
            request = request.body(body);
        }

        Ok(request)
    }
}

/// Resolver issuing one backend call per field invocation
pub struct RestResolver {
    endpoint: Endpoint,
    base_url: String,
    client: Arc<dyn HttpClient>,
    forward_token: bool,
}

impl RestResolver {
    pub fn new(endpoint: Endpoint, base_url: impl Into<String>, client: Arc<dyn HttpClient>) -> Self {
        Self {
            endpoint,
            base_url: base_url.into(),
            client,
            forward_token: false,
        }
    }

    /// Pass the caller's bearer token on to the backend
    pub fn forward_token(mut self, forward: bool) -> Self {
        self.forward_token = forward;
        self
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl FieldResolver for RestResolver {
    async fn resolve(&self, call: FieldCall) -> Result<JsonValue, ResolveError> {
        let mut request = self
            .endpoint
            .request(&self.base_url, &call)?
            .request_id(call.request_id);
        if self.forward_token {
            request = request.bearer_token(call.token);
        }

        tracing::debug!(
            field = %self.endpoint.field,
            "Resolving {}.{} via {} {}",
            self.endpoint.root,
            self.endpoint.field,
            request.method,
            request.url
        );

        Ok(self.client.call(request).await?)
    }
}
