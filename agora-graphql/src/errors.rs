//! Schema construction errors, resolver errors and response error shaping

use crate::endpoint::RootKind;
use agora_http::HttpError;
use async_graphql::{PathSegment, ServerError, Value};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while registering resources or building the schema
#[derive(Error, Debug)]
pub enum SchemaBuildError {
    #[error("Invalid schema fragment in resource '{resource}': {message}")]
    InvalidFragment { resource: String, message: String },

    #[error("Field '{root}.{field}' of resource '{resource}' is already registered by '{existing}'")]
    DuplicateField {
        root: RootKind,
        field: String,
        resource: String,
        existing: String,
    },

    #[error("Type '{name}' of resource '{resource}' is already defined by '{existing}'")]
    DuplicateType {
        name: String,
        resource: String,
        existing: String,
    },

    #[error("Field '{root}.{field}' of resource '{resource}' has no endpoint")]
    MissingEndpoint {
        root: RootKind,
        field: String,
        resource: String,
    },

    #[error("Endpoint '{root}.{field}' of resource '{resource}' matches no declared field")]
    UnknownEndpoint {
        root: RootKind,
        field: String,
        resource: String,
    },

    #[error("Type '{name}' uses unsupported {kind} definition")]
    Unsupported { name: String, kind: &'static str },

    #[error("No resources registered")]
    Empty,

    #[error("Merged schema does not parse: {0}")]
    Parse(String),

    #[error("Failed to build executable schema: {0}")]
    Schema(String),
}

/// Errors raised while resolving a root field
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Missing argument '{0}'")]
    MissingArgument(String),
}

impl ResolveError {
    /// Convert into a GraphQL field error
    ///
    /// Backend failures keep the [`HttpError`] as the error source so the
    /// response formatter can inspect the backend payload later.
    pub fn into_graphql_error(self) -> async_graphql::Error {
        match self {
            ResolveError::Http(e) => async_graphql::Error::new_with_source(e),
            other => async_graphql::Error::new(other.to_string()),
        }
    }
}

/// A response error as it goes over the wire
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FormattedError {
    /// A structured error reported by a backend service
    Backend {
        message: String,
        code: JsonValue,
        description: JsonValue,
        path: Vec<PathSegment>,
    },
    /// Any other error, in the standard GraphQL shape
    Default(ServerError),
}

/// Reshape an execution error for clients
///
/// When the error comes from a backend response whose body is an object
/// carrying an `id`, the client sees `{message: id, code, description, path}`.
/// Everything else passes through unchanged.
pub fn format_error(error: &ServerError) -> FormattedError {
    if let Some(HttpError::Status {
        body: JsonValue::Object(details),
        ..
    }) = error.source::<HttpError>()
    {
        if let Some(id) = details.get("id") {
            return FormattedError::Backend {
                message: match id {
                    JsonValue::String(s) => s.clone(),
                    other => other.to_string(),
                },
                code: details.get("code").cloned().unwrap_or(JsonValue::Null),
                description: details.get("description").cloned().unwrap_or(JsonValue::Null),
                path: error.path.clone(),
            };
        }
    }

    FormattedError::Default(error.clone())
}

/// GraphQL response body with formatted errors
#[derive(Debug, Serialize)]
pub struct GatewayResponse {
    pub data: Value,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FormattedError>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, Value>,
}

impl From<async_graphql::Response> for GatewayResponse {
    fn from(response: async_graphql::Response) -> Self {
        Self {
            errors: response.errors.iter().map(format_error).collect(),
            data: response.data,
            extensions: response.extensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::Pos;
    use serde_json::json;

    fn backend_error(status: u16, body: JsonValue) -> ServerError {
        let mut error = ResolveError::Http(HttpError::Status { status, body })
            .into_graphql_error()
            .into_server_error(Pos::default());
        error.path = vec![PathSegment::Field("createThread".to_string())];
        error
    }

    #[test]
    fn test_backend_error_is_reshaped() {
        let error = backend_error(409, json!({ "id": "E1", "code": 409, "description": "conflict" }));

        let formatted = serde_json::to_value(format_error(&error)).unwrap();
        assert_eq!(
            formatted,
            json!({
                "message": "E1",
                "code": 409,
                "description": "conflict",
                "path": ["createThread"]
            })
        );
    }

    #[test]
    fn test_missing_code_and_description_are_null() {
        let error = backend_error(400, json!({ "id": "BAD" }));

        match format_error(&error) {
            FormattedError::Backend { message, code, description, .. } => {
                assert_eq!(message, "BAD");
                assert_eq!(code, JsonValue::Null);
                assert_eq!(description, JsonValue::Null);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_body_without_id_keeps_default_shape() {
        let error = backend_error(500, json!({ "message": "boom" }));
        assert!(matches!(format_error(&error), FormattedError::Default(_)));

        let text_body = backend_error(502, json!("Bad Gateway"));
        assert!(matches!(format_error(&text_body), FormattedError::Default(_)));
    }

    #[test]
    fn test_non_backend_error_keeps_default_shape() {
        let error = ServerError::new("Unknown field \"nope\"", Some(Pos { line: 1, column: 3 }));

        let formatted = serde_json::to_value(format_error(&error)).unwrap();
        assert_eq!(formatted["message"], "Unknown field \"nope\"");
        assert_eq!(formatted["locations"], json!([{ "line": 1, "column": 3 }]));
    }

    #[test]
    fn test_resolve_errors_become_messages() {
        let error = ResolveError::MissingArgument("id".to_string()).into_graphql_error();
        assert_eq!(error.message, "Missing argument 'id'");
    }
}
