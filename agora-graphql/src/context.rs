//! Per-request data handed to resolvers

/// Request-scoped context attached to every GraphQL execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayContext {
    /// Bearer token taken from the inbound `Authorization` header
    pub token: Option<String>,
    /// Correlation ID passed on to every backend call of the request
    pub request_id: Option<String>,
}

impl GatewayContext {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}
