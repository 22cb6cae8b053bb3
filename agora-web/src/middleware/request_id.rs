//! Request correlation IDs
//!
//! Every inbound request is tagged with an ID that shows up on its log span,
//! is echoed on the response and is handed to resolvers so backend calls made
//! on behalf of the request carry the same `X-Request-ID`.

use axum::{
    extract::{OptionalFromRequestParts, Request},
    http::{request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use tracing::Instrument;
use uuid::Uuid;

/// Request ID header name
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Longest inbound ID that is trusted and passed on
const MAX_INBOUND_LEN: usize = 128;

/// Correlation ID of one inbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The caller's ID, when it is short and safe to forward as a header
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?.trim();

        let acceptable = !value.is_empty()
            && value.len() <= MAX_INBOUND_LEN
            && value.bytes().all(|b| b.is_ascii_graphic());

        acceptable.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Middleware tagging every request with a [`RequestId`]
///
/// A well-formed inbound `X-Request-ID` is kept, anything else is replaced by
/// a v4 UUID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id =
        RequestId::from_headers(request.headers()).unwrap_or_else(RequestId::generate);

    request.extensions_mut().insert(request_id.clone());

    let span = tracing::info_span!("request", request_id = %request_id);

    async move {
        let mut response = next.run(request).await;

        if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        response
    }
    .instrument(span)
    .await
}

/// `Option<RequestId>` is `None` when the middleware is not installed
impl<S> OptionalFromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<RequestId>().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn seen_id(request_id: Option<RequestId>) -> String {
        request_id.map(RequestId::into_inner).unwrap_or_default()
    }

    fn app() -> Router {
        Router::new()
            .route("/graphql", get(seen_id))
            .layer(middleware::from_fn(request_id_middleware))
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_generated_id_reaches_handler_and_response() {
        let request = Request::builder().uri("/graphql").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let echoed = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(Uuid::parse_str(&echoed).is_ok());
        assert_eq!(body_text(response).await, echoed);
    }

    #[tokio::test]
    async fn test_inbound_id_is_kept() {
        let request = Request::builder()
            .uri("/graphql")
            .header(REQUEST_ID_HEADER, "req-42")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "req-42");
        assert_eq!(body_text(response).await, "req-42");
    }

    #[tokio::test]
    async fn test_extractor_without_middleware_is_none() {
        let app = Router::new().route("/graphql", get(seen_id));
        let request = Request::builder().uri("/graphql").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert!(response.headers().get(REQUEST_ID_HEADER).is_none());
        assert_eq!(body_text(response).await, "");
    }

    #[test]
    fn test_unusable_inbound_ids_are_rejected() {
        let mut headers = HeaderMap::new();
        assert_eq!(RequestId::from_headers(&headers), None);

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("   "));
        assert_eq!(RequestId::from_headers(&headers), None);

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("two words"));
        assert_eq!(RequestId::from_headers(&headers), None);

        let long = "a".repeat(MAX_INBOUND_LEN + 1);
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(&long).unwrap());
        assert_eq!(RequestId::from_headers(&headers), None);

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(" abc-1 "));
        assert_eq!(RequestId::from_headers(&headers).unwrap().as_str(), "abc-1");
    }
}
