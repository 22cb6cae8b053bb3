//! Bearer token extraction

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use once_cell::sync::Lazy;
use regex::Regex;

static BEARER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Bearer ([A-Za-z0-9]+)").expect("bearer pattern is valid"));

/// Token carried by the `Authorization` header, if any
///
/// Only the leading alphanumeric run after `Bearer ` is taken, so tokens
/// containing `.`, `-` or `_` are truncated at the first such character.
/// A missing or malformed header yields `BearerToken(None)`; extraction
/// never rejects the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_bearer);
        Self(token)
    }

    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

/// Pull the token out of an `Authorization` header value
pub fn parse_bearer(value: &str) -> Option<String> {
    BEARER_PATTERN
        .captures(value)
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str().to_string())
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
