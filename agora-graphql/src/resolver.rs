//! Resolver abstraction and the map from root fields to resolvers

use crate::context::GatewayContext;
use crate::endpoint::RootKind;
use crate::errors::ResolveError;
use async_graphql::dynamic::ResolverContext;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::sync::Arc;

/// Arguments and request data of a single root field invocation
#[derive(Debug, Clone, Default)]
pub struct FieldCall {
    pub arguments: Map<String, JsonValue>,
    pub token: Option<String>,
    pub request_id: Option<String>,
}

impl FieldCall {
    pub fn new(arguments: Map<String, JsonValue>) -> Self {
        Self {
            arguments,
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Collect the field's arguments as JSON along with the request data
    pub fn from_context(ctx: &ResolverContext<'_>) -> async_graphql::Result<Self> {
        let mut arguments = Map::new();
        for (name, value) in ctx.args.iter() {
            arguments.insert(name.to_string(), value.as_value().clone().into_json()?);
        }

        let context = ctx.data_opt::<GatewayContext>();

        Ok(Self {
            arguments,
            token: context.and_then(|context| context.token.clone()),
            request_id: context.and_then(|context| context.request_id.clone()),
        })
    }

    pub fn argument(&self, name: &str) -> Option<&JsonValue> {
        self.arguments.get(name).filter(|value| !value.is_null())
    }
}

/// Resolves one root field into backend JSON
#[async_trait::async_trait]
pub trait FieldResolver: Send + Sync {
    async fn resolve(&self, call: FieldCall) -> Result<JsonValue, ResolveError>;
}

/// Root field resolvers keyed by `(root, field)`
#[derive(Clone, Default)]
pub struct ResolverMap {
    resolvers: HashMap<(RootKind, String), Arc<dyn FieldResolver>>,
}

impl ResolverMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, root: RootKind, field: impl Into<String>, resolver: Arc<dyn FieldResolver>) {
        self.resolvers.insert((root, field.into()), resolver);
    }

    pub fn get(&self, root: RootKind, field: &str) -> Option<Arc<dyn FieldResolver>> {
        self.resolvers.get(&(root, field.to_string())).cloned()
    }

    pub fn contains(&self, root: RootKind, field: &str) -> bool {
        self.resolvers.contains_key(&(root, field.to_string()))
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Registered fields, sorted for stable output
    pub fn fields(&self) -> Vec<(RootKind, &str)> {
        let mut fields: Vec<_> = self
            .resolvers
            .keys()
            .map(|(root, field)| (*root, field.as_str()))
            .collect();
        fields.sort();
        fields
    }
}

impl std::fmt::Debug for ResolverMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverMap")
            .field("fields", &self.fields())
            .finish()
    }
}
