//! Field error completion for the dynamic executor
//!
//! Left alone, the executor reports resolver errors without a path and drops
//! the failing field from its parent object. This extension takes over both:
//! every field error is tagged with the path of the field that raised it, and
//! GraphQL null propagation applies. A failing nullable field or list item
//! resolves to `null` in place. A failing non-null field nulls its parent,
//! recursively, and a non-null root field that could not be completed nulls
//! `data`.

use async_graphql::extensions::{
    Extension, ExtensionContext, ExtensionFactory, NextExecute, NextResolve, ResolveInfo,
};
use async_graphql::{
    PathSegment, QueryPathNode, QueryPathSegment, Response, ServerError, ServerResult, Value,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Extension factory registered on every gateway schema
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldErrors;

impl ExtensionFactory for FieldErrors {
    fn create(&self) -> Arc<dyn Extension> {
        Arc::new(FieldErrorsExtension::default())
    }
}

#[derive(Debug, Default)]
struct Completion {
    /// Every field error of the request, reported once
    errors: Vec<ServerError>,
    /// Non-null fields that ended up without a value
    failed: Vec<Vec<PathSegment>>,
}

impl Completion {
    /// Record that the field at `path` could not produce a value
    fn fail(&mut self, path: Vec<PathSegment>, nullable: bool) {
        if !nullable {
            self.failed.push(path);
        }
    }

    fn has_failed_child(&self, path: &[PathSegment]) -> bool {
        self.failed
            .iter()
            .any(|failed| failed.len() == path.len() + 1 && failed.starts_with(path))
    }

    fn root_failed(&self) -> bool {
        self.failed.iter().any(|failed| failed.len() == 1)
    }
}

/// Per-request completion state
#[derive(Debug, Default)]
struct FieldErrorsExtension {
    state: Mutex<Completion>,
}

impl FieldErrorsExtension {
    fn state(&self) -> MutexGuard<'_, Completion> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl Extension for FieldErrorsExtension {
    async fn execute(
        &self,
        ctx: &ExtensionContext<'_>,
        operation_name: Option<&str>,
        next: NextExecute<'_>,
    ) -> Response {
        let mut response = next.run(ctx, operation_name).await;

        let mut state = self.state();
        if state.root_failed() {
            response.data = Value::Null;
        }
        response.errors.append(&mut state.errors);

        response
    }

    async fn resolve(
        &self,
        ctx: &ExtensionContext<'_>,
        info: ResolveInfo<'_>,
        next: NextResolve<'_>,
    ) -> ServerResult<Option<Value>> {
        if info.is_for_introspection {
            return next.run(ctx, info).await;
        }

        let path_node = info.path_node;
        let nullable = !info.return_type.ends_with('!');

        match next.run(ctx, info).await {
            Err(mut error) => {
                let path = error_path(path_node);
                if error.path.is_empty() {
                    error.path = path.clone();
                }

                let mut state = self.state();
                state.errors.push(error);
                state.fail(path, nullable);
                Ok(None)
            }
            Ok(value) => {
                let mut state = self.state();
                if state.failed.is_empty() {
                    return Ok(value);
                }

                let path = error_path(path_node);
                if state.has_failed_child(&path) {
                    state.fail(path, nullable);
                    Ok(None)
                } else {
                    Ok(value)
                }
            }
        }
    }
}

/// Response path of a field, root first
pub fn error_path(node: &QueryPathNode<'_>) -> Vec<PathSegment> {
    let mut path: Vec<PathSegment> = std::iter::once(node)
        .chain(node.parents())
        .map(|node| match node.segment {
            QueryPathSegment::Name(name) => PathSegment::Field(name.to_string()),
            QueryPathSegment::Index(index) => PathSegment::Index(index),
        })
        .collect();
    path.reverse();
    path
}
