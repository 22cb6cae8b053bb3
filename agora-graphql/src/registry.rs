//! Resource registration and schema assembly

use crate::endpoint::{Endpoint, RestResolver, RootKind};
use crate::errors::SchemaBuildError;
use crate::executable::build_schema;
use crate::merge::merge_schemas;
use crate::resolver::ResolverMap;
use agora_config::GraphQLConfig;
use agora_http::HttpClient;
use async_graphql::dynamic::Schema;
use async_graphql::parser::parse_schema;
use async_graphql::parser::types::{TypeKind, TypeSystemDefinition};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// A backend resource contributing to the gateway schema
pub trait Resource: Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &str;

    /// Type and input definitions
    fn type_defs(&self) -> &str;

    /// Query field signatures, without the enclosing `type Query`
    fn queries(&self) -> &str;

    /// Mutation field signatures, without the enclosing `type Mutation`
    fn mutations(&self) -> &str;

    /// One endpoint per declared query and mutation field
    fn endpoints(&self) -> Vec<Endpoint>;
}

#[derive(Debug, Clone)]
struct Fragments {
    name: String,
    type_defs: String,
    queries: String,
    mutations: String,
}

/// Collects resources and builds the executable gateway schema
pub struct SchemaRegistry {
    client: Arc<dyn HttpClient>,
    forward_token: bool,
    fragments: Vec<Fragments>,
    /// Owning resource of every root field
    fields: HashMap<(RootKind, String), String>,
    /// Owning resource of every named type
    types: HashMap<String, String>,
    resolvers: ResolverMap,
}

impl SchemaRegistry {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self {
            client,
            forward_token: false,
            fragments: Vec::new(),
            fields: HashMap::new(),
            types: HashMap::new(),
            resolvers: ResolverMap::new(),
        }
    }

    /// Forward the caller's bearer token to backends for resources registered afterwards
    pub fn forward_token(mut self, forward: bool) -> Self {
        self.forward_token = forward;
        self
    }

    /// Register a resource whose endpoints live under `base_url`
    ///
    /// Registration is all-or-nothing: a resource that clashes with an
    /// earlier one, or whose fields and endpoints do not line up one to one,
    /// leaves the registry untouched.
    pub fn register<R>(&mut self, resource: &R, base_url: impl Into<String>) -> Result<&mut Self, SchemaBuildError>
    where
        R: Resource + ?Sized,
    {
        let name = resource.name().to_string();
        let base_url = base_url.into();

        let types = declared_types(&name, resource.type_defs())?;
        for type_name in &types {
            if let Some(existing) = self.types.get(type_name) {
                return Err(SchemaBuildError::DuplicateType {
                    name: type_name.clone(),
                    resource: name,
                    existing: existing.clone(),
                });
            }
        }

        let mut declared = Vec::new();
        for (root, fragment) in [
            (RootKind::Query, resource.queries()),
            (RootKind::Mutation, resource.mutations()),
        ] {
            for field in declared_fields(&name, root, fragment)? {
                if let Some(existing) = self.fields.get(&(root, field.clone())) {
                    return Err(SchemaBuildError::DuplicateField {
                        root,
                        field,
                        resource: name,
                        existing: existing.clone(),
                    });
                }
                declared.push((root, field));
            }
        }

        let endpoints = resource.endpoints();
        let mut routed = HashSet::new();
        for endpoint in &endpoints {
            let key = (endpoint.root, endpoint.field.clone());
            if !declared.contains(&key) || !routed.insert(key) {
                return Err(SchemaBuildError::UnknownEndpoint {
                    root: endpoint.root,
                    field: endpoint.field.clone(),
                    resource: name,
                });
            }
        }

        if let Some((root, field)) = declared.iter().find(|key| !routed.contains(*key)) {
            return Err(SchemaBuildError::MissingEndpoint {
                root: *root,
                field: field.clone(),
                resource: name,
            });
        }

        for endpoint in endpoints {
            debug!(
                "Routing {}.{} to {} {}/{}",
                endpoint.root, endpoint.field, endpoint.method, base_url, endpoint.path
            );
            let root = endpoint.root;
            let field = endpoint.field.clone();
            let resolver = RestResolver::new(endpoint, base_url.clone(), self.client.clone())
                .forward_token(self.forward_token);
            self.resolvers.insert(root, field, Arc::new(resolver));
        }

        for key in declared {
            self.fields.insert(key, name.clone());
        }
        for type_name in types {
            self.types.insert(type_name, name.clone());
        }

        info!("Registered resource '{}' at {}", name, base_url);
        self.fragments.push(Fragments {
            name,
            type_defs: resource.type_defs().to_string(),
            queries: resource.queries().to_string(),
            mutations: resource.mutations().to_string(),
        });

        Ok(self)
    }

    /// Names of registered resources, in registration order
    pub fn resource_names(&self) -> Vec<&str> {
        self.fragments.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn resolvers(&self) -> &ResolverMap {
        &self.resolvers
    }

    /// The merged SDL document, headed by `scalar JSON`
    pub fn sdl(&self) -> String {
        let type_defs: Vec<&str> = std::iter::once("scalar JSON")
            .chain(self.fragments.iter().map(|f| f.type_defs.as_str()))
            .collect();
        let queries: Vec<&str> = self.fragments.iter().map(|f| f.queries.as_str()).collect();
        let mutations: Vec<&str> = self
            .fragments
            .iter()
            .map(|f| f.mutations.as_str())
            .filter(|m| !m.trim().is_empty())
            .collect();

        let merged = merge_schemas(&type_defs, &queries, &mutations);
        if mutations.is_empty() {
            // An empty `type Mutation {}` block does not parse
            match merged.rfind("\n    type Mutation") {
                Some(end) => merged[..end].to_string(),
                None => merged,
            }
        } else {
            merged
        }
    }

    /// Build the executable schema
    pub fn build(&self, config: &GraphQLConfig) -> Result<Schema, SchemaBuildError> {
        if self.fragments.is_empty() {
            return Err(SchemaBuildError::Empty);
        }

        let sdl = self.sdl();
        let document = parse_schema(&sdl).map_err(|e| SchemaBuildError::Parse(e.to_string()))?;
        let schema = build_schema(&document, &self.resolvers, config)?;

        info!(
            "Built gateway schema with {} resources and {} root fields",
            self.fragments.len(),
            self.resolvers.len()
        );
        Ok(schema)
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("resources", &self.resource_names())
            .field("forward_token", &self.forward_token)
            .field("resolvers", &self.resolvers)
            .finish()
    }
}

/// Names of the types a fragment defines
fn declared_types(resource: &str, type_defs: &str) -> Result<Vec<String>, SchemaBuildError> {
    if type_defs.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document = parse_schema(type_defs).map_err(|e| SchemaBuildError::InvalidFragment {
        resource: resource.to_string(),
        message: e.to_string(),
    })?;

    let mut names = Vec::new();
    for definition in &document.definitions {
        if let TypeSystemDefinition::Type(ty) = definition {
            let name = ty.node.name.node.to_string();
            if names.contains(&name) {
                return Err(SchemaBuildError::InvalidFragment {
                    resource: resource.to_string(),
                    message: format!("type '{}' is defined twice", name),
                });
            }
            names.push(name);
        }
    }
    Ok(names)
}

/// Names of the root fields a fragment declares
fn declared_fields(resource: &str, root: RootKind, fragment: &str) -> Result<Vec<String>, SchemaBuildError> {
    if fragment.trim().is_empty() {
        return Ok(Vec::new());
    }

    let invalid = |message: String| SchemaBuildError::InvalidFragment {
        resource: resource.to_string(),
        message: format!("{} fields: {}", root, message),
    };

    let wrapped = format!("type {} {{ {} }}", root.type_name(), fragment);
    let document = parse_schema(&wrapped).map_err(|e| invalid(e.to_string()))?;

    let mut names = Vec::new();
    for definition in &document.definitions {
        if let TypeSystemDefinition::Type(ty) = definition {
            if let TypeKind::Object(object) = &ty.node.kind {
                for field in &object.fields {
                    let name = field.node.name.node.to_string();
                    if names.contains(&name) {
                        return Err(invalid(format!("'{}' is declared twice", name)));
                    }
                    names.push(name);
                }
            }
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_http::{HttpManager, HttpMethod};

    struct Fixture {
        name: &'static str,
        type_defs: &'static str,
        queries: &'static str,
        mutations: &'static str,
        endpoints: Vec<Endpoint>,
    }

    impl Resource for Fixture {
        fn name(&self) -> &str {
            self.name
        }
        fn type_defs(&self) -> &str {
            self.type_defs
        }
        fn queries(&self) -> &str {
            self.queries
        }
        fn mutations(&self) -> &str {
            self.mutations
        }
        fn endpoints(&self) -> Vec<Endpoint> {
            self.endpoints.clone()
        }
    }

    fn widgets() -> Fixture {
        Fixture {
            name: "widget",
            type_defs: "type Widget { _id: String! }",
            queries: "allWidgets: [Widget]!",
            mutations: "deleteWidget(id: String!): String",
            endpoints: vec![
                Endpoint::list("allWidgets"),
                Endpoint::mutation("deleteWidget", HttpMethod::Delete, "{id}/"),
            ],
        }
    }

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new(Arc::new(HttpManager::new().unwrap()))
    }

    #[test]
    fn test_register_and_sdl() {
        let mut registry = registry();
        registry.register(&widgets(), "http://w/widgets").unwrap();

        let sdl = registry.sdl();
        assert!(sdl.starts_with("scalar JSON\n"));
        assert!(sdl.contains("type Widget { _id: String! }"));
        assert!(sdl.contains("type Query { allWidgets: [Widget]! }"));
        assert!(sdl.contains("type Mutation { deleteWidget(id: String!): String }"));
        assert_eq!(registry.resource_names(), vec!["widget"]);
        assert_eq!(registry.resolvers().len(), 2);
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let mut registry = registry();
        registry.register(&widgets(), "http://w/widgets").unwrap();

        let clash = Fixture {
            name: "gadget",
            type_defs: "type Gadget { _id: String! }",
            queries: "allWidgets: [Gadget]!",
            mutations: "",
            endpoints: vec![Endpoint::list("allWidgets")],
        };
        let err = registry.register(&clash, "http://g/gadgets").unwrap_err();
        assert!(matches!(
            err,
            SchemaBuildError::DuplicateField { ref field, ref existing, .. }
                if field == "allWidgets" && existing == "widget"
        ));
        assert_eq!(registry.resource_names(), vec!["widget"]);
        assert!(!registry.sdl().contains("Gadget"));
    }

    #[test]
    fn test_duplicate_type_is_rejected() {
        let mut registry = registry();
        registry.register(&widgets(), "http://w/widgets").unwrap();

        let clash = Fixture {
            name: "widget-v2",
            type_defs: "type Widget { name: String }",
            queries: "widgetsV2: [Widget]",
            mutations: "",
            endpoints: vec![Endpoint::list("widgetsV2")],
        };
        let err = registry.register(&clash, "http://w/v2").unwrap_err();
        assert!(matches!(err, SchemaBuildError::DuplicateType { ref name, .. } if name == "Widget"));
    }

    #[test]
    fn test_fields_and_endpoints_must_line_up() {
        let mut missing = widgets();
        missing.endpoints.pop();
        let err = registry().register(&missing, "http://w").unwrap_err();
        assert!(matches!(err, SchemaBuildError::MissingEndpoint { ref field, .. } if field == "deleteWidget"));

        let mut unknown = widgets();
        unknown.endpoints.push(Endpoint::query("widgetById", "{id}"));
        let err = registry().register(&unknown, "http://w").unwrap_err();
        assert!(matches!(err, SchemaBuildError::UnknownEndpoint { ref field, .. } if field == "widgetById"));

        let mut misrooted = widgets();
        misrooted.endpoints[1] = Endpoint::query("deleteWidget", "{id}/");
        let err = registry().register(&misrooted, "http://w").unwrap_err();
        assert!(matches!(err, SchemaBuildError::UnknownEndpoint { root: RootKind::Query, .. }));
    }

    #[test]
    fn test_invalid_fragment() {
        let mut broken = widgets();
        broken.queries = "allWidgets: [Widget";
        let err = registry().register(&broken, "http://w").unwrap_err();
        assert!(matches!(err, SchemaBuildError::InvalidFragment { .. }));
    }

    #[test]
    fn test_query_only_registry_builds() {
        let reader = Fixture {
            name: "reader",
            type_defs: "type Note { text: String }",
            queries: "allNotes: [Note]",
            mutations: "",
            endpoints: vec![Endpoint::list("allNotes")],
        };

        let mut registry = registry();
        registry.register(&reader, "http://n/notes").unwrap();
        assert!(!registry.sdl().contains("Mutation"));
        assert!(registry.build(&GraphQLConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_registry_does_not_build() {
        let err = registry().build(&GraphQLConfig::default()).unwrap_err();
        assert!(matches!(err, SchemaBuildError::Empty));
    }
}
