//! Conversion of a merged SDL document into an executable dynamic schema

use crate::completion::FieldErrors;
use crate::endpoint::RootKind;
use crate::errors::SchemaBuildError;
use crate::resolver::{FieldCall, ResolverMap};
use agora_config::GraphQLConfig;
use agora_http::param_text;
use async_graphql::dynamic::{
    Enum, EnumItem, Field, FieldFuture, FieldValue, InputObject, InputValue, Object, Scalar,
    Schema, TypeRef,
};
use async_graphql::parser::types::{
    BaseType, FieldDefinition, InputObjectType, InputValueDefinition, ObjectType, ServiceDocument,
    Type, TypeKind, TypeSystemDefinition,
};
use async_graphql::Value;
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::sync::Arc;

/// Build an executable schema from a parsed document and its root resolvers
pub fn build_schema(
    document: &ServiceDocument,
    resolvers: &ResolverMap,
    config: &GraphQLConfig,
) -> Result<Schema, SchemaBuildError> {
    let object_types: HashSet<String> = type_definitions(document)
        .filter(|(_, kind)| matches!(kind, TypeKind::Object(_)))
        .map(|(name, _)| name.to_string())
        .collect();

    let mutation = object_types
        .contains(RootKind::Mutation.type_name())
        .then_some(RootKind::Mutation.type_name());
    let shaper = Arc::new(ValueShaper::new(object_types.clone()));

    let mut builder =
        Schema::build(RootKind::Query.type_name(), mutation, None).extension(FieldErrors);

    for (name, kind) in type_definitions(document) {
        builder = match kind {
            TypeKind::Scalar => builder.register(Scalar::new(name)),
            TypeKind::Enum(definition) => builder.register(
                definition
                    .values
                    .iter()
                    .fold(Enum::new(name), |item, value| {
                        item.item(EnumItem::new(value.node.value.node.as_str()))
                    }),
            ),
            TypeKind::InputObject(definition) => builder.register(input_object(name, definition)),
            TypeKind::Object(definition) => match RootKind::from_type_name(name) {
                Some(root) => builder.register(root_object(root, definition, resolvers, &shaper)?),
                None => builder.register(data_object(name, definition, &shaper)),
            },
            TypeKind::Interface(_) => {
                return Err(SchemaBuildError::Unsupported {
                    name: name.to_string(),
                    kind: "interface",
                })
            }
            TypeKind::Union(_) => {
                return Err(SchemaBuildError::Unsupported {
                    name: name.to_string(),
                    kind: "union",
                })
            }
        };
    }

    if let Some(depth) = config.max_query_depth {
        builder = builder.limit_depth(depth);
    }

    if let Some(complexity) = config.max_query_complexity {
        builder = builder.limit_complexity(complexity);
    }

    if !config.enable_introspection {
        builder = builder.disable_introspection();
    }

    builder
        .finish()
        .map_err(|e| SchemaBuildError::Schema(e.to_string()))
}

fn type_definitions(document: &ServiceDocument) -> impl Iterator<Item = (&str, &TypeKind)> {
    document.definitions.iter().filter_map(|definition| match definition {
        TypeSystemDefinition::Type(ty) => Some((ty.node.name.node.as_str(), &ty.node.kind)),
        TypeSystemDefinition::Schema(_) | TypeSystemDefinition::Directive(_) => None,
    })
}

/// Map a parsed type reference onto a dynamic one
pub fn type_ref(ty: &Type) -> TypeRef {
    let base = match &ty.base {
        BaseType::Named(name) => TypeRef::Named(name.to_string().into()),
        BaseType::List(inner) => TypeRef::List(Box::new(type_ref(inner))),
    };

    if ty.nullable {
        base
    } else {
        TypeRef::NonNull(Box::new(base))
    }
}

fn input_value(definition: &InputValueDefinition) -> InputValue {
    let mut value = InputValue::new(definition.name.node.as_str(), type_ref(&definition.ty.node));
    if let Some(default) = &definition.default_value {
        value = value.default_value(default.node.clone());
    }
    if let Some(description) = &definition.description {
        value = value.description(description.node.as_str());
    }
    value
}

fn input_object(name: &str, definition: &InputObjectType) -> InputObject {
    definition
        .fields
        .iter()
        .fold(InputObject::new(name), |object, field| {
            object.field(input_value(&field.node))
        })
}

fn with_arguments(field: Field, definition: &FieldDefinition) -> Field {
    let field = definition
        .arguments
        .iter()
        .fold(field, |field, argument| field.argument(input_value(&argument.node)));

    match &definition.description {
        Some(description) => field.description(description.node.as_str()),
        None => field,
    }
}

/// `Query` or `Mutation`, every field dispatching to its resolver
fn root_object(
    root: RootKind,
    definition: &ObjectType,
    resolvers: &ResolverMap,
    shaper: &Arc<ValueShaper>,
) -> Result<Object, SchemaBuildError> {
    let mut object = Object::new(root.type_name());

    for field in &definition.fields {
        let field = &field.node;
        let name = field.name.node.as_str();
        let resolver = resolvers
            .get(root, name)
            .ok_or_else(|| SchemaBuildError::MissingEndpoint {
                root,
                field: name.to_string(),
                resource: "<merged schema>".to_string(),
            })?;

        let ty = type_ref(&field.ty.node);
        let output = ty.clone();
        let shaper = shaper.clone();

        let resolved = Field::new(name, ty, move |ctx| {
            let resolver = resolver.clone();
            let shaper = shaper.clone();
            let output = output.clone();

            FieldFuture::new(async move {
                let call = FieldCall::from_context(&ctx)?;
                let value = resolver
                    .resolve(call)
                    .await
                    .map_err(|e| e.into_graphql_error())?;
                shaper.shape(value, &output)
            })
        });

        object = object.field(with_arguments(resolved, field));
    }

    Ok(object)
}

/// A resource type whose fields read keys of the parent JSON object
fn data_object(name: &str, definition: &ObjectType, shaper: &Arc<ValueShaper>) -> Object {
    let mut object = Object::new(name);

    for field in &definition.fields {
        let field = &field.node;
        let key = field.name.node.to_string();
        let ty = type_ref(&field.ty.node);
        let output = ty.clone();
        let shaper = shaper.clone();

        let resolved = Field::new(key.clone(), ty, move |ctx| {
            let key = key.clone();
            let shaper = shaper.clone();
            let output = output.clone();

            FieldFuture::new(async move {
                let parent = ctx.parent_value.try_downcast_ref::<JsonValue>()?;
                let value = parent.get(&key).cloned().unwrap_or(JsonValue::Null);
                shaper.shape(value, &output)
            })
        });

        object = object.field(with_arguments(resolved, field));
    }

    object
}

/// Turns backend JSON into field values according to the declared type
#[derive(Debug, Clone, Default)]
pub struct ValueShaper {
    object_types: HashSet<String>,
}

impl ValueShaper {
    pub fn new(object_types: HashSet<String>) -> Self {
        Self { object_types }
    }

    pub fn shape<'a>(
        &self,
        value: JsonValue,
        ty: &TypeRef,
    ) -> async_graphql::Result<Option<FieldValue<'a>>> {
        if value.is_null() {
            return Ok(None);
        }

        match ty {
            TypeRef::NonNull(inner) => self.shape(value, inner),
            TypeRef::List(inner) => match value {
                JsonValue::Array(items) => {
                    let values = items
                        .into_iter()
                        .map(|item| Ok(self.shape(item, inner)?.unwrap_or(FieldValue::NULL)))
                        .collect::<async_graphql::Result<Vec<_>>>()?;
                    Ok(Some(FieldValue::list(values)))
                }
                other => Err(format!("Expected a list from the backend, got {}", kind_of(&other)).into()),
            },
            TypeRef::Named(name) => self.shape_named(value, name),
        }
    }

    fn shape_named<'a>(
        &self,
        value: JsonValue,
        name: &str,
    ) -> async_graphql::Result<Option<FieldValue<'a>>> {
        if self.object_types.contains(name) {
            return match value {
                JsonValue::Object(_) => Ok(Some(FieldValue::owned_any(value))),
                other => Err(format!(
                    "Expected an object for type {} from the backend, got {}",
                    name,
                    kind_of(&other)
                )
                .into()),
            };
        }

        let value = match name {
            "String" | "ID" => JsonValue::String(coerce_text(value)),
            _ => value,
        };

        Ok(Some(FieldValue::value(Value::from_json(value)?)))
    }
}

/// Text form of a backend value declared as `String`
pub fn coerce_text(value: JsonValue) -> String {
    match value {
        JsonValue::String(s) => s,
        JsonValue::Array(_) | JsonValue::Object(_) => value.to_string(),
        other => param_text(&other),
    }
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "an object",
    }
}
