//! GraphQL layer of the Agora gateway
//!
//! Each backend resource contributes SDL fragments and a set of REST
//! endpoints. The [`SchemaRegistry`] merges the fragments into one document,
//! checks that every root field has exactly one endpoint, and builds an
//! executable `async_graphql::dynamic` schema whose resolvers translate
//! field calls into backend requests.

pub mod completion;
pub mod context;
pub mod endpoint;
pub mod errors;
pub mod executable;
pub mod merge;
pub mod registry;
pub mod resolver;
pub mod resources;
pub mod schema;

// Re-export main components
pub use completion::FieldErrors;
pub use context::GatewayContext;
pub use endpoint::{Endpoint, PathTemplate, RestResolver, RootKind};
pub use errors::{format_error, FormattedError, GatewayResponse, ResolveError, SchemaBuildError};
pub use merge::merge_schemas;
pub use registry::{Resource, SchemaRegistry};
pub use resolver::{FieldCall, FieldResolver, ResolverMap};
pub use resources::{register_defaults, EntryResource, ThreadResource, TicketResource};
pub use schema::{graphql_router, GatewaySchema, GraphQLState};
