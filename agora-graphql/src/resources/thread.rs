//! Forum threads

use crate::endpoint::Endpoint;
use crate::registry::Resource;
use agora_http::HttpMethod;

pub const THREAD_TYPE_DEFS: &str = r#"
    type Thread{
        _id: String!
        title: String!
        description: String!
        levelId: String!
        userName: String!
        userId: String!
        active: Boolean!
    }
  input ThreadInput {
        _id: String
        title: String!
        description: String
        levelId: String
        userName: String
        userId: String
        active: Boolean
  }"#;

pub const THREAD_QUERIES: &str = r#"
      allThreads: [Thread]!
      threadLevel(id: String!, active: String!): [Thread]!
      threadById(id: String!): Thread!
  "#;

pub const THREAD_MUTATIONS: &str = r#"
    createThread(thread: ThreadInput!): Thread!
    updateThread(id: String!, thread: ThreadInput!): Thread!
    deleteThread(id: String!): String
"#;

/// Threads served by the forum service
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadResource;

impl Resource for ThreadResource {
    fn name(&self) -> &str {
        "thread"
    }

    fn type_defs(&self) -> &str {
        THREAD_TYPE_DEFS
    }

    fn queries(&self) -> &str {
        THREAD_QUERIES
    }

    fn mutations(&self) -> &str {
        THREAD_MUTATIONS
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint::list("allThreads"),
            Endpoint::query("threadById", "{id}"),
            Endpoint::query("threadLevel", "level/{id}/{active}"),
            Endpoint::mutation("createThread", HttpMethod::Post, "/").with_body("thread"),
            Endpoint::mutation("updateThread", HttpMethod::Put, "{id}/").with_body("thread"),
            Endpoint::mutation("deleteThread", HttpMethod::Delete, "{id}/"),
        ]
    }
}
