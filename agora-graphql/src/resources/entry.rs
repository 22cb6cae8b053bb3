//! Forum entries (replies within a thread)

use crate::endpoint::Endpoint;
use crate::registry::Resource;
use agora_http::HttpMethod;

pub const ENTRY_TYPE_DEFS: &str = r#"
    type Entry{
        _id: String!
        message: String!
        threadId: String!
        userName: String!
        userId: String!
        active: Boolean!
        isAuthor: Boolean!
    }
  input EntryInput {
        _id: String
        message: String!
        threadId: String!
        userName: String!
        userId: String!
        active: Boolean
        isAuthor: Boolean
  }"#;

pub const ENTRY_QUERIES: &str = r#"
      allEntrys: [Entry]!
      entryThread(id: String!, active: String!): [Entry]!
      entryById(id: String!): Entry!
  "#;

pub const ENTRY_MUTATIONS: &str = r#"
    createEntry(entry: EntryInput!): Entry!
    updateEntry(id: String!, entry: EntryInput!): Entry!
    deleteEntry(id: String!): String
"#;

/// Entries served by the forum service
#[derive(Debug, Clone, Copy, Default)]
pub struct EntryResource;

impl Resource for EntryResource {
    fn name(&self) -> &str {
        "entry"
    }

    fn type_defs(&self) -> &str {
        ENTRY_TYPE_DEFS
    }

    fn queries(&self) -> &str {
        ENTRY_QUERIES
    }

    fn mutations(&self) -> &str {
        ENTRY_MUTATIONS
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint::list("allEntrys"),
            Endpoint::query("entryById", "{id}"),
            Endpoint::query("entryThread", "thread/{id}/{active}"),
            Endpoint::mutation("createEntry", HttpMethod::Post, "/").with_body("entry"),
            Endpoint::mutation("updateEntry", HttpMethod::Put, "{id}/").with_body("entry"),
            Endpoint::mutation("deleteEntry", HttpMethod::Delete, "{id}/"),
        ]
    }
}
