//! Support tickets

use crate::endpoint::Endpoint;
use crate::registry::Resource;
use agora_http::HttpMethod;

pub const TICKET_TYPE_DEFS: &str = r#"
    type Ticket{
        _id: String!
        title: String!
        description: String!
        status: String!
        userName: String!
        userId: String!
        active: Boolean!
    }
  input TicketInput {
        _id: String
        title: String!
        description: String
        status: String
        userName: String
        userId: String
        active: Boolean
  }"#;

pub const TICKET_QUERIES: &str = r#"
      allTickets: [Ticket]!
      ticketById(id: String!): Ticket!
  "#;

pub const TICKET_MUTATIONS: &str = r#"
    createTicket(ticket: TicketInput!): Ticket!
    updateTicket(id: String!, ticket: TicketInput!): Ticket!
    deleteTicket(id: String!): String
"#;

/// Tickets served by the ticket service
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketResource;

impl Resource for TicketResource {
    fn name(&self) -> &str {
        "ticket"
    }

    fn type_defs(&self) -> &str {
        TICKET_TYPE_DEFS
    }

    fn queries(&self) -> &str {
        TICKET_QUERIES
    }

    fn mutations(&self) -> &str {
        TICKET_MUTATIONS
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint::list("allTickets"),
            Endpoint::query("ticketById", "{id}"),
            Endpoint::mutation("createTicket", HttpMethod::Post, "/").with_body("ticket"),
            Endpoint::mutation("updateTicket", HttpMethod::Put, "{id}/").with_body("ticket"),
            Endpoint::mutation("deleteTicket", HttpMethod::Delete, "{id}/"),
        ]
    }
}
