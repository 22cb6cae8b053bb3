//! Resources exposed by the gateway

pub mod entry;
pub mod thread;
pub mod ticket;

pub use entry::EntryResource;
pub use thread::ThreadResource;
pub use ticket::TicketResource;

use crate::errors::SchemaBuildError;
use crate::registry::SchemaRegistry;
use agora_config::{BackendFamily, BackendsConfig};

/// Register threads, entries and tickets against their configured services
pub fn register_defaults(
    registry: &mut SchemaRegistry,
    backends: &BackendsConfig,
) -> Result<(), SchemaBuildError> {
    registry
        .register(&ThreadResource, backends.base_url(BackendFamily::Threads))?
        .register(&EntryResource, backends.base_url(BackendFamily::Entries))?
        .register(&TicketResource, backends.base_url(BackendFamily::Tickets))?;
    Ok(())
}
