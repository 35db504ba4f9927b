//! Entities, Core server configuration and message builders shared by the
//! Arrowhead client library and the provider agent.

pub mod messages;
pub mod protocol;
pub mod server;
pub mod types;

pub use server::{CoreEndpoint, CoreSystem, ServerConfig, UnknownCoreSystem};
pub use types::{Hydrate, Interface, Service, System};
