//! Lightweight Rust client for the Arrowhead Framework Core.
//!
//! The Core consists of three systems: the Service Registry, the
//! Orchestrator and Authorization. This crate covers the calls a provider or
//! consumer system needs:
//!
//! - register a system
//! - register and unregister a service
//! - request orchestration (service discovery)
//!
//! Entities and message builders live in `arrowhead-shared`; this crate adds
//! the [`Connector`] transport seam, a reqwest implementation with PKCS#12
//! client certificates, and the [`ArrowheadClient`] facade.
//!
//! # Error Handling
//!
//! All operations return `Result<T, ClientError>`. A Core status of 300 or
//! above becomes [`ClientError::Core`] carrying a readable diagnostic:
//!
//! ```no_run
//! # use arrowhead_client::{ArrowheadClient, ClientError, HttpConnector, DEFAULT_TIMEOUT};
//! # use arrowhead_shared::{ServerConfig, Service, System};
//! # async fn example() -> Result<(), ClientError> {
//! # let connector = HttpConnector::new(ServerConfig::default(), DEFAULT_TIMEOUT)?;
//! let client = ArrowheadClient::new(System::new("consumer", "10.0.0.9", 0), connector);
//! match client.orchestrate(&Service::new("temperature")).await {
//!     Ok(Some(provider)) => println!("Use {}:{}", provider.address, provider.port),
//!     Ok(None) => println!("No provider"),
//!     Err(ClientError::Core { status: 401, .. }) => println!("Certificate rejected"),
//!     Err(e) => println!("Error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
pub mod connector;
mod credentials;
mod error;

pub use client::ArrowheadClient;
pub use connector::{
    describe_failure, Connector, CoreRequest, CoreResponse, HttpConnector, Operation,
    DEFAULT_TIMEOUT,
};
pub use credentials::{normalize_public_key, Pkcs12Credentials};
pub use error::{ClientError, Result};
