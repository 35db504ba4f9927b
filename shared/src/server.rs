use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::protocol::{
    DEFAULT_AUTHORIZATION_PORT, DEFAULT_CORE_ADDRESS, DEFAULT_ORCHESTRATOR_PORT,
    DEFAULT_SERVICE_REGISTRY_PORT,
};

/// One of the three Core systems a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreSystem {
    Orchestrator,
    ServiceRegistry,
    Authorization,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Undefined core service '{0}'")]
pub struct UnknownCoreSystem(pub String);

impl CoreSystem {
    pub const ALL: [CoreSystem; 3] = [
        CoreSystem::Orchestrator,
        CoreSystem::ServiceRegistry,
        CoreSystem::Authorization,
    ];

    /// Path segment the Core system is mounted under
    pub fn endpoint(self) -> &'static str {
        match self {
            CoreSystem::Orchestrator => "orchestrator",
            CoreSystem::ServiceRegistry => "serviceregistry",
            CoreSystem::Authorization => "authorization",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            CoreSystem::Orchestrator => DEFAULT_ORCHESTRATOR_PORT,
            CoreSystem::ServiceRegistry => DEFAULT_SERVICE_REGISTRY_PORT,
            CoreSystem::Authorization => DEFAULT_AUTHORIZATION_PORT,
        }
    }
}

impl fmt::Display for CoreSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CoreSystem::Orchestrator => "Orchestrator",
            CoreSystem::ServiceRegistry => "Service Registry",
            CoreSystem::Authorization => "Authorization",
        })
    }
}

impl FromStr for CoreSystem {
    type Err = UnknownCoreSystem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "orchestrator" => Ok(CoreSystem::Orchestrator),
            "serviceregistry" | "service_registry" | "service-registry" => {
                Ok(CoreSystem::ServiceRegistry)
            }
            "authorization" => Ok(CoreSystem::Authorization),
            _ => Err(UnknownCoreSystem(s.to_string())),
        }
    }
}

/// Port and optional full URL override of a single Core system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreEndpoint {
    #[serde(default)]
    pub port: Option<u16>,
    /// When set, used verbatim instead of the address/port/endpoint URL
    #[serde(default)]
    pub url: Option<String>,
}

/// Static location of the Arrowhead Core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default)]
    pub orchestrator: CoreEndpoint,
    #[serde(default, alias = "serviceregistry")]
    pub service_registry: CoreEndpoint,
    #[serde(default)]
    pub authorization: CoreEndpoint,
}

fn default_address() -> String {
    DEFAULT_CORE_ADDRESS.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            orchestrator: CoreEndpoint::default(),
            service_registry: CoreEndpoint::default(),
            authorization: CoreEndpoint::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_port(mut self, core: CoreSystem, port: u16) -> Self {
        self.endpoint_mut(core).port = Some(port);
        self
    }

    #[must_use]
    pub fn with_url(mut self, core: CoreSystem, url: impl Into<String>) -> Self {
        self.endpoint_mut(core).url = Some(url.into());
        self
    }

    pub fn endpoint(&self, core: CoreSystem) -> &CoreEndpoint {
        match core {
            CoreSystem::Orchestrator => &self.orchestrator,
            CoreSystem::ServiceRegistry => &self.service_registry,
            CoreSystem::Authorization => &self.authorization,
        }
    }

    fn endpoint_mut(&mut self, core: CoreSystem) -> &mut CoreEndpoint {
        match core {
            CoreSystem::Orchestrator => &mut self.orchestrator,
            CoreSystem::ServiceRegistry => &mut self.service_registry,
            CoreSystem::Authorization => &mut self.authorization,
        }
    }

    pub fn port(&self, core: CoreSystem) -> u16 {
        self.endpoint(core).port.unwrap_or_else(|| core.default_port())
    }

    /// Base URL of a Core system, always ending in `/` unless overridden.
    pub fn url(&self, core: CoreSystem) -> String {
        match self.endpoint(core).url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!(
                "https://{}:{}/{}/",
                self.address,
                self.port(core),
                core.endpoint()
            ),
        }
    }

    /// Look up a URL by core system name, e.g. `"orchestrator"`.
    pub fn get_url(&self, core: &str) -> Result<String, UnknownCoreSystem> {
        Ok(self.url(core.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let server = ServerConfig::default();

        assert_eq!(
            server.url(CoreSystem::Orchestrator),
            "https://127.0.0.1:8441/orchestrator/"
        );
        assert_eq!(
            server.url(CoreSystem::ServiceRegistry),
            "https://127.0.0.1:8443/serviceregistry/"
        );
        assert_eq!(
            server.url(CoreSystem::Authorization),
            "https://127.0.0.1:8445/authorization/"
        );
    }

    #[test]
    fn test_custom_address_and_port() {
        let server = ServerConfig::new("core.local").with_port(CoreSystem::Orchestrator, 9441);

        assert_eq!(
            server.url(CoreSystem::Orchestrator),
            "https://core.local:9441/orchestrator/"
        );
        assert_eq!(server.port(CoreSystem::ServiceRegistry), 8443);
    }

    #[test]
    fn test_url_override_is_verbatim() {
        let server = ServerConfig::default()
            .with_url(CoreSystem::ServiceRegistry, "http://proxy:80/sr/");

        assert_eq!(server.url(CoreSystem::ServiceRegistry), "http://proxy:80/sr/");
        // Other systems are unaffected
        assert_eq!(
            server.url(CoreSystem::Orchestrator),
            "https://127.0.0.1:8441/orchestrator/"
        );
    }

    #[test]
    fn test_empty_override_falls_back() {
        let server = ServerConfig::default().with_url(CoreSystem::Authorization, "");
        assert_eq!(
            server.url(CoreSystem::Authorization),
            "https://127.0.0.1:8445/authorization/"
        );
    }

    #[test]
    fn test_get_url_by_name() {
        let server = ServerConfig::default();
        assert_eq!(
            server.get_url("orchestrator").unwrap(),
            "https://127.0.0.1:8441/orchestrator/"
        );
        assert_eq!(
            server.get_url("serviceregistry").unwrap(),
            "https://127.0.0.1:8443/serviceregistry/"
        );

        let err = server.get_url("gatekeeper").unwrap_err();
        assert_eq!(err.to_string(), "Undefined core service 'gatekeeper'");
    }

    #[test]
    fn test_deserialize_partial_config() {
        let json = r#"{
            "address": "10.0.0.1",
            "serviceregistry": { "port": 9443 },
            "orchestrator": { "url": "https://orch.example/orchestrator/" }
        }"#;
        let server: ServerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(
            server.url(CoreSystem::ServiceRegistry),
            "https://10.0.0.1:9443/serviceregistry/"
        );
        assert_eq!(
            server.url(CoreSystem::Orchestrator),
            "https://orch.example/orchestrator/"
        );
        assert_eq!(server.port(CoreSystem::Authorization), 8445);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(CoreSystem::ServiceRegistry.to_string(), "Service Registry");
        assert_eq!(CoreSystem::Orchestrator.to_string(), "Orchestrator");
    }
}
