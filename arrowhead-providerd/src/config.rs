use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use serde::Deserialize;
use anyhow::{Context, Result};
use arrowhead_client::{Pkcs12Credentials, DEFAULT_TIMEOUT};
use arrowhead_shared::{Interface, ServerConfig, Service, System};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub core: ServerConfig,
    pub system: SystemConfig,
    pub certificates: Pkcs12Credentials,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Services this system provides
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
    /// Services looked up through the Orchestrator at startup
    #[serde(default)]
    pub consume: Vec<ServiceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// Must match the common name of the client certificate
    pub name: String,
    /// Defaults to the host name
    #[serde(default)]
    pub address: Option<String>,
    /// 0 for a consumer-only system
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub interfaces: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_version() -> u32 {
    1
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SystemConfig {
    /// Local system description; the public key is filled in from the
    /// certificates when the client is built.
    pub fn to_system(&self) -> Result<System> {
        let address = match &self.address {
            Some(address) => address.clone(),
            None => hostname::get()
                .context("Failed to get system hostname")?
                .to_string_lossy()
                .to_string(),
        };

        Ok(System::new(&self.name, address, self.port)
            .with_interfaces(self.interfaces.iter().map(Interface::new)))
    }
}

impl ServiceConfig {
    pub fn to_service(&self) -> Service {
        let mut service = Service::new(&self.name).with_version(self.version);
        service.metadata = self.metadata.clone();
        service
    }
}
