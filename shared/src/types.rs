use std::collections::HashMap;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::protocol::CORE_TIMESTAMP_FORMAT;

/// Copies matching fields of a Core response object onto a local entity.
///
/// Keys are accepted in both snake_case and the Core's camelCase spelling.
/// Unknown keys, read-only attributes and values of the wrong JSON type
/// are ignored.
pub trait Hydrate {
    fn update(&mut self, fields: &Map<String, Value>);

    /// Same as [`Hydrate::update`], ignoring anything that is not an object
    fn update_from_value(&mut self, value: &Value) {
        if let Some(fields) = value.as_object() {
            self.update(fields);
        }
    }
}

/// An Arrowhead participant. A `port` of 0 marks a consumer-only system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    pub name: String,
    pub address: String,
    pub port: u16,
    /// Public key sent as `authenticationInfo`
    #[serde(default)]
    pub pubkey: String,
    /// Assigned by the Service Registry
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub interfaces: Vec<Interface>,
}

/// A registrable capability of a system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Transport/encoding binding, e.g. `HTTP-INSECURE-JSON`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

fn default_version() -> u32 {
    1
}

impl System {
    pub fn new(name: impl Into<String>, address: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            port,
            pubkey: String::new(),
            id: None,
            created_at: None,
            updated_at: None,
            interfaces: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_pubkey(mut self, pubkey: impl Into<String>) -> Self {
        self.pubkey = pubkey.into();
        self
    }

    #[must_use]
    pub fn with_interfaces(mut self, interfaces: impl IntoIterator<Item = Interface>) -> Self {
        self.interfaces.extend(interfaces);
        self
    }

    pub fn is_consumer_only(&self) -> bool {
        self.port == 0
    }

    /// Build a system from a Core `provider` / `requesterSystem` object.
    /// Returns `None` unless the object carries at least a `systemName`.
    pub fn from_core(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        let name = fields
            .get("systemName")
            .or_else(|| fields.get("name"))
            .and_then(Value::as_str)?;

        let mut system = System::new(name, "", 0);
        system.update(fields);
        Some(system)
    }
}

impl Hydrate for System {
    fn update(&mut self, fields: &Map<String, Value>) {
        for (key, value) in fields {
            match key.as_str() {
                "address" => set_string(&mut self.address, value),
                "port" => {
                    if let Some(port) = value.as_u64().and_then(|p| u16::try_from(p).ok()) {
                        self.port = port;
                    }
                }
                "pubkey" | "authenticationInfo" => set_string(&mut self.pubkey, value),
                "id" => set_id(&mut self.id, value),
                "created_at" | "createdAt" => set_timestamp(&mut self.created_at, value),
                "updated_at" | "updatedAt" => set_timestamp(&mut self.updated_at, value),
                _ => {}
            }
        }
    }
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            id: None,
            created_at: None,
            updated_at: None,
            metadata: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl Hydrate for Service {
    fn update(&mut self, fields: &Map<String, Value>) {
        for (key, value) in fields {
            match key.as_str() {
                "version" => {
                    if let Some(version) = value.as_u64().and_then(|v| u32::try_from(v).ok()) {
                        self.version = version;
                    }
                }
                "id" => set_id(&mut self.id, value),
                "created_at" | "createdAt" => set_timestamp(&mut self.created_at, value),
                "updated_at" | "updatedAt" => set_timestamp(&mut self.updated_at, value),
                "metadata" => {
                    if let Some(entries) = value.as_object() {
                        self.metadata = entries
                            .iter()
                            .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                            .collect();
                    }
                }
                _ => {}
            }
        }
    }
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Name as it appears in Core payloads (`interfaceName`)
    pub fn interface_name(&self) -> &str {
        &self.name
    }
}

impl Hydrate for Interface {
    fn update(&mut self, fields: &Map<String, Value>) {
        for (key, value) in fields {
            match key.as_str() {
                "id" => set_id(&mut self.id, value),
                "created_at" | "createdAt" => set_timestamp(&mut self.created_at, value),
                "updated_at" | "updatedAt" => set_timestamp(&mut self.updated_at, value),
                _ => {}
            }
        }
    }
}

/// Parse a Core timestamp. Accepts `YYYY-MM-DD HH:MM:SS`, the
/// `YYYY-MM-DD HH-MM-SS` variant and RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, CORE_TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H-%M-%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
}

fn set_string(slot: &mut String, value: &Value) {
    if let Some(s) = value.as_str() {
        *slot = s.to_string();
    }
}

fn set_id(slot: &mut Option<i64>, value: &Value) {
    if let Some(id) = value.as_i64() {
        *slot = Some(id);
    }
}

fn set_timestamp(slot: &mut Option<NaiveDateTime>, value: &Value) {
    let Some(raw) = value.as_str() else {
        return;
    };
    match parse_timestamp(raw) {
        Some(ts) => *slot = Some(ts),
        None => tracing::debug!("Ignoring unparseable Core timestamp {:?}", raw),
    }
}
