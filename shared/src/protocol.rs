/// Service Registry endpoint for system registration
pub const REGISTER_SYSTEM_PATH: &str = "register-system";

/// Service Registry endpoint for service registration
pub const REGISTER_SERVICE_PATH: &str = "register";

/// Service Registry endpoint for service removal (DELETE with query)
pub const UNREGISTER_SERVICE_PATH: &str = "unregister";

/// Orchestrator endpoint for service discovery
pub const ORCHESTRATION_PATH: &str = "orchestration";

/// Interface used when a system does not declare one,
/// following the PROTOCOL-SECURE/INSECURE-FORMAT naming pattern
pub const DEFAULT_INTERFACE: &str = "HTTP-INSECURE-JSON";

/// Security level announced when registering a service
pub const SECURE_CERTIFICATE: &str = "CERTIFICATE";

/// Default Core address
pub const DEFAULT_CORE_ADDRESS: &str = "127.0.0.1";

pub const DEFAULT_ORCHESTRATOR_PORT: u16 = 8441;
pub const DEFAULT_SERVICE_REGISTRY_PORT: u16 = 8443;
pub const DEFAULT_AUTHORIZATION_PORT: u16 = 8445;

/// Timestamp layout used by the Core in `createdAt` / `updatedAt`
pub const CORE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
