//! Pluggable transport to the Arrowhead Core.
//!
//! A [`Connector`] only has to know how to put a [`CoreRequest`] on the wire.
//! The four Core operations are provided on top of [`Connector::send`]: they
//! build the URL from the [`ServerConfig`], send the message and turn any
//! status of 300 or above into [`ClientError::Core`].

mod http;
mod report;

pub use self::http::{HttpConnector, DEFAULT_TIMEOUT};
pub use self::report::describe_failure;

use std::fmt;
use arrowhead_shared::messages::{
    OrchestrationRequest, RegisterServiceRequest, RegisterSystemRequest, UnregisterServiceRequest,
};
use arrowhead_shared::protocol::{
    ORCHESTRATION_PATH, REGISTER_SERVICE_PATH, REGISTER_SYSTEM_PATH, UNREGISTER_SERVICE_PATH,
};
use arrowhead_shared::{CoreSystem, ServerConfig};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use crate::error::{ClientError, Result};

/// A request/response exchange with one of the Core systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    RegisterSystem,
    RegisterService,
    UnregisterService,
    Orchestrate,
}

impl Operation {
    pub fn core_system(self) -> CoreSystem {
        match self {
            Operation::Orchestrate => CoreSystem::Orchestrator,
            _ => CoreSystem::ServiceRegistry,
        }
    }

    /// Endpoint path relative to the Core system URL
    pub fn path(self) -> &'static str {
        match self {
            Operation::RegisterSystem => REGISTER_SYSTEM_PATH,
            Operation::RegisterService => REGISTER_SERVICE_PATH,
            Operation::UnregisterService => UNREGISTER_SERVICE_PATH,
            Operation::Orchestrate => ORCHESTRATION_PATH,
        }
    }

    pub fn method(self) -> Method {
        match self {
            Operation::UnregisterService => Method::DELETE,
            _ => Method::POST,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Operation::RegisterSystem => "register system",
            Operation::RegisterService => "register service",
            Operation::UnregisterService => "unregister service",
            Operation::Orchestrate => "orchestrate",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A fully resolved request to a Core system.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreRequest {
    pub operation: Operation,
    pub url: String,
    /// JSON body, if any
    pub body: Option<Value>,
    /// URL query parameters
    pub query: Vec<(String, String)>,
}

impl CoreRequest {
    pub fn method(&self) -> Method {
        self.operation.method()
    }
}

/// Status and decoded body of a Core response.
///
/// The payload is `Null` for an empty body and a JSON string when the body
/// is not JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreResponse {
    pub status: u16,
    pub payload: Value,
}

impl CoreResponse {
    pub fn new(status: u16, payload: Value) -> Self {
        Self { status, payload }
    }

    pub fn is_success(&self) -> bool {
        self.status < 300
    }
}

/// Decode a response body into a payload.
pub fn parse_payload(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

#[async_trait]
pub trait Connector: Send + Sync {
    /// Location of the Core this connector talks to
    fn server(&self) -> &ServerConfig;

    /// Perform a single HTTP exchange. Must not interpret the status code.
    async fn send(&self, request: CoreRequest) -> Result<CoreResponse>;

    fn request(&self, operation: Operation) -> CoreRequest {
        CoreRequest {
            operation,
            url: format!(
                "{}{}",
                self.server().url(operation.core_system()),
                operation.path()
            ),
            body: None,
            query: Vec::new(),
        }
    }

    /// Send a request and map a non-success status to [`ClientError::Core`].
    async fn dispatch(&self, request: CoreRequest) -> Result<CoreResponse> {
        let operation = request.operation;
        tracing::debug!(
            operation = %operation,
            method = %request.method(),
            url = %request.url,
            "Sending request to Core"
        );

        let response = self.send(request).await?;
        if response.is_success() {
            return Ok(response);
        }

        let message = describe_failure(response.status, operation, &response.payload);
        tracing::warn!(status = response.status, operation = %operation, "{}", message);
        Err(ClientError::Core {
            status: response.status,
            operation,
            message,
        })
    }

    async fn register_system(&self, message: &RegisterSystemRequest) -> Result<CoreResponse> {
        let mut request = self.request(Operation::RegisterSystem);
        request.body = Some(serde_json::to_value(message)?);

        let response = self.dispatch(request).await?;
        match response.payload.get("id").and_then(Value::as_i64) {
            Some(id) => tracing::info!("System registered with ID: {}", id),
            None => tracing::info!("System {} registered", message.system_name),
        }
        Ok(response)
    }

    async fn register_service(&self, message: &RegisterServiceRequest) -> Result<CoreResponse> {
        let mut request = self.request(Operation::RegisterService);
        request.body = Some(serde_json::to_value(message)?);

        let response = self.dispatch(request).await?;
        let id = |pointer: &str| response.payload.pointer(pointer).and_then(Value::as_i64);
        tracing::info!(
            interface_id = ?id("/interfaces/0/id"),
            provider_id = ?id("/provider/id"),
            service_id = ?id("/serviceDefinition/id"),
            "Service {} registered",
            message.service_definition
        );
        Ok(response)
    }

    async fn unregister_service(&self, message: &UnregisterServiceRequest) -> Result<CoreResponse> {
        let mut request = self.request(Operation::UnregisterService);
        request.query = message.query_pairs();

        let mut response = self.dispatch(request).await?;
        tracing::info!("Service {} unregistered", message.service_definition);
        // The Service Registry answers unregistration without content
        response.payload = Value::Null;
        Ok(response)
    }

    async fn orchestrate(&self, message: &OrchestrationRequest) -> Result<CoreResponse> {
        let mut request = self.request(Operation::Orchestrate);
        request.body = Some(serde_json::to_value(message)?);

        let response = self.dispatch(request).await?;
        let providers = response
            .payload
            .get("response")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ClientError::InvalidResponse("orchestration result has no 'response' list".into())
            })?;

        tracing::info!("Found {} service providers", providers.len());
        for (i, entry) in providers.iter().enumerate() {
            let provider = &entry["provider"];
            tracing::info!(
                "{}: {}:{}",
                i + 1,
                provider["address"].as_str().unwrap_or("?"),
                provider["port"].as_u64().unwrap_or(0)
            );
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_routing() {
        assert_eq!(Operation::Orchestrate.core_system(), CoreSystem::Orchestrator);
        assert_eq!(Operation::RegisterSystem.core_system(), CoreSystem::ServiceRegistry);
        assert_eq!(Operation::UnregisterService.method(), Method::DELETE);
        assert_eq!(Operation::RegisterService.method(), Method::POST);
        assert_eq!(Operation::RegisterSystem.path(), "register-system");
        assert_eq!(Operation::UnregisterService.to_string(), "unregister service");
    }

    #[test]
    fn test_parse_payload() {
        assert_eq!(parse_payload(""), Value::Null);
        assert_eq!(parse_payload("  \n"), Value::Null);
        assert_eq!(parse_payload(r#"{"id": 1}"#), json!({ "id": 1 }));
        assert_eq!(parse_payload("Bad Gateway"), json!("Bad Gateway"));
    }

    #[test]
    fn test_success_threshold() {
        assert!(CoreResponse::new(200, Value::Null).is_success());
        assert!(CoreResponse::new(201, Value::Null).is_success());
        assert!(CoreResponse::new(204, Value::Null).is_success());
        assert!(!CoreResponse::new(300, Value::Null).is_success());
        assert!(!CoreResponse::new(400, Value::Null).is_success());
    }
}
