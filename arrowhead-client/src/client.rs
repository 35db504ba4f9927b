//! High-level Arrowhead client bound to one local system.

use std::time::Duration;
use arrowhead_shared::messages::{
    build_orchestration_request, build_register_service, build_register_system,
    build_unregister_service,
};
use arrowhead_shared::protocol::DEFAULT_INTERFACE;
use arrowhead_shared::{Hydrate, Interface, ServerConfig, Service, System};
use serde_json::Value;
use crate::connector::{Connector, HttpConnector, DEFAULT_TIMEOUT};
use crate::credentials::Pkcs12Credentials;
use crate::error::Result;

/// A local system talking to the Arrowhead Core through a [`Connector`].
///
/// Responses from the Core are merged back into the local [`System`] and
/// [`Service`] values, so IDs and timestamps become available after a
/// successful registration.
///
/// # Example
///
/// ```no_run
/// use arrowhead_client::{ArrowheadClient, Pkcs12Credentials};
/// use arrowhead_shared::{Interface, ServerConfig, Service};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Pkcs12Credentials::new(
///     "certs/sensor.p12",
///     "secret",
///     "certs/sensor.pub",
///     "certs/ca.pem",
/// );
/// let mut client = ArrowheadClient::pkcs12(
///     "sensor",
///     "10.0.0.5",
///     8080,
///     &credentials,
///     ServerConfig::new("10.0.0.1"),
///     vec![Interface::new("HTTP-SECURE-JSON")],
/// )?;
///
/// client.register_system().await?;
///
/// let mut temperature = Service::new("temperature");
/// client.register_service(&mut temperature).await?;
/// println!("Registered with ID {:?}", temperature.id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ArrowheadClient<C> {
    system: System,
    connector: C,
}

impl ArrowheadClient<HttpConnector> {
    /// Client authenticating with a PKCS#12 certificate. The public key is
    /// read from `credentials.pubfile`.
    pub fn pkcs12(
        name: impl Into<String>,
        address: impl Into<String>,
        port: u16,
        credentials: &Pkcs12Credentials,
        server: ServerConfig,
        interfaces: Vec<Interface>,
    ) -> Result<Self> {
        Self::pkcs12_with_timeout(
            System::new(name, address, port).with_interfaces(interfaces),
            credentials,
            server,
            DEFAULT_TIMEOUT,
        )
    }

    /// Same as [`ArrowheadClient::pkcs12`] for a prepared system and timeout.
    /// The system's `pubkey` is replaced by the key from `credentials`.
    pub fn pkcs12_with_timeout(
        system: System,
        credentials: &Pkcs12Credentials,
        server: ServerConfig,
        timeout: Duration,
    ) -> Result<Self> {
        let pubkey = credentials.public_key()?;
        let connector = HttpConnector::pkcs12(server, credentials, timeout)?;
        Ok(Self::new(system.with_pubkey(pubkey), connector))
    }
}

impl<C: Connector> ArrowheadClient<C> {
    pub fn new(system: System, connector: C) -> Self {
        Self { system, connector }
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Interface announced for services: the first declared one, or
    /// `HTTP-INSECURE-JSON`.
    pub fn interface(&self) -> &str {
        self.system
            .interfaces
            .first()
            .map(Interface::interface_name)
            .unwrap_or(DEFAULT_INTERFACE)
    }

    /// Register the local system with the Service Registry.
    pub async fn register_system(&mut self) -> Result<()> {
        let message = build_register_system(&self.system);
        let response = self.connector.register_system(&message).await?;

        self.system.update_from_value(&response.payload);
        Ok(())
    }

    /// Register `service` as provided by the local system.
    ///
    /// On success the service, the system and its matching interfaces are
    /// updated with the IDs assigned by the Core.
    pub async fn register_service(&mut self, service: &mut Service) -> Result<()> {
        let message = build_register_service(self.interface(), &self.system, service);
        let response = self.connector.register_service(&message).await?;
        let payload = &response.payload;

        service.update_from_value(&payload["serviceDefinition"]);
        self.system.update_from_value(&payload["provider"]);

        if let Some(remote) = payload["interfaces"].as_array() {
            for entry in remote {
                let Some(name) = entry.get("interfaceName").and_then(Value::as_str) else {
                    continue;
                };
                if let Some(local) = self.system.interfaces.iter_mut().find(|i| i.name == name) {
                    local.update_from_value(entry);
                }
            }
        }
        Ok(())
    }

    /// Remove `service` of the local system from the Service Registry.
    pub async fn unregister_service(&self, service: &Service) -> Result<()> {
        let message = build_unregister_service(&self.system, service);
        self.connector.unregister_service(&message).await?;
        Ok(())
    }

    /// All providers of `service` the Orchestrator returns, in its order.
    pub async fn providers(&self, service: &Service) -> Result<Vec<System>> {
        let message = build_orchestration_request(self.interface(), &self.system, service);
        let response = self.connector.orchestrate(&message).await?;

        let providers = response.payload["response"]
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| System::from_core(&entry["provider"]))
                    .collect()
            })
            .unwrap_or_default();
        Ok(providers)
    }

    /// First provider of `service`, if any.
    pub async fn orchestrate(&self, service: &Service) -> Result<Option<System>> {
        Ok(self.providers(service).await?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use async_trait::async_trait;
    use reqwest::Method;
    use serde_json::json;
    use crate::connector::{CoreRequest, CoreResponse, Operation};
    use crate::error::ClientError;

    /// Replays canned responses and records every request.
    struct RecordingConnector {
        server: ServerConfig,
        responses: Mutex<VecDeque<CoreResponse>>,
        requests: Mutex<Vec<CoreRequest>>,
    }

    impl RecordingConnector {
        fn new(responses: Vec<CoreResponse>) -> Self {
            Self {
                server: ServerConfig::new("core.local"),
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<CoreRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Connector for RecordingConnector {
        fn server(&self) -> &ServerConfig {
            &self.server
        }

        async fn send(&self, request: CoreRequest) -> Result<CoreResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no canned response left"))
        }
    }

    fn client(responses: Vec<CoreResponse>) -> ArrowheadClient<RecordingConnector> {
        let system = System::new("sensor", "10.0.0.5", 8080)
            .with_pubkey("PUBKEY")
            .with_interfaces([Interface::new("HTTP-SECURE-JSON")]);
        ArrowheadClient::new(system, RecordingConnector::new(responses))
    }

    #[test]
    fn test_default_interface() {
        let bare = ArrowheadClient::new(
            System::new("consumer", "10.0.0.9", 0),
            RecordingConnector::new(vec![]),
        );
        assert_eq!(bare.interface(), "HTTP-INSECURE-JSON");
        assert_eq!(client(vec![]).interface(), "HTTP-SECURE-JSON");
    }

    #[tokio::test]
    async fn test_register_system_hydrates() {
        let mut client = client(vec![CoreResponse::new(
            201,
            json!({
                "id": 17,
                "systemName": "sensor",
                "address": "10.0.0.5",
                "port": 8080,
                "authenticationInfo": "PUBKEY",
                "createdAt": "2021-03-14 10:20:30",
            }),
        )]);

        client.register_system().await.unwrap();
        assert_eq!(client.system().id, Some(17));
        assert!(client.system().created_at.is_some());

        let requests = client.connector().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://core.local:8443/serviceregistry/register-system"
        );
        assert_eq!(requests[0].method(), Method::POST);
        assert_eq!(
            requests[0].body,
            Some(json!({
                "systemName": "sensor",
                "authenticationInfo": "PUBKEY",
                "address": "10.0.0.5",
                "port": 8080,
            }))
        );
    }

    #[tokio::test]
    async fn test_register_service_hydrates_service_system_and_interfaces() {
        let mut client = client(vec![CoreResponse::new(
            201,
            json!({
                "id": 99,
                "serviceDefinition": {
                    "id": 5,
                    "serviceDefinition": "temperature",
                    "createdAt": "2021-03-14 10:20:30",
                },
                "provider": { "id": 17, "systemName": "sensor" },
                "interfaces": [
                    { "id": 2, "interfaceName": "HTTP-SECURE-JSON" },
                    { "id": 3, "interfaceName": "COAP-SECURE-CBOR" },
                ],
                "version": 1,
            }),
        )]);

        let mut service = Service::new("temperature");
        client.register_service(&mut service).await.unwrap();

        assert_eq!(service.id, Some(5));
        assert!(service.created_at.is_some());
        assert_eq!(client.system().id, Some(17));
        assert_eq!(client.system().interfaces.len(), 1);
        assert_eq!(client.system().interfaces[0].id, Some(2));

        let requests = client.connector().requests();
        assert_eq!(requests[0].operation, Operation::RegisterService);
        let body = requests[0].body.as_ref().unwrap();
        assert_eq!(body["interfaces"], json!(["HTTP-SECURE-JSON"]));
        assert_eq!(body["secure"], json!("CERTIFICATE"));
    }

    #[tokio::test]
    async fn test_unregister_service_uses_query() {
        let client = client(vec![CoreResponse::new(200, Value::Null)]);

        client
            .unregister_service(&Service::new("temperature"))
            .await
            .unwrap();

        let requests = client.connector().requests();
        assert_eq!(requests[0].method(), Method::DELETE);
        assert_eq!(requests[0].url, "https://core.local:8443/serviceregistry/unregister");
        assert!(requests[0].body.is_none());
        assert!(requests[0]
            .query
            .contains(&("system_name".to_string(), "sensor".to_string())));
    }

    #[tokio::test]
    async fn test_orchestrate_returns_first_provider() {
        let client = client(vec![CoreResponse::new(
            200,
            json!({
                "response": [
                    { "provider": { "id": 1, "systemName": "thermo-a", "address": "10.0.0.20", "port": 9001 } },
                    { "provider": { "id": 2, "systemName": "thermo-b", "address": "10.0.0.21", "port": 9002 } },
                ]
            }),
        )]);

        let provider = client
            .orchestrate(&Service::new("temperature"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(provider.name, "thermo-a");
        assert_eq!(provider.address, "10.0.0.20");
        assert_eq!(provider.port, 9001);

        let requests = client.connector().requests();
        assert_eq!(requests[0].url, "https://core.local:8441/orchestrator/orchestration");
    }

    #[tokio::test]
    async fn test_orchestrate_without_providers() {
        let client = client(vec![CoreResponse::new(200, json!({ "response": [] }))]);

        let provider = client.orchestrate(&Service::new("humidity")).await.unwrap();
        assert!(provider.is_none());
    }

    #[tokio::test]
    async fn test_orchestrate_malformed_result() {
        let client = client(vec![CoreResponse::new(200, json!({ "unexpected": true }))]);

        let result = client.orchestrate(&Service::new("humidity")).await;
        assert!(matches!(result, Err(ClientError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_failure_leaves_local_state_untouched() {
        let mut client = client(vec![CoreResponse::new(
            401,
            json!({ "id": 123, "errorMessage": "Unauthorized" }),
        )]);

        let err = client.register_system().await.unwrap_err();
        match err {
            ClientError::Core { status, operation, message } => {
                assert_eq!(status, 401);
                assert_eq!(operation, Operation::RegisterSystem);
                assert!(message.starts_with(
                    "Client is not authorized for communication with the Service Registry."
                ));
            }
            other => panic!("Expected Core error, got {:?}", other),
        }
        assert_eq!(client.system().id, None);
    }
}
