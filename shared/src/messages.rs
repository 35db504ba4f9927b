//! Request bodies sent to the Arrowhead Core.
//!
//! Field names follow the Core's JSON contract; the builders only copy
//! data from the local entities.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::protocol::SECURE_CERTIFICATE;
use crate::types::{Service, System};

/// `POST serviceregistry/register-system`
///
/// `port` may be 0 for a consuming system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSystemRequest {
    pub system_name: String,
    /// Public key, required by the Core with `CERTIFICATE` security
    pub authentication_info: String,
    pub address: String,
    pub port: u16,
}

/// `POST serviceregistry/register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterServiceRequest {
    pub interfaces: Vec<String>,
    pub provider_system: RegisterSystemRequest,
    pub service_definition: String,
    pub secure: String,
    pub version: u32,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

/// `DELETE serviceregistry/unregister`, sent as URL query parameters.
/// A provider may only remove its own services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnregisterServiceRequest {
    pub address: String,
    pub port: u16,
    pub system_name: String,
    pub service_definition: String,
}

impl UnregisterServiceRequest {
    /// Query pairs in the order the Service Registry documents them
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("address".to_string(), self.address.clone()),
            ("port".to_string(), self.port.to_string()),
            ("system_name".to_string(), self.system_name.clone()),
            ("service_definition".to_string(), self.service_definition.clone()),
        ]
    }
}

/// `POST orchestrator/orchestration`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationRequest {
    pub requester_system: RegisterSystemRequest,
    pub requested_service: RequestedService,
    pub orchestration_flags: OrchestrationFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedService {
    pub service_definition_requirement: String,
    pub interface_requirements: Vec<String>,
    pub version_requirement: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationFlags {
    /// Ask the Orchestrator to search the Service Registry instead of its store
    pub override_store: bool,
}

impl Default for OrchestrationFlags {
    fn default() -> Self {
        Self {
            override_store: true,
        }
    }
}

pub fn build_register_system(system: &System) -> RegisterSystemRequest {
    RegisterSystemRequest {
        system_name: system.name.clone(),
        authentication_info: system.pubkey.clone(),
        address: system.address.clone(),
        port: system.port,
    }
}

pub fn build_register_service(
    interface: &str,
    system: &System,
    service: &Service,
) -> RegisterServiceRequest {
    RegisterServiceRequest {
        interfaces: vec![interface.to_string()],
        provider_system: build_register_system(system),
        service_definition: service.name.clone(),
        secure: SECURE_CERTIFICATE.to_string(),
        version: service.version,
        metadata: service.metadata.clone(),
    }
}

pub fn build_unregister_service(system: &System, service: &Service) -> UnregisterServiceRequest {
    UnregisterServiceRequest {
        address: system.address.clone(),
        port: system.port,
        system_name: system.name.clone(),
        service_definition: service.name.clone(),
    }
}

pub fn build_orchestration_request(
    interface: &str,
    system: &System,
    service: &Service,
) -> OrchestrationRequest {
    OrchestrationRequest {
        requester_system: build_register_system(system),
        requested_service: RequestedService {
            service_definition_requirement: service.name.clone(),
            interface_requirements: vec![interface.to_string()],
            version_requirement: service.version,
        },
        orchestration_flags: OrchestrationFlags::default(),
    }
}
