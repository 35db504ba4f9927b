use arrowhead_client::{ArrowheadClient, Connector};
use arrowhead_shared::Service;
use crate::config::ServiceConfig;

/// Register the system and every configured service.
///
/// A failed system registration is logged and does not stop the services
/// from being registered, since the Core rejects re-registration of a
/// system that is already known. Returns the services that were accepted.
pub async fn register_all<C: Connector>(
    client: &mut ArrowheadClient<C>,
    provided: &[ServiceConfig],
) -> Vec<Service> {
    if let Err(e) = client.register_system().await {
        tracing::warn!("System registration failed: {}", e);
    }

    if client.system().is_consumer_only() && !provided.is_empty() {
        tracing::warn!(
            "System {} has port 0 but provides {} services",
            client.system().name,
            provided.len()
        );
    }

    let mut registered = Vec::with_capacity(provided.len());
    for config in provided {
        let mut service = config.to_service();
        match client.register_service(&mut service).await {
            Ok(()) => registered.push(service),
            Err(e) => tracing::error!("Failed to register service {}: {}", service.name, e),
        }
    }

    tracing::info!(
        "Registered {}/{} services for {}",
        registered.len(),
        provided.len(),
        client.system().name
    );
    registered
}

/// Look up each consumed service and log the provider the Orchestrator picks.
pub async fn discover_all<C: Connector>(client: &ArrowheadClient<C>, consumed: &[ServiceConfig]) {
    for config in consumed {
        let service = config.to_service();
        match client.orchestrate(&service).await {
            Ok(Some(provider)) => tracing::info!(
                "Service {} provided by {} at {}:{}",
                service.name,
                provider.name,
                provider.address,
                provider.port
            ),
            Ok(None) => tracing::warn!("No provider found for service {}", service.name),
            Err(e) => tracing::error!("Orchestration of {} failed: {}", service.name, e),
        }
    }
}

/// Remove previously registered services. Errors are logged and skipped.
pub async fn unregister_all<C: Connector>(client: &ArrowheadClient<C>, registered: &[Service]) {
    for service in registered {
        if let Err(e) = client.unregister_service(service).await {
            tracing::error!("Failed to unregister service {}: {}", service.name, e);
        }
    }
}
