use tracing::{error, info};

use crate::clients::ResourcePolicyService;
use crate::config::RestConfig;
use crate::framework::{FrameworkError, HttpTransport, RequestActor, RestDataService, RestTransport};

/// The runtime orchestrator of the access layer.
///
/// `PolicyAccessSystem` is responsible for:
/// - **Lifecycle Management**: Starting and stopping the request cache
/// - **Dependency Wiring**: config -> transport -> request cache -> data service -> typed service
///
/// # Example
///
/// ```ignore
/// let system = PolicyAccessSystem::new(&RestConfig::from_env()?)?;
///
/// let mut policies = system.policies.search_by_resource("res-1", Some(ActionType::Read)).await;
/// let page = policies.completed().await;
///
/// system.shutdown().await?;
/// ```
pub struct PolicyAccessSystem {
    /// Typed access to resource policies
    pub policies: ResourcePolicyService,

    /// Task handle of the request cache (used for graceful shutdown)
    handle: tokio::task::JoinHandle<()>,
}

impl PolicyAccessSystem {
    /// Creates the system over HTTP.
    pub fn new(config: &RestConfig) -> Result<Self, FrameworkError> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, transport))
    }

    /// Creates the system over any transport.
    ///
    /// This method:
    /// 1. Spawns the request cache on `transport`
    /// 2. Builds the data service from the configured endpoints
    /// 3. Wraps it in the typed services
    pub fn with_transport<R: RestTransport>(config: &RestConfig, transport: R) -> Self {
        let (actor, client) = RequestActor::new(config.request_buffer, config.cache_ttl(), transport);
        let handle = tokio::spawn(actor.run());

        let data_service = RestDataService::new(client, config.endpoint());
        info!(rest_url = %config.rest_url, "Policy access started");

        Self {
            policies: ResourcePolicyService::new(data_service),
            handle,
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the services closes the request cache's channel; transport calls
    /// still in flight finish in the background and publish to any handle that
    /// is still observed.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down policy access...");
        drop(self.policies);

        if let Err(e) = self.handle.await {
            error!("Request cache task failed: {:?}", e);
            return Err(format!("Request cache task failed: {:?}", e));
        }

        info!("Shutdown complete.");
        Ok(())
    }
}
