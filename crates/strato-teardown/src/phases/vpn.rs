use crate::error::Result;
use crate::orchestrator::PhaseRun;
use strato_cloud::{ListFilter, ResourceKind};

/// Sessions, then endpoints, then the service, one VPN service at a time
pub(super) async fn vpn_resources(run: &mut PhaseRun<'_>) -> Result<()> {
    let services = run.list_in_vpc(ResourceKind::VpnService).await?;

    for service in &services {
        let sessions = run
            .list(ResourceKind::VpnSession, ListFilter::vpn_service(&service.id))
            .await?;
        run.delete_all(&sessions).await;

        let endpoints = run
            .list(ResourceKind::VpnEndpoint, ListFilter::vpn_service(&service.id))
            .await?;
        run.delete_all(&endpoints).await;

        run.delete_one(service).await;
    }
    Ok(())
}
