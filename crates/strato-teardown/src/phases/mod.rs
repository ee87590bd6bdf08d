//! Per-phase listing and deletion logic

mod compute;
mod container;
mod hosts;
mod network;
mod storage;
mod vpn;

use crate::error::Result;
use crate::orchestrator::PhaseRun;
use crate::phase::Phase;

/// Run the body of `run`'s phase
pub(crate) async fn execute(run: &mut PhaseRun<'_>) -> Result<()> {
    match run.phase() {
        Phase::AffinityRules => compute::affinity_rules(run).await,
        Phase::Instances => compute::instances(run).await,
        Phase::LoadBalancers => compute::load_balancers(run).await,
        Phase::VpnResources => vpn::vpn_resources(run).await,
        Phase::NetworkResources => network::network_resources(run).await,
        Phase::FloatingIps => network::remaining_floating_ips(run).await,
        Phase::VolumeResources => storage::volume_resources(run).await,
        Phase::HostResources => hosts::host_resources(run).await,
        Phase::PrivateImages => storage::private_images(run).await,
        Phase::Container => container::vpc(run).await,
    }
}
