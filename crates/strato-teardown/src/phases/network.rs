//! Routers and everything attached to them
//!
//! Per router: every network under it (cluster IP addresses, NAT rules, then
//! the network), then floating IPs assigned to the router are unassigned and
//! the router itself is deleted.

use crate::error::Result;
use crate::orchestrator::PhaseRun;
use crate::step::Step;
use strato_cloud::model::{ATTR_IP_TYPE, ATTR_ROUTER_ID, IP_TYPE_CLUSTER, clear_reference};
use strato_cloud::{ListFilter, ResourceKind, ResourceRef};

pub(super) async fn network_resources(run: &mut PhaseRun<'_>) -> Result<()> {
    let routers = run.list_in_vpc(ResourceKind::Router).await?;

    for router in &routers {
        let networks = run
            .list(ResourceKind::Network, ListFilter::router(&router.id))
            .await?;

        for network in &networks {
            let addresses = run
                .list(ResourceKind::IpAddress, ListFilter::network(&network.id))
                .await?;
            let cluster: Vec<ResourceRef> = addresses
                .into_iter()
                .filter(is_cluster_address)
                .collect();
            run.delete_all(&cluster).await;

            let nat_rules = run
                .list(ResourceKind::NatRule, ListFilter::network(&network.id))
                .await?;
            run.delete_all(&nat_rules).await;

            run.delete_one(network).await;
        }

        let floating_ips = run
            .list(ResourceKind::FloatingIp, ListFilter::router(&router.id))
            .await?;
        for floating_ip in &floating_ips {
            run.patch_one(Step::unassign(floating_ip), clear_reference(ATTR_ROUTER_ID))
                .await;
        }

        run.delete_one(router).await;
    }
    Ok(())
}

/// Floating IPs still scoped to the VPC once routers are gone
pub(super) async fn remaining_floating_ips(run: &mut PhaseRun<'_>) -> Result<()> {
    let floating_ips = run.list_in_vpc(ResourceKind::FloatingIp).await?;
    run.delete_all(&floating_ips).await;
    Ok(())
}

/// Only addresses the platform allocated for the cluster are removed
fn is_cluster_address(address: &ResourceRef) -> bool {
    address.attribute_str(ATTR_IP_TYPE) == Some(IP_TYPE_CLUSTER)
}
