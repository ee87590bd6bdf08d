//! Ordered teardown phases
//!
//! The order in [`Phase::ALL`] is the referential-integrity knowledge of the
//! teardown: a phase only runs after every phase whose resources reference
//! its own. [`Phase::must_follow`] spells those references out so the order
//! can be checked on its own.

use serde::Serialize;
use strato_cloud::ResourceKind;

/// One step of a VPC teardown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AffinityRules,
    Instances,
    LoadBalancers,
    VpnResources,
    NetworkResources,
    FloatingIps,
    VolumeResources,
    HostResources,
    PrivateImages,
    Container,
}

impl Phase {
    /// Execution order
    pub const ALL: [Phase; 10] = [
        Phase::AffinityRules,
        Phase::Instances,
        Phase::LoadBalancers,
        Phase::VpnResources,
        Phase::NetworkResources,
        Phase::FloatingIps,
        Phase::VolumeResources,
        Phase::HostResources,
        Phase::PrivateImages,
        Phase::Container,
    ];

    /// 1-based position in the run
    pub fn number(self) -> usize {
        self as usize + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::AffinityRules => "affinity rules",
            Phase::Instances => "instances",
            Phase::LoadBalancers => "load balancers",
            Phase::VpnResources => "VPN resources",
            Phase::NetworkResources => "network resources",
            Phase::FloatingIps => "remaining floating IPs",
            Phase::VolumeResources => "volume resources",
            Phase::HostResources => "host resources",
            Phase::PrivateImages => "private images",
            Phase::Container => "VPC",
        }
    }

    /// Phases holding resources that reference this phase's resources
    pub fn must_follow(self) -> &'static [Phase] {
        match self {
            Phase::AffinityRules => &[],
            // affinity rules name their member instances
            Phase::Instances => &[Phase::AffinityRules],
            Phase::LoadBalancers => &[],
            Phase::VpnResources => &[],
            // NICs, listeners and VPN gateways sit on networks and routers
            Phase::NetworkResources => &[
                Phase::Instances,
                Phase::LoadBalancers,
                Phase::VpnResources,
            ],
            // unassignment happens while routers are still around
            Phase::FloatingIps => &[Phase::Instances, Phase::NetworkResources],
            Phase::VolumeResources => &[Phase::Instances],
            Phase::HostResources => &[Phase::Instances],
            Phase::PrivateImages => &[Phase::Instances],
            Phase::Container => &[
                Phase::AffinityRules,
                Phase::Instances,
                Phase::LoadBalancers,
                Phase::VpnResources,
                Phase::NetworkResources,
                Phase::FloatingIps,
                Phase::VolumeResources,
                Phase::HostResources,
                Phase::PrivateImages,
            ],
        }
    }

    /// VPC-scoped kinds re-listed after the phase to find leftovers
    pub fn verified_kinds(self) -> &'static [ResourceKind] {
        match self {
            Phase::AffinityRules => &[ResourceKind::AffinityRule],
            Phase::Instances => &[ResourceKind::Instance],
            Phase::LoadBalancers => &[ResourceKind::LoadBalancer],
            Phase::VpnResources => &[ResourceKind::VpnService],
            Phase::NetworkResources => &[ResourceKind::Router],
            Phase::FloatingIps => &[ResourceKind::FloatingIp],
            Phase::VolumeResources => &[ResourceKind::Volume, ResourceKind::VolumeGroup],
            Phase::HostResources => &[ResourceKind::HostGroup],
            Phase::PrivateImages => &[ResourceKind::PrivateImage],
            Phase::Container => &[],
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_respects_dependencies() {
        for (position, phase) in Phase::ALL.iter().enumerate() {
            for earlier in phase.must_follow() {
                let earlier_position = Phase::ALL.iter().position(|p| p == earlier).unwrap();
                assert!(
                    earlier_position < position,
                    "{} must run before {}",
                    earlier,
                    phase
                );
            }
        }
    }

    #[test]
    fn test_container_is_last_and_follows_everything() {
        assert_eq!(Phase::ALL.last(), Some(&Phase::Container));
        assert_eq!(Phase::Container.must_follow().len(), Phase::ALL.len() - 1);
    }

    #[test]
    fn test_numbers_are_sequential() {
        let numbers: Vec<_> = Phase::ALL.iter().map(|p| p.number()).collect();
        assert_eq!(numbers, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_no_phase_depends_on_itself() {
        for phase in Phase::ALL {
            assert!(!phase.must_follow().contains(&phase));
        }
    }
}
