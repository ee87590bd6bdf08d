use crate::error::Result;
use crate::orchestrator::PhaseRun;
use strato_cloud::{ListFilter, ResourceKind};

/// Member hosts first, then their group
pub(super) async fn host_resources(run: &mut PhaseRun<'_>) -> Result<()> {
    let groups = run.list_in_vpc(ResourceKind::HostGroup).await?;

    for group in &groups {
        let hosts = run
            .list(ResourceKind::Host, ListFilter::host_group(&group.id))
            .await?;
        run.delete_all(&hosts).await;
        run.delete_one(group).await;
    }
    Ok(())
}
