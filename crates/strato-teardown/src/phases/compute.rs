use crate::error::Result;
use crate::orchestrator::PhaseRun;
use strato_cloud::ResourceKind;

pub(super) async fn affinity_rules(run: &mut PhaseRun<'_>) -> Result<()> {
    let rules = run.list_in_vpc(ResourceKind::AffinityRule).await?;
    run.delete_all(&rules).await;
    Ok(())
}

pub(super) async fn instances(run: &mut PhaseRun<'_>) -> Result<()> {
    let instances = run.list_in_vpc(ResourceKind::Instance).await?;
    run.delete_all(&instances).await;
    Ok(())
}

pub(super) async fn load_balancers(run: &mut PhaseRun<'_>) -> Result<()> {
    let load_balancers = run.list_in_vpc(ResourceKind::LoadBalancer).await?;
    run.delete_all(&load_balancers).await;
    Ok(())
}
