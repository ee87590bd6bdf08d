use crate::error::Result;
use crate::orchestrator::PhaseRun;
use crate::step::Step;
use strato_cloud::ResourceKind;
use strato_cloud::model::{ATTR_VOLUME_GROUP_ID, clear_reference};

/// Ungroup grouped volumes, delete every volume, then every volume group
pub(super) async fn volume_resources(run: &mut PhaseRun<'_>) -> Result<()> {
    let volumes = run.list_in_vpc(ResourceKind::Volume).await?;

    for volume in volumes
        .iter()
        .filter(|v| v.attribute_str(ATTR_VOLUME_GROUP_ID).is_some())
    {
        run.patch_one(Step::ungroup(volume), clear_reference(ATTR_VOLUME_GROUP_ID))
            .await;
    }
    run.delete_all(&volumes).await;

    let groups = run.list_in_vpc(ResourceKind::VolumeGroup).await?;
    run.delete_all(&groups).await;
    Ok(())
}

pub(super) async fn private_images(run: &mut PhaseRun<'_>) -> Result<()> {
    let images = run.list_in_vpc(ResourceKind::PrivateImage).await?;
    run.delete_all(&images).await;
    Ok(())
}
