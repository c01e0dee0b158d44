//! Detaching volumes from instances.

use tracing::{debug, info};

use crate::node::RelationshipEnd;
use crate::outcome::{LifecycleResult, Outcome};
use crate::provider::ProviderClient;
use crate::registry;

use super::{VolumeLifecycle, terminal};

impl<P: ProviderClient> VolumeLifecycle<P> {
    /// Detaches the source volume and removes it from the target's `volumes`
    /// list.
    ///
    /// When both ends are external resources only the bookkeeping is done.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LifecycleError::MissingResourceId`] when either end
    /// has no recorded id and [`crate::LifecycleError::Provider`] when the
    /// provider rejects the detachment.
    pub async fn detach(
        &self,
        source: &RelationshipEnd,
        target: &mut RelationshipEnd,
    ) -> LifecycleResult {
        let volume_id =
            registry::external_resource_id_or_fail(&source.runtime_properties, "detach volume")?;
        let instance_id =
            registry::external_resource_id_or_fail(&target.runtime_properties, "detach volume")?;

        if registry::end_is_external(source) && registry::end_is_external(target) {
            info!(
                volume_id = %volume_id,
                instance_id = %instance_id,
                "volume and instance are external resources; recording detachment only"
            );
            registry::remove_volume(&mut target.runtime_properties, &volume_id);
            return Ok(Outcome::Complete);
        }

        debug!(volume_id = %volume_id, "attempting to detach volume");
        self.provider
            .detach_volume(&volume_id)
            .await
            .map_err(|err| terminal(&err))?;

        registry::remove_volume(&mut target.runtime_properties, &volume_id);
        info!(volume_id = %volume_id, instance_id = %instance_id, "detached volume");
        Ok(Outcome::Complete)
    }
}
