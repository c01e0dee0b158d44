//! Attaching volumes to instances.

use tracing::{debug, info};

use crate::classify::{ErrorClass, Transition, classify};
use crate::node::RelationshipEnd;
use crate::outcome::{LifecycleResult, Outcome};
use crate::provider::ProviderClient;
use crate::registry;

use super::{VolumeLifecycle, terminal};

impl<P: ProviderClient> VolumeLifecycle<P> {
    /// Attaches the source volume to the target instance and records the
    /// volume id in the target's `volumes` list.
    ///
    /// When both ends are external resources only the bookkeeping is done.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LifecycleError::MissingResourceId`] when either end
    /// has no recorded id and [`crate::LifecycleError::Provider`] when the
    /// provider rejects the attachment for a reason other than the volume not
    /// being available yet.
    pub async fn attach(
        &self,
        source: &RelationshipEnd,
        target: &mut RelationshipEnd,
    ) -> LifecycleResult {
        let volume_id =
            registry::external_resource_id_or_fail(&source.runtime_properties, "attach volume")?;
        let instance_id =
            registry::external_resource_id_or_fail(&target.runtime_properties, "attach volume")?;

        if registry::end_is_external(source) && registry::end_is_external(target) {
            info!(
                volume_id = %volume_id,
                instance_id = %instance_id,
                "volume and instance are external resources; recording attachment only"
            );
            registry::append_volume(&mut target.runtime_properties, &volume_id);
            return Ok(Outcome::Complete);
        }

        debug!(volume_id = %volume_id, instance_id = %instance_id, "attempting to attach volume");
        let device = registry::device(&source.runtime_properties);
        if let Err(err) = self
            .provider
            .attach_volume(&instance_id, &volume_id, device)
            .await
        {
            return match classify(&err, Transition::Attach) {
                ErrorClass::TransientConflict => {
                    Ok(Outcome::retry("volume not available; retrying"))
                }
                ErrorClass::NotFound | ErrorClass::Terminal => Err(terminal(&err)),
            };
        }

        info!(volume_id = %volume_id, instance_id = %instance_id, "attached volume");
        registry::append_volume(&mut target.runtime_properties, &volume_id);
        Ok(Outcome::Complete)
    }
}
