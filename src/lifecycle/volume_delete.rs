//! Volume deletion with confirmation.

use tracing::{debug, info, warn};

use crate::classify::{ErrorClass, Transition, classify};
use crate::node::{NodeInstance, VolumeProperties};
use crate::outcome::{LifecycleError, LifecycleResult, Outcome};
use crate::provider::ProviderClient;
use crate::registry;

use super::{VolumeLifecycle, terminal};

impl<P: ProviderClient> VolumeLifecycle<P> {
    /// Deletes a managed volume and clears its recorded id once the provider
    /// no longer lists it.
    ///
    /// Persistent and external volumes are left untouched. A volume that is
    /// already gone counts as deleted. A volume that is still attached, or
    /// still listed after the delete call, yields [`Outcome::Retry`] with the
    /// recorded id kept.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::MissingResourceId`] when no id was recorded
    /// and [`LifecycleError::Provider`] when deletion fails for any other
    /// reason.
    pub async fn delete(
        &self,
        properties: &VolumeProperties,
        instance: &mut NodeInstance,
    ) -> LifecycleResult {
        if properties.persistent {
            info!(instance = %instance.id, "volume is persistent; not deleting");
            return Ok(Outcome::Complete);
        }

        let runtime = &mut instance.runtime_properties;
        let volume_id = registry::external_resource_id_or_fail(runtime, "delete volume")?;

        let external =
            registry::recorded_as_external(runtime).unwrap_or(properties.use_external_resource);
        if external {
            info!(volume_id = %volume_id, "volume is an external resource; not deleting");
            return Ok(Outcome::Complete);
        }

        let Some(volume) = self.find_volume(Some(&volume_id)).await? else {
            warn!(
                volume_id = %volume_id,
                "unable to find volume; it does not exist or has already been deleted"
            );
            registry::clear_external_resource_id(runtime);
            return Ok(Outcome::Complete);
        };

        debug!(volume_id = %volume.id, "attempting to delete volume");
        let confirmed = match self.provider.delete_volume(&volume.id).await {
            Ok(confirmed) => confirmed,
            Err(err) => {
                return match classify(&err, Transition::Delete) {
                    ErrorClass::TransientConflict => {
                        Ok(Outcome::retry("volume still attached; retrying"))
                    }
                    ErrorClass::NotFound | ErrorClass::Terminal => Err(terminal(&err)),
                };
            }
        };

        if !confirmed {
            return Err(LifecycleError::provider(format!(
                "volume {} deletion failed for an unknown reason",
                volume.id
            )));
        }

        if self.find_volume(Some(&volume.id)).await?.is_some() {
            return Ok(Outcome::retry(format!(
                "volume {} not yet deleted; retrying",
                volume.id
            )));
        }

        registry::clear_external_resource_id(runtime);
        info!(volume_id = %volume.id, "deleted volume");
        Ok(Outcome::Complete)
    }
}
