//! Volume resolution shared by the lifecycle operations.

use tracing::debug;

use crate::classify::{ErrorClass, Transition, classify};
use crate::outcome::LifecycleError;
use crate::provider::{ProviderClient, VolumeSnapshot};

use super::{VolumeLifecycle, terminal};

impl<P: ProviderClient> VolumeLifecycle<P> {
    /// Resolves a volume by id. A blank or absent id, an empty listing, and a
    /// provider not-found error all resolve to `None`.
    pub(super) async fn find_volume(
        &self,
        volume_id: Option<&str>,
    ) -> Result<Option<VolumeSnapshot>, LifecycleError> {
        let Some(id) = volume_id.map(str::trim).filter(|id| !id.is_empty()) else {
            return Ok(None);
        };

        let found = match self.provider.list_volumes(Some(id)).await {
            Ok(volumes) => volumes.into_iter().find(|volume| volume.id == id),
            Err(err) => match classify(&err, Transition::Lookup) {
                ErrorClass::NotFound => None,
                ErrorClass::TransientConflict | ErrorClass::Terminal => {
                    return Err(terminal(&err));
                }
            },
        };

        if found.is_none() {
            self.log_available_volumes(id).await;
        }
        Ok(found)
    }

    async fn log_available_volumes(&self, missing_id: &str) {
        match self.provider.list_volumes(None).await {
            Ok(volumes) => {
                let ids: Vec<&str> = volumes.iter().map(|volume| volume.id.as_str()).collect();
                debug!(
                    volume_id = %missing_id,
                    available = ?ids,
                    "volume not found; listing volumes known to the provider"
                );
            }
            Err(err) => {
                debug!(volume_id = %missing_id, error = %err, "volume not found; listing failed");
            }
        }
    }
}
