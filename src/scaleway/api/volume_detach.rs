//! `POST /zones/{zone}/servers/{id}/detach-volume`.

use tracing::debug;

use crate::provider::ProviderError;

use super::super::ScalewayProvider;
use super::super::volume::VolumeActionRequest;
use super::HTTP_CLIENT;

impl ScalewayProvider {
    /// Detaches a volume from whichever server holds it. A volume with no
    /// server is already detached.
    pub(in crate::scaleway) async fn detach_block_volume(
        &self,
        volume_id: &str,
    ) -> Result<(), ProviderError> {
        let volume = self
            .fetch_raw_volume(volume_id)
            .await?
            .ok_or_else(|| ProviderError::NotFound {
                resource_id: volume_id.to_owned(),
            })?;
        let Some(server) = volume.server else {
            debug!(volume_id, "volume has no server; nothing to detach");
            return Ok(());
        };

        let url = self.zone_url(&format!("servers/{}/detach-volume", server.id));
        let payload = VolumeActionRequest {
            volume_id: volume_id.to_owned(),
        };
        self.execute(HTTP_CLIENT.post(&url).json(&payload), &server.id)
            .await?;
        Ok(())
    }
}
