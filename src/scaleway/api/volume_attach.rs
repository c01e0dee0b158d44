//! `POST /zones/{zone}/servers/{id}/attach-volume`.

use tracing::debug;

use crate::provider::ProviderError;

use super::super::ScalewayProvider;
use super::super::volume::VolumeActionRequest;
use super::HTTP_CLIENT;

impl ScalewayProvider {
    /// Attaches a volume to a server.
    ///
    /// Scaleway assigns the device itself, so a requested device path is
    /// only logged. The volume's state is read first: a volume that is not
    /// `available` is rejected with a message the classifier treats as a
    /// transient conflict, and an unknown volume yields
    /// [`ProviderError::NotFound`].
    pub(in crate::scaleway) async fn attach_block_volume(
        &self,
        instance_id: &str,
        volume_id: &str,
        device: Option<&str>,
    ) -> Result<(), ProviderError> {
        if let Some(requested) = device {
            debug!(device = requested, volume_id, "device is assigned by the provider");
        }

        self.fetch_raw_volume(volume_id)
            .await?
            .ok_or_else(|| ProviderError::NotFound {
                resource_id: volume_id.to_owned(),
            })?
            .ensure_attachable()?;

        let url = self.zone_url(&format!("servers/{instance_id}/attach-volume"));
        let payload = VolumeActionRequest {
            volume_id: volume_id.to_owned(),
        };
        self.execute(HTTP_CLIENT.post(&url).json(&payload), instance_id)
            .await?;
        Ok(())
    }
}
