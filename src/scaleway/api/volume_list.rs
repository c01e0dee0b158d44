//! Volume lookups.

use crate::provider::{ProviderError, VolumeSnapshot};

use super::super::ScalewayProvider;
use super::super::volume::{ScalewayVolume, VolumeEnvelope, VolumeList};
use super::{HTTP_CLIENT, parse};

impl ScalewayProvider {
    /// Fetches one volume from the configured zone, `None` when it is absent.
    pub(in crate::scaleway) async fn fetch_volume(
        &self,
        volume_id: &str,
    ) -> Result<Option<VolumeSnapshot>, ProviderError> {
        Ok(self
            .fetch_raw_volume(volume_id)
            .await?
            .map(VolumeSnapshot::from))
    }

    pub(in crate::scaleway) async fn fetch_raw_volume(
        &self,
        volume_id: &str,
    ) -> Result<Option<ScalewayVolume>, ProviderError> {
        let url = self.zone_url(&format!("volumes/{volume_id}"));
        match self.execute(HTTP_CLIENT.get(&url), volume_id).await {
            Ok(body) => Ok(Some(parse::<VolumeEnvelope>(&body)?.volume)),
            Err(ProviderError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Lists every volume in the configured zone.
    pub(in crate::scaleway) async fn fetch_all_volumes(
        &self,
    ) -> Result<Vec<VolumeSnapshot>, ProviderError> {
        let url = self.zone_url("volumes");
        let body = self.execute(HTTP_CLIENT.get(&url), "volumes").await?;
        let parsed: VolumeList = parse(&body)?;
        Ok(parsed
            .volumes
            .into_iter()
            .map(VolumeSnapshot::from)
            .collect())
    }
}
