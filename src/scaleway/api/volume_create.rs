//! `POST /zones/{zone}/volumes`.

use tracing::debug;
use uuid::Uuid;

use crate::provider::{ProviderError, VolumeRequest};

use super::super::ScalewayProvider;
use super::super::volume::{CreateVolumeRequest, VolumeEnvelope};
use super::{HTTP_CLIENT, parse};

const VOLUME_TAG: &str = "kedge";

impl ScalewayProvider {
    /// Creates a volume in the request's zone and returns its id.
    ///
    /// The API takes sizes in bytes; the request's GiB figure is converted
    /// first and an overflow is reported as an API error.
    pub(in crate::scaleway) async fn create_block_volume(
        &self,
        request: &VolumeRequest,
    ) -> Result<String, ProviderError> {
        let size = request.size_bytes().ok_or_else(|| {
            ProviderError::api(format!(
                "volume size {} GiB overflows the byte count",
                request.size_gb
            ))
        })?;
        let name = format!("{}-{}", self.config.volume_name_prefix, Uuid::new_v4());
        let payload = CreateVolumeRequest {
            name,
            size,
            volume_type: request.volume_type.clone(),
            project: self.config.default_project_id.clone(),
            organization: self.config.default_organization_id.clone(),
            tags: vec![String::from(VOLUME_TAG)],
        };
        let url = format!("{}/zones/{}/volumes", self.base_url, request.zone);
        debug!(name = %payload.name, zone = %request.zone, size, "posting volume");

        let body = self
            .execute(HTTP_CLIENT.post(&url).json(&payload), &payload.name)
            .await?;
        let parsed: VolumeEnvelope = parse(&body)?;
        Ok(parsed.volume.id)
    }
}
