//! `DELETE /zones/{zone}/volumes/{id}`.

use crate::provider::ProviderError;

use super::super::ScalewayProvider;
use super::HTTP_CLIENT;

impl ScalewayProvider {
    /// Deletes a volume. A success response is reported as `true`; Scaleway
    /// refuses to delete a volume still attached to a server.
    pub(in crate::scaleway) async fn delete_block_volume(
        &self,
        volume_id: &str,
    ) -> Result<bool, ProviderError> {
        let url = self.zone_url(&format!("volumes/{volume_id}"));
        self.execute(HTTP_CLIENT.delete(&url), volume_id).await?;
        Ok(true)
    }
}
