//! Server placement lookups through `scaleway-rs`.

use crate::provider::{InstancePlacement, ProviderError};

use super::super::ScalewayProvider;

impl ScalewayProvider {
    /// Resolves the zone a server runs in. Servers are looked up in the
    /// configured zone only.
    pub(in crate::scaleway) async fn fetch_placement(
        &self,
        instance_id: &str,
    ) -> Result<InstancePlacement, ProviderError> {
        let zone = &self.config.default_zone;
        let mut servers = self
            .api
            .list_instances(zone)
            .servers(instance_id)
            .per_page(1)
            .run_async()
            .await?;

        servers
            .pop()
            .filter(|server| server.id == instance_id)
            .map(|server| InstancePlacement {
                instance_id: server.id,
                zone: zone.clone(),
            })
            .ok_or_else(|| ProviderError::NotFound {
                resource_id: instance_id.to_owned(),
            })
    }
}
