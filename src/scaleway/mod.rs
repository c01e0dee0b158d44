//! Scaleway implementation of the provider client.
//!
//! Volumes are managed through the Instances API volume endpoints with direct
//! HTTP calls since `scaleway-rs` does not expose them. Server lookups go
//! through `scaleway-rs`.

mod api;
mod error;
mod volume;

use scaleway_rs::ScalewayApi;

use crate::config::{ConfigError, ScalewayConfig};
use crate::provider::{
    InstancePlacement, ProviderClient, ProviderFuture, VolumeRequest, VolumeSnapshot,
};

/// Provider client backed by the Scaleway Instances API.
#[derive(Clone)]
pub struct ScalewayProvider {
    api: ScalewayApi,
    config: ScalewayConfig,
    base_url: String,
}

impl ScalewayProvider {
    /// Constructs a new provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the configuration fails
    /// validation.
    pub fn new(config: ScalewayConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            api: ScalewayApi::new(&config.secret_key),
            config,
            base_url: String::from(api::SCALEWAY_INSTANCE_API_BASE),
        })
    }

    /// Points volume requests at a different API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Returns the zone lookups are scoped to.
    #[must_use]
    pub fn zone(&self) -> &str {
        &self.config.default_zone
    }
}

impl std::fmt::Debug for ScalewayProvider {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ScalewayProvider")
            .field("zone", &self.config.default_zone)
            .field("project", &self.config.default_project_id)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ProviderClient for ScalewayProvider {
    fn create_volume<'a>(&'a self, request: &'a VolumeRequest) -> ProviderFuture<'a, String> {
        Box::pin(async move { self.create_block_volume(request).await })
    }

    fn delete_volume<'a>(&'a self, volume_id: &'a str) -> ProviderFuture<'a, bool> {
        Box::pin(async move { self.delete_block_volume(volume_id).await })
    }

    fn list_volumes<'a>(
        &'a self,
        volume_id: Option<&'a str>,
    ) -> ProviderFuture<'a, Vec<VolumeSnapshot>> {
        Box::pin(async move {
            match volume_id {
                Some(id) => Ok(self.fetch_volume(id).await?.into_iter().collect()),
                None => self.fetch_all_volumes().await,
            }
        })
    }

    fn attach_volume<'a>(
        &'a self,
        instance_id: &'a str,
        volume_id: &'a str,
        device: Option<&'a str>,
    ) -> ProviderFuture<'a, ()> {
        Box::pin(async move { self.attach_block_volume(instance_id, volume_id, device).await })
    }

    fn detach_volume<'a>(&'a self, volume_id: &'a str) -> ProviderFuture<'a, ()> {
        Box::pin(async move { self.detach_block_volume(volume_id).await })
    }

    fn get_instance<'a>(&'a self, instance_id: &'a str) -> ProviderFuture<'a, InstancePlacement> {
        Box::pin(async move { self.fetch_placement(instance_id).await })
    }
}
