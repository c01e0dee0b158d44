//! Volume creation, or adoption of an external volume.

use tracing::{debug, info};

use crate::node::{NodeInstance, RuntimeProperties, VolumeProperties};
use crate::outcome::{LifecycleError, LifecycleResult, Outcome};
use crate::provider::{ProviderClient, VolumeRequest};
use crate::registry;

use super::{VOLUME_ATTACHED_TO_INSTANCE, VolumeLifecycle, terminal};

/// Properties a managed volume cannot be created without.
struct ManagedVolumeSpec<'a> {
    size_gb: u64,
    volume_type: &'a str,
}

impl<'a> ManagedVolumeSpec<'a> {
    fn from_properties(properties: &'a VolumeProperties) -> Result<Self, LifecycleError> {
        let size_gb = properties
            .size
            .filter(|size| *size > 0)
            .ok_or_else(|| missing_property("size"))?;
        let volume_type = properties
            .volume_type
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| missing_property("volume_type"))?;
        if properties
            .device
            .as_deref()
            .is_none_or(|value| value.trim().is_empty())
        {
            return Err(missing_property("device"));
        }
        Ok(Self {
            size_gb,
            volume_type,
        })
    }
}

fn missing_property(name: &str) -> LifecycleError {
    LifecycleError::validation(format!("{name} is a required input and must not be empty"))
}

impl<P: ProviderClient> VolumeLifecycle<P> {
    /// Creates the volume in the zone of its related instance, or records an
    /// existing volume when the node is external.
    ///
    /// The device path is copied onto the instance before anything else so
    /// later attach calls can read it on either branch.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Validation`] when the external volume is
    /// missing, a required property is absent, or the volume is not related
    /// to exactly one instance. Returns [`LifecycleError::Provider`] when a
    /// provider call fails.
    pub async fn create(
        &self,
        properties: &VolumeProperties,
        instance: &mut NodeInstance,
    ) -> LifecycleResult {
        if let Some(device) = properties.device.as_deref() {
            registry::set_device(&mut instance.runtime_properties, device);
        }

        if registry::is_external(properties) {
            return self
                .adopt_external_volume(properties, &mut instance.runtime_properties)
                .await;
        }

        let spec = ManagedVolumeSpec::from_properties(properties)?;
        let instance_id = related_instance_id(instance)?;
        let placement = self
            .provider
            .get_instance(&instance_id)
            .await
            .map_err(|err| terminal(&err))?;

        let request = VolumeRequest::builder()
            .size_gb(spec.size_gb)
            .zone(placement.zone)
            .volume_type(spec.volume_type)
            .build()
            .map_err(|err| LifecycleError::validation(err.to_string()))?;

        debug!(
            instance_id = %instance_id,
            zone = %request.zone,
            size_gb = request.size_gb,
            volume_type = %request.volume_type,
            "attempting to create volume"
        );
        let volume_id = self
            .provider
            .create_volume(&request)
            .await
            .map_err(|err| terminal(&err))?;

        registry::set_external_resource_id(&mut instance.runtime_properties, &volume_id, false);
        info!(volume_id = %volume_id, zone = %request.zone, "created volume");
        Ok(Outcome::Complete)
    }

    async fn adopt_external_volume(
        &self,
        properties: &VolumeProperties,
        runtime: &mut RuntimeProperties,
    ) -> LifecycleResult {
        let Some(volume) = self.find_volume(properties.resource_id.as_deref()).await? else {
            return Err(LifecycleError::validation(format!(
                "external volume was indicated, but volume '{}' does not exist in the account",
                properties.resource_id.as_deref().unwrap_or_default()
            )));
        };
        registry::set_external_resource_id(runtime, &volume.id, true);
        info!(volume_id = %volume.id, "using external volume");
        Ok(Outcome::Complete)
    }
}

fn related_instance_id(instance: &NodeInstance) -> Result<String, LifecycleError> {
    let ids = registry::related_resource_ids(instance, VOLUME_ATTACHED_TO_INSTANCE);
    match ids.as_slice() {
        [only] => Ok(only.clone()),
        [] => Err(LifecycleError::validation(format!(
            "volume {} has no related instance through {VOLUME_ATTACHED_TO_INSTANCE}",
            instance.id
        ))),
        many => Err(LifecycleError::validation(format!(
            "volume {} is related to {} instances through {VOLUME_ATTACHED_TO_INSTANCE}; expected exactly one",
            instance.id,
            many.len()
        ))),
    }
}
