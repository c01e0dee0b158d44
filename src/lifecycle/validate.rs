//! Pre-deployment validation of volume declarations.

use crate::node::VolumeProperties;
use crate::outcome::{LifecycleError, LifecycleResult, Outcome};
use crate::provider::ProviderClient;
use crate::registry;

use super::VolumeLifecycle;

impl<P: ProviderClient> VolumeLifecycle<P> {
    /// Checks that the declaration agrees with what the provider holds.
    ///
    /// An external volume must exist and be available; a managed volume must
    /// not collide with an existing one.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Validation`] on a mismatch and
    /// [`LifecycleError::Provider`] when the lookup itself fails.
    pub async fn validate(&self, properties: &VolumeProperties) -> LifecycleResult {
        let volume = self.find_volume(properties.resource_id.as_deref()).await?;
        let requested = properties.resource_id.as_deref().unwrap_or_default();

        match (registry::is_external(properties), volume) {
            (true, None) => Err(LifecycleError::validation(format!(
                "external resource, but volume '{requested}' does not exist in the account"
            ))),
            (false, Some(existing)) => Err(LifecycleError::validation(format!(
                "not an external resource, but volume {} already exists",
                existing.id
            ))),
            (true, Some(existing)) if !existing.is_available() => {
                Err(LifecycleError::validation(format!(
                    "volume {} is not available (status {})",
                    existing.id, existing.status
                )))
            }
            _ => Ok(Outcome::Complete),
        }
    }
}
