//! Volume lifecycle operations driven by orchestrator events.
//!
//! Each operation forks on whether the volume (and, for relationships, the
//! instance) is an external resource before touching the provider. External
//! resources are adopted and tracked but never created, deleted, attached, or
//! detached through the provider.

mod lookup;
mod validate;
mod volume_attach;
mod volume_create;
mod volume_delete;
mod volume_detach;

use crate::outcome::LifecycleError;
use crate::provider::{ProviderClient, ProviderError};

/// Relationship type linking a volume to the instance it is created for.
pub const VOLUME_ATTACHED_TO_INSTANCE: &str = "kedge.relationships.volume_attached_to_instance";

/// Runs lifecycle operations for volumes against a provider.
#[derive(Clone, Debug)]
pub struct VolumeLifecycle<P> {
    provider: P,
}

impl<P: ProviderClient> VolumeLifecycle<P> {
    /// Creates a lifecycle bound to `provider`.
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Returns the underlying provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }
}

fn terminal(error: &ProviderError) -> LifecycleError {
    LifecycleError::provider(error.message())
}
