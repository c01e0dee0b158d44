//! Core library for the kedge volume lifecycle plugin.
//!
//! An orchestrator declares block volumes and their attachments to compute
//! instances; this crate reconciles those declarations against a cloud
//! provider. Operations fork on whether a resource is external (adopted and
//! tracked only) or managed (created and destroyed here), record provider
//! ids in the orchestrator's runtime properties, and report blocked
//! transitions as retries rather than failures.

pub mod classify;
pub mod config;
pub mod context;
pub mod lifecycle;
pub mod node;
pub mod outcome;
pub mod provider;
pub mod registry;
pub mod scaleway;
pub mod telemetry;
pub mod test_support;

pub use classify::{ErrorClass, Transition, classify};
pub use config::{ConfigError, LoggingConfig, ScalewayConfig};
pub use context::{ContextError, Operation, OperationContext, OperationReport, run_operation};
pub use lifecycle::{VOLUME_ATTACHED_TO_INSTANCE, VolumeLifecycle};
pub use node::{NodeInstance, Relationship, RelationshipEnd, RuntimeProperties, VolumeProperties};
pub use outcome::{LifecycleError, LifecycleResult, Outcome};
pub use provider::{
    InstancePlacement, ProviderClient, ProviderError, ProviderFuture, RequestError,
    VolumeRequest, VolumeRequestBuilder, VolumeSnapshot,
};
pub use scaleway::ScalewayProvider;
