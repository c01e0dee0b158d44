//! Rules for recording which provider resource backs a node instance.
//!
//! State lives in the orchestrator's runtime properties. These helpers are
//! the only code that reads or writes the keys below.

use serde_json::Value;

use crate::node::{NodeInstance, RelationshipEnd, RuntimeProperties, VolumeProperties};
use crate::outcome::LifecycleError;

/// Runtime key holding the provider resource id.
pub const EXTERNAL_RESOURCE_ID: &str = "external_resource_id";
/// Runtime key recording whether the resource is external.
pub const IS_EXTERNAL: &str = "is_external";
/// Runtime key holding the device path copied from the volume node.
pub const DEVICE: &str = "device";
/// Runtime key on compute instances listing attached volume ids in order.
pub const VOLUMES: &str = "volumes";

/// Returns the node's `use_external_resource` flag.
#[must_use]
pub const fn is_external(properties: &VolumeProperties) -> bool {
    properties.use_external_resource
}

/// Records the provider id and whether it is external.
pub fn set_external_resource_id(runtime: &mut RuntimeProperties, id: &str, external: bool) {
    runtime.insert(EXTERNAL_RESOURCE_ID, id);
    runtime.insert(IS_EXTERNAL, external);
}

/// Returns the recorded provider id.
///
/// # Errors
///
/// Returns [`LifecycleError::MissingResourceId`] when no non-empty id has
/// been recorded.
pub fn external_resource_id_or_fail(
    runtime: &RuntimeProperties,
    action: &str,
) -> Result<String, LifecycleError> {
    runtime
        .get_str(EXTERNAL_RESOURCE_ID)
        .filter(|id| !id.trim().is_empty())
        .map(str::to_owned)
        .ok_or_else(|| LifecycleError::MissingResourceId {
            action: action.to_owned(),
        })
}

/// Returns the recorded `is_external` flag, if any.
#[must_use]
pub fn recorded_as_external(runtime: &RuntimeProperties) -> Option<bool> {
    runtime.get_bool(IS_EXTERNAL)
}

/// Returns whether one end of a relationship is an external resource. The
/// recorded `is_external` flag wins over the end's declared flag.
#[must_use]
pub fn end_is_external(end: &RelationshipEnd) -> bool {
    recorded_as_external(&end.runtime_properties).unwrap_or(end.use_external_resource)
}

/// Removes the provider id after the resource is confirmed gone.
pub fn clear_external_resource_id(runtime: &mut RuntimeProperties) {
    runtime.remove(EXTERNAL_RESOURCE_ID);
    runtime.remove(IS_EXTERNAL);
}

/// Copies the volume's device path onto its runtime state.
pub fn set_device(runtime: &mut RuntimeProperties, device: &str) {
    runtime.insert(DEVICE, device);
}

/// Returns the recorded device path.
#[must_use]
pub fn device(runtime: &RuntimeProperties) -> Option<&str> {
    runtime.get_str(DEVICE)
}

/// Appends `volume_id` to the instance's `volumes` list, creating it on first
/// use. An id already present is not added twice.
pub fn append_volume(runtime: &mut RuntimeProperties, volume_id: &str) {
    let slot = runtime.entry_mut(VOLUMES);
    if !slot.is_array() {
        *slot = Value::Array(Vec::new());
    }
    if let Value::Array(volumes) = slot
        && !volumes.iter().any(|entry| entry.as_str() == Some(volume_id))
    {
        volumes.push(Value::from(volume_id));
    }
}

/// Removes the first occurrence of `volume_id` from the `volumes` list.
/// Returns whether anything was removed.
pub fn remove_volume(runtime: &mut RuntimeProperties, volume_id: &str) -> bool {
    let Some(Value::Array(volumes)) = runtime.get(VOLUMES).cloned() else {
        return false;
    };
    let Some(position) = volumes
        .iter()
        .position(|entry| entry.as_str() == Some(volume_id))
    else {
        return false;
    };
    let mut remaining = volumes;
    remaining.remove(position);
    runtime.insert(VOLUMES, Value::Array(remaining));
    true
}

/// Returns the attached volume ids in order.
#[must_use]
pub fn volumes(runtime: &RuntimeProperties) -> Vec<String> {
    match runtime.get(VOLUMES) {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

/// Resolves the provider ids of instances related through `kind`.
#[must_use]
pub fn related_resource_ids(instance: &NodeInstance, kind: &str) -> Vec<String> {
    instance
        .relationships
        .iter()
        .filter(|relationship| relationship.kind == kind)
        .filter_map(|relationship| relationship.target.get_str(EXTERNAL_RESOURCE_ID))
        .map(str::to_owned)
        .collect()
}
