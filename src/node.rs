//! Node declarations and runtime state exchanged with the orchestrator.
//!
//! The orchestrator owns and persists all of these values. Operations borrow
//! them for the duration of a single call and never keep references.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declared properties of a volume node.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VolumeProperties {
    /// Provider volume identifier, present only when supplied by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// When true the volume already exists and is never created or deleted.
    #[serde(default)]
    pub use_external_resource: bool,
    /// Size in GiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Provider volume type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<String>,
    /// Device path the volume is exposed under on the instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// When true `delete` leaves the provider volume in place.
    #[serde(default)]
    pub persistent: bool,
}

/// Persisted key-value runtime state of a deployed instance.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RuntimeProperties(Map<String, Value>);

impl RuntimeProperties {
    /// Creates an empty property map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the string stored under `key`, ignoring non-string values.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns the boolean stored under `key`, ignoring non-boolean values.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Removes `key`, returning the previous value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Returns true when `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub(crate) fn entry_mut(&mut self, key: &str) -> &mut Value {
        self.0.entry(key).or_insert(Value::Null)
    }
}

impl From<Map<String, Value>> for RuntimeProperties {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

/// Relationship edge from an instance to another node instance.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Relationship {
    /// Relationship type name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Runtime properties of the related instance.
    #[serde(default)]
    pub target: RuntimeProperties,
}

/// Runtime counterpart of a node, one per deployment.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct NodeInstance {
    /// Orchestrator-assigned instance identifier.
    #[serde(default)]
    pub id: String,
    /// Persisted runtime state.
    #[serde(default)]
    pub runtime_properties: RuntimeProperties,
    /// Outgoing relationships.
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

/// One end of an attach/detach relationship.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RelationshipEnd {
    /// Whether the node at this end is an external resource.
    #[serde(default)]
    pub use_external_resource: bool,
    /// Runtime state of the instance at this end.
    #[serde(default)]
    pub runtime_properties: RuntimeProperties,
}
