//! Shared fixtures for volume lifecycle BDD scenarios.

use std::cell::RefCell;

use kedge::test_support::ScriptedProvider;
use kedge::{LifecycleResult, NodeInstance, RelationshipEnd, VolumeLifecycle, VolumeProperties};
use rstest::fixture;

/// State carried between steps of one scenario.
#[derive(Debug)]
pub struct VolumeWorld {
    pub provider: ScriptedProvider,
    pub lifecycle: VolumeLifecycle<ScriptedProvider>,
    pub properties: VolumeProperties,
    pub instance: NodeInstance,
    pub source: RelationshipEnd,
    pub target: RelationshipEnd,
    pub last_result: Option<LifecycleResult>,
}

impl VolumeWorld {
    fn new() -> Self {
        let provider = ScriptedProvider::new();
        Self {
            lifecycle: VolumeLifecycle::new(provider.clone()),
            provider,
            properties: VolumeProperties::default(),
            instance: NodeInstance {
                id: String::from("volume_1"),
                ..NodeInstance::default()
            },
            source: RelationshipEnd::default(),
            target: RelationshipEnd::default(),
            last_result: None,
        }
    }
}

#[fixture]
pub fn volume_world() -> RefCell<VolumeWorld> {
    RefCell::new(VolumeWorld::new())
}
