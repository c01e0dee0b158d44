//! BDD scenarios for volume lifecycle reconciliation.

use std::cell::RefCell;

use rstest_bdd_macros::scenario;

use super::test_helpers::{VolumeWorld, volume_world};

#[scenario(
    path = "tests/features/volume_lifecycle.feature",
    name = "Adopt an existing external volume"
)]
fn scenario_adopt_external(volume_world: RefCell<VolumeWorld>) {
    drop(volume_world);
}

#[scenario(
    path = "tests/features/volume_lifecycle.feature",
    name = "Create a managed volume in the zone of its instance"
)]
fn scenario_create_managed(volume_world: RefCell<VolumeWorld>) {
    drop(volume_world);
}

#[scenario(
    path = "tests/features/volume_lifecycle.feature",
    name = "Delete a volume the provider no longer knows"
)]
fn scenario_delete_missing(volume_world: RefCell<VolumeWorld>) {
    drop(volume_world);
}

#[scenario(
    path = "tests/features/volume_lifecycle.feature",
    name = "Retry deletion while the volume is still attached"
)]
fn scenario_delete_attached(volume_world: RefCell<VolumeWorld>) {
    drop(volume_world);
}

#[scenario(
    path = "tests/features/volume_lifecycle.feature",
    name = "Attach and detach a managed volume"
)]
fn scenario_attach_detach(volume_world: RefCell<VolumeWorld>) {
    drop(volume_world);
}

#[scenario(
    path = "tests/features/volume_lifecycle.feature",
    name = "Keep a persistent volume on delete"
)]
fn scenario_persistent_delete(volume_world: RefCell<VolumeWorld>) {
    drop(volume_world);
}

#[scenario(
    path = "tests/features/volume_lifecycle.feature",
    name = "Refuse to attach a volume that was never created"
)]
fn scenario_attach_without_id(volume_world: RefCell<VolumeWorld>) {
    drop(volume_world);
}
