//! BDD step definitions for volume lifecycle reconciliation.

use std::cell::RefCell;
use std::future::Future;

use kedge::registry;
use kedge::test_support::{ProviderCall, ScriptedOperation};
use kedge::{
    LifecycleResult, Outcome, ProviderError, Relationship, RuntimeProperties,
    VOLUME_ATTACHED_TO_INSTANCE, VolumeRequest,
};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;

use super::test_helpers::VolumeWorld;

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("assertion failed: {0}")]
    Assertion(String),
}

fn block_on<T>(future: impl Future<Output = T>) -> Result<T, StepError> {
    let runtime = Runtime::new()?;
    Ok(runtime.block_on(future))
}

fn recorded_runtime(id: &str, external: bool) -> RuntimeProperties {
    let mut runtime = RuntimeProperties::new();
    registry::set_external_resource_id(&mut runtime, id, external);
    runtime
}

#[given("the provider holds volume \"{id}\" with status \"{status}\"")]
fn provider_holds_volume(volume_world: &RefCell<VolumeWorld>, id: String, status: String) {
    volume_world
        .borrow()
        .provider
        .add_volume(&id, &status, "us-east-1a");
}

#[given("the provider runs instance \"{id}\" in zone \"{zone}\"")]
fn provider_runs_instance(volume_world: &RefCell<VolumeWorld>, id: String, zone: String) {
    volume_world.borrow().provider.add_instance(&id, &zone);
}

#[given("the volume node is external with resource id \"{id}\"")]
fn external_volume_node(volume_world: &RefCell<VolumeWorld>, id: String) {
    let mut world = volume_world.borrow_mut();
    world.properties.use_external_resource = true;
    world.properties.resource_id = Some(id);
}

#[given(
    "the volume node is managed with size {size}, type \"{volume_type}\" and device \"{device}\""
)]
fn managed_volume_node(
    volume_world: &RefCell<VolumeWorld>,
    size: u64,
    volume_type: String,
    device: String,
) {
    let mut world = volume_world.borrow_mut();
    world.properties.use_external_resource = false;
    world.properties.size = Some(size);
    world.properties.volume_type = Some(volume_type);
    world.properties.device = Some(device);
}

#[given("the volume node is persistent")]
fn persistent_volume_node(volume_world: &RefCell<VolumeWorld>) {
    volume_world.borrow_mut().properties.persistent = true;
}

#[given("the volume is related to instance \"{id}\"")]
fn related_to_instance(volume_world: &RefCell<VolumeWorld>, id: String) {
    volume_world
        .borrow_mut()
        .instance
        .relationships
        .push(Relationship {
            kind: String::from(VOLUME_ATTACHED_TO_INSTANCE),
            target: recorded_runtime(&id, false),
        });
}

#[given("the volume instance records managed volume \"{id}\"")]
fn instance_records_managed(volume_world: &RefCell<VolumeWorld>, id: String) {
    volume_world.borrow_mut().instance.runtime_properties = recorded_runtime(&id, false);
}

#[given("the next volume lookup fails with \"{message}\"")]
fn lookup_fails(volume_world: &RefCell<VolumeWorld>, message: String) {
    volume_world
        .borrow()
        .provider
        .fail_next(ScriptedOperation::List, ProviderError::api(message));
}

#[given("the next volume deletion fails with \"{message}\"")]
fn deletion_fails(volume_world: &RefCell<VolumeWorld>, message: String) {
    volume_world
        .borrow()
        .provider
        .fail_next(ScriptedOperation::Delete, ProviderError::api(message));
}

#[given("the relationship links volume \"{volume_id}\" to instance \"{instance_id}\"")]
fn relationship_links(volume_world: &RefCell<VolumeWorld>, volume_id: String, instance_id: String) {
    let mut world = volume_world.borrow_mut();
    world.source.runtime_properties = recorded_runtime(&volume_id, false);
    world.target.runtime_properties = recorded_runtime(&instance_id, false);
}

#[given("the relationship has no volume id but links instance \"{instance_id}\"")]
fn relationship_without_volume(volume_world: &RefCell<VolumeWorld>, instance_id: String) {
    volume_world.borrow_mut().target.runtime_properties = recorded_runtime(&instance_id, false);
}

fn record(volume_world: &RefCell<VolumeWorld>, result: LifecycleResult) {
    volume_world.borrow_mut().last_result = Some(result);
}

#[when("the volume is validated")]
fn validate_volume(volume_world: &RefCell<VolumeWorld>) -> Result<(), StepError> {
    let result = {
        let world = volume_world.borrow();
        block_on(world.lifecycle.validate(&world.properties))?
    };
    record(volume_world, result);
    Ok(())
}

#[when("the volume is created")]
fn create_volume(volume_world: &RefCell<VolumeWorld>) -> Result<(), StepError> {
    let mut world = volume_world.borrow_mut();
    let VolumeWorld {
        lifecycle,
        properties,
        instance,
        last_result,
        ..
    } = &mut *world;
    *last_result = Some(block_on(lifecycle.create(properties, instance))?);
    Ok(())
}

#[when("the volume is deleted")]
fn delete_volume(volume_world: &RefCell<VolumeWorld>) -> Result<(), StepError> {
    let mut world = volume_world.borrow_mut();
    let VolumeWorld {
        lifecycle,
        properties,
        instance,
        last_result,
        ..
    } = &mut *world;
    *last_result = Some(block_on(lifecycle.delete(properties, instance))?);
    Ok(())
}

#[when("the volume is attached")]
fn attach_volume(volume_world: &RefCell<VolumeWorld>) -> Result<(), StepError> {
    let mut world = volume_world.borrow_mut();
    let VolumeWorld {
        lifecycle,
        source,
        target,
        last_result,
        ..
    } = &mut *world;
    *last_result = Some(block_on(lifecycle.attach(source, target))?);
    Ok(())
}

#[when("the volume is detached")]
fn detach_volume(volume_world: &RefCell<VolumeWorld>) -> Result<(), StepError> {
    let mut world = volume_world.borrow_mut();
    let VolumeWorld {
        lifecycle,
        source,
        target,
        last_result,
        ..
    } = &mut *world;
    *last_result = Some(block_on(lifecycle.detach(source, target))?);
    Ok(())
}

#[then("the operation completes")]
fn operation_completes(volume_world: &RefCell<VolumeWorld>) -> Result<(), StepError> {
    match &volume_world.borrow().last_result {
        Some(Ok(Outcome::Complete)) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected completion, got {other:?}"
        ))),
    }
}

#[then("the operation asks for a retry")]
fn operation_retries(volume_world: &RefCell<VolumeWorld>) -> Result<(), StepError> {
    match &volume_world.borrow().last_result {
        Some(Ok(Outcome::Retry { .. })) => Ok(()),
        other => Err(StepError::Assertion(format!("expected retry, got {other:?}"))),
    }
}

#[then("the operation fails with kind \"{kind}\"")]
fn operation_fails(volume_world: &RefCell<VolumeWorld>, kind: String) -> Result<(), StepError> {
    match &volume_world.borrow().last_result {
        Some(Err(err)) if err.kind() == kind => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected {kind} failure, got {other:?}"
        ))),
    }
}

fn expect_recorded(
    volume_world: &RefCell<VolumeWorld>,
    id: &str,
    external: bool,
) -> Result<(), StepError> {
    let world = volume_world.borrow();
    let runtime = &world.instance.runtime_properties;
    let recorded = runtime.get_str(registry::EXTERNAL_RESOURCE_ID);
    let flag = registry::recorded_as_external(runtime);
    if recorded == Some(id) && flag == Some(external) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {id} with is_external={external}, got {recorded:?} with {flag:?}"
        )))
    }
}

#[then("the instance records volume \"{id}\" as external")]
fn records_external(volume_world: &RefCell<VolumeWorld>, id: String) -> Result<(), StepError> {
    expect_recorded(volume_world, &id, true)
}

#[then("the instance records volume \"{id}\" as managed")]
fn records_managed(volume_world: &RefCell<VolumeWorld>, id: String) -> Result<(), StepError> {
    expect_recorded(volume_world, &id, false)
}

#[then("the instance records no volume")]
fn records_no_volume(volume_world: &RefCell<VolumeWorld>) -> Result<(), StepError> {
    let world = volume_world.borrow();
    if world
        .instance
        .runtime_properties
        .contains_key(registry::EXTERNAL_RESOURCE_ID)
    {
        return Err(StepError::Assertion(String::from(
            "resource id should be cleared",
        )));
    }
    Ok(())
}

#[then("the instance lists attached volumes \"{id}\"")]
fn lists_attached(volume_world: &RefCell<VolumeWorld>, id: String) -> Result<(), StepError> {
    let volumes = registry::volumes(&volume_world.borrow().target.runtime_properties);
    if volumes == [id.clone()] {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected [{id}], got {volumes:?}"
        )))
    }
}

#[then("the instance lists no attached volumes")]
fn lists_no_volumes(volume_world: &RefCell<VolumeWorld>) -> Result<(), StepError> {
    let volumes = registry::volumes(&volume_world.borrow().target.runtime_properties);
    if volumes.is_empty() {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected no volumes, got {volumes:?}"
        )))
    }
}

#[then("the provider created a {size} GiB \"{volume_type}\" volume in zone \"{zone}\"")]
fn provider_created(
    volume_world: &RefCell<VolumeWorld>,
    size: u64,
    volume_type: String,
    zone: String,
) -> Result<(), StepError> {
    let expected = VolumeRequest::builder()
        .size_gb(size)
        .zone(zone)
        .volume_type(volume_type)
        .build()
        .map_err(|err| StepError::Assertion(err.to_string()))?;
    let mutations = volume_world.borrow().provider.mutations();
    if mutations == [ProviderCall::CreateVolume(expected.clone())] {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected a single create of {expected:?}, got {mutations:?}"
        )))
    }
}

#[then("the provider received no mutating calls")]
fn no_mutations(volume_world: &RefCell<VolumeWorld>) -> Result<(), StepError> {
    let mutations = volume_world.borrow().provider.mutations();
    if mutations.is_empty() {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected no mutations, got {mutations:?}"
        )))
    }
}

#[then("the provider received no calls")]
fn no_calls(volume_world: &RefCell<VolumeWorld>) -> Result<(), StepError> {
    let calls = volume_world.borrow().provider.calls();
    if calls.is_empty() {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected no calls, got {calls:?}"
        )))
    }
}
