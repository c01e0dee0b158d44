//! Test support utilities shared across unit and integration tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::provider::{
    InstancePlacement, ProviderClient, ProviderError, ProviderFuture, VolumeRequest,
    VolumeSnapshot,
};

/// Records a single call made through [`ScriptedProvider`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProviderCall {
    /// `create_volume` with the request it received.
    CreateVolume(VolumeRequest),
    /// `delete_volume` for the given id.
    DeleteVolume(String),
    /// `list_volumes` with its optional filter.
    ListVolumes(Option<String>),
    /// `attach_volume` with instance id, volume id and device.
    AttachVolume {
        /// Target instance.
        instance_id: String,
        /// Volume being attached.
        volume_id: String,
        /// Device path passed through, if any.
        device: Option<String>,
    },
    /// `detach_volume` for the given id.
    DetachVolume(String),
    /// `get_instance` for the given id.
    GetInstance(String),
}

impl ProviderCall {
    /// Returns true for calls that change provider state.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateVolume(_)
                | Self::DeleteVolume(_)
                | Self::AttachVolume { .. }
                | Self::DetachVolume(_)
        )
    }
}

/// Provider operation a scripted failure applies to.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ScriptedOperation {
    /// `create_volume`.
    Create,
    /// `delete_volume`.
    Delete,
    /// `list_volumes`.
    List,
    /// `attach_volume`.
    Attach,
    /// `detach_volume`.
    Detach,
    /// `get_instance`.
    GetInstance,
}

#[derive(Debug, Default)]
struct State {
    volumes: Vec<VolumeSnapshot>,
    instances: BTreeMap<String, String>,
    failures: BTreeMap<ScriptedOperation, VecDeque<ProviderError>>,
    unconfirmed_deletes: u32,
    sticky_deletes: u32,
    next_volume: u32,
    calls: Vec<ProviderCall>,
}

/// In-memory provider that serves scripted volumes, instances and failures
/// and records every call it receives.
///
/// Clones share state, so a test can keep a handle after moving the provider
/// into a [`crate::VolumeLifecycle`].
#[derive(Clone, Debug, Default)]
pub struct ScriptedProvider {
    state: Arc<Mutex<State>>,
}

impl ScriptedProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeds a volume.
    pub fn add_volume(&self, id: &str, status: &str, zone: &str) {
        self.lock().volumes.push(VolumeSnapshot {
            id: id.to_owned(),
            status: status.to_owned(),
            zone: zone.to_owned(),
        });
    }

    /// Seeds a compute instance placed in `zone`.
    pub fn add_instance(&self, id: &str, zone: &str) {
        self.lock()
            .instances
            .insert(id.to_owned(), zone.to_owned());
    }

    /// Makes the next call to `operation` fail with `error`.
    pub fn fail_next(&self, operation: ScriptedOperation, error: ProviderError) {
        self.lock()
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Makes the next delete call return `false` without removing anything.
    pub fn leave_next_delete_unconfirmed(&self) {
        self.lock().unconfirmed_deletes += 1;
    }

    /// Makes the next delete call succeed while the volume stays listed.
    pub fn keep_volume_after_next_delete(&self) {
        self.lock().sticky_deletes += 1;
    }

    /// Returns a snapshot of every call made so far.
    #[must_use]
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.lock().calls.clone()
    }

    /// Returns the calls that changed provider state.
    #[must_use]
    pub fn mutations(&self) -> Vec<ProviderCall> {
        self.calls()
            .into_iter()
            .filter(ProviderCall::is_mutation)
            .collect()
    }

    /// Returns the ids of the volumes currently held.
    #[must_use]
    pub fn volume_ids(&self) -> Vec<String> {
        self.lock()
            .volumes
            .iter()
            .map(|volume| volume.id.clone())
            .collect()
    }

    fn begin(
        &self,
        call: ProviderCall,
        operation: ScriptedOperation,
    ) -> Result<MutexGuard<'_, State>, ProviderError> {
        let mut state = self.lock();
        state.calls.push(call);
        if let Some(error) = state
            .failures
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }
        Ok(state)
    }
}

impl ProviderClient for ScriptedProvider {
    fn create_volume<'a>(&'a self, request: &'a VolumeRequest) -> ProviderFuture<'a, String> {
        Box::pin(async move {
            let mut state = self.begin(
                ProviderCall::CreateVolume(request.clone()),
                ScriptedOperation::Create,
            )?;
            state.next_volume += 1;
            let id = format!("vol-new-{}", state.next_volume);
            state.volumes.push(VolumeSnapshot {
                id: id.clone(),
                status: String::from("available"),
                zone: request.zone.clone(),
            });
            Ok(id)
        })
    }

    fn delete_volume<'a>(&'a self, volume_id: &'a str) -> ProviderFuture<'a, bool> {
        Box::pin(async move {
            let mut state = self.begin(
                ProviderCall::DeleteVolume(volume_id.to_owned()),
                ScriptedOperation::Delete,
            )?;
            if state.unconfirmed_deletes > 0 {
                state.unconfirmed_deletes -= 1;
                return Ok(false);
            }
            if state.sticky_deletes > 0 {
                state.sticky_deletes -= 1;
                return Ok(true);
            }
            let before = state.volumes.len();
            state.volumes.retain(|volume| volume.id != volume_id);
            if state.volumes.len() == before {
                return Err(ProviderError::NotFound {
                    resource_id: volume_id.to_owned(),
                });
            }
            Ok(true)
        })
    }

    fn list_volumes<'a>(
        &'a self,
        volume_id: Option<&'a str>,
    ) -> ProviderFuture<'a, Vec<VolumeSnapshot>> {
        Box::pin(async move {
            let state = self.begin(
                ProviderCall::ListVolumes(volume_id.map(str::to_owned)),
                ScriptedOperation::List,
            )?;
            Ok(state
                .volumes
                .iter()
                .filter(|volume| volume_id.is_none_or(|id| volume.id == id))
                .cloned()
                .collect())
        })
    }

    fn attach_volume<'a>(
        &'a self,
        instance_id: &'a str,
        volume_id: &'a str,
        device: Option<&'a str>,
    ) -> ProviderFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.begin(
                ProviderCall::AttachVolume {
                    instance_id: instance_id.to_owned(),
                    volume_id: volume_id.to_owned(),
                    device: device.map(str::to_owned),
                },
                ScriptedOperation::Attach,
            )?;
            if let Some(volume) = state.volumes.iter_mut().find(|volume| volume.id == volume_id) {
                volume.status = String::from("in_use");
            }
            Ok(())
        })
    }

    fn detach_volume<'a>(&'a self, volume_id: &'a str) -> ProviderFuture<'a, ()> {
        Box::pin(async move {
            let mut state = self.begin(
                ProviderCall::DetachVolume(volume_id.to_owned()),
                ScriptedOperation::Detach,
            )?;
            if let Some(volume) = state.volumes.iter_mut().find(|volume| volume.id == volume_id) {
                volume.status = String::from("available");
            }
            Ok(())
        })
    }

    fn get_instance<'a>(&'a self, instance_id: &'a str) -> ProviderFuture<'a, InstancePlacement> {
        Box::pin(async move {
            let state = self.begin(
                ProviderCall::GetInstance(instance_id.to_owned()),
                ScriptedOperation::GetInstance,
            )?;
            state
                .instances
                .get(instance_id)
                .map(|zone| InstancePlacement {
                    instance_id: instance_id.to_owned(),
                    zone: zone.clone(),
                })
                .ok_or_else(|| ProviderError::NotFound {
                    resource_id: instance_id.to_owned(),
                })
        })
    }
}
