//! Request and response bodies for the Scaleway volume endpoints.

use serde::{Deserialize, Serialize};

use crate::provider::{ProviderError, VolumeSnapshot};

const AVAILABLE_STATE: &str = "available";

/// Body for `POST /zones/{zone}/volumes`.
#[derive(Clone, Debug, Serialize)]
pub(super) struct CreateVolumeRequest {
    pub name: String,
    pub size: u64,
    pub volume_type: String,
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Body for `POST /zones/{zone}/servers/{id}/attach-volume` and
/// `detach-volume`.
#[derive(Clone, Debug, Serialize)]
pub(super) struct VolumeActionRequest {
    pub volume_id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct VolumeEnvelope {
    pub volume: ScalewayVolume,
}

#[derive(Debug, Deserialize)]
pub(super) struct VolumeList {
    #[serde(default)]
    pub volumes: Vec<ScalewayVolume>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ServerRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ScalewayVolume {
    pub id: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub server: Option<ServerRef>,
}

impl ScalewayVolume {
    /// Rejects attachment of a volume that is not `available`. The message
    /// names the required state so the attach classifier sees a transient
    /// conflict.
    pub(super) fn ensure_attachable(&self) -> Result<(), ProviderError> {
        if self.state == AVAILABLE_STATE {
            return Ok(());
        }
        Err(ProviderError::api(format!(
            "volume {} is {}, not {AVAILABLE_STATE}",
            self.id, self.state
        )))
    }
}

impl From<ScalewayVolume> for VolumeSnapshot {
    fn from(value: ScalewayVolume) -> Self {
        Self {
            id: value.id,
            status: value.state,
            zone: value.zone,
        }
    }
}
