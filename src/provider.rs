//! Provider abstraction for the block-storage calls the lifecycle issues.
//!
//! The lifecycle only ever talks to a cloud through [`ProviderClient`]. A
//! concrete implementation lives in [`crate::scaleway`]; tests use the
//! scripted double from [`crate::test_support`].

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

const BYTES_PER_GIB: u64 = 1024 * 1024 * 1024;

/// Parameters required to create a block volume.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VolumeRequest {
    /// Size in GiB.
    pub size_gb: u64,
    /// Availability zone the volume must be created in.
    pub zone: String,
    /// Provider volume type (for example `b_ssd` or `gp2`).
    pub volume_type: String,
}

impl VolumeRequest {
    /// Starts a builder for a [`VolumeRequest`].
    #[must_use]
    pub fn builder() -> VolumeRequestBuilder {
        VolumeRequestBuilder::default()
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::MissingField`] when the zone or volume type is
    /// blank and [`RequestError::ZeroSize`] when the size is zero.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.size_gb == 0 {
            return Err(RequestError::ZeroSize);
        }
        if self.zone.is_empty() {
            return Err(RequestError::MissingField(String::from("zone")));
        }
        if self.volume_type.is_empty() {
            return Err(RequestError::MissingField(String::from("volume_type")));
        }
        Ok(())
    }

    /// Returns the requested size in bytes, or `None` on overflow.
    #[must_use]
    pub const fn size_bytes(&self) -> Option<u64> {
        self.size_gb.checked_mul(BYTES_PER_GIB)
    }
}

/// Builder for [`VolumeRequest`] that trims string inputs on build.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VolumeRequestBuilder {
    size_gb: u64,
    zone: String,
    volume_type: String,
}

impl VolumeRequestBuilder {
    /// Sets the size in GiB.
    #[must_use]
    pub const fn size_gb(mut self, value: u64) -> Self {
        self.size_gb = value;
        self
    }

    /// Sets the availability zone.
    #[must_use]
    pub fn zone(mut self, value: impl Into<String>) -> Self {
        self.zone = value.into();
        self
    }

    /// Sets the volume type.
    #[must_use]
    pub fn volume_type(mut self, value: impl Into<String>) -> Self {
        self.volume_type = value.into();
        self
    }

    /// Builds and validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] when a required field is empty or zero.
    pub fn build(self) -> Result<VolumeRequest, RequestError> {
        let request = VolumeRequest {
            size_gb: self.size_gb,
            zone: self.zone.trim().to_owned(),
            volume_type: self.volume_type.trim().to_owned(),
        };
        request.validate()?;
        Ok(request)
    }
}

/// Errors raised while building provider requests.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum RequestError {
    /// Raised when a required string field is missing or blank.
    #[error("missing or empty field: {0}")]
    MissingField(String),
    /// Raised when a zero-sized volume is requested.
    #[error("volume size must be greater than zero")]
    ZeroSize,
}

/// Point-in-time view of a provider volume.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VolumeSnapshot {
    /// Provider volume identifier.
    pub id: String,
    /// Provider status string (for example `available` or `in_use`).
    pub status: String,
    /// Zone the volume lives in.
    pub zone: String,
}

impl VolumeSnapshot {
    /// Returns true when the provider reports the volume as usable.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status.contains("available")
    }
}

/// Placement details of a compute instance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstancePlacement {
    /// Provider instance identifier.
    pub instance_id: String,
    /// Availability zone hosting the instance.
    pub zone: String,
}

/// Failure reported by a provider call.
///
/// Adapters translate SDK and transport errors into this type so nothing
/// provider specific crosses into the lifecycle.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ProviderError {
    /// The addressed resource does not exist.
    #[error("resource {resource_id} not found")]
    NotFound {
        /// Identifier that was looked up.
        resource_id: String,
    },
    /// Any other failure, with the provider's message preserved verbatim.
    #[error("{message}")]
    Api {
        /// HTTP status, when the failure came from an HTTP response.
        status: Option<u16>,
        /// Message returned by the provider.
        message: String,
    },
}

impl ProviderError {
    /// Builds an [`ProviderError::Api`] without a status code.
    #[must_use]
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            status: None,
            message: message.into(),
        }
    }

    /// Returns the provider message carried by this error.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NotFound { .. } => self.to_string(),
            Self::Api { message, .. } => message.clone(),
        }
    }
}

/// Future returned by provider operations.
pub type ProviderFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

/// Volume and instance operations required by the lifecycle.
pub trait ProviderClient {
    /// Creates a volume and returns the provider identifier.
    fn create_volume<'a>(&'a self, request: &'a VolumeRequest) -> ProviderFuture<'a, String>;

    /// Deletes a volume, returning whether the provider confirmed the call.
    fn delete_volume<'a>(&'a self, volume_id: &'a str) -> ProviderFuture<'a, bool>;

    /// Lists volumes, optionally restricted to a single identifier.
    ///
    /// An unknown identifier may surface either as an empty list or as
    /// [`ProviderError::NotFound`]; callers must accept both.
    fn list_volumes<'a>(
        &'a self,
        volume_id: Option<&'a str>,
    ) -> ProviderFuture<'a, Vec<VolumeSnapshot>>;

    /// Attaches a volume to an instance.
    fn attach_volume<'a>(
        &'a self,
        instance_id: &'a str,
        volume_id: &'a str,
        device: Option<&'a str>,
    ) -> ProviderFuture<'a, ()>;

    /// Detaches a volume from whichever instance holds it.
    fn detach_volume<'a>(&'a self, volume_id: &'a str) -> ProviderFuture<'a, ()>;

    /// Reads the placement of a compute instance.
    fn get_instance<'a>(&'a self, instance_id: &'a str) -> ProviderFuture<'a, InstancePlacement>;
}
