//! Translation of Scaleway failures into provider errors.

use scaleway_rs::{ScalewayApiError, ScalewayError};

use crate::provider::ProviderError;

impl From<ScalewayError> for ProviderError {
    fn from(value: ScalewayError) -> Self {
        Self::api(value.to_string())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(value: reqwest::Error) -> Self {
        Self::Api {
            status: value.status().map(|status| status.as_u16()),
            message: value.to_string(),
        }
    }
}

/// Builds a provider error from a non-success HTTP response body.
///
/// Scaleway reports failures as `{"type": ..., "message": ...}`; both parts
/// are kept so callers can match on either.
pub(super) fn from_response(status: u16, body: &[u8], resource_id: &str) -> ProviderError {
    if status == 404 {
        return ProviderError::NotFound {
            resource_id: resource_id.to_owned(),
        };
    }

    let message = serde_json::from_slice::<ScalewayApiError>(body).map_or_else(
        |_| String::from_utf8_lossy(body).into_owned(),
        |api_err| format!("{}: {}", api_err.etype, api_err.message),
    );
    ProviderError::Api {
        status: Some(status),
        message,
    }
}
