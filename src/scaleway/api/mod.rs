//! Direct HTTP calls against the Scaleway Instances API.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::RequestBuilder;

use crate::provider::ProviderError;

use super::ScalewayProvider;
use super::error::from_response;

mod instance;
mod volume_attach;
mod volume_create;
mod volume_delete;
mod volume_detach;
mod volume_list;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
pub(super) const SCALEWAY_INSTANCE_API_BASE: &str = "https://api.scaleway.com/instance/v1";
const AUTH_HEADER: &str = "X-Auth-Token";

static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

impl ScalewayProvider {
    fn zone_url(&self, path: &str) -> String {
        format!("{}/zones/{}/{path}", self.base_url, self.config.default_zone)
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTH_HEADER, &self.config.secret_key)
    }

    /// Sends `request` and returns the body of a successful response.
    /// `resource_id` names the resource a 404 refers to.
    async fn execute(
        &self,
        request: RequestBuilder,
        resource_id: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        let response = self.authorised(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if status.is_success() {
            return Ok(body.to_vec());
        }
        Err(from_response(status.as_u16(), &body, resource_id))
    }
}

fn parse<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ProviderError> {
    serde_json::from_slice(body).map_err(|err| ProviderError::api(err.to_string()))
}
