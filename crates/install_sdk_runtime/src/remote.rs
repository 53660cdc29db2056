//! Client for the install backend's capability and download endpoints.

use std::rc::Rc;

use install_sdk_host::{
    ApiResponse, AppBaseConfig, BaseConfigRequest, DownloadConfig, DownloadRequest, HttpMethod,
    Transport, TransportConfig, TransportError,
};
use leptos::logging;
use serde::{de::DeserializeOwned, Serialize};

use crate::SdkError;

/// Capability descriptor endpoint.
pub const BASE_CONFIG_PATH: &str = "/api/sdk/v1/baseConfig";
/// Scheme/URL pair endpoint.
pub const DOWNLOAD_PATH: &str = "/api/sdk/v1/download";

/// Remote config client bound to one immutable [`TransportConfig`].
///
/// Requests are issued once; failures are never retried.
#[derive(Clone)]
pub struct RemoteConfigClient {
    transport: Rc<dyn Transport>,
    config: TransportConfig,
}

impl RemoteConfigClient {
    /// Creates a client for `config`.
    pub fn new(transport: Rc<dyn Transport>, config: TransportConfig) -> Self {
        Self { transport, config }
    }

    /// Returns the bound transport config.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Fetches the capability descriptor for `app_id` on the page at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::RemoteConfig`] on network failure, timeout, non-2xx status, or an
    /// undecodable body.
    pub async fn fetch_base_config(
        &self,
        app_id: &str,
        url: &str,
        ext_info: Option<String>,
    ) -> Result<AppBaseConfig, SdkError> {
        let request = BaseConfigRequest {
            app_id: app_id.to_string(),
            url: url.to_string(),
            ext_info,
        };
        self.post(BASE_CONFIG_PATH, &request).await
    }

    /// Fetches the scheme/URL pair for a download request.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::RemoteConfig`] under the same conditions as
    /// [`Self::fetch_base_config`].
    pub async fn fetch_download_config(
        &self,
        request: &DownloadRequest,
    ) -> Result<DownloadConfig, SdkError> {
        self.post(DOWNLOAD_PATH, request).await
    }

    async fn post<B, T>(&self, endpoint: &'static str, body: &B) -> Result<T, SdkError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let result = self.try_post(endpoint, body).await;
        if let Err(err) = &result {
            logging::error!("install sdk request to `{endpoint}` failed: {err}");
        }
        result.map_err(|source| SdkError::RemoteConfig { endpoint, source })
    }

    async fn try_post<B, T>(&self, endpoint: &'static str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let body =
            serde_json::to_value(body).map_err(|err| TransportError::Decode(err.to_string()))?;
        let request = self
            .config
            .json_request(HttpMethod::Post, endpoint, Some(body));
        let response = self.transport.send(&request).await?;
        Ok(ApiResponse::<T>::from_body(response)?.data)
    }
}
