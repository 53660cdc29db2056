//! Wire models shared by the remote config client, the session context, and the strategies.

use serde::{Deserialize, Deserializer, Serialize};

use crate::device::DownloadPlatform;

/// Default visual template for rendered triggers.
pub const DEFAULT_TRIGGER_TEMPLATE: &str = "<div>Open App</div>";

// Backend replies send `null` for fields they leave unset.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Host-supplied initialization parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InitOptions {
    /// Application identifier registered with the install backend.
    #[serde(default)]
    pub id: String,
    /// Selects the debug backend host and enables JS-SDK debug output.
    #[serde(rename = "isDebug", default)]
    pub is_debug: bool,
    /// Opaque business payload forwarded to the open tag and the descriptor request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_info: Option<String>,
    /// Set to `false` to skip the WeChat JS-SDK handshake during init.
    #[serde(rename = "loadWxSdk", default, skip_serializing_if = "Option::is_none")]
    pub load_wx_sdk: Option<bool>,
    /// Overrides the backend origin resolved from `isDebug`.
    #[serde(rename = "baseUrl", default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in milliseconds.
    #[serde(rename = "timeout", default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u32>,
    /// Set to `false` to skip the public-address lookup during fallback execution.
    #[serde(
        rename = "resolveExtranetIp",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub resolve_extranet_ip: Option<bool>,
}

impl InitOptions {
    /// Creates options for `id` with every optional field unset.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Returns whether the JS-SDK handshake should run when the environment allows it.
    pub fn wants_wx_sdk(&self) -> bool {
        self.load_wx_sdk.unwrap_or(true)
    }

    /// Returns whether the public-address lookup should run.
    pub fn wants_extranet_lookup(&self) -> bool {
        self.resolve_extranet_ip.unwrap_or(true)
    }
}

/// App-opening mechanism advertised by the capability descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpenType {
    /// WeChat `wx-open-launch-app` open tag.
    #[serde(rename = "openTag", alias = "open_tag")]
    OpenTag,
    /// Custom URL scheme.
    #[serde(rename = "scheme")]
    Scheme,
    /// HTTP download URL.
    #[serde(rename = "url")]
    Url,
}

/// Signing parameters for the WeChat JS-SDK `config` call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JsSdkSignature {
    /// Official account app id.
    pub app_id: String,
    /// Signature timestamp.
    pub timestamp: String,
    /// Signature nonce.
    pub nonce_str: String,
    /// Signature digest.
    pub signature: String,
}

/// Open-tag configuration returned when the descriptor supports [`OpenType::OpenTag`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpenTagConfig {
    /// URL of the vendor JS-SDK script.
    #[serde(default, deserialize_with = "null_as_default")]
    pub js_sdk_url: String,
    /// Short-lived signing parameters.
    #[serde(default)]
    pub js_sdk_config: JsSdkSignature,
    /// Mobile app id placed on the open tag.
    #[serde(default, deserialize_with = "null_as_default")]
    pub app_id: String,
}

/// Capability descriptor for the current app and page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppBaseConfig {
    /// Supported opening mechanisms.
    #[serde(default, deserialize_with = "null_as_default")]
    pub types: Vec<OpenType>,
    /// Current app version.
    #[serde(default, deserialize_with = "null_as_default")]
    pub app_version: String,
    /// Open-tag configuration; present iff `types` contains [`OpenType::OpenTag`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_tag: Option<OpenTagConfig>,
    /// Extra payload echoed by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_info: Option<String>,
}

/// Adjustment applied by [`AppBaseConfig::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorRepair {
    /// `openTag` was declared without an `open_tag` block and was removed from `types`.
    DroppedOpenTagType,
    /// An `open_tag` block arrived without `openTag` in `types` and was discarded.
    DroppedUndeclaredConfig,
}

impl AppBaseConfig {
    /// Returns whether `open_type` is advertised.
    pub fn supports(&self, open_type: OpenType) -> bool {
        self.types.contains(&open_type)
    }

    /// Enforces the `open_tag` presence invariant, returning the repaired descriptor and the
    /// repair applied, if any.
    pub fn normalized(mut self) -> (Self, Option<DescriptorRepair>) {
        let declared = self.supports(OpenType::OpenTag);
        match (declared, self.open_tag.is_some()) {
            (true, false) => {
                self.types.retain(|open_type| *open_type != OpenType::OpenTag);
                (self, Some(DescriptorRepair::DroppedOpenTagType))
            }
            (false, true) => {
                self.open_tag = None;
                (self, Some(DescriptorRepair::DroppedUndeclaredConfig))
            }
            _ => (self, None),
        }
    }
}

/// Body of the capability descriptor request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseConfigRequest {
    /// Application identifier.
    pub app_id: String,
    /// Current page URL.
    pub url: String,
    /// Optional business payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext_info: Option<String>,
}

/// Scheme and download URL pair returned by the download endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Custom URL scheme; empty when unavailable.
    #[serde(default, deserialize_with = "null_as_default")]
    pub scheme: String,
    /// Download or landing URL; empty when unavailable.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

impl DownloadConfig {
    /// Returns the scheme when non-empty.
    pub fn scheme(&self) -> Option<&str> {
        Some(self.scheme.trim()).filter(|scheme| !scheme.is_empty())
    }

    /// Returns the URL when non-empty.
    pub fn url(&self) -> Option<&str> {
        Some(self.url.trim()).filter(|url| !url.is_empty())
    }
}

/// Device and page signals reported with the download request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceFingerprint {
    /// Platform token.
    pub download_type: DownloadPlatform,
    /// Query string of the landing page without the leading `?`.
    pub link_param: String,
    /// Viewport width.
    pub screen_width: f64,
    /// Viewport height.
    pub screen_height: f64,
    /// Device pixel ratio (backend field spelling).
    #[serde(rename = "device_pixel_ration")]
    pub device_pixel_ratio: f64,
    /// WebGL version string.
    pub web_gl_version: String,
    /// GPU renderer.
    pub gpu_type: String,
    /// Local network address.
    pub intranet_ip: String,
    /// Public network address.
    pub extranet_ip: String,
    /// Device brand.
    pub brand_name: String,
    /// Device model.
    pub mobile_model: String,
    /// App version from the capability descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
}

/// `ext_info` object of the download request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadExtInfo {
    /// Application identifier, repeated for the backend.
    pub project_unique_id: String,
    /// Collected device signals.
    #[serde(flatten)]
    pub fingerprint: DeviceFingerprint,
}

/// Body of the download config request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DownloadRequest {
    /// Application identifier.
    pub app_id: String,
    /// Device signals.
    pub ext_info: DownloadExtInfo,
}

impl DownloadRequest {
    /// Builds the request for `app_id` from a collected fingerprint.
    pub fn new(app_id: impl Into<String>, fingerprint: DeviceFingerprint) -> Self {
        let app_id = app_id.into();
        Self {
            ext_info: DownloadExtInfo {
                project_unique_id: app_id.clone(),
                fingerprint,
            },
            app_id,
        }
    }
}

/// Host render options for a trigger.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderOptions {
    /// HTML template; elements are serialized to `outerHTML` before reaching the runtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl RenderOptions {
    /// Returns the configured template or [`DEFAULT_TRIGGER_TEMPLATE`].
    pub fn template_or_default(&self) -> &str {
        self.template
            .as_deref()
            .filter(|template| !template.trim().is_empty())
            .unwrap_or(DEFAULT_TRIGGER_TEMPLATE)
    }
}
