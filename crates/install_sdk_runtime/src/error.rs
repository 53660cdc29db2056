//! Error taxonomy surfaced by the SDK runtime.

use install_sdk_host::TransportError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
/// Errors produced by initialization, strategy preparation, launching, and rendering.
pub enum SdkError {
    /// A required input was absent (app id, descriptor, open-tag config).
    #[error("missing configuration: {0}")]
    ConfigMissing(&'static str),
    /// Fetching the capability descriptor or download config failed.
    #[error("remote config request to `{endpoint}` failed: {source}")]
    RemoteConfig {
        /// Endpoint path that failed.
        endpoint: &'static str,
        /// Transport failure.
        #[source]
        source: TransportError,
    },
    /// The vendor JS-SDK script could not be loaded.
    #[error("failed to load script `{url}`: {message}")]
    ScriptLoad {
        /// Script URL.
        url: String,
        /// Loader diagnostic.
        message: String,
    },
    /// The vendor signature handshake failed or timed out.
    #[error("WeChat JS-SDK handshake failed: {0}")]
    SdkHandshake(String),
    /// An operation ran before `init` completed.
    #[error("install sdk is not initialized; call init first")]
    NotInitialized,
    /// The render target was missing or not an element.
    #[error("invalid render container: {0}")]
    InvalidContainer(String),
    /// The page refused a navigation or scheme iframe.
    #[error("app launch failed: {0}")]
    Launch(String),
    /// Mounting a trigger element failed.
    #[error("trigger render failed: {0}")]
    Render(String),
}

impl SdkError {
    /// Returns a stable token used as the JS error name.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ConfigMissing(_) => "CONFIG_MISSING",
            Self::RemoteConfig { .. } => "REMOTE_CONFIG_ERROR",
            Self::ScriptLoad { .. } => "SCRIPT_LOAD_ERROR",
            Self::SdkHandshake(_) => "SDK_HANDSHAKE_ERROR",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::InvalidContainer(_) => "INVALID_CONTAINER",
            Self::Launch(_) => "LAUNCH_ERROR",
            Self::Render(_) => "RENDER_ERROR",
        }
    }

    /// Returns whether the failure only disables the open tag and never blocks the fallback.
    pub const fn is_vendor_failure(&self) -> bool {
        matches!(self, Self::ScriptLoad { .. } | Self::SdkHandshake(_))
    }
}
