//! Typed host contracts and shared models for the install SDK.
//!
//! This crate is the boundary between the target-independent runtime in `install_sdk_runtime`
//! and the browser adapters in `install_sdk_web`. It holds the backend wire models, the
//! user-agent environment probe and device lookup tables, the transport contract with its
//! immutable configuration, and one trait per browser collaborator.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod device;
pub mod environment;
pub mod host;
pub mod models;
pub mod page;
pub mod script;
pub mod timer;
pub mod transport;
pub mod trigger;
pub mod wechat;

pub use device::{
    brand_name, download_platform, link_param, mobile_model, parse_extranet_address,
    DeviceProbe, DeviceProbeFuture, DownloadPlatform, ScreenMetrics, WebGlInfo,
    EXTRANET_LOOKUP_URL, LOOPBACK_ADDRESS, UNKNOWN, WEBGL_NOT_SUPPORTED,
};
pub use environment::{
    is_android, is_ios, is_mobile, is_wechat_env, is_wechat_mini_program, is_wechat_webview,
    EnvironmentSnapshot,
};
pub use host::SdkHostServices;
pub use models::{
    AppBaseConfig, BaseConfigRequest, DescriptorRepair, DeviceFingerprint, DownloadConfig,
    DownloadExtInfo, DownloadRequest, InitOptions, JsSdkSignature, OpenTagConfig, OpenType,
    RenderOptions, DEFAULT_TRIGGER_TEMPLATE,
};
pub use page::{PageHost, SchemeFrame};
pub use script::{ScriptLoadFuture, ScriptLoader};
pub use timer::{Timer, TimerFuture};
pub use transport::{
    ApiResponse, HttpMethod, HttpRequest, Transport, TransportConfig, TransportError,
    TransportFuture, API_BASE_PATH, DEBUG_HOST, DEFAULT_TIMEOUT_MS, PRODUCTION_HOST,
};
pub use trigger::{ButtonView, OpenTagHandlers, OpenTagView, TriggerContainer, OPEN_TAG_STYLE};
pub use wechat::{WxConfig, WxJsSdk, WxJsSdkProvider, OPEN_LAUNCH_APP_TAG};
