//! Target-independent install SDK runtime.
//!
//! [`InstallSdk`] owns one [`SessionContext`] and the two launch strategies. Initialization
//! fetches the capability descriptor through [`RemoteConfigClient`], prepares the WeChat open tag
//! when the environment allows it, and later render calls pick between the open tag and the
//! scheme/URL fallback. Every browser effect goes through the contracts in `install_sdk_host`,
//! so the whole runtime is exercised natively with in-memory collaborators.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod context;
pub mod error;
pub mod remote;
pub mod sdk;
pub mod strategy;

#[cfg(test)]
mod testing;

pub use context::SessionContext;
pub use error::SdkError;
pub use install_sdk_host::{
    is_android, is_ios, is_mobile, is_wechat_env, is_wechat_mini_program, is_wechat_webview,
    EnvironmentSnapshot,
};
pub use remote::{RemoteConfigClient, BASE_CONFIG_PATH, DOWNLOAD_PATH};
pub use sdk::{InstallSdk, SdkState};
pub use strategy::{
    collect_fingerprint, plan_launch, FallbackStrategy, LaunchOutcome, LaunchPlan,
    StrategyTimings, TriggerStrategy, WxOpenState, WxOpenTagStrategy,
};
