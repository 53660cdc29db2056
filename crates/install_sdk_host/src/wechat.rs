//! WeChat JS-SDK handle contract and the handshake payload.

use std::rc::Rc;

use serde::Serialize;

use crate::models::JsSdkSignature;

/// Open tag requested in every handshake.
pub const OPEN_LAUNCH_APP_TAG: &str = "wx-open-launch-app";

/// Payload passed to `wx.config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WxConfig {
    /// Enables the vendor debug alerts.
    pub debug: bool,
    /// Official account app id.
    pub app_id: String,
    /// Signature timestamp.
    pub timestamp: String,
    /// Signature nonce.
    pub nonce_str: String,
    /// Signature digest.
    pub signature: String,
    /// JS APIs requested; the open tag needs none.
    pub js_api_list: Vec<String>,
    /// Open tags requested.
    pub open_tag_list: Vec<String>,
}

impl WxConfig {
    /// Builds the handshake payload requesting the launch-app open tag.
    pub fn launch_app(signature: &JsSdkSignature, debug: bool) -> Self {
        Self {
            debug,
            app_id: signature.app_id.clone(),
            timestamp: signature.timestamp.clone(),
            nonce_str: signature.nonce_str.clone(),
            signature: signature.signature.clone(),
            js_api_list: Vec::new(),
            open_tag_list: vec![OPEN_LAUNCH_APP_TAG.to_string()],
        }
    }
}

/// Handle to the vendor global injected by the JS-SDK script.
pub trait WxJsSdk {
    /// Calls `wx.config`.
    ///
    /// # Errors
    ///
    /// Returns an error when the call throws.
    fn config(&self, config: &WxConfig) -> Result<(), String>;

    /// Registers the `wx.ready` callback.
    fn ready(&self, callback: Box<dyn FnOnce()>);

    /// Registers the `wx.error` callback.
    fn error(&self, callback: Box<dyn FnOnce(String)>);

    /// Reads the `isReady` flag; `None` when the vendor does not expose one.
    fn is_ready(&self) -> Option<bool>;
}

/// Looks up the vendor global.
pub trait WxJsSdkProvider {
    /// Returns the handle when the global exists.
    fn sdk(&self) -> Option<Rc<dyn WxJsSdk>>;
}
