//! Browser (`wasm32`) implementations of the [`install_sdk_host`] contracts and the JS API.
//!
//! Each adapter reaches the page through `web-sys`, with a non-wasm shim that reports the
//! capability as unavailable so the crate builds and tests natively:
//! - [`WebTransport`]: `fetch` with an `AbortController` timeout
//! - [`WebScriptLoader`]: `<script>` injection into `<head>`
//! - [`WebWxJsSdkProvider`]: reads `window.wx`
//! - [`WebPageHost`]: location, visibility, navigation, and the scheme iframe
//! - [`WebDeviceProbe`]: viewport, WebGL, and the ICE address probe
//! - [`WebTimer`] / [`WebSpawner`]: `setTimeout` and `spawn_local`
//! - [`WebTriggerContainer`]: renders into a host `HTMLElement`

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

#[cfg(target_arch = "wasm32")]
pub mod api;
mod bridge;
pub mod device;
pub mod page;
pub mod script;
pub mod services;
pub mod timer;
pub mod transport;
pub mod trigger;
pub mod wechat;

pub use device::WebDeviceProbe;
pub use page::WebPageHost;
pub use script::WebScriptLoader;
pub use services::build_host_services;
pub use timer::{WebSpawner, WebTimer};
pub use transport::WebTransport;
pub use trigger::WebTriggerContainer;
pub use wechat::WebWxJsSdkProvider;
