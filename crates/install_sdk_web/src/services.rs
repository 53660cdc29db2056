//! Browser host service wiring for the runtime.

use std::rc::Rc;

use install_sdk_host::SdkHostServices;

use crate::{
    WebDeviceProbe, WebPageHost, WebScriptLoader, WebSpawner, WebTimer, WebTransport,
    WebWxJsSdkProvider,
};

/// Builds the service bundle backed by `window`.
pub fn build_host_services() -> SdkHostServices {
    SdkHostServices {
        transport: Rc::new(WebTransport),
        scripts: Rc::new(WebScriptLoader),
        wx: Rc::new(WebWxJsSdkProvider),
        page: Rc::new(WebPageHost),
        device: Rc::new(WebDeviceProbe),
        timer: Rc::new(WebTimer),
        spawner: Rc::new(WebSpawner),
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use install_sdk_host::{InitOptions, TransportError};
    use install_sdk_runtime::{InstallSdk, SdkError, SdkState};

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn runtime_over_native_shims_fails_init_with_a_transport_error() {
        let sdk = InstallSdk::new(build_host_services());

        let err = block_on(sdk.init(InitOptions::new("app123"))).expect_err("no fetch natively");

        assert!(matches!(
            err,
            SdkError::RemoteConfig {
                source: TransportError::Network(_),
                ..
            }
        ));
        assert_eq!(sdk.state(), SdkState::InitFailed);
        assert!(!sdk.can_use_wx_open());
    }
}
