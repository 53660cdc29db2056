//! Host service bundle injected into the SDK runtime.

use std::rc::Rc;

use futures::task::LocalSpawn;

use crate::{DeviceProbe, PageHost, ScriptLoader, Timer, Transport, WxJsSdkProvider};

/// Environment-specific collaborators selected before the runtime is constructed.
///
/// The browser adapter crate builds one of these from `window`; tests build one from fakes.
#[derive(Clone)]
pub struct SdkHostServices {
    /// HTTP transport for the install backend.
    pub transport: Rc<dyn Transport>,
    /// Script injection for the vendor JS-SDK.
    pub scripts: Rc<dyn ScriptLoader>,
    /// Access to the vendor global.
    pub wx: Rc<dyn WxJsSdkProvider>,
    /// Current page.
    pub page: Rc<dyn PageHost>,
    /// Device fingerprint signals.
    pub device: Rc<dyn DeviceProbe>,
    /// Timers.
    pub timer: Rc<dyn Timer>,
    /// Executor for work started from DOM event handlers.
    pub spawner: Rc<dyn LocalSpawn>,
}
