//! In-memory host collaborators shared by the runtime unit tests.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    future::Future,
    rc::Rc,
};

use futures::{executor::LocalPool, future};
use install_sdk_host::{
    ButtonView, DeviceFingerprint, DeviceProbe, DeviceProbeFuture, DownloadPlatform,
    HttpRequest, JsSdkSignature, OpenTagConfig, OpenTagHandlers, OpenTagView, PageHost,
    SchemeFrame, ScreenMetrics, ScriptLoadFuture, ScriptLoader, SdkHostServices, Timer,
    TimerFuture, Transport, TransportError, TransportFuture, TriggerContainer, WebGlInfo,
    WxConfig, WxJsSdk, WxJsSdkProvider,
};
use serde_json::{json, Value};

use crate::remote::{BASE_CONFIG_PATH, DOWNLOAD_PATH};

pub const IOS_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) \
    AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1";
pub const ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 13; Pixel 7 Build/TQ3A.230901.001) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
pub const WECHAT_WEBVIEW: &str = "Mozilla/5.0 (Linux; Android 13; Pixel 7 Build/TQ3A.230901.001; wv) \
    AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/120.0.0.0 Mobile Safari/537.36 \
    MicroMessenger/8.0.43.2480(0x28002B37) NetType/WIFI Language/zh_CN";

/// Observable side effect recorded by the fakes, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    FrameOpened(String),
    Slept(u32),
    FrameRemoved(String),
    Navigated(String),
    ScriptLoaded(String),
}

#[derive(Debug, Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<PageEvent>>>);

impl EventLog {
    pub fn push(&self, event: PageEvent) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<PageEvent> {
        self.0.borrow().clone()
    }

    /// Events visible on the page itself: frames, waits, and navigations.
    pub fn page_events(&self) -> Vec<PageEvent> {
        self.events()
            .into_iter()
            .filter(|event| !matches!(event, PageEvent::ScriptLoaded(_)))
            .collect()
    }
}

/// Resolves every sleep as soon as it is polled; unpolled sleeps leave no trace.
pub struct FakeTimer {
    log: EventLog,
}

impl FakeTimer {
    pub fn new(log: EventLog) -> Self {
        Self { log }
    }
}

impl Timer for FakeTimer {
    fn sleep(&self, duration_ms: u32) -> TimerFuture {
        let log = self.log.clone();
        Box::pin(async move { log.push(PageEvent::Slept(duration_ms)) })
    }
}

#[derive(Default)]
pub struct FakeTransport {
    responses: RefCell<HashMap<String, Result<Value, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn respond(&self, path: &str, response: Result<Value, TransportError>) {
        self.responses
            .borrow_mut()
            .insert(path.to_string(), response);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for FakeTransport {
    fn send<'a>(
        &'a self,
        request: &'a HttpRequest,
    ) -> TransportFuture<'a, Result<Value, TransportError>> {
        Box::pin(async move {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .borrow()
                .iter()
                .find(|(path, _)| request.url.ends_with(path.as_str()))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| {
                    Err(TransportError::Network(format!("no fake for {}", request.url)))
                })
        })
    }
}

pub struct FakeScriptLoader {
    log: EventLog,
    loaded: RefCell<Vec<String>>,
    failure: RefCell<Option<String>>,
}

impl FakeScriptLoader {
    fn new(log: EventLog) -> Self {
        Self {
            log,
            loaded: RefCell::new(Vec::new()),
            failure: RefCell::new(None),
        }
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.borrow_mut() = Some(message.to_string());
    }

    pub fn loaded(&self) -> Vec<String> {
        self.loaded.borrow().clone()
    }
}

impl ScriptLoader for FakeScriptLoader {
    fn load_script<'a>(&'a self, url: &'a str) -> ScriptLoadFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.loaded.borrow_mut().push(url.to_string());
            self.log.push(PageEvent::ScriptLoaded(url.to_string()));
            match self.failure.borrow().clone() {
                Some(message) => Err(message),
                None => Ok(()),
            }
        })
    }
}

/// How the fake vendor answers the handshake.
#[derive(Debug, Clone)]
pub enum WxBehavior {
    Ready,
    Error(String),
    ReadyThenError(String),
    Silent,
}

pub struct FakeWx {
    behavior: WxBehavior,
    configs: RefCell<Vec<WxConfig>>,
    ready_flag: Cell<Option<bool>>,
    pending_ready: RefCell<Option<Box<dyn FnOnce()>>>,
    pending_error: RefCell<Option<Box<dyn FnOnce(String)>>>,
}

impl FakeWx {
    fn new(behavior: WxBehavior) -> Self {
        Self {
            behavior,
            configs: RefCell::new(Vec::new()),
            ready_flag: Cell::new(None),
            pending_ready: RefCell::new(None),
            pending_error: RefCell::new(None),
        }
    }

    pub fn configs(&self) -> Vec<WxConfig> {
        self.configs.borrow().clone()
    }

    pub fn set_ready_flag(&self, flag: Option<bool>) {
        self.ready_flag.set(flag);
    }

    /// Registered callbacks the vendor has not invoked yet.
    pub fn pending_callbacks(&self) -> usize {
        usize::from(self.pending_ready.borrow().is_some())
            + usize::from(self.pending_error.borrow().is_some())
    }
}

impl WxJsSdk for FakeWx {
    fn config(&self, config: &WxConfig) -> Result<(), String> {
        self.configs.borrow_mut().push(config.clone());
        Ok(())
    }

    fn ready(&self, callback: Box<dyn FnOnce()>) {
        match self.behavior {
            WxBehavior::Ready | WxBehavior::ReadyThenError(_) => callback(),
            WxBehavior::Error(_) | WxBehavior::Silent => {
                *self.pending_ready.borrow_mut() = Some(callback);
            }
        }
    }

    fn error(&self, callback: Box<dyn FnOnce(String)>) {
        match &self.behavior {
            WxBehavior::Error(message) | WxBehavior::ReadyThenError(message) => {
                callback(message.clone());
            }
            WxBehavior::Ready | WxBehavior::Silent => {
                *self.pending_error.borrow_mut() = Some(callback);
            }
        }
    }

    fn is_ready(&self) -> Option<bool> {
        self.ready_flag.get()
    }
}

#[derive(Default)]
pub struct FakeWxProvider {
    sdk: RefCell<Option<Rc<FakeWx>>>,
}

impl FakeWxProvider {
    pub fn installed(&self) -> Option<Rc<FakeWx>> {
        self.sdk.borrow().clone()
    }
}

impl WxJsSdkProvider for FakeWxProvider {
    fn sdk(&self) -> Option<Rc<dyn WxJsSdk>> {
        self.installed().map(|sdk| sdk as Rc<dyn WxJsSdk>)
    }
}

pub struct FakePage {
    log: EventLog,
    user_agent: String,
    href: RefCell<String>,
    search: RefCell<String>,
    protocol: RefCell<String>,
    hidden: Cell<bool>,
    navigations: RefCell<Vec<String>>,
}

impl FakePage {
    fn new(log: EventLog, user_agent: &str) -> Self {
        Self {
            log,
            user_agent: user_agent.to_string(),
            href: RefCell::new("https://landing.example.com/?channel=ad".to_string()),
            search: RefCell::new("?channel=ad".to_string()),
            protocol: RefCell::new("https:".to_string()),
            hidden: Cell::new(false),
            navigations: RefCell::new(Vec::new()),
        }
    }

    pub fn set_search(&self, search: &str) {
        *self.search.borrow_mut() = search.to_string();
    }

    pub fn set_protocol(&self, protocol: &str) {
        *self.protocol.borrow_mut() = protocol.to_string();
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.hidden.set(hidden);
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }
}

impl PageHost for FakePage {
    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }

    fn location_href(&self) -> String {
        self.href.borrow().clone()
    }

    fn location_search(&self) -> String {
        self.search.borrow().clone()
    }

    fn protocol(&self) -> String {
        self.protocol.borrow().clone()
    }

    fn is_hidden(&self) -> bool {
        self.hidden.get()
    }

    fn navigate(&self, url: &str) -> Result<(), String> {
        self.navigations.borrow_mut().push(url.to_string());
        self.log.push(PageEvent::Navigated(url.to_string()));
        Ok(())
    }

    fn open_scheme_frame(&self, scheme: &str) -> Result<Box<dyn SchemeFrame>, String> {
        self.log.push(PageEvent::FrameOpened(scheme.to_string()));
        Ok(Box::new(FakeFrame {
            log: self.log.clone(),
            scheme: scheme.to_string(),
            attached: Cell::new(true),
        }))
    }
}

struct FakeFrame {
    log: EventLog,
    scheme: String,
    attached: Cell<bool>,
}

impl SchemeFrame for FakeFrame {
    fn remove(&self) {
        if self.attached.replace(false) {
            self.log.push(PageEvent::FrameRemoved(self.scheme.clone()));
        }
    }
}

/// Scripted outcome of an async device probe.
#[derive(Debug, Clone)]
pub enum ProbeBehavior {
    Resolve(String),
    Fail(String),
    Pending,
}

impl ProbeBehavior {
    fn settle(self) -> impl Future<Output = Result<String, String>> {
        async move {
            match self {
                Self::Resolve(value) => Ok(value),
                Self::Fail(err) => Err(err),
                Self::Pending => future::pending().await,
            }
        }
    }
}

pub struct FakeDevice {
    webgl: RefCell<WebGlInfo>,
    intranet: RefCell<ProbeBehavior>,
    lookup: RefCell<ProbeBehavior>,
    lookups: Cell<usize>,
}

impl Default for FakeDevice {
    fn default() -> Self {
        Self {
            webgl: RefCell::new(WebGlInfo {
                version: "WebGL 1.0".to_string(),
                gpu: "Apple GPU".to_string(),
            }),
            intranet: RefCell::new(ProbeBehavior::Resolve("192.168.1.2".to_string())),
            lookup: RefCell::new(ProbeBehavior::Resolve(
                r#"<a href="/" target="_blank">198.51.100.7</a>"#.to_string(),
            )),
            lookups: Cell::new(0),
        }
    }
}

impl FakeDevice {
    pub fn set_intranet(&self, behavior: ProbeBehavior) {
        *self.intranet.borrow_mut() = behavior;
    }

    pub fn set_lookup(&self, behavior: ProbeBehavior) {
        *self.lookup.borrow_mut() = behavior;
    }

    pub fn set_webgl_unsupported(&self) {
        *self.webgl.borrow_mut() = WebGlInfo::unsupported();
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl DeviceProbe for FakeDevice {
    fn screen_metrics(&self) -> ScreenMetrics {
        ScreenMetrics {
            width: 390.0,
            height: 844.0,
            pixel_ratio: 3.0,
        }
    }

    fn webgl_info(&self) -> WebGlInfo {
        self.webgl.borrow().clone()
    }

    fn intranet_address<'a>(&'a self) -> DeviceProbeFuture<'a, Result<String, String>> {
        Box::pin(self.intranet.borrow().clone().settle())
    }

    fn fetch_page_text<'a>(
        &'a self,
        _url: &'a str,
    ) -> DeviceProbeFuture<'a, Result<String, String>> {
        self.lookups.set(self.lookups.get() + 1);
        Box::pin(self.lookup.borrow().clone().settle())
    }
}

#[derive(Default)]
struct ContainerState {
    clears: usize,
    refuse: bool,
    buttons: Vec<String>,
    open_tags: Vec<OpenTagView>,
    on_click: Option<Rc<dyn Fn()>>,
    on_tag_error: Option<Rc<dyn Fn(String)>>,
}

/// Records mounted triggers and replays DOM events into their handlers.
#[derive(Clone, Default)]
pub struct FakeContainer(Rc<RefCell<ContainerState>>);

impl FakeContainer {
    pub fn refuse_mounts(&self) {
        self.0.borrow_mut().refuse = true;
    }

    pub fn clears(&self) -> usize {
        self.0.borrow().clears
    }

    pub fn buttons(&self) -> Vec<String> {
        self.0.borrow().buttons.clone()
    }

    pub fn open_tags(&self) -> Vec<OpenTagView> {
        self.0.borrow().open_tags.clone()
    }

    pub fn click(&self) {
        let handler = self.0.borrow().on_click.clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    pub fn fire_tag_error(&self, detail: &str) {
        let handler = self.0.borrow().on_tag_error.clone();
        if let Some(handler) = handler {
            handler(detail.to_string());
        }
    }
}

impl TriggerContainer for FakeContainer {
    fn clear(&self) {
        let mut state = self.0.borrow_mut();
        state.clears += 1;
        state.buttons.clear();
        state.open_tags.clear();
        state.on_click = None;
        state.on_tag_error = None;
    }

    fn mount_open_tag(&self, view: &OpenTagView, handlers: OpenTagHandlers) -> Result<(), String> {
        let mut state = self.0.borrow_mut();
        if state.refuse {
            return Err("appendChild refused".to_string());
        }
        state.open_tags.push(view.clone());
        state.on_tag_error = Some(Rc::from(handlers.on_error));
        Ok(())
    }

    fn mount_button(&self, view: &ButtonView, on_click: Box<dyn Fn()>) -> Result<(), String> {
        let mut state = self.0.borrow_mut();
        if state.refuse {
            return Err("appendChild refused".to_string());
        }
        state.buttons.push(view.template.clone());
        state.on_click = Some(Rc::from(on_click));
        Ok(())
    }
}

/// Every fake wired together over one event log and one local executor.
pub struct TestHost {
    pub log: EventLog,
    pub transport: Rc<FakeTransport>,
    pub scripts: Rc<FakeScriptLoader>,
    pub wx: Rc<FakeWxProvider>,
    pub page: Rc<FakePage>,
    pub device: Rc<FakeDevice>,
    pub timer: Rc<FakeTimer>,
    pool: LocalPool,
}

impl TestHost {
    pub fn new(user_agent: &str) -> Self {
        let log = EventLog::default();
        Self {
            transport: Rc::new(FakeTransport::default()),
            scripts: Rc::new(FakeScriptLoader::new(log.clone())),
            wx: Rc::new(FakeWxProvider::default()),
            page: Rc::new(FakePage::new(log.clone(), user_agent)),
            device: Rc::new(FakeDevice::default()),
            timer: Rc::new(FakeTimer::new(log.clone())),
            pool: LocalPool::new(),
            log,
        }
    }

    pub fn services(&self) -> SdkHostServices {
        SdkHostServices {
            transport: self.transport.clone(),
            scripts: self.scripts.clone(),
            wx: self.wx.clone(),
            page: self.page.clone(),
            device: self.device.clone(),
            timer: self.timer.clone(),
            spawner: Rc::new(self.pool.spawner()),
        }
    }

    pub fn run<F: Future>(&mut self, future: F) -> F::Output {
        self.pool.run_until(future)
    }

    pub fn run_until_stalled(&mut self) {
        self.pool.run_until_stalled();
    }

    pub fn container(&self) -> FakeContainer {
        FakeContainer::default()
    }

    pub fn install_wx(&self, behavior: WxBehavior) {
        *self.wx.sdk.borrow_mut() = Some(Rc::new(FakeWx::new(behavior)));
    }

    pub fn remove_wx(&self) {
        *self.wx.sdk.borrow_mut() = None;
    }

    pub fn wx_sdk(&self) -> Rc<FakeWx> {
        self.wx.installed().expect("install_wx was not called")
    }

    pub fn respond_base_config(&self, descriptor: Value) {
        self.transport.respond(
            BASE_CONFIG_PATH,
            Ok(json!({"data": descriptor, "code": 0, "msg": "success"})),
        );
    }

    pub fn respond_download(&self, scheme: &str, url: &str) {
        self.transport.respond(
            DOWNLOAD_PATH,
            Ok(json!({"data": {"scheme": scheme, "url": url}, "code": 0, "msg": "success"})),
        );
    }
}

pub fn open_tag_config() -> OpenTagConfig {
    OpenTagConfig {
        js_sdk_url: "https://res.wx.qq.com/open/js/jweixin-1.6.0.js".to_string(),
        js_sdk_config: JsSdkSignature {
            app_id: "wx123".to_string(),
            timestamp: "1700000000".to_string(),
            nonce_str: "n0nce".to_string(),
            signature: "sig".to_string(),
        },
        app_id: "wxmobile".to_string(),
    }
}

pub fn fingerprint() -> DeviceFingerprint {
    DeviceFingerprint {
        download_type: DownloadPlatform::Android,
        link_param: "channel=ad".to_string(),
        screen_width: 390.0,
        screen_height: 844.0,
        device_pixel_ratio: 3.0,
        web_gl_version: "WebGL 1.0".to_string(),
        gpu_type: "Apple GPU".to_string(),
        intranet_ip: "192.168.1.2".to_string(),
        extranet_ip: "198.51.100.7".to_string(),
        brand_name: "Google".to_string(),
        mobile_model: "Pixel 7".to_string(),
        app_version: Some("1.0".to_string()),
    }
}
