//! `wasm-bindgen` surface exposed to host pages.
//!
//! The module start hook installs a default [`JsInstallSdk`] on `window.XMInstallSDK`. Errors
//! cross the boundary as `Error` objects whose `name` is [`SdkError::code`].

use std::rc::Rc;

use install_sdk_host::{
    is_android, is_ios, is_mobile, is_wechat_env, is_wechat_mini_program, is_wechat_webview,
    InitOptions, PageHost, RenderOptions, TriggerContainer,
};
use install_sdk_runtime::{InstallSdk, SdkError, TriggerStrategy};
use js_sys::Promise;
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::future_to_promise;

use crate::{build_host_services, WebPageHost, WebTriggerContainer};

const GLOBAL_NAME: &str = "XMInstallSDK";

/// SDK handle exported to JS as `InstallSdk`.
#[wasm_bindgen(js_name = InstallSdk)]
pub struct JsInstallSdk {
    inner: Rc<InstallSdk>,
}

impl Default for JsInstallSdk {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen(js_class = InstallSdk)]
impl JsInstallSdk {
    /// Creates an uninitialized SDK bound to the current window.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(InstallSdk::new(build_host_services())),
        }
    }

    /// Initializes the SDK. Resolves to `undefined`; rejects with the init error.
    pub fn init(&self, options: JsValue) -> Promise {
        let sdk = Rc::clone(&self.inner);
        future_to_promise(async move {
            let options = init_options(options)?;
            sdk.init(options).await.map_err(to_js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Launches the app through the fallback strategy and resolves to the launch outcome.
    ///
    /// Throws synchronously when the SDK is not initialized.
    #[wasm_bindgen(js_name = openApp)]
    pub fn open_app(&self) -> Result<Promise, JsValue> {
        self.inner.ensure_ready().map_err(to_js_error)?;
        let sdk = Rc::clone(&self.inner);
        Ok(future_to_promise(async move {
            let outcome = sdk.open_app().await.map_err(to_js_error)?;
            to_js(&outcome)
        }))
    }

    /// Whether the WeChat open tag is usable right now.
    #[wasm_bindgen(js_name = canUseWxOpen)]
    pub fn can_use_wx_open(&self) -> bool {
        self.inner.can_use_wx_open()
    }

    /// Alias of `canUseWxOpen`.
    #[wasm_bindgen(js_name = isWxReady)]
    pub fn is_wx_ready(&self) -> bool {
        self.inner.can_use_wx_open()
    }

    /// Renders the best trigger into `container` and returns the chosen strategy token.
    #[wasm_bindgen(js_name = renderOpenAppTrigger)]
    pub fn render_open_app_trigger(
        &self,
        container: JsValue,
        options: JsValue,
    ) -> Result<String, JsValue> {
        self.render(container, &options, |sdk, container, options| {
            sdk.render_open_app_trigger(container, options)
        })
    }

    /// Alias of `renderOpenAppTrigger`.
    #[wasm_bindgen(js_name = renderWxOpenTag)]
    pub fn render_wx_open_tag(&self, container: JsValue, options: JsValue) -> Result<String, JsValue> {
        self.render(container, &options, |sdk, container, options| {
            sdk.render_wx_open_tag(container, options)
        })
    }

    /// Returns one capability descriptor field, or the whole descriptor without a key.
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self, key: Option<String>) -> Result<JsValue, JsValue> {
        match self.inner.config_value(key.as_deref()) {
            Some(value) => to_js(&value),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Environment predicates for the current user agent.
    pub fn environment(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.environment())
    }
}

impl JsInstallSdk {
    fn render(
        &self,
        container: JsValue,
        options: &JsValue,
        render: impl FnOnce(
            &InstallSdk,
            Option<&dyn TriggerContainer>,
            &RenderOptions,
        ) -> Result<TriggerStrategy, SdkError>,
    ) -> Result<String, JsValue> {
        self.inner.ensure_ready().map_err(to_js_error)?;
        let container = trigger_container(container)?;
        let options = render_options(options);
        let strategy = render(
            &self.inner,
            container.as_ref().map(|container| container as &dyn TriggerContainer),
            &options,
        )
        .map_err(to_js_error)?;
        Ok(strategy.as_str().to_string())
    }
}

fn init_options(value: JsValue) -> Result<InitOptions, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(InitOptions::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|err| {
        js_sys::TypeError::new(&format!("invalid init options: {err}")).into()
    })
}

fn trigger_container(value: JsValue) -> Result<Option<WebTriggerContainer>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    value
        .dyn_into::<web_sys::HtmlElement>()
        .map(|element| Some(WebTriggerContainer::new(element)))
        .map_err(|_| {
            to_js_error(SdkError::InvalidContainer(
                "container must be an HTMLElement".to_string(),
            ))
        })
}

// `template` may be an HTML string or an element, which is serialized to `outerHTML`.
fn render_options(value: &JsValue) -> RenderOptions {
    if !value.is_object() {
        return RenderOptions::default();
    }
    let template = js_sys::Reflect::get(value, &JsValue::from_str("template"))
        .ok()
        .and_then(|template| {
            template.as_string().or_else(|| {
                template
                    .dyn_ref::<web_sys::Element>()
                    .map(web_sys::Element::outer_html)
            })
        });
    RenderOptions { template }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn to_js_error(err: SdkError) -> JsValue {
    let error = js_sys::Error::new(&err.to_string());
    error.set_name(err.code());
    error.into()
}

fn user_agent() -> String {
    WebPageHost.user_agent()
}

/// WeChat mini-program webview.
#[wasm_bindgen(js_name = isWeChat)]
pub fn is_wechat() -> bool {
    is_wechat_mini_program(&user_agent())
}

/// WeChat in-app browser, excluding mini-programs.
#[wasm_bindgen(js_name = isWeChatWebview)]
pub fn is_wechat_webview_js() -> bool {
    is_wechat_webview(&user_agent())
}

/// Any WeChat environment.
#[wasm_bindgen(js_name = isWeChatEnv)]
pub fn is_wechat_env_js() -> bool {
    is_wechat_env(&user_agent())
}

/// iPhone, iPad, or iPod.
#[wasm_bindgen(js_name = isIOS)]
pub fn is_ios_js() -> bool {
    is_ios(&user_agent())
}

/// Android.
#[wasm_bindgen(js_name = isAndroid)]
pub fn is_android_js() -> bool {
    is_android(&user_agent())
}

/// Any mobile device.
#[wasm_bindgen(js_name = isMobile)]
pub fn is_mobile_js() -> bool {
    is_mobile(&user_agent())
}

/// Installs the panic hook and the default instance on `window.XMInstallSDK`.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let Some(window) = web_sys::window() else {
        return Ok(());
    };
    js_sys::Reflect::set(
        &window,
        &JsValue::from_str(GLOBAL_NAME),
        &JsValue::from(JsInstallSdk::new()),
    )?;
    Ok(())
}
