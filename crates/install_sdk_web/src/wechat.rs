//! Access to the `window.wx` global injected by the JS-SDK script.

use std::rc::Rc;

use install_sdk_host::{WxJsSdk, WxJsSdkProvider};

#[derive(Debug, Clone, Copy, Default)]
/// Reads `window.wx` on every lookup, so a global removed by the page is noticed.
pub struct WebWxJsSdkProvider;

impl WxJsSdkProvider for WebWxJsSdkProvider {
    fn sdk(&self) -> Option<Rc<dyn WxJsSdk>> {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsValue;

            let window = web_sys::window()?;
            let wx = js_sys::Reflect::get(&window, &JsValue::from_str("wx")).ok()?;
            if !wx.is_object() {
                return None;
            }
            Some(Rc::new(imp::WebWxJsSdk::new(wx)) as Rc<dyn WxJsSdk>)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use install_sdk_host::{WxConfig, WxJsSdk};
    use leptos::logging;
    use serde::Serialize;
    use serde_wasm_bindgen::Serializer;
    use wasm_bindgen::{closure::Closure, JsCast, JsValue};

    use crate::bridge::js_error_to_string;

    pub struct WebWxJsSdk {
        wx: JsValue,
    }

    impl WebWxJsSdk {
        pub fn new(wx: JsValue) -> Self {
            Self { wx }
        }

        fn call(&self, method: &str, argument: &JsValue) -> Result<JsValue, String> {
            let function = js_sys::Reflect::get(&self.wx, &JsValue::from_str(method))
                .map_err(js_error_to_string)?
                .dyn_into::<js_sys::Function>()
                .map_err(|_| format!("wx.{method} is not a function"))?;
            function
                .call1(&self.wx, argument)
                .map_err(js_error_to_string)
        }
    }

    // The vendor reports failures as `{ errMsg }`.
    fn describe_vendor_error(value: &JsValue) -> String {
        if let Some(message) = js_sys::Reflect::get(value, &JsValue::from_str("errMsg"))
            .ok()
            .and_then(|message| message.as_string())
        {
            return message;
        }
        js_sys::JSON::stringify(value)
            .ok()
            .and_then(|text| text.as_string())
            .unwrap_or_else(|| js_error_to_string(value.clone()))
    }

    impl WxJsSdk for WebWxJsSdk {
        fn config(&self, config: &WxConfig) -> Result<(), String> {
            let payload = config
                .serialize(&Serializer::json_compatible())
                .map_err(|err| format!("failed to encode wx.config payload: {err}"))?;
            self.call("config", &payload).map(|_| ())
        }

        fn ready(&self, callback: Box<dyn FnOnce()>) {
            let listener = Closure::once_into_js(move || callback());
            if let Err(err) = self.call("ready", &listener) {
                logging::warn!("wx.ready registration failed: {err}");
            }
        }

        fn error(&self, callback: Box<dyn FnOnce(String)>) {
            let listener =
                Closure::once_into_js(move |value: JsValue| callback(describe_vendor_error(&value)));
            if let Err(err) = self.call("error", &listener) {
                logging::warn!("wx.error registration failed: {err}");
            }
        }

        fn is_ready(&self) -> Option<bool> {
            js_sys::Reflect::get(&self.wx, &JsValue::from_str("isReady"))
                .ok()
                .and_then(|flag| flag.as_bool())
        }
    }
}
