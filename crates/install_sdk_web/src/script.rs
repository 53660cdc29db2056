//! `<script>` injection used to load the WeChat JS-SDK.

use install_sdk_host::{ScriptLoadFuture, ScriptLoader};

#[cfg(target_arch = "wasm32")]
use futures::channel::oneshot;
#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};

#[derive(Debug, Clone, Copy, Default)]
/// Appends a script element to `<head>` and waits for its `load` or `error` event.
pub struct WebScriptLoader;

impl ScriptLoader for WebScriptLoader {
    fn load_script<'a>(&'a self, url: &'a str) -> ScriptLoadFuture<'a, Result<(), String>> {
        Box::pin(async move { inject_script(url).await })
    }
}

async fn inject_script(url: &str) -> Result<(), String> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = url;
        Err(crate::bridge::unsupported("script injection"))
    }

    #[cfg(target_arch = "wasm32")]
    {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| "document unavailable".to_string())?;
        let head = document
            .head()
            .ok_or_else(|| "document head unavailable".to_string())?;
        let script = document
            .create_element("script")
            .map_err(|err| format!("failed to create script element: {err:?}"))?
            .dyn_into::<web_sys::HtmlScriptElement>()
            .map_err(|_| "failed to cast script element".to_string())?;
        script.set_src(url);
        script.set_async(true);

        let (tx, rx) = oneshot::channel::<Result<(), String>>();
        let sender = Rc::new(RefCell::new(Some(tx)));
        let load_sender = sender.clone();
        let on_load = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| {
            if let Some(tx) = load_sender.borrow_mut().take() {
                let _ = tx.send(Ok(()));
            }
        }));
        let on_error = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| {
            if let Some(tx) = sender.borrow_mut().take() {
                let _ = tx.send(Err("script error event".to_string()));
            }
        }));
        script.set_onload(Some(on_load.as_ref().unchecked_ref()));
        script.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        head.append_child(&script)
            .map_err(|err| format!("failed to append script element: {err:?}"))?;
        let result = rx
            .await
            .map_err(|_| "script load listeners were dropped".to_string())?;
        script.set_onload(None);
        script.set_onerror(None);
        result
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn script_loader_non_wasm_parity() {
        assert_eq!(
            block_on(WebScriptLoader.load_script("https://res.wx.qq.com/open/js/jweixin-1.6.0.js"))
                .expect_err("no DOM natively"),
            "script injection is only available when compiled for wasm32"
        );
    }
}
