//! `fetch`-backed HTTP transport with an `AbortController` timeout.

use install_sdk_host::{HttpRequest, Transport, TransportError, TransportFuture};
use serde_json::Value;

#[cfg(target_arch = "wasm32")]
use crate::bridge::js_error_to_string;
#[cfg(not(target_arch = "wasm32"))]
use crate::bridge::unsupported;

#[derive(Debug, Clone, Copy, Default)]
/// Browser transport for the install backend.
pub struct WebTransport;

impl Transport for WebTransport {
    fn send<'a>(
        &'a self,
        request: &'a HttpRequest,
    ) -> TransportFuture<'a, Result<Value, TransportError>> {
        Box::pin(async move { fetch_json(request).await })
    }
}

/// Decodes a response body as JSON, keeping non-JSON text as a string value.
pub(crate) fn decode_body(text: String) -> Value {
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => Value::String(text),
    }
}

/// Maps a rejected `fetch` or body read to a transport error; aborts are timeouts.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn rejection_error(aborted: bool, timeout_ms: u32, message: String) -> TransportError {
    if aborted {
        TransportError::Timeout { timeout_ms }
    } else {
        TransportError::Network(message)
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_json(request: &HttpRequest) -> Result<Value, TransportError> {
    let _ = request;
    Err(TransportError::Network(unsupported("fetch")))
}

#[cfg(target_arch = "wasm32")]
async fn fetch_json(request: &HttpRequest) -> Result<Value, TransportError> {
    use wasm_bindgen::{closure::Closure, JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    let network = |err: JsValue| TransportError::Network(js_error_to_string(err));
    let window = web_sys::window()
        .ok_or_else(|| TransportError::Network("window unavailable".to_string()))?;

    let init = web_sys::RequestInit::new();
    init.set_method(request.method.as_str());
    let headers = web_sys::Headers::new().map_err(network)?;
    for (name, value) in &request.headers {
        headers.set(name, value).map_err(network)?;
    }
    init.set_headers(&headers);
    if let Some(body) = request.encoded_body()? {
        init.set_body(&JsValue::from_str(&body));
    }

    let controller = web_sys::AbortController::new().map_err(network)?;
    let signal = controller.signal();
    init.set_signal(Some(&signal));
    let on_timeout = Closure::once_into_js(move || controller.abort());
    let timeout_handle = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            on_timeout.unchecked_ref(),
            i32::try_from(request.timeout_ms).unwrap_or(i32::MAX),
        )
        .map_err(network)?;

    // The abort timer stays armed until the body has been read.
    let rejected = |err: JsValue| {
        rejection_error(signal.aborted(), request.timeout_ms, js_error_to_string(err))
    };
    let result = async {
        let response: web_sys::Response =
            JsFuture::from(window.fetch_with_str_and_init(&request.url, &init))
                .await
                .map_err(rejected)?
                .dyn_into()
                .map_err(|_| {
                    TransportError::Network("fetch resolved to a non-Response".to_string())
                })?;
        if !response.ok() {
            return Err(TransportError::Http {
                status: response.status(),
                status_text: response.status_text(),
            });
        }
        let text = JsFuture::from(response.text().map_err(network)?)
            .await
            .map_err(rejected)?
            .as_string()
            .unwrap_or_default();
        Ok(decode_body(text))
    }
    .await;
    window.clear_timeout_with_handle(timeout_handle);
    result
}

/// Fetches `url` with a plain `GET` and returns the body text.
pub(crate) async fn fetch_text(url: &str) -> Result<String, String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;

        let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
        let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(js_error_to_string)?
            .dyn_into()
            .map_err(|_| "fetch resolved to a non-Response".to_string())?;
        let text = JsFuture::from(response.text().map_err(js_error_to_string)?)
            .await
            .map_err(js_error_to_string)?;
        Ok(text.as_string().unwrap_or_default())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = url;
        Err(unsupported("fetch"))
    }
}
