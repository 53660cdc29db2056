//! Device signals read from the viewport, a WebGL context, and an ICE candidate.

use install_sdk_host::{DeviceProbe, DeviceProbeFuture, ScreenMetrics, WebGlInfo};

use crate::{bridge, transport};

/// `UNMASKED_RENDERER_WEBGL` from `WEBGL_debug_renderer_info`.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const UNMASKED_RENDERER_WEBGL: u32 = 0x9246;
/// Version reported when creating the context throws.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const WEBGL_ERROR: &str = "WebGL error";

#[derive(Debug, Clone, Copy, Default)]
/// Browser device probe.
pub struct WebDeviceProbe;

impl DeviceProbe for WebDeviceProbe {
    fn screen_metrics(&self) -> ScreenMetrics {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = web_sys::window() else {
                return ScreenMetrics::default();
            };
            let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
                value.ok().and_then(|value| value.as_f64()).unwrap_or_default()
            };
            ScreenMetrics {
                width: dimension(window.inner_width()),
                height: dimension(window.inner_height()),
                pixel_ratio: window.device_pixel_ratio(),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            ScreenMetrics::default()
        }
    }

    fn webgl_info(&self) -> WebGlInfo {
        #[cfg(target_arch = "wasm32")]
        {
            read_webgl_info().unwrap_or_else(|err| {
                leptos::logging::warn!("reading WebGL info failed: {err}");
                WebGlInfo {
                    version: WEBGL_ERROR.to_string(),
                    gpu: install_sdk_host::UNKNOWN.to_string(),
                }
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            WebGlInfo::unsupported()
        }
    }

    fn intranet_address<'a>(&'a self) -> DeviceProbeFuture<'a, Result<String, String>> {
        Box::pin(bridge::intranet_address())
    }

    fn fetch_page_text<'a>(
        &'a self,
        url: &'a str,
    ) -> DeviceProbeFuture<'a, Result<String, String>> {
        Box::pin(transport::fetch_text(url))
    }
}

#[cfg(target_arch = "wasm32")]
fn read_webgl_info() -> Result<WebGlInfo, String> {
    use install_sdk_host::UNKNOWN;
    use wasm_bindgen::JsCast;
    use web_sys::WebGlRenderingContext as Gl;

    use crate::bridge::js_error_to_string;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| "document unavailable".to_string())?;
    let canvas = document
        .create_element("canvas")
        .map_err(js_error_to_string)?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| "failed to cast canvas element".to_string())?;

    let mut context = None;
    for kind in ["webgl", "experimental-webgl"] {
        if let Some(candidate) = canvas.get_context(kind).map_err(js_error_to_string)? {
            context = candidate.dyn_into::<Gl>().ok();
            if context.is_some() {
                break;
            }
        }
    }
    let Some(gl) = context else {
        return Ok(WebGlInfo::unsupported());
    };

    let version = gl
        .get_parameter(Gl::VERSION)
        .map_err(js_error_to_string)?
        .as_string()
        .unwrap_or_else(|| UNKNOWN.to_string());
    let gpu = match gl.get_extension("WEBGL_debug_renderer_info") {
        Ok(Some(_)) => gl
            .get_parameter(UNMASKED_RENDERER_WEBGL)
            .ok()
            .and_then(|renderer| renderer.as_string())
            .filter(|renderer| !renderer.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        _ => UNKNOWN.to_string(),
    };
    Ok(WebGlInfo { version, gpu })
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use install_sdk_host::WEBGL_NOT_SUPPORTED;
    use pretty_assertions::assert_eq;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn device_probe_non_wasm_parity() {
        let probe = WebDeviceProbe;
        assert_eq!(probe.screen_metrics(), ScreenMetrics::default());
        assert_eq!(probe.webgl_info().version, WEBGL_NOT_SUPPORTED);
        assert_eq!(
            block_on(probe.intranet_address()).expect_err("no ICE natively"),
            "the ICE address probe is only available when compiled for wasm32"
        );
        assert!(block_on(probe.fetch_page_text("https://2025.ip138.com/")).is_err());
    }
}
