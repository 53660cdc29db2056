//! Current-page adapter: location, visibility, navigation, and the scheme iframe.

use install_sdk_host::{PageHost, SchemeFrame};

#[cfg(not(target_arch = "wasm32"))]
use crate::bridge::unsupported;
#[cfg(target_arch = "wasm32")]
use crate::bridge::js_error_to_string;

#[derive(Debug, Clone, Copy, Default)]
/// Page host backed by `window.location`, `navigator`, and `document`.
pub struct WebPageHost;

#[cfg(target_arch = "wasm32")]
fn location() -> Option<web_sys::Location> {
    web_sys::window().map(|window| window.location())
}

impl PageHost for WebPageHost {
    fn user_agent(&self) -> String {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|window| window.navigator().user_agent().ok())
                .unwrap_or_default()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            String::new()
        }
    }

    fn location_href(&self) -> String {
        #[cfg(target_arch = "wasm32")]
        {
            location()
                .and_then(|location| location.href().ok())
                .unwrap_or_default()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            String::new()
        }
    }

    fn location_search(&self) -> String {
        #[cfg(target_arch = "wasm32")]
        {
            location()
                .and_then(|location| location.search().ok())
                .unwrap_or_default()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            String::new()
        }
    }

    fn protocol(&self) -> String {
        #[cfg(target_arch = "wasm32")]
        {
            location()
                .and_then(|location| location.protocol().ok())
                .unwrap_or_else(|| "https:".to_string())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            "https:".to_string()
        }
    }

    fn is_hidden(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|window| window.document())
                .is_some_and(|document| document.hidden())
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    fn navigate(&self, url: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            location()
                .ok_or_else(|| "window unavailable".to_string())?
                .set_href(url)
                .map_err(js_error_to_string)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = url;
            Err(unsupported("page navigation"))
        }
    }

    fn open_scheme_frame(&self, scheme: &str) -> Result<Box<dyn SchemeFrame>, String> {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;

            let document = web_sys::window()
                .and_then(|window| window.document())
                .ok_or_else(|| "document unavailable".to_string())?;
            let body = document
                .body()
                .ok_or_else(|| "document body unavailable".to_string())?;
            let frame = document
                .create_element("iframe")
                .map_err(js_error_to_string)?
                .dyn_into::<web_sys::HtmlIFrameElement>()
                .map_err(|_| "failed to cast iframe element".to_string())?;
            frame
                .set_attribute("style", "display: none")
                .map_err(js_error_to_string)?;
            frame.set_src(scheme);
            body.append_child(&frame).map_err(js_error_to_string)?;
            Ok(Box::new(WebSchemeFrame { frame }))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = scheme;
            Err(unsupported("the scheme iframe"))
        }
    }
}

#[cfg(target_arch = "wasm32")]
struct WebSchemeFrame {
    frame: web_sys::HtmlIFrameElement,
}

#[cfg(target_arch = "wasm32")]
impl SchemeFrame for WebSchemeFrame {
    fn remove(&self) {
        self.frame.remove();
    }
}
