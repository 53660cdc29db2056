//! Host element that receives the rendered open tag or fallback trigger.

use install_sdk_host::{ButtonView, OpenTagHandlers, OpenTagView, TriggerContainer};

#[cfg(target_arch = "wasm32")]
use install_sdk_host::OPEN_LAUNCH_APP_TAG;

#[derive(Debug, Clone)]
/// Trigger container wrapping a host `HTMLElement`.
pub struct WebTriggerContainer {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    element: web_sys::HtmlElement,
}

impl WebTriggerContainer {
    /// Wraps `element`.
    pub fn new(element: web_sys::HtmlElement) -> Self {
        Self { element }
    }
}

impl TriggerContainer for WebTriggerContainer {
    fn clear(&self) {
        #[cfg(target_arch = "wasm32")]
        self.element.set_inner_html("");
    }

    fn mount_open_tag(&self, view: &OpenTagView, handlers: OpenTagHandlers) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::closure::Closure;

            let tag = self.create_element(OPEN_LAUNCH_APP_TAG)?;
            set_attribute(&tag, "appid", &view.app_id)?;
            if let Some(ext_info) = &view.ext_info {
                set_attribute(&tag, "extinfo", ext_info)?;
            }
            set_attribute(&tag, "style", &view.style)?;
            tag.set_inner_html(&view.inner_html());

            let OpenTagHandlers {
                on_launch,
                on_error,
            } = handlers;
            let launch = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| on_launch()));
            let error = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event| {
                on_error(describe_tag_error(&event));
            }));
            listen(&tag, "launch", &launch)?;
            listen(&tag, "error", &error)?;
            // Listeners live as long as the element.
            launch.forget();
            error.forget();

            self.append(&tag)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (view, handlers);
            Err(crate::bridge::unsupported("open tag rendering"))
        }
    }

    fn mount_button(&self, view: &ButtonView, on_click: Box<dyn Fn()>) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::closure::Closure;

            let button = self.create_element("div")?;
            button.set_inner_html(&view.template);
            let click = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| on_click()));
            listen(&button, "click", &click)?;
            click.forget();
            self.append(&button)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (view, on_click);
            Err(crate::bridge::unsupported("trigger rendering"))
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl WebTriggerContainer {
    fn create_element(&self, tag: &str) -> Result<web_sys::Element, String> {
        let document = self
            .element
            .owner_document()
            .or_else(|| web_sys::window().and_then(|window| window.document()))
            .ok_or_else(|| "document unavailable".to_string())?;
        document
            .create_element(tag)
            .map_err(crate::bridge::js_error_to_string)
    }

    fn append(&self, child: &web_sys::Element) -> Result<(), String> {
        self.element
            .append_child(child)
            .map(|_| ())
            .map_err(crate::bridge::js_error_to_string)
    }
}

#[cfg(target_arch = "wasm32")]
fn set_attribute(element: &web_sys::Element, name: &str, value: &str) -> Result<(), String> {
    element
        .set_attribute(name, value)
        .map_err(crate::bridge::js_error_to_string)
}

#[cfg(target_arch = "wasm32")]
fn listen(
    element: &web_sys::Element,
    event: &str,
    listener: &wasm_bindgen::closure::Closure<dyn FnMut(web_sys::Event)>,
) -> Result<(), String> {
    use wasm_bindgen::JsCast;

    element
        .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
        .map_err(crate::bridge::js_error_to_string)
}

// The open tag reports failures as a CustomEvent whose `detail` carries `errMsg`.
#[cfg(target_arch = "wasm32")]
fn describe_tag_error(event: &web_sys::Event) -> String {
    use wasm_bindgen::{JsCast, JsValue};

    let Some(detail) = event
        .dyn_ref::<web_sys::CustomEvent>()
        .map(|event| event.detail())
        .filter(|detail| !detail.is_undefined() && !detail.is_null())
    else {
        return event.type_();
    };
    js_sys::Reflect::get(&detail, &JsValue::from_str("errMsg"))
        .ok()
        .and_then(|message| message.as_string())
        .or_else(|| {
            js_sys::JSON::stringify(&detail)
                .ok()
                .and_then(|text| text.as_string())
        })
        .unwrap_or_else(|| event.type_())
}
