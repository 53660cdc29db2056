//! Render-target contract for the open tag and the plain fallback trigger.

/// Inline style that stretches the open tag over its container.
pub const OPEN_TAG_STYLE: &str = "width: 100%; height: 100%;position: absolute; left: 0; top: 0";

/// Attributes and template of a `wx-open-launch-app` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTagView {
    /// Mobile app id (`appid` attribute).
    pub app_id: String,
    /// Optional `extinfo` attribute.
    pub ext_info: Option<String>,
    /// Inline style.
    pub style: String,
    /// Template HTML embedded as `<script type="text/wxtag-template">`.
    pub template: String,
}

impl OpenTagView {
    /// Returns the element's inner HTML.
    pub fn inner_html(&self) -> String {
        format!(
            "<script type=\"text/wxtag-template\">{}</script>",
            self.template
        )
    }
}

/// Template of the plain clickable trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    /// Template HTML.
    pub template: String,
}

/// Handlers wired onto a mounted open tag.
pub struct OpenTagHandlers {
    /// `launch` event.
    pub on_launch: Box<dyn Fn()>,
    /// `error` event with a readable description.
    pub on_error: Box<dyn Fn(String)>,
}

/// Host element that receives a rendered trigger.
pub trait TriggerContainer {
    /// Removes all children.
    fn clear(&self);

    /// Appends an open tag element.
    ///
    /// # Errors
    ///
    /// Returns an error when the element cannot be created or attached.
    fn mount_open_tag(&self, view: &OpenTagView, handlers: OpenTagHandlers) -> Result<(), String>;

    /// Appends a clickable element.
    ///
    /// # Errors
    ///
    /// Returns an error when the element cannot be created or attached.
    fn mount_button(&self, view: &ButtonView, on_click: Box<dyn Fn()>) -> Result<(), String>;
}
