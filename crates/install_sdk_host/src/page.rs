//! Page-level host contract: location, navigation, visibility, and the scheme iframe.

/// An injected, invisible iframe pointed at a custom scheme.
pub trait SchemeFrame {
    /// Detaches the iframe. Calling this after the frame is already gone is a no-op.
    fn remove(&self);
}

/// Host service for the current page.
pub trait PageHost {
    /// Current `navigator.userAgent`.
    fn user_agent(&self) -> String;

    /// Current `location.href`.
    fn location_href(&self) -> String;

    /// Current `location.search`, including the leading `?`.
    fn location_search(&self) -> String;

    /// Current `location.protocol`, for example `https:`.
    fn protocol(&self) -> String;

    /// Whether the document is hidden, which follows a successful app switch.
    fn is_hidden(&self) -> bool;

    /// Navigates the page to `url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the page refuses the navigation.
    fn navigate(&self, url: &str) -> Result<(), String>;

    /// Injects an invisible iframe whose `src` is `scheme`.
    ///
    /// # Errors
    ///
    /// Returns an error when the iframe cannot be created or attached.
    fn open_scheme_frame(&self, scheme: &str) -> Result<Box<dyn SchemeFrame>, String>;
}
