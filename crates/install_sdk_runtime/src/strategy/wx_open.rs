//! WeChat open-tag strategy: JS-SDK handshake and `wx-open-launch-app` rendering.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use futures::channel::oneshot;
use install_sdk_host::{
    OpenTagConfig, OpenTagHandlers, OpenTagView, RenderOptions, SdkHostServices,
    TriggerContainer, WxConfig, OPEN_TAG_STYLE,
};
use leptos::logging;

use super::{with_deadline, FallbackStrategy, StrategyTimings};
use crate::{SdkError, SessionContext};

/// Preparation state of the open-tag strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WxOpenState {
    /// No handshake attempted.
    Unprepared,
    /// Script load or handshake in flight.
    Preparing,
    /// Handshake succeeded.
    Ready,
    /// Handshake failed or the strategy was disabled; stays off for the session.
    Failed,
}

/// Renders the vendor open tag once the JS-SDK handshake has succeeded.
pub struct WxOpenTagStrategy {
    context: Rc<SessionContext>,
    services: SdkHostServices,
    fallback: Rc<FallbackStrategy>,
    timings: StrategyTimings,
    state: Cell<WxOpenState>,
}

impl WxOpenTagStrategy {
    /// Creates the strategy; `fallback` runs when the rendered tag reports an error.
    pub fn new(
        context: Rc<SessionContext>,
        services: SdkHostServices,
        fallback: Rc<FallbackStrategy>,
        timings: StrategyTimings,
    ) -> Self {
        Self {
            context,
            services,
            fallback,
            timings,
            state: Cell::new(WxOpenState::Unprepared),
        }
    }

    /// Current preparation state.
    pub fn state(&self) -> WxOpenState {
        self.state.get()
    }

    /// Loads the JS-SDK and performs the signature handshake.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::ConfigMissing`] without open-tag config, [`SdkError::ScriptLoad`] when
    /// the script or its global is missing, and [`SdkError::SdkHandshake`] when the vendor
    /// rejects the signature, does not answer before the handshake timeout, or the strategy
    /// was already disabled.
    pub async fn prepare(&self) -> Result<(), SdkError> {
        if self.state.get() == WxOpenState::Failed {
            return Err(SdkError::SdkHandshake(
                "open tag is disabled for this session".to_string(),
            ));
        }
        let open_tag = self
            .context
            .open_tag()
            .ok_or(SdkError::ConfigMissing("open_tag"))?;
        if open_tag.js_sdk_url.trim().is_empty() {
            return Err(SdkError::ConfigMissing("open_tag.js_sdk_url"));
        }

        self.state.set(WxOpenState::Preparing);
        let result = self.handshake(&open_tag).await;
        self.state.set(match result {
            Ok(()) => WxOpenState::Ready,
            Err(_) => WxOpenState::Failed,
        });
        result
    }

    /// Forgets a previous handshake so a new descriptor starts from `Unprepared`. A disabled
    /// strategy stays disabled.
    pub fn reset(&self) {
        if self.state.get() != WxOpenState::Failed {
            self.state.set(WxOpenState::Unprepared);
        }
    }

    /// Turns the strategy off for the rest of the session.
    pub fn disable(&self) {
        self.state.set(WxOpenState::Failed);
    }

    /// Returns whether the open tag can be rendered right now.
    ///
    /// Requires the current descriptor to declare open-tag support.
    pub fn can_use(&self) -> bool {
        if !self.context.is_support_open_tag() {
            return false;
        }
        match self.state.get() {
            WxOpenState::Preparing | WxOpenState::Failed => false,
            WxOpenState::Unprepared | WxOpenState::Ready => self
                .services
                .wx
                .sdk()
                .is_some_and(|sdk| sdk.is_ready() != Some(false)),
        }
    }

    /// The open tag launches on its own click; nothing to run imperatively.
    pub async fn execute(&self) -> Result<(), SdkError> {
        logging::log!("wx open tag launches from the rendered element; no imperative launch");
        Ok(())
    }

    /// Replaces the container content with a `wx-open-launch-app` element.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::ConfigMissing`] without open-tag config and [`SdkError::Render`] when
    /// the element cannot be mounted.
    pub fn render_open_tag(
        &self,
        container: &dyn TriggerContainer,
        options: &RenderOptions,
    ) -> Result<(), SdkError> {
        container.clear();
        let open_tag = self
            .context
            .open_tag()
            .ok_or(SdkError::ConfigMissing("open_tag"))?;

        let view = OpenTagView {
            app_id: open_tag.app_id,
            ext_info: self.context.ext_info(),
            style: OPEN_TAG_STYLE.to_string(),
            template: options.template_or_default().to_string(),
        };
        let fallback = Rc::clone(&self.fallback);
        let handlers = OpenTagHandlers {
            on_launch: Box::new(|| logging::log!("wx-open-launch-app launched")),
            on_error: Box::new(move |detail| {
                logging::warn!("wx-open-launch-app failed ({detail}); running fallback");
                fallback.spawn_execute("open tag error");
            }),
        };
        container
            .mount_open_tag(&view, handlers)
            .map_err(SdkError::Render)
    }

    async fn handshake(&self, open_tag: &OpenTagConfig) -> Result<(), SdkError> {
        let url = open_tag.js_sdk_url.as_str();
        self.services
            .scripts
            .load_script(url)
            .await
            .map_err(|message| SdkError::ScriptLoad {
                url: url.to_string(),
                message,
            })?;
        let sdk = self.services.wx.sdk().ok_or_else(|| SdkError::ScriptLoad {
            url: url.to_string(),
            message: "`wx` global missing after load".to_string(),
        })?;

        let config = WxConfig::launch_app(&open_tag.js_sdk_config, self.context.is_debug());
        sdk.config(&config).map_err(SdkError::SdkHandshake)?;

        // Whichever callback fires first takes the sender; the other finds it gone.
        let (tx, rx) = oneshot::channel::<Result<(), String>>();
        let sender = Rc::new(RefCell::new(Some(tx)));
        let ready_sender = Rc::clone(&sender);
        sdk.ready(Box::new(move || {
            if let Some(tx) = ready_sender.borrow_mut().take() {
                let _ = tx.send(Ok(()));
            }
        }));
        sdk.error(Box::new(move |message| {
            if let Some(tx) = sender.borrow_mut().take() {
                let _ = tx.send(Err(message));
            }
        }));

        let timeout_ms = self.timings.handshake_timeout_ms;
        match with_deadline(&*self.services.timer, timeout_ms, rx).await {
            Some(Ok(Ok(()))) => {
                logging::log!("WeChat JS-SDK configured");
                Ok(())
            }
            Some(Ok(Err(message))) => Err(SdkError::SdkHandshake(message)),
            Some(Err(_)) => Err(SdkError::SdkHandshake(
                "vendor dropped the handshake callbacks".to_string(),
            )),
            None => Err(SdkError::SdkHandshake(format!(
                "no ready or error callback within {timeout_ms}ms"
            ))),
        }
    }
}
