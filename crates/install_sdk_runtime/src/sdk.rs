//! SDK orchestrator: initialization, strategy selection, and the host-facing operations.

use std::{cell::Cell, rc::Rc};

use install_sdk_host::{
    is_wechat_env, EnvironmentSnapshot, InitOptions, RenderOptions, SdkHostServices,
    TransportConfig, TriggerContainer,
};
use leptos::logging;
use serde_json::Value;

use crate::{
    strategy::{
        FallbackStrategy, LaunchOutcome, StrategyTimings, TriggerStrategy, WxOpenState,
        WxOpenTagStrategy,
    },
    RemoteConfigClient, SdkError, SessionContext,
};

/// Lifecycle of one SDK instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkState {
    /// `init` has not been called.
    Uninitialized,
    /// `init` is in flight.
    Initializing,
    /// The descriptor is loaded; every operation is available.
    Ready,
    /// The last `init` failed; calling `init` again is allowed.
    InitFailed,
}

/// Entry point owning the session context and both strategies.
pub struct InstallSdk {
    services: SdkHostServices,
    context: Rc<SessionContext>,
    fallback: Rc<FallbackStrategy>,
    wx_open: WxOpenTagStrategy,
    state: Cell<SdkState>,
}

impl InstallSdk {
    /// Creates an uninitialized SDK over `services` with the default timings.
    pub fn new(services: SdkHostServices) -> Self {
        Self::with_timings(services, StrategyTimings::default())
    }

    /// Creates an uninitialized SDK with explicit timer bounds.
    pub fn with_timings(services: SdkHostServices, timings: StrategyTimings) -> Self {
        let context = Rc::new(SessionContext::default());
        let fallback = Rc::new(FallbackStrategy::new(
            Rc::clone(&context),
            services.clone(),
            timings,
        ));
        let wx_open = WxOpenTagStrategy::new(
            Rc::clone(&context),
            services.clone(),
            Rc::clone(&fallback),
            timings,
        );
        Self::from_parts(services, context, fallback, wx_open)
    }

    /// Assembles an SDK from separately constructed parts sharing one context.
    pub fn from_parts(
        services: SdkHostServices,
        context: Rc<SessionContext>,
        fallback: Rc<FallbackStrategy>,
        wx_open: WxOpenTagStrategy,
    ) -> Self {
        Self {
            services,
            context,
            fallback,
            wx_open,
            state: Cell::new(SdkState::Uninitialized),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SdkState {
        self.state.get()
    }

    /// Shared session context.
    pub fn context(&self) -> &Rc<SessionContext> {
        &self.context
    }

    /// Environment predicates evaluated against the current user agent.
    pub fn environment(&self) -> EnvironmentSnapshot {
        EnvironmentSnapshot::from_user_agent(&self.services.page.user_agent())
    }

    /// Validates options, fetches the capability descriptor, and prepares the open tag when the
    /// environment allows it.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::ConfigMissing`] for a blank `id` (before any request) and
    /// [`SdkError::RemoteConfig`] when the descriptor cannot be fetched. Open-tag preparation
    /// failures are logged and never returned.
    pub async fn init(&self, options: InitOptions) -> Result<(), SdkError> {
        if options.id.trim().is_empty() {
            self.state.set(SdkState::InitFailed);
            return Err(SdkError::ConfigMissing("id"));
        }
        self.state.set(SdkState::Initializing);
        logging::log!("install sdk init for app `{}`", options.id.trim());

        match self.initialize(options).await {
            Ok(()) => {
                self.state.set(SdkState::Ready);
                logging::log!("install sdk ready");
                Ok(())
            }
            Err(err) => {
                self.state.set(SdkState::InitFailed);
                logging::error!("install sdk init failed: {err}");
                Err(err)
            }
        }
    }

    async fn initialize(&self, options: InitOptions) -> Result<(), SdkError> {
        self.wx_open.reset();
        let transport = self.transport_config(&options);
        let client = RemoteConfigClient::new(self.services.transport.clone(), transport.clone());
        let wants_wx_sdk = options.wants_wx_sdk();
        let app_id = options.id.trim().to_string();
        let ext_info = options.ext_info.clone().filter(|ext_info| !ext_info.is_empty());
        self.context.set_transport_config(transport);
        self.context.set_init_data(options);

        let descriptor = client
            .fetch_base_config(&app_id, &self.services.page.location_href(), ext_info)
            .await?;
        let (descriptor, repair) = descriptor.normalized();
        if let Some(repair) = repair {
            logging::warn!("install sdk repaired capability descriptor: {repair:?}");
        }
        logging::log!("install sdk capability types: {:?}", descriptor.types);
        self.context.set(descriptor);

        let in_wechat = is_wechat_env(&self.services.page.user_agent());
        if self.wx_open.state() == WxOpenState::Failed {
            logging::log!("wx open tag stays disabled for this session");
        } else if wants_wx_sdk && in_wechat && self.context.is_support_open_tag() {
            if let Err(err) = self.wx_open.prepare().await {
                logging::warn!("wx open tag unavailable, using fallback: {err}");
                self.wx_open.disable();
            }
        }
        Ok(())
    }

    fn transport_config(&self, options: &InitOptions) -> TransportConfig {
        let mut config =
            TransportConfig::for_environment(options.is_debug, &self.services.page.protocol());
        if let Some(base_url) = options
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|base_url| !base_url.is_empty())
        {
            config = config.with_base_url(base_url);
        }
        if let Some(timeout_ms) = options.timeout_ms {
            config = config.with_timeout_ms(timeout_ms);
        }
        config
    }

    /// Fails with [`SdkError::NotInitialized`] unless the last `init` succeeded.
    pub fn ensure_ready(&self) -> Result<(), SdkError> {
        match self.state.get() {
            SdkState::Ready => Ok(()),
            _ => Err(SdkError::NotInitialized),
        }
    }

    /// Runs the fallback launch.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotInitialized`] before `init` succeeds, otherwise any error of
    /// [`FallbackStrategy::execute`].
    pub async fn open_app(&self) -> Result<LaunchOutcome, SdkError> {
        self.ensure_ready()?;
        self.fallback.execute().await
    }

    /// Returns whether the open tag is usable right now.
    pub fn can_use_wx_open(&self) -> bool {
        self.wx_open.can_use()
    }

    /// Strategy a render call would choose right now.
    pub fn select_trigger_strategy(&self) -> TriggerStrategy {
        if self.wx_open.can_use() {
            TriggerStrategy::WxOpenTag
        } else {
            TriggerStrategy::Fallback
        }
    }

    /// Renders the best available trigger into `container` and returns the chosen strategy.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::NotInitialized`] before `init` succeeds,
    /// [`SdkError::InvalidContainer`] without a container, and render errors of the chosen
    /// strategy.
    pub fn render_open_app_trigger(
        &self,
        container: Option<&dyn TriggerContainer>,
        options: &RenderOptions,
    ) -> Result<TriggerStrategy, SdkError> {
        self.ensure_ready()?;
        let container = container.ok_or_else(|| {
            SdkError::InvalidContainer("no container element was provided".to_string())
        })?;

        let strategy = self.select_trigger_strategy();
        logging::log!("install sdk rendering trigger with `{}`", strategy.as_str());
        match strategy {
            TriggerStrategy::WxOpenTag => self.wx_open.render_open_tag(container, options)?,
            TriggerStrategy::Fallback => self.fallback.render_open_app_dom(container, options)?,
        }
        Ok(strategy)
    }

    /// Same as [`Self::render_open_app_trigger`].
    pub fn render_wx_open_tag(
        &self,
        container: Option<&dyn TriggerContainer>,
        options: &RenderOptions,
    ) -> Result<TriggerStrategy, SdkError> {
        self.render_open_app_trigger(container, options)
    }

    /// Returns one descriptor field by wire name, or the whole descriptor for `None`.
    pub fn config_value(&self, key: Option<&str>) -> Option<Value> {
        match key {
            Some(key) => self.context.get_value(key),
            None => self
                .context
                .get()
                .and_then(|config| serde_json::to_value(config).ok()),
        }
    }
}
