//! Scheme/URL fallback launch.

use std::rc::Rc;

use futures::task::LocalSpawnExt;
use install_sdk_host::{
    is_wechat_env, ButtonView, DownloadConfig, DownloadRequest, RenderOptions, SchemeFrame,
    SdkHostServices, TransportConfig, TriggerContainer,
};
use leptos::logging;
use serde::Serialize;

use super::{collect_fingerprint, StrategyTimings};
use crate::{RemoteConfigClient, SdkError, SessionContext};

/// Action derived from a download config and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchPlan {
    /// Navigate straight to the URL.
    Navigate(String),
    /// Try the scheme, then navigate to the URL if the page is still visible.
    SchemeWithFallback {
        /// Custom scheme URI.
        scheme: String,
        /// Fallback URL.
        url: String,
    },
    /// Try the scheme with no fallback.
    SchemeOnly(String),
    /// Nothing to launch.
    NoTarget,
}

/// Chooses the launch action. WeChat blocks scheme launches, so a URL wins there.
pub fn plan_launch(in_wechat: bool, config: &DownloadConfig) -> LaunchPlan {
    match (config.scheme(), config.url()) {
        (_, Some(url)) if in_wechat => LaunchPlan::Navigate(url.to_string()),
        (Some(scheme), Some(url)) => LaunchPlan::SchemeWithFallback {
            scheme: scheme.to_string(),
            url: url.to_string(),
        },
        (Some(scheme), None) => LaunchPlan::SchemeOnly(scheme.to_string()),
        (None, Some(url)) => LaunchPlan::Navigate(url.to_string()),
        (None, None) => LaunchPlan::NoTarget,
    }
}

/// Result of one fallback execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum LaunchOutcome {
    /// The page navigated to `url`.
    Navigated {
        /// Target URL.
        url: String,
    },
    /// The scheme iframe ran its full wait; `fell_back_to` is the URL navigated to afterwards.
    SchemeAttempted {
        /// Scheme URI.
        scheme: String,
        /// URL navigated to after the wait.
        fell_back_to: Option<String>,
    },
    /// The page was hidden when the wait ended, so the app took over.
    AppSwitched {
        /// Scheme URI.
        scheme: String,
    },
    /// The backend returned neither a scheme nor a URL.
    NoTarget,
}

/// Universal fallback: fingerprint, fetch the scheme/URL pair, and launch.
pub struct FallbackStrategy {
    context: Rc<SessionContext>,
    services: SdkHostServices,
    timings: StrategyTimings,
}

impl FallbackStrategy {
    /// Creates the strategy over a shared context.
    pub fn new(
        context: Rc<SessionContext>,
        services: SdkHostServices,
        timings: StrategyTimings,
    ) -> Self {
        Self {
            context,
            services,
            timings,
        }
    }

    /// Runs the fallback launch.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::ConfigMissing`] without an app id, [`SdkError::RemoteConfig`] when the
    /// download config cannot be fetched, and [`SdkError::Launch`] when the page refuses the
    /// iframe or navigation.
    pub async fn execute(&self) -> Result<LaunchOutcome, SdkError> {
        let app_id = self.context.app_id().ok_or(SdkError::ConfigMissing("app id"))?;
        let fingerprint = collect_fingerprint(
            &self.services,
            &self.timings,
            self.context.app_version(),
            self.context.wants_extranet_lookup(),
        )
        .await;

        let client = RemoteConfigClient::new(self.services.transport.clone(), self.transport());
        let download = client
            .fetch_download_config(&DownloadRequest::new(app_id, fingerprint))
            .await?;

        let in_wechat = is_wechat_env(&self.services.page.user_agent());
        let plan = plan_launch(in_wechat, &download);
        logging::log!("install sdk fallback plan: {plan:?}");
        self.apply(plan).await
    }

    /// Renders a clickable trigger whose click runs [`Self::execute`].
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Render`] when the element cannot be mounted.
    pub fn render_open_app_dom(
        self: &Rc<Self>,
        container: &dyn TriggerContainer,
        options: &RenderOptions,
    ) -> Result<(), SdkError> {
        container.clear();
        let view = ButtonView {
            template: options.template_or_default().to_string(),
        };
        let strategy = Rc::clone(self);
        container
            .mount_button(&view, Box::new(move || strategy.spawn_execute("trigger click")))
            .map_err(SdkError::Render)
    }

    /// Starts [`Self::execute`] on the host spawner, logging any failure.
    pub(crate) fn spawn_execute(self: &Rc<Self>, cause: &'static str) {
        let strategy = Rc::clone(self);
        let spawned = self.services.spawner.spawn_local(async move {
            match strategy.execute().await {
                Ok(outcome) => logging::log!("install sdk fallback after {cause}: {outcome:?}"),
                Err(err) => logging::error!("install sdk fallback after {cause} failed: {err}"),
            }
        });
        if let Err(err) = spawned {
            logging::error!("install sdk could not schedule fallback after {cause}: {err}");
        }
    }

    fn transport(&self) -> TransportConfig {
        self.context.transport_config().unwrap_or_else(|| {
            TransportConfig::for_environment(
                self.context.is_debug(),
                &self.services.page.protocol(),
            )
        })
    }

    async fn apply(&self, plan: LaunchPlan) -> Result<LaunchOutcome, SdkError> {
        match plan {
            LaunchPlan::Navigate(url) => {
                self.navigate(&url)?;
                Ok(LaunchOutcome::Navigated { url })
            }
            LaunchPlan::SchemeWithFallback { scheme, url } => {
                let frame = self.open_frame(&scheme)?;
                self.services
                    .timer
                    .sleep(self.timings.scheme_fallback_ms)
                    .await;
                frame.remove();
                if self.services.page.is_hidden() {
                    return Ok(LaunchOutcome::AppSwitched { scheme });
                }
                self.navigate(&url)?;
                Ok(LaunchOutcome::SchemeAttempted {
                    scheme,
                    fell_back_to: Some(url),
                })
            }
            LaunchPlan::SchemeOnly(scheme) => {
                let frame = self.open_frame(&scheme)?;
                self.services
                    .timer
                    .sleep(self.timings.scheme_fallback_ms)
                    .await;
                frame.remove();
                if self.services.page.is_hidden() {
                    return Ok(LaunchOutcome::AppSwitched { scheme });
                }
                Ok(LaunchOutcome::SchemeAttempted {
                    scheme,
                    fell_back_to: None,
                })
            }
            LaunchPlan::NoTarget => {
                logging::warn!("install sdk download config has neither scheme nor url");
                Ok(LaunchOutcome::NoTarget)
            }
        }
    }

    fn open_frame(&self, scheme: &str) -> Result<Box<dyn SchemeFrame>, SdkError> {
        self.services
            .page
            .open_scheme_frame(scheme)
            .map_err(SdkError::Launch)
    }

    fn navigate(&self, url: &str) -> Result<(), SdkError> {
        self.services.page.navigate(url).map_err(SdkError::Launch)
    }
}
