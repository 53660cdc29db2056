//! App-opening strategies and the timing bounds they share.
//!
//! The strategy set is closed: [`WxOpenTagStrategy`] renders the vendor open tag and
//! [`FallbackStrategy`] launches a scheme or URL. [`TriggerStrategy`] names the one chosen at
//! render time.

mod fallback;
mod fingerprint;
mod wx_open;

use std::future::Future;

use futures::future::{self, Either};
use install_sdk_host::Timer;

pub use fallback::{plan_launch, FallbackStrategy, LaunchOutcome, LaunchPlan};
pub use fingerprint::collect_fingerprint;
pub use wx_open::{WxOpenState, WxOpenTagStrategy};

/// Strategy chosen to render a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerStrategy {
    /// Vendor `wx-open-launch-app` element.
    WxOpenTag,
    /// Plain clickable element that runs the fallback launch.
    Fallback,
}

impl TriggerStrategy {
    /// Returns a stable token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WxOpenTag => "wx-open-tag",
            Self::Fallback => "fallback",
        }
    }
}

/// Timer bounds used by the strategies, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategyTimings {
    /// Wait after the scheme iframe before assuming the app did not open.
    pub scheme_fallback_ms: u32,
    /// Bound on the vendor `ready`/`error` callbacks.
    pub handshake_timeout_ms: u32,
    /// Bound on the ICE local-address probe.
    pub intranet_probe_ms: u32,
    /// Bound on the public-address lookup.
    pub extranet_lookup_ms: u32,
}

impl Default for StrategyTimings {
    fn default() -> Self {
        Self {
            scheme_fallback_ms: 2_000,
            handshake_timeout_ms: 10_000,
            intranet_probe_ms: 1_500,
            extranet_lookup_ms: 3_000,
        }
    }
}

/// Resolves to `Some(output)` when `work` finishes first, or `None` once the timer fires.
pub(crate) async fn with_deadline<F: Future>(
    timer: &dyn Timer,
    duration_ms: u32,
    work: F,
) -> Option<F::Output> {
    futures::pin_mut!(work);
    match future::select(work, timer.sleep(duration_ms)).await {
        Either::Left((output, _)) => Some(output),
        Either::Right(((), _)) => None,
    }
}
