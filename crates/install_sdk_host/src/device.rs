//! Device fingerprint probe contract and user-agent lookup tables.

use std::{future::Future, pin::Pin};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::environment::{is_android, is_ios};

/// Object-safe boxed future used by [`DeviceProbe`].
pub type DeviceProbeFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Placeholder address reported when the local-network probe yields nothing.
pub const LOOPBACK_ADDRESS: &str = "127.0.0.1";
/// Page scraped for the visitor's public address.
pub const EXTRANET_LOOKUP_URL: &str = "https://2025.ip138.com/";
/// Reported value for a missing brand, model, or GPU.
pub const UNKNOWN: &str = "Unknown";
/// Reported WebGL version when no context can be created.
pub const WEBGL_NOT_SUPPORTED: &str = "WebGL not supported";

/// Viewport dimensions and pixel density at probe time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenMetrics {
    /// Viewport width in CSS pixels.
    pub width: f64,
    /// Viewport height in CSS pixels.
    pub height: f64,
    /// Device pixel ratio.
    pub pixel_ratio: f64,
}

/// Best-effort WebGL capability readout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebGlInfo {
    /// `VERSION` parameter of the rendering context.
    pub version: String,
    /// Unmasked renderer string, when the debug extension is exposed.
    pub gpu: String,
}

impl WebGlInfo {
    /// Value reported when WebGL is unavailable.
    pub fn unsupported() -> Self {
        Self {
            version: WEBGL_NOT_SUPPORTED.to_string(),
            gpu: UNKNOWN.to_string(),
        }
    }
}

impl Default for WebGlInfo {
    fn default() -> Self {
        Self::unsupported()
    }
}

/// Host service exposing the device signals the download request reports.
///
/// Implementations never panic; failures surface as `Err` and callers substitute placeholders.
pub trait DeviceProbe {
    /// Reads viewport dimensions and pixel ratio.
    fn screen_metrics(&self) -> ScreenMetrics;

    /// Reads WebGL version and GPU renderer. Returns [`WebGlInfo::unsupported`] on any failure.
    fn webgl_info(&self) -> WebGlInfo;

    /// Discovers a local network address through a peer-connection ICE candidate.
    ///
    /// The returned future may never settle; callers bound it with a timer.
    fn intranet_address<'a>(&'a self) -> DeviceProbeFuture<'a, Result<String, String>>;

    /// Fetches a page as text, used for the public-address lookup.
    fn fetch_page_text<'a>(&'a self, url: &'a str)
        -> DeviceProbeFuture<'a, Result<String, String>>;
}

/// Platform token reported as `download_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadPlatform {
    /// iPhone, iPad, or iPod.
    Ios,
    /// Any Android device.
    Android,
    /// Everything else.
    Pc,
}

/// Classifies the UA into the download platform token.
pub fn download_platform(user_agent: &str) -> DownloadPlatform {
    if is_ios(user_agent) {
        DownloadPlatform::Ios
    } else if is_android(user_agent) {
        DownloadPlatform::Android
    } else {
        DownloadPlatform::Pc
    }
}

static APPLE_DEVICE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)iPhone|iPad|iPod"));

static ANDROID_BRANDS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)SM-[A-Z0-9]+", "Samsung"),
        (r"(?i)Pixel", "Google"),
        (r"(?i)MI [0-9]+", "Xiaomi"),
        (r"(?i)Redmi", "Redmi"),
        (r"(?i)OPPO", "OPPO"),
        (r"(?i)VIVO", "Vivo"),
        (r"(?i)HUAWEI", "Huawei"),
        (r"(?i)Honor", "Honor"),
        (r"(?i)ONEPLUS", "OnePlus"),
    ]
    .into_iter()
    .map(|(pattern, brand)| (compile(pattern), brand))
    .collect()
});

static IPHONE_SERIES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"iPhone OS 17", "iPhone 15 series"),
        (r"iPhone OS 16", "iPhone 14 series"),
        (r"iPhone OS 15", "iPhone 13 series"),
        (r"iPhone OS 14", "iPhone 12 series"),
        (r"iPhone OS 13", "iPhone 11 series"),
    ]
    .into_iter()
    .map(|(pattern, model)| (compile(pattern), model))
    .collect()
});

static IPHONE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)iPhone"));
static ANDROID_MODEL: Lazy<Regex> = Lazy::new(|| compile(r"Android.*?; ([^;]+) Build"));
static EXTRANET_ADDRESS: Lazy<Regex> =
    Lazy::new(|| compile(r#"target="_blank">([\d\.]+)</a>"#));

// Patterns are literals checked by the tests below.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid UA pattern `{pattern}`: {err}"))
}

/// Infers the device brand from the UA, or [`UNKNOWN`].
pub fn brand_name(user_agent: &str) -> String {
    if APPLE_DEVICE.is_match(user_agent) {
        return "Apple".to_string();
    }
    ANDROID_BRANDS
        .iter()
        .find(|(pattern, _)| pattern.is_match(user_agent))
        .map_or(UNKNOWN, |(_, brand)| *brand)
        .to_string()
}

/// Infers a device model label from the UA, or [`UNKNOWN`].
pub fn mobile_model(user_agent: &str) -> String {
    if IPHONE.is_match(user_agent) {
        return IPHONE_SERIES
            .iter()
            .find(|(pattern, _)| pattern.is_match(user_agent))
            .map_or("iPhone", |(_, model)| *model)
            .to_string();
    }
    ANDROID_MODEL
        .captures(user_agent)
        .and_then(|captures| captures.get(1))
        .map(|model| model.as_str().trim().to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Returns the part of `location.search` after the first `?`, or an empty string.
pub fn link_param(search: &str) -> String {
    search
        .split('?')
        .nth(1)
        .unwrap_or_default()
        .to_string()
}

/// Extracts the public address from the lookup page markup.
pub fn parse_extranet_address(html: &str) -> Option<String> {
    EXTRANET_ADDRESS
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|address| address.as_str().to_string())
}
