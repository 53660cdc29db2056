//! Device fingerprint collection for the download request.
//!
//! Every sub-step is best-effort: failures and timeouts substitute placeholder values.

use install_sdk_host::{
    brand_name, download_platform, link_param, mobile_model, parse_extranet_address,
    DeviceFingerprint, SdkHostServices, EXTRANET_LOOKUP_URL, LOOPBACK_ADDRESS,
};
use leptos::logging;

use super::{with_deadline, StrategyTimings};

/// Collects the fingerprint reported with the download request.
pub async fn collect_fingerprint(
    services: &SdkHostServices,
    timings: &StrategyTimings,
    app_version: Option<String>,
    lookup_extranet: bool,
) -> DeviceFingerprint {
    let user_agent = services.page.user_agent();
    let screen = services.device.screen_metrics();
    let webgl = services.device.webgl_info();
    let intranet_ip = intranet_address(services, timings).await;
    let extranet_ip = if lookup_extranet {
        extranet_address(services, timings, &intranet_ip).await
    } else {
        intranet_ip.clone()
    };

    DeviceFingerprint {
        download_type: download_platform(&user_agent),
        link_param: link_param(&services.page.location_search()),
        screen_width: screen.width,
        screen_height: screen.height,
        device_pixel_ratio: screen.pixel_ratio,
        web_gl_version: webgl.version,
        gpu_type: webgl.gpu,
        intranet_ip,
        extranet_ip,
        brand_name: brand_name(&user_agent),
        mobile_model: mobile_model(&user_agent),
        app_version,
    }
}

async fn intranet_address(services: &SdkHostServices, timings: &StrategyTimings) -> String {
    let probe = services.device.intranet_address();
    match with_deadline(&*services.timer, timings.intranet_probe_ms, probe).await {
        Some(Ok(address)) if !address.trim().is_empty() => address,
        Some(Ok(_)) => LOOPBACK_ADDRESS.to_string(),
        Some(Err(err)) => {
            logging::warn!("intranet address probe failed: {err}");
            LOOPBACK_ADDRESS.to_string()
        }
        None => {
            logging::warn!(
                "intranet address probe gave no candidate within {}ms",
                timings.intranet_probe_ms
            );
            LOOPBACK_ADDRESS.to_string()
        }
    }
}

async fn extranet_address(
    services: &SdkHostServices,
    timings: &StrategyTimings,
    default_address: &str,
) -> String {
    let lookup = services.device.fetch_page_text(EXTRANET_LOOKUP_URL);
    match with_deadline(&*services.timer, timings.extranet_lookup_ms, lookup).await {
        Some(Ok(html)) => {
            parse_extranet_address(&html).unwrap_or_else(|| default_address.to_string())
        }
        Some(Err(err)) => {
            logging::warn!("extranet address lookup failed: {err}");
            default_address.to_string()
        }
        None => {
            logging::warn!(
                "extranet address lookup timed out after {}ms",
                timings.extranet_lookup_ms
            );
            default_address.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use install_sdk_host::{DownloadPlatform, UNKNOWN, WEBGL_NOT_SUPPORTED};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::{ProbeBehavior, TestHost, IOS_SAFARI};

    #[test]
    fn collects_device_and_page_signals() {
        let host = TestHost::new(IOS_SAFARI);
        host.page.set_search("?channel=ad");
        host.device.set_intranet(ProbeBehavior::Resolve("192.168.1.20".to_string()));
        host.device.set_lookup(ProbeBehavior::Resolve(
            r#"<a href="/" target="_blank">203.0.113.9</a>"#.to_string(),
        ));

        let fingerprint = block_on(collect_fingerprint(
            &host.services(),
            &StrategyTimings::default(),
            Some("1.0".to_string()),
            true,
        ));

        assert_eq!(fingerprint.download_type, DownloadPlatform::Ios);
        assert_eq!(fingerprint.link_param, "channel=ad");
        assert_eq!(fingerprint.screen_width, 390.0);
        assert_eq!(fingerprint.device_pixel_ratio, 3.0);
        assert_eq!(fingerprint.intranet_ip, "192.168.1.20");
        assert_eq!(fingerprint.extranet_ip, "203.0.113.9");
        assert_eq!(fingerprint.brand_name, "Apple");
        assert_eq!(fingerprint.mobile_model, "iPhone 15 series");
        assert_eq!(fingerprint.app_version.as_deref(), Some("1.0"));
    }

    #[test]
    fn probe_failures_degrade_to_placeholders() {
        let host = TestHost::new("curl/8.0");
        host.device.set_intranet(ProbeBehavior::Pending);
        host.device.set_lookup(ProbeBehavior::Fail("offline".to_string()));
        host.device.set_webgl_unsupported();

        let fingerprint = block_on(collect_fingerprint(
            &host.services(),
            &StrategyTimings::default(),
            None,
            true,
        ));

        assert_eq!(fingerprint.intranet_ip, LOOPBACK_ADDRESS);
        assert_eq!(fingerprint.extranet_ip, LOOPBACK_ADDRESS);
        assert_eq!(fingerprint.web_gl_version, WEBGL_NOT_SUPPORTED);
        assert_eq!(fingerprint.gpu_type, UNKNOWN);
        assert_eq!(fingerprint.brand_name, UNKNOWN);
        assert_eq!(fingerprint.download_type, DownloadPlatform::Pc);
    }

    #[test]
    fn unparseable_lookup_page_reuses_intranet_address() {
        let host = TestHost::new(IOS_SAFARI);
        host.device.set_intranet(ProbeBehavior::Resolve("10.0.0.8".to_string()));
        host.device.set_lookup(ProbeBehavior::Resolve("<html>captcha</html>".to_string()));

        let fingerprint = block_on(collect_fingerprint(
            &host.services(),
            &StrategyTimings::default(),
            None,
            true,
        ));

        assert_eq!(fingerprint.extranet_ip, "10.0.0.8");
    }

    #[test]
    fn disabled_lookup_skips_the_request() {
        let host = TestHost::new(IOS_SAFARI);
        host.device.set_intranet(ProbeBehavior::Resolve("10.0.0.8".to_string()));

        let fingerprint = block_on(collect_fingerprint(
            &host.services(),
            &StrategyTimings::default(),
            None,
            false,
        ));

        assert_eq!(fingerprint.extranet_ip, "10.0.0.8");
        assert_eq!(host.device.lookups(), 0);
    }
}
