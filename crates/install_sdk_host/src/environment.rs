//! User-agent predicates for the WeChat and mobile environments the SDK branches on.
//!
//! Every predicate is a pure function of the user-agent string. A missing or unrecognized token
//! simply yields `false`.

const WECHAT_TOKEN: &str = "micromessenger";
const MINI_PROGRAM_TOKEN: &str = "miniprogram";
const IOS_DEVICE_TOKENS: &[&str] = &["iPad", "iPhone", "iPod"];
const MOBILE_TOKENS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Returns whether the UA belongs to a WeChat mini-program webview.
pub fn is_wechat_mini_program(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    ua.contains(WECHAT_TOKEN) && ua.contains(MINI_PROGRAM_TOKEN)
}

/// Returns whether the UA belongs to the WeChat in-app browser (not a mini-program).
pub fn is_wechat_webview(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    ua.contains(WECHAT_TOKEN) && !ua.contains(MINI_PROGRAM_TOKEN)
}

/// Returns whether the UA is any WeChat environment (webview or mini-program).
pub fn is_wechat_env(user_agent: &str) -> bool {
    is_wechat_webview(user_agent) || is_wechat_mini_program(user_agent)
}

/// Returns whether the UA reports an iOS device. Matching is case-sensitive.
pub fn is_ios(user_agent: &str) -> bool {
    IOS_DEVICE_TOKENS
        .iter()
        .any(|token| user_agent.contains(token))
}

/// Returns whether the UA reports Android.
pub fn is_android(user_agent: &str) -> bool {
    user_agent.to_ascii_lowercase().contains("android")
}

/// Returns whether the UA reports a mobile device.
pub fn is_mobile(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    MOBILE_TOKENS.iter().any(|token| ua.contains(token))
}

/// Snapshot of every environment predicate for one user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSnapshot {
    /// WeChat in-app browser.
    pub wechat_webview: bool,
    /// WeChat mini-program webview.
    pub wechat_mini_program: bool,
    /// iOS device.
    pub ios: bool,
    /// Android device.
    pub android: bool,
    /// Any mobile device.
    pub mobile: bool,
}

impl EnvironmentSnapshot {
    /// Evaluates all predicates against `user_agent`.
    pub fn from_user_agent(user_agent: &str) -> Self {
        Self {
            wechat_webview: is_wechat_webview(user_agent),
            wechat_mini_program: is_wechat_mini_program(user_agent),
            ios: is_ios(user_agent),
            android: is_android(user_agent),
            mobile: is_mobile(user_agent),
        }
    }

    /// Returns whether either WeChat environment was detected.
    pub const fn wechat_env(self) -> bool {
        self.wechat_webview || self.wechat_mini_program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WECHAT_IOS: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148 MicroMessenger/8.0.40(0x18002831) \
        NetType/WIFI Language/zh_CN";
    const WECHAT_MINI_ANDROID: &str = "Mozilla/5.0 (Linux; Android 13; Pixel 7 Build/TQ3A) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0 Mobile Safari/537.36 \
        MicroMessenger/8.0.42 miniProgram";
    const DESKTOP_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

    #[test]
    fn wechat_webview_and_mini_program_are_disjoint() {
        assert!(is_wechat_webview(WECHAT_IOS));
        assert!(!is_wechat_mini_program(WECHAT_IOS));

        assert!(is_wechat_mini_program(WECHAT_MINI_ANDROID));
        assert!(!is_wechat_webview(WECHAT_MINI_ANDROID));

        assert!(is_wechat_env(WECHAT_IOS));
        assert!(is_wechat_env(WECHAT_MINI_ANDROID));
        assert!(!is_wechat_env(DESKTOP_CHROME));
    }

    #[test]
    fn platform_predicates_match_expected_tokens() {
        assert!(is_ios(WECHAT_IOS));
        assert!(!is_android(WECHAT_IOS));
        assert!(is_android(WECHAT_MINI_ANDROID));
        assert!(is_mobile(WECHAT_IOS));
        assert!(is_mobile(WECHAT_MINI_ANDROID));
        assert!(!is_mobile(DESKTOP_CHROME));
    }

    #[test]
    fn ios_match_is_case_sensitive() {
        assert!(!is_ios("custom iphone client"));
        assert!(is_mobile("custom iphone client"));
    }

    #[test]
    fn empty_user_agent_yields_false_everywhere() {
        assert_eq!(
            EnvironmentSnapshot::from_user_agent(""),
            EnvironmentSnapshot::default()
        );
    }

    #[test]
    fn snapshot_reports_wechat_env() {
        let snapshot = EnvironmentSnapshot::from_user_agent(WECHAT_IOS);
        assert!(snapshot.wechat_env());
        assert!(snapshot.ios);
        assert!(!snapshot.android);
    }
}
