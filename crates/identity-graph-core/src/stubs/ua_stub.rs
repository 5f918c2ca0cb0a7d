//! Substring-matching implementation of [`UserAgentClassifier`].
//!
//! # TEST ONLY
//!
//! Recognizes only the handful of browser, OS, and device markers that show
//! up in test fixtures. Production deployments wire in a real classification
//! service; the tracker's default substitution handles whatever this stub
//! leaves as `None`.

use crate::traits::UserAgentClassifier;
use crate::types::UaClassification;

/// Naive classifier over raw user-agent substrings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveUserAgentClassifier;

impl NaiveUserAgentClassifier {
    pub fn new() -> Self {
        Self
    }
}

fn version_after(ua: &str, marker: &str) -> Option<String> {
    let start = ua.find(marker)? + marker.len();
    let version: String = ua[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if version.is_empty() {
        None
    } else {
        Some(version)
    }
}

impl UserAgentClassifier for NaiveUserAgentClassifier {
    fn classify(&self, user_agent: &str) -> UaClassification {
        let ua = user_agent.to_ascii_lowercase();
        let mut classification = UaClassification::default();

        if ua.contains("firefox") {
            classification.browser_name = Some("Firefox".to_string());
            classification.browser_version = version_after(&ua, "firefox/");
        } else if ua.contains("edg/") {
            classification.browser_name = Some("Edge".to_string());
            classification.browser_version = version_after(&ua, "edg/");
        } else if ua.contains("chrome") {
            classification.browser_name = Some("Chrome".to_string());
            classification.browser_version = version_after(&ua, "chrome/");
        } else if ua.contains("safari") {
            classification.browser_name = Some("Safari".to_string());
            classification.browser_version = version_after(&ua, "version/");
        }

        if ua.contains("windows nt") {
            classification.os_name = Some("Windows".to_string());
            classification.os_version = version_after(&ua, "windows nt ");
        } else if ua.contains("android") {
            classification.os_name = Some("Android".to_string());
            classification.os_version = version_after(&ua, "android ");
        } else if ua.contains("iphone") || ua.contains("ipad") {
            classification.os_name = Some("iOS".to_string());
        } else if ua.contains("mac os x") {
            classification.os_name = Some("macOS".to_string());
        } else if ua.contains("linux") {
            classification.os_name = Some("Linux".to_string());
        }

        if ua.contains("mobile") || ua.contains("android") || ua.contains("iphone") {
            classification.device_type = Some("mobile".to_string());
        } else if ua.contains("ipad") || ua.contains("tablet") {
            classification.device_type = Some("tablet".to_string());
        }

        if ua.contains("x86_64") || ua.contains("win64") || ua.contains("x64") {
            classification.cpu_architecture = Some("amd64".to_string());
        } else if ua.contains("aarch64") || ua.contains("arm64") {
            classification.cpu_architecture = Some("arm64".to_string());
        }

        classification
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIREFOX_LINUX: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
    const CHROME_ANDROID: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

    #[test]
    fn classifies_firefox_on_linux() {
        let c = NaiveUserAgentClassifier::new().classify(FIREFOX_LINUX);
        assert_eq!(c.browser_name.as_deref(), Some("Firefox"));
        assert_eq!(c.browser_version.as_deref(), Some("121.0"));
        assert_eq!(c.os_name.as_deref(), Some("Linux"));
        assert_eq!(c.cpu_architecture.as_deref(), Some("amd64"));
        assert_eq!(c.device_type, None);
    }

    #[test]
    fn classifies_chrome_on_android_as_mobile() {
        let c = NaiveUserAgentClassifier::new().classify(CHROME_ANDROID);
        assert_eq!(c.browser_name.as_deref(), Some("Chrome"));
        assert_eq!(c.os_name.as_deref(), Some("Android"));
        assert_eq!(c.os_version.as_deref(), Some("14"));
        assert_eq!(c.device_type.as_deref(), Some("mobile"));
    }

    #[test]
    fn unknown_agent_yields_empty_classification() {
        let c = NaiveUserAgentClassifier::new().classify("curl/8.4.0");
        assert_eq!(c, UaClassification::default());
    }
}
