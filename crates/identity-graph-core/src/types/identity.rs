//! Identity projections: device metadata, per-edge statistics, and the
//! `get_user_connections` output shapes.

use serde::{Deserialize, Serialize};

const UNKNOWN: &str = "Unknown";
const DEFAULT_DEVICE_TYPE: &str = "desktop";

/// Classified user-agent attributes attached to FINGERPRINT nodes.
///
/// Every field is concrete: missing classifier output is substituted with
/// `"Unknown"`, except the device type which defaults to `"desktop"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMetadata {
    pub browser: String,
    pub browser_version: String,
    pub os: String,
    pub os_version: String,
    pub device: String,
    pub device_type: String,
    pub cpu: String,
}

impl Default for DeviceMetadata {
    fn default() -> Self {
        Self {
            browser: UNKNOWN.to_string(),
            browser_version: UNKNOWN.to_string(),
            os: UNKNOWN.to_string(),
            os_version: UNKNOWN.to_string(),
            device: UNKNOWN.to_string(),
            device_type: DEFAULT_DEVICE_TYPE.to_string(),
            cpu: UNKNOWN.to_string(),
        }
    }
}

/// Raw output of the user-agent classification oracle.
///
/// Every field is optional; the tracker substitutes defaults when it attaches
/// the classification to a FINGERPRINT node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UaClassification {
    pub browser_name: Option<String>,
    pub browser_version: Option<String>,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub device_model: Option<String>,
    pub device_type: Option<String>,
    pub cpu_architecture: Option<String>,
}

impl UaClassification {
    /// Applies the default substitutions and produces persisted metadata.
    pub fn into_metadata(self) -> DeviceMetadata {
        let or_unknown = |v: Option<String>| v.unwrap_or_else(|| UNKNOWN.to_string());
        DeviceMetadata {
            browser: or_unknown(self.browser_name),
            browser_version: or_unknown(self.browser_version),
            os: or_unknown(self.os_name),
            os_version: or_unknown(self.os_version),
            device: or_unknown(self.device_model),
            device_type: self
                .device_type
                .unwrap_or_else(|| DEFAULT_DEVICE_TYPE.to_string()),
            cpu: or_unknown(self.cpu_architecture),
        }
    }
}

/// First-seen / last-seen / count statistics carried by a usage edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStats {
    pub first_seen: String,
    pub last_seen: String,
    pub count: u64,
}

/// One IP a user has appeared under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpConnection {
    pub ip: String,
    pub stats: ConnectionStats,
}

/// One browser fingerprint a user has appeared under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintConnection {
    pub fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DeviceMetadata>,
    pub stats: ConnectionStats,
}

/// Output of `get_user_connections`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConnections {
    pub ips: Vec<IpConnection>,
    pub fingerprints: Vec<FingerprintConnection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_classification_yields_defaults() {
        let metadata = UaClassification::default().into_metadata();
        assert_eq!(metadata, DeviceMetadata::default());
        assert_eq!(metadata.browser, "Unknown");
        assert_eq!(metadata.device_type, "desktop");
    }

    #[test]
    fn classification_fields_carry_through() {
        let classification = UaClassification {
            browser_name: Some("Firefox".to_string()),
            browser_version: Some("121.0".to_string()),
            os_name: Some("Linux".to_string()),
            device_type: Some("mobile".to_string()),
            ..Default::default()
        };
        let metadata = classification.into_metadata();
        assert_eq!(metadata.browser, "Firefox");
        assert_eq!(metadata.browser_version, "121.0");
        assert_eq!(metadata.os, "Linux");
        assert_eq!(metadata.os_version, "Unknown");
        assert_eq!(metadata.device_type, "mobile");
    }

    #[test]
    fn metadata_serializes_camel_case() {
        let json = serde_json::to_value(DeviceMetadata::default()).unwrap();
        assert_eq!(json["browserVersion"], "Unknown");
        assert_eq!(json["deviceType"], "desktop");
        assert!(json.get("browser_version").is_none());
    }

    #[test]
    fn absent_fingerprint_metadata_is_omitted() {
        let connection = FingerprintConnection {
            fingerprint: "fpA".to_string(),
            metadata: None,
            stats: ConnectionStats {
                first_seen: "2024-01-01T00:00:00.000Z".to_string(),
                last_seen: "2024-01-01T00:00:00.000Z".to_string(),
                count: 1,
            },
        };
        let json = serde_json::to_value(&connection).unwrap();
        assert!(json.get("metadata").is_none());
    }
}
