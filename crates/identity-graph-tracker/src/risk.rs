//! Behavioral risk scoring over a user's recent edge activity.
//!
//! Four independent factor checks, each gated by its own threshold and
//! capped, summed and clamped to 100:
//!
//! | Window | Signal | Fires when | Contribution |
//! |--------|--------|------------|--------------|
//! | 24 h | distinct IPs | > 3 | `min(n * 10, 30)` |
//! | 1 h  | distinct IPs | > 2 | `min(n * 15, 40)` |
//! | 24 h | distinct fingerprints | > 2 | `min(n * 15, 35)` |
//! | 5 m  | adjacent identity events < 1 s apart | >= 1 pair | `min(k * 15, 35)` |
//!
//! Per-factor caps keep any single anomaly from saturating the score; the
//! aggregate clamp bounds the output; the distinct windows separate
//! persistent low-grade churn from acute bursts.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use identity_graph_core::time::{format_timestamp, parse_timestamp};
use identity_graph_core::types::{
    FingerprintConnection, IpConnection, RiskAssessment, RiskFactor, RiskLevel,
};

/// Upper bound of the aggregate risk score.
pub const MAX_RISK_SCORE: u32 = 100;

/// Thresholds, windows, and caps for the four factor checks.
///
/// Defaults implement the standard scoring table; deployments tune them via
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Width of the long churn window, in hours.
    #[serde(default = "default_daily_window_hours")]
    pub daily_window_hours: i64,
    /// Width of the burst window, in minutes.
    #[serde(default = "default_burst_window_minutes")]
    pub burst_window_minutes: i64,
    /// Width of the rapid-change window, in minutes.
    #[serde(default = "default_rapid_window_minutes")]
    pub rapid_window_minutes: i64,

    /// Distinct IPs in the daily window must exceed this to score.
    #[serde(default = "default_daily_ip_threshold")]
    pub daily_ip_threshold: usize,
    #[serde(default = "default_daily_ip_weight")]
    pub daily_ip_weight: u32,
    #[serde(default = "default_daily_ip_cap")]
    pub daily_ip_cap: u32,

    /// Distinct IPs in the burst window must exceed this to score.
    #[serde(default = "default_burst_ip_threshold")]
    pub burst_ip_threshold: usize,
    #[serde(default = "default_burst_ip_weight")]
    pub burst_ip_weight: u32,
    #[serde(default = "default_burst_ip_cap")]
    pub burst_ip_cap: u32,

    /// Distinct fingerprints in the daily window must exceed this to score.
    #[serde(default = "default_daily_fingerprint_threshold")]
    pub daily_fingerprint_threshold: usize,
    #[serde(default = "default_daily_fingerprint_weight")]
    pub daily_fingerprint_weight: u32,
    #[serde(default = "default_daily_fingerprint_cap")]
    pub daily_fingerprint_cap: u32,

    /// Adjacent identity events closer than this count as one rapid pair.
    #[serde(default = "default_rapid_change_max_gap_ms")]
    pub rapid_change_max_gap_ms: i64,
    #[serde(default = "default_rapid_change_weight")]
    pub rapid_change_weight: u32,
    #[serde(default = "default_rapid_change_cap")]
    pub rapid_change_cap: u32,
}

fn default_daily_window_hours() -> i64 {
    24
}
fn default_burst_window_minutes() -> i64 {
    60
}
fn default_rapid_window_minutes() -> i64 {
    5
}
fn default_daily_ip_threshold() -> usize {
    3
}
fn default_daily_ip_weight() -> u32 {
    10
}
fn default_daily_ip_cap() -> u32 {
    30
}
fn default_burst_ip_threshold() -> usize {
    2
}
fn default_burst_ip_weight() -> u32 {
    15
}
fn default_burst_ip_cap() -> u32 {
    40
}
fn default_daily_fingerprint_threshold() -> usize {
    2
}
fn default_daily_fingerprint_weight() -> u32 {
    15
}
fn default_daily_fingerprint_cap() -> u32 {
    35
}
fn default_rapid_change_max_gap_ms() -> i64 {
    1000
}
fn default_rapid_change_weight() -> u32 {
    15
}
fn default_rapid_change_cap() -> u32 {
    35
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            daily_window_hours: default_daily_window_hours(),
            burst_window_minutes: default_burst_window_minutes(),
            rapid_window_minutes: default_rapid_window_minutes(),
            daily_ip_threshold: default_daily_ip_threshold(),
            daily_ip_weight: default_daily_ip_weight(),
            daily_ip_cap: default_daily_ip_cap(),
            burst_ip_threshold: default_burst_ip_threshold(),
            burst_ip_weight: default_burst_ip_weight(),
            burst_ip_cap: default_burst_ip_cap(),
            daily_fingerprint_threshold: default_daily_fingerprint_threshold(),
            daily_fingerprint_weight: default_daily_fingerprint_weight(),
            daily_fingerprint_cap: default_daily_fingerprint_cap(),
            rapid_change_max_gap_ms: default_rapid_change_max_gap_ms(),
            rapid_change_weight: default_rapid_change_weight(),
            rapid_change_cap: default_rapid_change_cap(),
        }
    }
}

/// Pure scoring engine; never fails, returns the zero assessment for empty
/// input.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    config: RiskConfig,
}

impl RiskEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Scores one user's IP and fingerprint edges as of `now`.
    pub fn assess(
        &self,
        ips: &[IpConnection],
        fingerprints: &[FingerprintConnection],
        now: DateTime<Utc>,
    ) -> RiskAssessment {
        let mut factors = Vec::new();

        let daily_cutoff = format_timestamp(now - Duration::hours(self.config.daily_window_hours));
        let burst_cutoff =
            format_timestamp(now - Duration::minutes(self.config.burst_window_minutes));
        let rapid_cutoff =
            format_timestamp(now - Duration::minutes(self.config.rapid_window_minutes));

        // Distinct IPs over the daily window.
        let daily_ips: HashSet<&str> = ips
            .iter()
            .filter(|c| c.stats.last_seen.as_str() >= daily_cutoff.as_str())
            .map(|c| c.ip.as_str())
            .collect();
        if daily_ips.len() > self.config.daily_ip_threshold {
            let score =
                (daily_ips.len() as u32 * self.config.daily_ip_weight).min(self.config.daily_ip_cap);
            factors.push(RiskFactor {
                score,
                reason: "Multiple IPs in 24 hours".to_string(),
                details: json!({ "uniqueIps": daily_ips.len() }),
            });
        }

        // Distinct IPs over the burst window.
        let burst_ips: HashSet<&str> = ips
            .iter()
            .filter(|c| c.stats.last_seen.as_str() >= burst_cutoff.as_str())
            .map(|c| c.ip.as_str())
            .collect();
        if burst_ips.len() > self.config.burst_ip_threshold {
            let score =
                (burst_ips.len() as u32 * self.config.burst_ip_weight).min(self.config.burst_ip_cap);
            factors.push(RiskFactor {
                score,
                reason: "Rapid IP switching".to_string(),
                details: json!({ "uniqueIps": burst_ips.len() }),
            });
        }

        // Distinct fingerprints over the daily window.
        let daily_fingerprints: HashSet<&str> = fingerprints
            .iter()
            .filter(|c| c.stats.last_seen.as_str() >= daily_cutoff.as_str())
            .map(|c| c.fingerprint.as_str())
            .collect();
        if daily_fingerprints.len() > self.config.daily_fingerprint_threshold {
            let score = (daily_fingerprints.len() as u32 * self.config.daily_fingerprint_weight)
                .min(self.config.daily_fingerprint_cap);
            factors.push(RiskFactor {
                score,
                reason: "Multiple fingerprints in 24 hours".to_string(),
                details: json!({ "uniqueFingerprints": daily_fingerprints.len() }),
            });
        }

        // Near-simultaneous identity switches inside the rapid window. One
        // session touches its IP edge and its fingerprint edge with the same
        // timestamp, so identical instants collapse to a single event before
        // adjacent gaps are measured.
        let mut events: Vec<DateTime<Utc>> = ips
            .iter()
            .map(|c| c.stats.last_seen.as_str())
            .chain(fingerprints.iter().map(|c| c.stats.last_seen.as_str()))
            .filter(|last_seen| *last_seen >= rapid_cutoff.as_str())
            .filter_map(parse_timestamp)
            .collect();
        events.sort_unstable();
        events.dedup();
        if events.len() >= 2 {
            let rapid_pairs = events
                .windows(2)
                .filter(|pair| {
                    (pair[1] - pair[0]).num_milliseconds() < self.config.rapid_change_max_gap_ms
                })
                .count();
            if rapid_pairs >= 1 {
                let score = (rapid_pairs as u32 * self.config.rapid_change_weight)
                    .min(self.config.rapid_change_cap);
                factors.push(RiskFactor {
                    score,
                    reason: "Very rapid identity changes".to_string(),
                    details: json!({ "rapidPairs": rapid_pairs, "events": events.len() }),
                });
            }
        }

        let score = factors
            .iter()
            .map(|f| f.score)
            .sum::<u32>()
            .min(MAX_RISK_SCORE);
        let level = RiskLevel::from_score(score);
        if level == RiskLevel::High {
            warn!(score, factors = factors.len(), "high-risk identity churn");
        } else {
            debug!(score, %level, "risk assessed");
        }

        RiskAssessment {
            score,
            level,
            factors,
        }
    }
}
