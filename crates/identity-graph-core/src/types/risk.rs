//! Risk scoring output types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Score threshold at or above which a user is classified HIGH risk.
pub const HIGH_RISK_THRESHOLD: u32 = 70;

/// Score threshold at or above which a user is classified MEDIUM risk.
pub const MEDIUM_RISK_THRESHOLD: u32 = 40;

/// Coarse risk classification of an aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classifies a score. Applies to the aggregate score and to any
    /// externally supplied score alike: `>= 70` HIGH, `>= 40` MEDIUM,
    /// else LOW.
    #[inline]
    pub fn from_score(score: u32) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Returns the serialized tag.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One independent additive contribution to a user's risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Capped contribution of this factor.
    pub score: u32,
    /// Human-readable reason, e.g. `"Rapid IP switching"`.
    pub reason: String,
    /// Free-form supporting detail (counts, offending values).
    pub details: Value,
}

/// Aggregate risk assessment for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Sum of factor scores, clamped to `[0, 100]`.
    pub score: u32,
    /// Level classification of `score`.
    pub level: RiskLevel,
    /// Factors that exceeded their thresholds, in evaluation order.
    pub factors: Vec<RiskFactor>,
}

impl RiskAssessment {
    /// The zero assessment: no factors, score 0, LOW.
    pub fn none() -> Self {
        Self {
            score: 0,
            level: RiskLevel::Low,
            factors: Vec::new(),
        }
    }
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_partition() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(39), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(40), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(69), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    }

    #[test]
    fn level_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::Medium).unwrap(),
            r#""MEDIUM""#
        );
        let restored: RiskLevel = serde_json::from_str(r#""HIGH""#).unwrap();
        assert_eq!(restored, RiskLevel::High);
    }

    #[test]
    fn none_assessment_is_zeroed() {
        let assessment = RiskAssessment::none();
        assert_eq!(assessment.score, 0);
        assert_eq!(assessment.level, RiskLevel::Low);
        assert!(assessment.factors.is_empty());
    }
}
