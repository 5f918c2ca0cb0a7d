//! User-agent classification contract.

use crate::types::UaClassification;

/// Classifies a raw user-agent string into browser / OS / device / CPU
/// attributes.
///
/// The production implementation is an external oracle; this system only
/// consumes the contract. Every output field is optional, and the tracker
/// substitutes `"Unknown"` for missing fields (`"desktop"` for a missing
/// device type) before persisting.
pub trait UserAgentClassifier: Send + Sync {
    fn classify(&self, user_agent: &str) -> UaClassification;
}
