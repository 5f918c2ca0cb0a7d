//! Consumed contracts: the host key-value store and the user-agent
//! classification oracle.

mod key_value_store;
mod ua_classifier;

pub use key_value_store::{KeyPage, KeyValueStore};
pub use ua_classifier::UserAgentClassifier;
