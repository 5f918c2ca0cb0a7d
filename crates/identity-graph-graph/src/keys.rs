//! Key construction and parsing for the graph namespaces.

use serde_json::Value;

use crate::config::GraphConfig;

/// Key of a node record.
pub fn node_key(config: &GraphConfig, node_id: &str) -> String {
    format!("{}{}", config.node_prefix, node_id)
}

/// Key of an edge record.
pub fn edge_key(config: &GraphConfig, edge_id: &str) -> String {
    format!("{}{}", config.edge_prefix, edge_id)
}

/// Key of one secondary index row.
pub fn index_key(config: &GraphConfig, property: &str, value_repr: &str, node_id: &str) -> String {
    format!(
        "{}{}:{}:{}",
        config.index_prefix, property, value_repr, node_id
    )
}

/// Listing prefix covering every node indexed under `(property, value)`.
pub fn index_scan_prefix(config: &GraphConfig, property: &str, value_repr: &str) -> String {
    format!("{}{}:{}:", config.index_prefix, property, value_repr)
}

/// Renders a property value into its index-key form.
///
/// Strings index verbatim; every other JSON value indexes as compact JSON
/// text. Rendered values may themselves contain `:`; that is harmless
/// because index keys are only ever parsed from the right.
pub fn index_value_repr(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extracts the node id from an index key: the substring after the last `:`.
pub fn node_id_from_index_key(key: &str) -> Option<&str> {
    match key.rsplit(':').next() {
        Some("") | None => None,
        Some(id) => Some(id),
    }
}
