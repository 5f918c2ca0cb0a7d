//! Error conversion and display tests.

use super::*;

#[test]
fn store_error_converts_into_graph_error() {
    let store = StoreError::ReadFailed("io".to_string());
    let graph: GraphError = store.into();
    assert!(matches!(graph, GraphError::Store(StoreError::ReadFailed(_))));
}

#[test]
fn store_error_converts_into_tracker_error() {
    let store = StoreError::WriteFailed("io".to_string());
    let tracker: TrackerError = store.into();
    assert!(matches!(
        tracker,
        TrackerError::Graph(GraphError::Store(StoreError::WriteFailed(_)))
    ));
}

#[test]
fn unified_error_wraps_each_layer() {
    let a: IdentityGraphError = StoreError::ListFailed("x".to_string()).into();
    let b: IdentityGraphError = GraphError::EndpointMissing {
        node_id: "n1".to_string(),
    }
    .into();
    let c: IdentityGraphError = TrackerError::InvalidTimestamp("bad".to_string()).into();

    assert!(matches!(a, IdentityGraphError::Store(_)));
    assert!(matches!(b, IdentityGraphError::Graph(_)));
    assert!(matches!(c, IdentityGraphError::Tracker(_)));
}

#[test]
fn endpoint_missing_names_the_node() {
    let err = GraphError::EndpointMissing {
        node_id: "abc123".to_string(),
    };
    assert_eq!(err.to_string(), "edge endpoint missing: abc123");
}

#[test]
fn invalid_cursor_display_includes_both_fields() {
    let err = StoreError::InvalidCursor {
        prefix: "node:".to_string(),
        cursor: "edge:xyz".to_string(),
    };
    let text = err.to_string();
    assert!(text.contains("node:"));
    assert!(text.contains("edge:xyz"));
}
