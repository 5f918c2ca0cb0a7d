//! End-to-end tracker scenarios over the in-memory store.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use identity_graph_core::stubs::{MemoryKeyValueStore, NaiveUserAgentClassifier};
use identity_graph_core::types::{edge_types, NodeType, RiskLevel};
use identity_graph_graph::{GraphStore, QueryOptions};
use identity_graph_tracker::{ConnectionGraphOptions, IdentityTracker};

const FIREFOX_LINUX: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";

struct Fixture {
    graph: Arc<GraphStore>,
    tracker: IdentityTracker,
}

fn fixture() -> Fixture {
    let graph = Arc::new(GraphStore::new(Arc::new(MemoryKeyValueStore::new())));
    let tracker = IdentityTracker::new(graph.clone(), Arc::new(NaiveUserAgentClassifier::new()));
    Fixture { graph, tracker }
}

fn at(base: DateTime<Utc>, offset: Duration) -> DateTime<Utc> {
    base + offset
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

#[tokio::test]
async fn single_session_creates_three_nodes_and_two_edges() {
    let f = fixture();
    let t0 = base_time();
    f.tracker
        .record_connection_at("u1", "1.1.1.1", "fpA", FIREFOX_LINUX, t0)
        .await
        .unwrap();

    for node_type in NodeType::all() {
        let page = f.graph.query(QueryOptions::by_type(node_type)).await.unwrap();
        assert_eq!(page.items.len(), 1, "{node_type} node count");
    }

    let connections = f.tracker.get_user_connections("u1").await.unwrap();
    assert_eq!(connections.ips.len(), 1);
    assert_eq!(connections.fingerprints.len(), 1);

    let ip = &connections.ips[0];
    assert_eq!(ip.ip, "1.1.1.1");
    assert_eq!(ip.stats.count, 1);
    assert_eq!(ip.stats.first_seen, "2024-01-01T00:00:00.000Z");
    assert_eq!(ip.stats.last_seen, "2024-01-01T00:00:00.000Z");

    let fp = &connections.fingerprints[0];
    assert_eq!(fp.fingerprint, "fpA");
    assert_eq!(fp.stats.count, 1);
    let metadata = fp.metadata.as_ref().expect("fingerprint metadata");
    assert_eq!(metadata.browser, "Firefox");
    assert_eq!(metadata.os, "Linux");
    assert_eq!(metadata.device_type, "desktop");
    assert_eq!(metadata.device, "Unknown");
}

#[tokio::test]
async fn repeat_session_bumps_edges_not_nodes() {
    let f = fixture();
    let t0 = base_time();
    f.tracker
        .record_connection_at("u1", "1.1.1.1", "fpA", FIREFOX_LINUX, t0)
        .await
        .unwrap();
    f.tracker
        .record_connection_at(
            "u1",
            "1.1.1.1",
            "fpA",
            FIREFOX_LINUX,
            at(t0, Duration::minutes(1)),
        )
        .await
        .unwrap();

    for node_type in NodeType::all() {
        let page = f.graph.query(QueryOptions::by_type(node_type)).await.unwrap();
        assert_eq!(page.items.len(), 1, "{node_type} node count");
    }

    let connections = f.tracker.get_user_connections("u1").await.unwrap();
    let ip = &connections.ips[0];
    assert_eq!(ip.stats.count, 2);
    assert_eq!(ip.stats.first_seen, "2024-01-01T00:00:00.000Z");
    assert_eq!(ip.stats.last_seen, "2024-01-01T00:01:00.000Z");

    let fp = &connections.fingerprints[0];
    assert_eq!(fp.stats.count, 2);
    assert_eq!(fp.stats.last_seen, "2024-01-01T00:01:00.000Z");
}

#[tokio::test]
async fn multiple_ips_in_a_day_score_low() {
    let f = fixture();
    let t0 = base_time();
    for i in 0..4 {
        f.tracker
            .record_connection_at(
                "u1",
                &format!("1.1.1.{}", i + 1),
                "fpA",
                FIREFOX_LINUX,
                at(t0, Duration::hours(i)),
            )
            .await
            .unwrap();
    }

    let assessment = f
        .tracker
        .calculate_user_risk_at("u1", at(t0, Duration::hours(3)))
        .await
        .unwrap();

    assert_eq!(assessment.score, 30);
    assert_eq!(assessment.level, RiskLevel::Low);
    assert_eq!(assessment.factors.len(), 1);
    assert_eq!(assessment.factors[0].reason, "Multiple IPs in 24 hours");
    assert_eq!(assessment.factors[0].score, 30);
}

#[tokio::test]
async fn rapid_ip_switching_scores_medium() {
    let f = fixture();
    let t0 = base_time();
    for (i, ip) in ["1.1.1.1", "1.1.1.2", "1.1.1.3"].iter().enumerate() {
        f.tracker
            .record_connection_at(
                "u1",
                ip,
                "fpA",
                FIREFOX_LINUX,
                at(t0, Duration::seconds(10 * i as i64)),
            )
            .await
            .unwrap();
    }

    let assessment = f
        .tracker
        .calculate_user_risk_at("u1", at(t0, Duration::seconds(30)))
        .await
        .unwrap();

    assert_eq!(assessment.score, 40);
    assert_eq!(assessment.level, RiskLevel::Medium);
    assert_eq!(assessment.factors.len(), 1);
    assert_eq!(assessment.factors[0].reason, "Rapid IP switching");
}

#[tokio::test]
async fn sub_second_identity_change_scores_rapid_factor() {
    let f = fixture();
    let t0 = base_time();
    f.tracker
        .record_connection_at("u1", "1.1.1.1", "fpA", FIREFOX_LINUX, t0)
        .await
        .unwrap();
    f.tracker
        .record_connection_at(
            "u1",
            "1.1.1.2",
            "fpA",
            FIREFOX_LINUX,
            at(t0, Duration::milliseconds(500)),
        )
        .await
        .unwrap();

    let assessment = f
        .tracker
        .calculate_user_risk_at("u1", at(t0, Duration::minutes(2)))
        .await
        .unwrap();

    assert_eq!(assessment.score, 15);
    assert_eq!(assessment.level, RiskLevel::Low);
    assert_eq!(assessment.factors.len(), 1);
    assert_eq!(assessment.factors[0].reason, "Very rapid identity changes");
}

#[tokio::test]
async fn unknown_user_scores_zero_and_lists_empty() {
    let f = fixture();
    let assessment = f.tracker.calculate_user_risk("ghost").await.unwrap();
    assert_eq!(assessment.score, 0);
    assert_eq!(assessment.level, RiskLevel::Low);
    assert!(assessment.factors.is_empty());

    let connections = f.tracker.get_user_connections("ghost").await.unwrap();
    assert!(connections.ips.is_empty());
    assert!(connections.fingerprints.is_empty());
}

#[tokio::test]
async fn connection_graph_window_excludes_stale_users() {
    let f = fixture();
    let t0 = base_time();
    f.tracker
        .record_connection_at("u1", "1.1.1.1", "fpA", FIREFOX_LINUX, t0)
        .await
        .unwrap();

    // Evaluated 25 hours later with a 24-hour window: nothing survives.
    let graph = f
        .tracker
        .connection_graph_at(
            ConnectionGraphOptions::default(),
            at(t0, Duration::hours(25)),
        )
        .await
        .unwrap();
    assert!(graph.nodes.is_empty());
    assert!(graph.links.is_empty());

    // Evaluated inside the window the whole triple appears.
    let graph = f
        .tracker
        .connection_graph_at(
            ConnectionGraphOptions::default(),
            at(t0, Duration::hours(23)),
        )
        .await
        .unwrap();
    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(graph.links.len(), 2);
}

#[tokio::test]
async fn connection_graph_shapes_and_dedup() {
    let f = fixture();
    let t0 = base_time();
    // Two users sharing one IP.
    f.tracker
        .record_connection_at("u1", "9.9.9.9", "fpA", FIREFOX_LINUX, t0)
        .await
        .unwrap();
    f.tracker
        .record_connection_at("u2", "9.9.9.9", "fpB", FIREFOX_LINUX, t0)
        .await
        .unwrap();

    let graph = f
        .tracker
        .connection_graph_at(
            ConnectionGraphOptions::default(),
            at(t0, Duration::minutes(10)),
        )
        .await
        .unwrap();

    // 2 users + 1 shared IP + 2 fingerprints.
    assert_eq!(graph.nodes.len(), 5);
    assert_eq!(graph.links.len(), 4);

    let users: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| n.node_type == NodeType::User)
        .collect();
    assert_eq!(users.len(), 2);
    for user in &users {
        assert!(user.risk.is_some());
        assert!(user.risk_score.is_some());
        assert!(user.metadata.is_none());
        assert_eq!(user.stats.count, 2, "total edges, not window-clipped");
    }

    let ips: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| n.node_type == NodeType::Ip)
        .collect();
    assert_eq!(ips.len(), 1);
    assert_eq!(ips[0].label, "9.9.9.9");
    assert!(ips[0].risk.is_none());
    assert_eq!(ips[0].stats.count, 1);

    let fingerprints: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| n.node_type == NodeType::Fingerprint)
        .collect();
    assert_eq!(fingerprints.len(), 2);
    for fp in &fingerprints {
        assert!(fp.metadata.is_some());
    }

    for link in &graph.links {
        assert!(
            link.link_type == edge_types::USES_IP
                || link.link_type == edge_types::USES_FINGERPRINT
        );
        assert_eq!(link.stats.count, 1);
    }
}

#[tokio::test]
async fn connection_graph_risk_threshold_filters_users() {
    let f = fixture();
    let t0 = base_time();
    // Quiet user: one IP.
    f.tracker
        .record_connection_at("quiet", "1.1.1.1", "fpQ", FIREFOX_LINUX, t0)
        .await
        .unwrap();
    // Churning user: three IPs inside an hour scores 40.
    for (i, ip) in ["2.2.2.1", "2.2.2.2", "2.2.2.3"].iter().enumerate() {
        f.tracker
            .record_connection_at(
                "churner",
                ip,
                "fpC",
                FIREFOX_LINUX,
                at(t0, Duration::minutes(i as i64)),
            )
            .await
            .unwrap();
    }

    let graph = f
        .tracker
        .connection_graph_at(
            ConnectionGraphOptions::default().risk_threshold(40),
            at(t0, Duration::minutes(30)),
        )
        .await
        .unwrap();

    let users: Vec<_> = graph
        .nodes
        .iter()
        .filter(|n| n.node_type == NodeType::User)
        .collect();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].label, "churner");
    assert_eq!(users[0].risk, Some(RiskLevel::Medium));
    assert_eq!(users[0].risk_score, Some(40));
}

#[tokio::test]
async fn edge_stats_stay_monotone_across_many_sessions() {
    let f = fixture();
    let t0 = base_time();
    for i in 0..5 {
        f.tracker
            .record_connection_at(
                "u1",
                "1.1.1.1",
                "fpA",
                FIREFOX_LINUX,
                at(t0, Duration::minutes(i)),
            )
            .await
            .unwrap();
    }

    let connections = f.tracker.get_user_connections("u1").await.unwrap();
    let ip = &connections.ips[0];
    assert_eq!(ip.stats.count, 5);
    assert_eq!(ip.stats.first_seen, "2024-01-01T00:00:00.000Z");
    assert_eq!(ip.stats.last_seen, "2024-01-01T00:04:00.000Z");
    assert!(ip.stats.first_seen <= ip.stats.last_seen);
}
