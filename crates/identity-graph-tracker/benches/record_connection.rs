//! Ingestion throughput against the in-memory store.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use identity_graph_core::stubs::{MemoryKeyValueStore, NaiveUserAgentClassifier};
use identity_graph_graph::GraphStore;
use identity_graph_tracker::IdentityTracker;

const UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";

fn new_tracker() -> IdentityTracker {
    let graph = Arc::new(GraphStore::new(Arc::new(MemoryKeyValueStore::new())));
    IdentityTracker::new(graph, Arc::new(NaiveUserAgentClassifier::new()))
}

fn bench_repeat_session(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let tracker = new_tracker();

    c.bench_function("record_connection/repeat_session", |b| {
        b.iter(|| {
            runtime.block_on(async {
                tracker
                    .record_connection("u1", "1.1.1.1", "fpA", UA)
                    .await
                    .expect("record");
            })
        })
    });
}

fn bench_fresh_identities(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let tracker = new_tracker();
    let mut sequence = 0u64;

    c.bench_function("record_connection/fresh_identity", |b| {
        b.iter(|| {
            sequence += 1;
            let user = format!("user-{sequence}");
            let ip = format!("10.{}.{}.{}", sequence % 256, (sequence / 256) % 256, 1);
            let fingerprint = format!("fp-{sequence}");
            runtime.block_on(async {
                tracker
                    .record_connection(&user, &ip, &fingerprint, UA)
                    .await
                    .expect("record");
            })
        })
    });
}

criterion_group!(benches, bench_repeat_session, bench_fresh_identities);
criterion_main!(benches);
