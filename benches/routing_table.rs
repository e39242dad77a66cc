//! Micro-benchmarks for RoutingTable operations: update, nearest_peers, and remove
//! at varying table sizes. Reports nanoseconds-per-operation.
//!
//! Catches regressions in the hot-path data structure that underlies every
//! lookup and peer refresh.
//!
//! Run: `cargo bench --bench routing_table`

use kbucket::{DhtId, PeerId, PeerMetrics, RoutingTable};
use std::sync::Arc;
use std::time::{Duration, Instant};

const BUCKET_SIZE: usize = 20;

fn main() {
    println!("routing_table\n");

    bench_update();
    bench_nearest_peers();
    bench_remove();
}

fn new_table() -> RoutingTable {
    RoutingTable::new(
        BUCKET_SIZE,
        DhtId::random(),
        Duration::from_secs(60),
        Arc::new(PeerMetrics::new()),
    )
}

fn bench_update() {
    println!("update");

    // Pre-generate random peers outside the timed section
    let peers: Vec<_> = (0..1000).map(|_| PeerId::random()).collect();

    // Empty table
    {
        let table = new_table();
        let start = Instant::now();
        for peer in peers.iter().cloned() {
            table.update(peer);
        }
        let per_op = start.elapsed().as_nanos() / peers.len() as u128;
        println!(
            "empty table:   {per_op}ns/op (final size: {}, buckets: {})",
            table.size(),
            table.bucket_count()
        );
    }

    // Refreshing peers already in the table
    {
        let table = new_table();
        for peer in peers.iter().cloned() {
            table.update(peer);
        }

        let present = table.peers();
        let start = Instant::now();
        for peer in present.iter().cloned() {
            table.update(peer);
        }
        let per_op = start.elapsed().as_nanos() / present.len() as u128;
        println!("refresh:       {per_op}ns/op");
    }

    println!();
}

fn bench_nearest_peers() {
    println!("nearest_peers");

    let targets: Vec<_> = (0..1000).map(|_| DhtId::random()).collect();

    for size in [50, 100, 200, 400] {
        let table = new_table();
        for _ in 0..size {
            table.update(PeerId::random());
        }

        let start = Instant::now();
        for target in &targets {
            let _ = table.nearest_peers(target, BUCKET_SIZE);
        }
        let per_op = start.elapsed().as_nanos() / targets.len() as u128;
        println!("{size:>3} offered peers: {per_op}ns/op");
    }

    println!();
}

fn bench_remove() {
    println!("remove");

    let table = new_table();
    for _ in 0..200 {
        table.update(PeerId::random());
    }

    let peers = table.peers();
    let n = peers.len();
    let start = Instant::now();
    for peer in &peers {
        table.remove(peer);
    }
    let per_op = start.elapsed().as_nanos() / n.max(1) as u128;
    println!("{per_op}ns/op ({n} removals)");
    println!();
}
