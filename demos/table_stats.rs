//! Fill a routing table with random peers and print how they spread over buckets.
//!
//! Run: `cargo run --example table_stats -- --peers 5000 --bucket-size 20`

use std::{sync::Arc, time::Duration};

use clap::Parser;
use histo::Histogram;
use kbucket::{DhtId, PeerId, PeerMetrics, RoutingTable};
use rand::Rng;
use tracing::{info, Level};

#[derive(Parser)]
struct Cli {
    /// Number of distinct random peers to offer to the table
    #[arg(short, long, default_value_t = 5000)]
    peers: usize,
    /// Maximum number of peers per bucket
    #[arg(short, long, default_value_t = 20)]
    bucket_size: usize,
    /// Peers with a simulated latency above this many milliseconds are rejected
    #[arg(short, long, default_value_t = 500)]
    max_latency_ms: u64,
    /// Log every bucket at the end
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let metrics = Arc::new(PeerMetrics::new());
    let table = RoutingTable::new(
        cli.bucket_size,
        DhtId::random(),
        Duration::from_millis(cli.max_latency_ms),
        metrics.clone(),
    );

    let mut rng = rand::thread_rng();
    let mut latencies = Histogram::with_buckets(10);

    for _ in 0..cli.peers {
        let peer = PeerId::random();
        let latency = rng.gen_range(5..1000);

        latencies.add(latency);
        metrics.record_latency(&peer, Duration::from_millis(latency));

        table.update(peer);
    }

    info!(
        local = %table.local_id(),
        size = table.size(),
        buckets = table.bucket_count(),
        "Filled routing table"
    );

    println!("Simulated latencies (ms):\n{}", latencies);

    for (i, bucket) in table.buckets().iter().enumerate() {
        println!("bucket {:>3}: {:>3} {}", i, bucket.len(), "#".repeat(bucket.len()));
    }

    let target = DhtId::random();
    let closest = table.nearest_peers(&target, cli.bucket_size);

    println!("\n{} closest peers to {}:", closest.len(), target);
    for peer in closest {
        println!("  {}", peer);
    }

    if cli.verbose {
        table.print();
    }
}
