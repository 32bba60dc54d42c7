//! Mini KV - demo driver
//!
//! Runs a short workload against a namespace built from the environment and
//! prints each store's statistics as JSON.
//!
//! # Startup Sequence
//! 1. Initialize tracing subscriber for logging
//! 2. Load configuration from environment variables
//! 3. Create the namespace (sweep tasks start with each store)
//! 4. Drive string and sorted-set workloads
//! 5. Print statistics and stop the sweep tasks

use std::time::{Duration, Instant};

use anyhow::Context;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_kv::{CacheStore, Config, Namespace, SortedSet, Valuer};

const KEY_COUNT: usize = 1000;
const READ_COUNT: usize = 100_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_kv=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::try_from_env().context("loading configuration")?;
    info!(
        "Configuration loaded: capacity={}B, clean_interval={}s, persist_path={:?}",
        config.capacity, config.clean_interval, config.persist_path
    );

    let namespace = Namespace::from_config(&config);

    let strings = namespace.use_db("strings");
    string_workload(&strings);

    let scores = namespace.use_db("scores");
    sorted_set_workload(&scores);

    let report: serde_json::Map<String, serde_json::Value> = namespace
        .names()
        .into_iter()
        .map(|name| {
            let stats = namespace.use_db(&name).stats();
            serde_json::to_value(stats).map(|stats| (name, stats))
        })
        .collect::<Result<_, _>>()?;

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "total_size": namespace.size(),
            "stores": report,
        }))?
    );

    namespace.shutdown();
    info!("Shutdown complete");
    Ok(())
}

fn string_workload(store: &CacheStore) {
    let start = Instant::now();
    for i in 0..KEY_COUNT {
        store.set(i.to_string(), "23");
    }
    store.set_with_ttl("short-lived", "gone soon", Duration::from_millis(1));
    let wrote = start.elapsed();

    let start = Instant::now();
    let hits = (0..READ_COUNT)
        .filter(|_| store.get("500").is_some())
        .count();
    let read = start.elapsed();

    info!(
        keys = KEY_COUNT,
        reads = READ_COUNT,
        hits,
        ?wrote,
        ?read,
        "String workload finished"
    );
}

fn sorted_set_workload(store: &CacheStore) {
    store.set("leaderboard", SortedSet::new());
    store.update("leaderboard", |value| {
        if let Some(zset) = value.as_sorted_set_mut() {
            for rank in 0..100 {
                zset.add(rank as f64, format!("player-{rank}"));
            }
        }
    });

    if let Some(zset) = store.get_sorted_set("leaderboard") {
        let podium = zset.get_range(0.0, 3.0, 1.0);
        info!(members = zset.len(), bytes = zset.size(), ?podium, "Sorted set workload finished");
    }
}
