//! Basic memory operations walkthrough.
//!
//! Stores notes across layers, recalls them, runs a reflection pass,
//! and shows decay pruning under a simulated clock.
//!
//! Run with: cargo run --example basic_memory_operations

use anyhow::Result;
use augment_memory::{MemoryLayer, MemoryManager};

const HOUR_MS: u64 = 60 * 60 * 1000;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let (mut memory, clock) = MemoryManager::sim(42);
    memory.initialize().await?;

    println!("=== Storing memories across layers ===");
    memory
        .store_memory(
            MemoryLayer::Ephemeral,
            "session_greeting",
            "user opened with a question about caching",
        )
        .await?;
    memory
        .store_memory(
            MemoryLayer::Working,
            "current_focus",
            "comparing LRU and LFU eviction for the cache layer",
        )
        .await?;
    memory
        .store_memory(
            MemoryLayer::Semantic,
            "lru_definition",
            "LRU evicts the entry that has gone longest without access",
        )
        .await?;
    memory
        .store_memory(
            MemoryLayer::Procedural,
            "benchmark_steps",
            "warm the cache, replay the trace, record hit ratios",
        )
        .await?;
    println!("stored {} records\n", memory.count(None).await?);

    println!("=== Recall ===");
    let result = memory.retrieve_memory("LRU eviction", None).await?;
    for matched in &result.matches {
        println!(
            "  [{}] {} (score {:.2})",
            matched.record.layer, matched.record.key, matched.score
        );
    }

    println!("\n=== Reflection ===");
    let reflection = memory.reflect().await?;
    println!(
        "  reviewed {} records, insight stored as {}",
        reflection.records_reviewed, reflection.insight_key
    );
    if let Some(strongest) = reflection.strongest.first() {
        println!(
            "  strongest memory: {} (relevance {:.2})",
            strongest.key, strongest.relevance
        );
    }

    println!("\n=== Decay after six simulated hours ===");
    clock.advance_ms(6 * HOUR_MS);
    let report = memory.prune_memory().await?;
    println!(
        "  examined {}, pruned {}",
        report.examined, report.pruned
    );
    for (layer, count) in &report.pruned_by_layer {
        println!("    {layer}: {count} pruned");
    }

    let health = memory.health_check().await;
    println!(
        "\n=== Health: {} records, {} bytes, healthy={} ===",
        health.total_records,
        health.total_bytes,
        health.is_healthy()
    );

    memory.shutdown().await?;
    Ok(())
}
