//! A research assistant built on layered memory.
//!
//! Tracks projects, notes and citations, evolves its understanding of a
//! topic across iterations, and reports how that knowledge trended.
//!
//! Run with: cargo run --example research_assistant

use anyhow::Result;
use augment_memory::reflection::analyze_knowledge_evolution;
use augment_memory::{
    MemoryLayer, MemoryManager, MemoryRecord, SimEmbeddingProvider, SimMemoryStore,
};

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

struct ResearchAssistant {
    memory: MemoryManager<SimMemoryStore, SimEmbeddingProvider>,
}

impl ResearchAssistant {
    async fn new(seed: u64) -> Result<(Self, augment_memory::dst::SimClock)> {
        let (mut memory, clock) = MemoryManager::sim(seed);
        memory.initialize().await?;
        Ok((Self { memory }, clock))
    }

    async fn start_project(&self, name: &str, description: &str) -> Result<()> {
        self.memory
            .store_memory(
                MemoryLayer::Working,
                &format!("project:{name}"),
                description,
            )
            .await?;
        Ok(())
    }

    async fn add_note(&self, project: &str, topic: &str, text: &str, now_ms: u64) -> Result<()> {
        let record = MemoryRecord::builder(
            MemoryLayer::Semantic,
            format!("note:{project}:{topic}"),
            text,
        )
        .with_metadata("project", project)
        .with_metadata("topic", topic)
        .build(now_ms);
        self.memory.store_record(record).await?;
        Ok(())
    }

    async fn add_citation(&self, key: &str, reference: &str, now_ms: u64) -> Result<()> {
        let record = MemoryRecord::builder(
            MemoryLayer::Semantic,
            format!("cite:{key}"),
            reference,
        )
        .with_metadata("kind", "citation")
        .with_importance(0.9)
        .build(now_ms);
        self.memory.store_record(record).await?;
        Ok(())
    }

    /// Store a refined iteration of the assistant's understanding.
    async fn evolve_knowledge(
        &self,
        topic: &str,
        iteration: usize,
        summary: &str,
        confidence: f64,
        now_ms: u64,
    ) -> Result<()> {
        let record = MemoryRecord::builder(
            MemoryLayer::Semantic,
            format!("knowledge:{topic}:v{iteration}"),
            summary,
        )
        .with_metadata("topic", topic)
        .with_importance(confidence)
        .build(now_ms);
        self.memory.store_record(record).await?;
        Ok(())
    }

    async fn lookup(&self, query: &str) -> Result<Vec<(String, f64)>> {
        let result = self.memory.retrieve_memory(query, None).await?;
        Ok(result
            .matches
            .into_iter()
            .map(|m| (m.record.key, m.score))
            .collect())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let (assistant, clock) = ResearchAssistant::new(42).await?;

    println!("=== Starting research project ===");
    assistant
        .start_project("spaced-repetition", "how review intervals affect retention")
        .await?;

    assistant
        .add_note(
            "spaced-repetition",
            "ebbinghaus",
            "retention drops exponentially without review",
            clock.now_ms(),
        )
        .await?;
    assistant
        .add_citation(
            "ebbinghaus1885",
            "Ebbinghaus 1885, Memory: A Contribution to Experimental Psychology",
            clock.now_ms(),
        )
        .await?;

    println!("=== Evolving knowledge over three days ===");
    let summaries = [
        (1, "review intervals matter", 0.4),
        (2, "expanding intervals beat fixed ones", 0.6),
        (3, "optimal intervals track the forgetting curve", 0.85),
    ];
    let mut iterations = Vec::new();
    for (iteration, summary, confidence) in summaries {
        clock.advance_ms(DAY_MS);
        assistant
            .evolve_knowledge(
                "spaced-repetition",
                iteration,
                summary,
                confidence,
                clock.now_ms(),
            )
            .await?;
        let record = assistant
            .memory
            .get(
                MemoryLayer::Semantic,
                &format!("knowledge:spaced-repetition:v{iteration}"),
            )
            .await?;
        iterations.push(record);
        println!("  v{iteration}: {summary} (confidence {confidence})");
    }

    if let Some(evolution) = analyze_knowledge_evolution(&iterations) {
        println!(
            "\n=== Knowledge evolution: {:?} over {} iterations, latest {} ===",
            evolution.trend, evolution.iterations, evolution.latest_key
        );
    }

    println!("\n=== Looking up review intervals ===");
    for (key, score) in assistant.lookup("review intervals retention").await? {
        println!("  {key} (score {score:.2})");
    }

    println!("\n=== Reflection ===");
    let reflection = assistant.memory.reflect().await?;
    println!(
        "  reviewed {} records, {} duplicate(s)",
        reflection.records_reviewed,
        reflection.duplicate_keys.len()
    );

    Ok(())
}
