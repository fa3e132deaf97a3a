use std::path::PathBuf;

use capture_search_rs::pipeline;
use capture_search_rs::types::SearchConfig;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;

/// capture-search-rs — concurrency-capped search over newline-delimited HTTP scan captures.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "capture-search-rs",
    version,
    about = "Search newline-delimited HTTP scan captures for response bodies containing given terms.",
    long_about = None
)]
struct Cli {
    /// Path to the newline-delimited JSON capture dataset.
    #[arg(long)]
    input: PathBuf,

    /// Max concurrent per-line decode/search tasks.
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Term(s) to search response bodies for, tried in the order given.
    #[arg(required = true)]
    terms: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("capture-search-rs configuration:");
    println!("  input        : {}", cli.input.display());
    println!("  concurrency  : {}", cli.concurrency);
    println!("  terms        : {}", cli.terms.join(", "));

    let config = SearchConfig {
        terms: cli.terms,
        concurrency: cli.concurrency,
    };

    // A single consumer renders all match events, so concurrent line tasks
    // never interleave partial output on stdout.
    let (tx, mut rx) = mpsc::unbounded_channel::<capture_search_rs::types::MatchEvent>();
    let printer = tokio::spawn(async move {
        while let Some(ev) = rx.recv().await {
            println!("IP {}'s response contains {}", ev.ip, ev.term);
        }
    });

    let stats = pipeline::search_file(&cli.input, &config, tx).await?;
    printer.await?;

    println!(
        "\nDone: {} lines read, {} matches (peak {} tasks in flight)",
        stats.lines_read, stats.events_emitted, stats.peak_in_flight
    );
    Ok(())
}
