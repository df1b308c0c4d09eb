//! ChatSense Batch
//!
//! Reads exported chat transcripts, classifies the relationship behind each
//! one and prints a report per conversation.

use anyhow::Result;
use chatsense_analysis::{BatchAnalyzer, ChatSource, ConversationAnalyzer, ConversationReport};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::{error, info};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    let config = cli.load_config()?;
    info!(
        workers = config.batch.workers,
        date_order = %config.parser.ambiguous_date_order,
        sentiment_timeout_ms = config.sentiment.timeout_ms,
        "Configuration loaded"
    );

    let metrics_handle = if cli.metrics {
        Some(init_metrics()?)
    } else {
        None
    };

    let analyzer = Arc::new(ConversationAnalyzer::with_lexicon(&config)?);
    info!(scorer = analyzer.scorer_name(), "Analyzer ready");

    let mut sources = Vec::with_capacity(cli.files.len());
    let mut failed = 0usize;
    for path in &cli.files {
        match ChatSource::from_path(path).await {
            Ok(source) => sources.push(source),
            Err(e) => {
                error!("Skipping transcript: {}", e);
                metrics::counter!("chatsense_load_errors_total").increment(1);
                failed += 1;
            }
        }
    }

    let batch = BatchAnalyzer::new(analyzer, config.batch.workers);
    for result in batch.run(sources).await {
        match result {
            Ok(report) => print_report(&report, cli.json)?,
            Err(e) => {
                error!("Analysis failed: {}", e);
                failed += 1;
            }
        }
    }

    if let Some(handle) = metrics_handle {
        eprintln!("{}", handle.render());
    }

    if failed > 0 {
        anyhow::bail!("{} of {} transcript(s) could not be analysed", failed, cli.files.len());
    }
    Ok(())
}

fn print_report(report: &ConversationReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }

    let classification = &report.classification;
    println!(
        "{}: {} (score {}, {} confidence, margin {}) - {} messages from {}",
        report.name,
        classification.relationship.label(),
        classification.score,
        classification.confidence,
        classification.margin(),
        report.features.total_messages,
        report.participants.join(", ")
    );
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("chatsense=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chatsense=info"))
    };

    // Logs go to stderr so reports on stdout stay machine-readable
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Install an in-process Prometheus recorder and return its handle
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "chatsense_conversations_analyzed_total",
        "Conversations run through the analysis pipeline"
    );
    metrics::describe_counter!(
        "chatsense_messages_parsed_total",
        "Messages parsed, system notices included"
    );
    metrics::describe_counter!(
        "chatsense_sentiment_fallbacks_total",
        "Sentiment calls replaced by the neutral score"
    );
    metrics::describe_counter!(
        "chatsense_load_errors_total",
        "Transcripts skipped because they could not be read"
    );
    metrics::describe_histogram!(
        "chatsense_analysis_latency_us",
        metrics::Unit::Microseconds,
        "Per-conversation analysis latency in microseconds"
    );

    Ok(handle)
}
