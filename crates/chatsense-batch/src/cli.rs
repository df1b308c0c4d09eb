use chatsense_analysis::{AnalyzerConfig, DateOrder};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chatsense-batch")]
#[command(
    author,
    version,
    about = "Classify the relationship behind exported chat transcripts"
)]
pub struct Cli {
    /// Configuration file path (defaults are used when it does not exist)
    #[arg(short, long, default_value = "chatsense.yaml")]
    pub config: PathBuf,

    /// Conversations analysed concurrently
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Reading of ambiguous D1/D2 dates: month-first or day-first
    #[arg(long, value_parser = parse_date_order)]
    pub date_order: Option<DateOrder>,

    /// Print one JSON report per conversation instead of a summary line
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Print a Prometheus snapshot of the run's metrics to stderr
    #[arg(long)]
    pub metrics: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Transcript files to analyse
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

fn parse_date_order(s: &str) -> Result<DateOrder, String> {
    s.parse()
}

impl Cli {
    /// Load the configuration file and apply command-line overrides
    pub fn load_config(&self) -> chatsense_core::Result<AnalyzerConfig> {
        let mut config = AnalyzerConfig::load_or_default(&self.config)?;
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut AnalyzerConfig) {
        if let Some(workers) = self.workers {
            config.batch.workers = workers;
        }

        if let Some(order) = self.date_order {
            config.parser.ambiguous_date_order = order;
        }
    }
}
