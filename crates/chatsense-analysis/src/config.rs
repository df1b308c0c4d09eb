//! Analyzer configuration

use crate::parser::ParserConfig;
use crate::sentiment::SentimentOptions;
use chatsense_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Top-level configuration, usually loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Transcript parsing
    #[serde(default)]
    pub parser: ParserConfig,

    /// Sentiment fan-out
    #[serde(default)]
    pub sentiment: SentimentOptions,

    /// Batch execution
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Batch execution settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Conversations analysed concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

fn default_workers() -> usize {
    num_cpus::get()
}

impl AnalyzerConfig {
    /// Parse from a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load from a YAML file, falling back to defaults when it does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Reject values the analyzer cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.batch.workers == 0 {
            return Err(Error::config("batch.workers must be at least 1"));
        }
        if self.sentiment.max_concurrency == 0 {
            return Err(Error::config("sentiment.max_concurrency must be at least 1"));
        }
        if self.sentiment.timeout_ms == 0 {
            return Err(Error::config("sentiment.timeout_ms must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::DateOrder;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.parser.ambiguous_date_order, DateOrder::MonthFirst);
        assert_eq!(config.sentiment.timeout_ms, 2000);
        assert_eq!(config.sentiment.max_concurrency, 16);
        assert_eq!(config.batch.workers, num_cpus::get());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
parser:
  ambiguous_date_order: day_first
sentiment:
  timeout_ms: 500
"#;
        let config = AnalyzerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.parser.ambiguous_date_order, DateOrder::DayFirst);
        assert_eq!(config.sentiment.timeout_ms, 500);
        assert_eq!(config.sentiment.max_concurrency, 16);
        assert_eq!(config.batch.workers, num_cpus::get());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AnalyzerConfig::from_yaml("batch:\n  workers: 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = AnalyzerConfig::from_yaml("parser:\n  ambiguous_date_order: sideways\n")
            .unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "batch:\n  workers: 3").unwrap();

        let config = AnalyzerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.batch.workers, 3);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalyzerConfig::load_or_default(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, AnalyzerConfig::default());
    }
}
