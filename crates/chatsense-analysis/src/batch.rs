//! Batch analysis over many transcripts
//!
//! Conversations are independent, so each one runs on its own task. A
//! semaphore bounds how many are in flight; results come back in input order.

use crate::pipeline::{ConversationAnalyzer, ConversationReport};
use chatsense_core::{Error, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info};

/// One transcript to analyse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSource {
    pub name: String,
    pub text: String,
}

impl ChatSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a transcript file as UTF-8.
    ///
    /// The source name is the file name without its directory. Undecodable
    /// bytes are a [`Error::Load`], raised here so the analysis never sees
    /// them.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::load(&display, e.to_string()))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| Error::load(&display, format!("invalid utf-8: {e}")))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(display);
        Ok(Self { name, text })
    }
}

/// Fans conversations out over a bounded number of tasks
#[derive(Clone)]
pub struct BatchAnalyzer {
    analyzer: Arc<ConversationAnalyzer>,
    workers: usize,
}

impl BatchAnalyzer {
    pub fn new(analyzer: Arc<ConversationAnalyzer>, workers: usize) -> Self {
        Self {
            analyzer,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Analyse every source; the i-th result belongs to the i-th source.
    ///
    /// A conversation only fails when its task panics.
    pub async fn run(&self, sources: Vec<ChatSource>) -> Vec<Result<ConversationReport>> {
        let total = sources.len();
        info!(conversations = total, workers = self.workers, "Starting batch analysis");

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut handles = Vec::with_capacity(total);

        for (i, source) in sources.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let analyzer = Arc::clone(&self.analyzer);

            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| Error::internal(format!("worker pool closed: {e}")))?;

                let report = analyzer.analyze(&source.name, &source.text).await;
                info!(
                    "[{}/{}] {}: {} ({})",
                    i + 1,
                    total,
                    source.name,
                    report.classification.relationship,
                    report.classification.confidence
                );
                Ok::<_, Error>(report)
            }));
        }

        let mut results = Vec::with_capacity(total);
        for handle in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!("Analysis task panicked: {}", e);
                    Err(Error::internal(format!("analysis task failed: {e}")))
                }
            };
            results.push(result);
        }

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(conversations = total, failed, "Batch analysis finished");
        results
    }
}
