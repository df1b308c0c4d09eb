//! Mock sentiment scorers for testing
//!
//! Configurable implementations of the SentimentScorer trait used to drive
//! the analysis pipeline through its fallback paths: failures, timeouts and
//! out-of-range scores.

use async_trait::async_trait;
use chatsense_analysis::sentiment::{score_messages, SentimentOptions};
use chatsense_analysis::{AnalyzerConfig, ConversationAnalyzer, SentimentScorer};
use chatsense_core::{Error, Message, Result};
use chrono::NaiveDate;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A configurable mock scorer
pub struct MockScorer {
    name: String,
    score: f64,
    simulated_latency: Option<Duration>,
    call_count: AtomicU32,
}

impl MockScorer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            score: 0.0,
            simulated_latency: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Set the score returned for unmarked text
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = Some(latency);
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SentimentScorer for MockScorer {
    async fn score(&self, text: &str) -> Result<f64> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        if let Some(latency) = self.simulated_latency {
            tokio::time::sleep(latency).await;
        }

        // Markers in the text override the configured score
        let score = if text.contains("POSITIVE") {
            0.9
        } else if text.contains("NEGATIVE") {
            -0.9
        } else {
            self.score
        };
        Ok(score)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A scorer that always fails
pub struct FailingScorer {
    name: String,
}

impl FailingScorer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl SentimentScorer for FailingScorer {
    async fn score(&self, _text: &str) -> Result<f64> {
        Err(Error::sentiment("model unavailable"))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn messages(texts: &[&str]) -> Vec<Message> {
    let ts = NaiveDate::from_ymd_opt(2024, 5, 10)
        .unwrap()
        .and_hms_opt(14, 0, 0)
        .unwrap();
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let sender = if i % 2 == 0 { "Alice" } else { "Bob" };
            Message::new(ts, sender, *text)
        })
        .collect()
}

const TRANSCRIPT: &str = "\
[05/10/2024, 14:00:00] Alice: POSITIVE news today
[05/10/2024, 14:01:00] Bob: tell me
[05/10/2024, 14:02:00] Alice: got the job, POSITIVE vibes
05/10/2024, 14:03 - Alice added Carol
";

const SINGLE: &str = "[05/10/2024, 14:00:00] Alice: see you at noon\n";

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_scorer_markers() {
        let scorer = MockScorer::new("mock").with_score(0.2);

        assert_eq!(scorer.score("POSITIVE").await.unwrap(), 0.9);
        assert_eq!(scorer.score("NEGATIVE").await.unwrap(), -0.9);
        assert_eq!(scorer.score("plain").await.unwrap(), 0.2);
        assert_eq!(scorer.call_count(), 3);
    }

    #[tokio::test]
    async fn test_one_call_per_regular_message() {
        let scorer = Arc::new(MockScorer::new("counting"));
        let analyzer =
            ConversationAnalyzer::new(&AnalyzerConfig::default(), scorer.clone()).unwrap();

        let report = analyzer.analyze("news", TRANSCRIPT).await;
        assert_eq!(report.system_messages, 1);
        assert_eq!(scorer.call_count(), 3);
        // (0.9 + 0.0 + 0.9) / 3
        assert!((report.features.average_sentiment - 0.6).abs() < 1e-6);
        assert!(report.classification.fired.contains(&"positive_sentiment"));
    }

    #[tokio::test]
    async fn test_failing_scorer_falls_back_to_neutral() {
        let analyzer = ConversationAnalyzer::new(
            &AnalyzerConfig::default(),
            Arc::new(FailingScorer::new("broken")),
        )
        .unwrap();

        let report = analyzer.analyze("news", TRANSCRIPT).await;
        assert_eq!(report.features.total_messages, 3);
        assert_eq!(report.features.average_sentiment, 0.0);
        assert!(!report.classification.fired.contains(&"positive_sentiment"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_scorer_times_out() {
        let scorer = MockScorer::new("slow")
            .with_score(0.8)
            .with_latency(Duration::from_secs(30));
        let options = SentimentOptions {
            timeout_ms: 100,
            max_concurrency: 4,
        };

        let scores = score_messages(&scorer, &messages(&["a", "b", "c"]), &options).await;
        assert_eq!(scores, vec![0.0, 0.0, 0.0]);
        assert_eq!(scorer.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_within_timeout_is_kept() {
        let scorer = MockScorer::new("sluggish")
            .with_score(0.5)
            .with_latency(Duration::from_millis(50));
        let options = SentimentOptions {
            timeout_ms: 1_000,
            max_concurrency: 1,
        };

        let scores = score_messages(&scorer, &messages(&["a", "NEGATIVE"]), &options).await;
        assert_eq!(scores, vec![0.5, -0.9]);
    }

    #[tokio::test]
    async fn test_out_of_range_scores_sanitized() {
        let options = SentimentOptions::default();

        let loud = MockScorer::new("loud").with_score(5.0);
        let scores = score_messages(&loud, &messages(&["a"]), &options).await;
        assert_eq!(scores, vec![1.0]);

        let broken = MockScorer::new("nan").with_score(f64::NAN);
        let scores = score_messages(&broken, &messages(&["a", "b"]), &options).await;
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_order_preserved_under_concurrency() {
        let scorer = MockScorer::new("ordered");
        let options = SentimentOptions {
            timeout_ms: 1_000,
            max_concurrency: 8,
        };
        let texts = ["POSITIVE", "x", "NEGATIVE", "y", "POSITIVE"];

        let scores = score_messages(&scorer, &messages(&texts), &options).await;
        assert_eq!(scores, vec![0.9, 0.0, -0.9, 0.0, 0.9]);
    }

    #[tokio::test]
    async fn test_sentiment_thresholds_are_strict() {
        for (score, rule) in [(0.3, "positive_sentiment"), (-0.2, "negative_sentiment")] {
            let analyzer = ConversationAnalyzer::new(
                &AnalyzerConfig::default(),
                Arc::new(MockScorer::new("fixed").with_score(score)),
            )
            .unwrap();

            let report = analyzer.analyze("edge", SINGLE).await;
            assert_eq!(report.features.average_sentiment, score);
            assert!(
                !report.classification.fired.contains(&rule),
                "{rule} fired at exactly {score}"
            );
        }
    }

    #[tokio::test]
    async fn test_sentiment_just_past_threshold_fires() {
        let analyzer = ConversationAnalyzer::new(
            &AnalyzerConfig::default(),
            Arc::new(MockScorer::new("fixed").with_score(-0.21)),
        )
        .unwrap();

        let report = analyzer.analyze("edge", SINGLE).await;
        assert!(report.classification.fired.contains(&"negative_sentiment"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_analysis_runs_on_spawned_task() {
        let scorer = Arc::new(MockScorer::new("spawned").with_score(0.5));
        let analyzer = Arc::new(
            ConversationAnalyzer::new(&AnalyzerConfig::default(), scorer.clone()).unwrap(),
        );

        let handle = tokio::spawn({
            let analyzer = Arc::clone(&analyzer);
            async move { analyzer.analyze("spawned", TRANSCRIPT).await }
        });
        let report = handle.await.unwrap();
        assert_eq!(report.features.total_messages, 3);
        assert_eq!(scorer.call_count(), 3);
    }
}
