//! Per-conversation analysis pipeline
//!
//! Raw transcript text goes in, a [`ConversationReport`] comes out:
//!
//! ```text
//! parse -> tone + content + sentiment -> aggregate -> classify
//!                                     \-> participant profiles
//! ```
//!
//! Every stage is total, so [`ConversationAnalyzer::analyze`] never fails.

use crate::classifier::{self, ClassificationResult};
use crate::config::AnalyzerConfig;
use crate::content::ContentAnalyzer;
use crate::features::AggregateFeatures;
use crate::parser::ChatParser;
use crate::profiles::{participant_profiles, ParticipantProfile};
use crate::sentiment::{self, LexiconSentiment, SentimentOptions, SentimentScorer};
use crate::tone::ToneDetector;
use chatsense_core::{Message, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Everything learned about one conversation
#[derive(Debug, Clone, Serialize)]
pub struct ConversationReport {
    /// Source name, usually the file name
    pub name: String,

    /// Distinct non-system senders, sorted
    pub participants: Vec<String>,

    /// Parsed messages including system notices
    pub messages: usize,

    pub system_messages: usize,

    pub features: AggregateFeatures,

    pub classification: ClassificationResult,

    pub profiles: BTreeMap<String, ParticipantProfile>,

    /// Wall-clock analysis time in microseconds
    pub latency_us: u64,
}

/// Runs the full analysis for one transcript at a time.
///
/// Cheap to share behind an [`Arc`]; holds no per-conversation state.
pub struct ConversationAnalyzer {
    parser: ChatParser,
    tone: ToneDetector,
    content: ContentAnalyzer,
    scorer: Arc<dyn SentimentScorer>,
    sentiment: SentimentOptions,
}

impl ConversationAnalyzer {
    /// Build an analyzer around the given sentiment capability
    pub fn new(config: &AnalyzerConfig, scorer: Arc<dyn SentimentScorer>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parser: ChatParser::new(config.parser)?,
            tone: ToneDetector::new()?,
            content: ContentAnalyzer::new()?,
            scorer,
            sentiment: config.sentiment,
        })
    }

    /// Build an analyzer that uses [`LexiconSentiment`]
    pub fn with_lexicon(config: &AnalyzerConfig) -> Result<Self> {
        Self::new(config, Arc::new(LexiconSentiment::new()?))
    }

    pub fn parser(&self) -> &ChatParser {
        &self.parser
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Analyse one raw transcript
    pub async fn analyze(&self, name: &str, raw: &str) -> ConversationReport {
        let start = Instant::now();

        let messages = self.parser.parse(raw);
        debug!(conversation = name, messages = messages.len(), "Parsed transcript");

        let report = self.analyze_messages(name, &messages).await;

        let latency = start.elapsed();
        metrics::counter!("chatsense_conversations_analyzed_total").increment(1);
        metrics::counter!("chatsense_messages_parsed_total").increment(messages.len() as u64);
        metrics::histogram!("chatsense_analysis_latency_us").record(latency.as_micros() as f64);

        ConversationReport {
            latency_us: latency.as_micros() as u64,
            ..report
        }
    }

    /// Analyse an already-parsed message list
    pub async fn analyze_messages(&self, name: &str, messages: &[Message]) -> ConversationReport {
        let start = Instant::now();

        let scores = sentiment::score_messages(self.scorer.as_ref(), messages, &self.sentiment).await;
        let tone = self.tone.detect(messages);
        let content = self.content.analyze(messages);
        debug!(
            conversation = name,
            scored = scores.len(),
            casual = tone.casual,
            insult = tone.insult,
            work_keywords = content.work_keywords,
            "Extracted signals"
        );

        let features = AggregateFeatures::aggregate(messages, tone, content, &scores);
        let classification = classifier::classify(&features);
        debug!(
            conversation = name,
            relationship = %classification.relationship,
            score = classification.score,
            confidence = %classification.confidence,
            "Classified conversation"
        );

        let participants = messages
            .iter()
            .filter(|m| !m.is_system)
            .map(|m| m.sender.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        ConversationReport {
            name: name.to_string(),
            participants,
            messages: messages.len(),
            system_messages: messages.iter().filter(|m| m.is_system).count(),
            features,
            classification,
            profiles: participant_profiles(messages),
            latency_us: start.elapsed().as_micros() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatsense_core::RelationshipType;

    const TRANSCRIPT: &str = "\
[01/02/2024, 09:15:00] Alice: lol morning
[01/02/2024, 09:16:10] Bob: haha hey
continued line
01/02/2024, 10:00 - Carol joined using this group's invite link
";

    #[tokio::test]
    async fn test_analyze_counts() {
        let analyzer = ConversationAnalyzer::with_lexicon(&AnalyzerConfig::default()).unwrap();
        let report = analyzer.analyze("sample", TRANSCRIPT).await;

        assert_eq!(report.name, "sample");
        assert_eq!(report.messages, 3);
        assert_eq!(report.system_messages, 1);
        assert_eq!(report.participants, vec!["Alice", "Bob"]);
        assert_eq!(report.features.total_messages, 2);
        assert_eq!(report.profiles.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_transcript() {
        let analyzer = ConversationAnalyzer::with_lexicon(&AnalyzerConfig::default()).unwrap();
        let report = analyzer.analyze("empty", "").await;

        assert_eq!(report.messages, 0);
        assert!(report.participants.is_empty());
        assert_eq!(report.classification.relationship, RelationshipType::Acquaintances);
        assert_eq!(report.classification.score, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AnalyzerConfig::default();
        config.sentiment.max_concurrency = 0;
        assert!(ConversationAnalyzer::with_lexicon(&config).is_err());
    }
}
