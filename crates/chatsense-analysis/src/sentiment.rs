//! Sentiment capability
//!
//! Polarity scoring is an external capability: anything implementing
//! [`SentimentScorer`] can be plugged in. [`score_messages`] drives a scorer
//! over a conversation with bounded concurrency and a per-call timeout,
//! substituting a neutral 0.0 whenever a call fails or takes too long.
//!
//! [`LexiconSentiment`] is a lightweight fallback used when no external
//! model is wired in.

use aho_corasick::AhoCorasick;
use async_trait::async_trait;
use chatsense_core::{Message, Result};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Polarity scorer returning a value in [-1, 1]
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Score a single message body
    async fn score(&self, text: &str) -> Result<f64>;

    /// Scorer name, used in logs
    fn name(&self) -> &str;
}

/// How a conversation is fanned out to the scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentOptions {
    /// Per-call timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum in-flight calls per conversation
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl SentimentOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for SentimentOptions {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    2_000
}

fn default_max_concurrency() -> usize {
    16
}

/// Score every non-system message, in message order.
///
/// Never fails: errors, timeouts and out-of-range values are replaced by the
/// neutral score 0.0.
pub async fn score_messages(
    scorer: &dyn SentimentScorer,
    messages: &[Message],
    options: &SentimentOptions,
) -> Vec<f64> {
    let futures: Vec<_> = messages
        .iter()
        .filter(|m| !m.is_system)
        .map(|message| score_one(scorer, &message.text, options))
        .collect();

    stream::iter(futures)
        .buffered(options.max_concurrency.max(1))
        .collect()
        .await
}

/// Score a single body, substituting neutral on any failure
async fn score_one(scorer: &dyn SentimentScorer, text: &str, options: &SentimentOptions) -> f64 {
    match tokio::time::timeout(options.timeout(), scorer.score(text)).await {
        Ok(Ok(score)) if score.is_finite() => score.clamp(-1.0, 1.0),
        Ok(Ok(score)) => {
            warn!(scorer = scorer.name(), score, "Non-finite sentiment score, using neutral");
            fallback()
        }
        Ok(Err(e)) => {
            warn!(scorer = scorer.name(), error = %e, "Sentiment scoring failed, using neutral");
            fallback()
        }
        Err(_) => {
            warn!(
                scorer = scorer.name(),
                timeout_ms = options.timeout_ms,
                "Sentiment scoring timed out, using neutral"
            );
            fallback()
        }
    }
}

fn fallback() -> f64 {
    metrics::counter!("chatsense_sentiment_fallbacks_total").increment(1);
    0.0
}

/// Mean of the scores, 0.0 when there are none
pub fn average(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "love",
    "amazing",
    "wonderful",
    "happy",
    "fantastic",
    "awesome",
    "best",
    "thanks",
    "glad",
    "nice",
    "fun",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "terrible",
    "awful",
    "hate",
    "horrible",
    "worst",
    "sad",
    "angry",
    "disappointed",
    "poor",
    "annoying",
    "upset",
    "sorry",
];

const POSITIVE_EMOJI: &[char] = &[
    '😀', '😃', '😄', '😁', '😊', '😍', '🥰', '😘', '😗', '🤗', '🤩', '🥳', '😎', '👍', '👌', '💪',
    '🙌', '👏', '🔥', '💯', '❤', '💕', '💖', '💗',
];

const NEGATIVE_EMOJI: &[char] = &[
    '😢', '😭', '😞', '😔', '😟', '😕', '🙁', '😣', '😖', '😫', '😩', '🥺', '😠', '😡', '🤬', '😤',
    '💔', '👎', '😰', '😨', '😱', '🤮',
];

const NEUTRAL_EMOJI: &[char] = &['😐', '😑', '🤔', '🙄', '😏', '🤷', '💭', '💬'];

const EMOJI_POLARITY: f64 = 0.8;
const TEXT_WEIGHT: f64 = 0.7;
const EMOJI_WEIGHT: f64 = 0.3;

/// Lexicon-based scorer: word polarity blended with emoji polarity
pub struct LexiconSentiment {
    name: String,
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl LexiconSentiment {
    pub fn new() -> Result<Self> {
        Self::with_name("sentiment-lexicon")
    }

    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        let positive = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(POSITIVE_WORDS)
            .map_err(|e| {
                chatsense_core::Error::sentiment(format!(
                    "Failed to build positive sentiment matcher: {e}"
                ))
            })?;

        let negative = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(NEGATIVE_WORDS)
            .map_err(|e| {
                chatsense_core::Error::sentiment(format!(
                    "Failed to build negative sentiment matcher: {e}"
                ))
            })?;

        Ok(Self {
            name: name.into(),
            positive,
            negative,
        })
    }

    /// Word polarity in [-1, 1]; 0.0 when no lexicon word occurs
    fn text_polarity(&self, text: &str) -> f64 {
        let positive = self.positive.find_iter(text).count() as f64;
        let negative = self.negative.find_iter(text).count() as f64;
        let total = positive + negative;
        if total == 0.0 {
            0.0
        } else {
            (positive - negative) / total
        }
    }

    /// Mean polarity of the mapped emoji; 0.0 when none are present
    fn emoji_polarity(text: &str) -> f64 {
        let values: Vec<f64> = text
            .chars()
            .filter_map(|c| {
                if POSITIVE_EMOJI.contains(&c) {
                    Some(EMOJI_POLARITY)
                } else if NEGATIVE_EMOJI.contains(&c) {
                    Some(-EMOJI_POLARITY)
                } else if NEUTRAL_EMOJI.contains(&c) {
                    Some(0.0)
                } else {
                    None
                }
            })
            .collect();

        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    }
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        Self::new().expect("Failed to create lexicon sentiment scorer")
    }
}

#[async_trait]
impl SentimentScorer for LexiconSentiment {
    async fn score(&self, text: &str) -> Result<f64> {
        let combined =
            TEXT_WEIGHT * self.text_polarity(text) + EMOJI_WEIGHT * Self::emoji_polarity(text);
        Ok(combined.clamp(-1.0, 1.0))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
