//! Aggregate feature extraction
//!
//! Folds the parsed messages, the tone/content profiles and the per-message
//! sentiment scores into the single [`AggregateFeatures`] value the
//! classifier consumes.

use crate::content::ContentProfile;
use crate::patterns::percentage;
use crate::sentiment;
use crate::tone::ToneProfile;
use chatsense_core::Message;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything the relationship classifier looks at
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateFeatures {
    /// Non-system message count
    pub total_messages: usize,

    /// Whole days between first and last message, floored, never below 1
    pub duration_days: u64,

    /// `total_messages / duration_days`
    pub messages_per_day: f64,

    /// Distinct non-system senders
    pub participant_count: usize,

    /// Share of messages sent between 23:00 and 05:59 (%)
    pub night_percentage: f64,

    /// Mean sentiment in [-1, 1]
    pub average_sentiment: f64,

    pub tone: ToneProfile,

    pub content: ContentProfile,
}

impl AggregateFeatures {
    /// Build the feature set.
    ///
    /// `sentiment_scores` are the scores of the non-system messages (as
    /// produced by [`sentiment::score_messages`]); only their mean is used.
    pub fn aggregate(
        messages: &[Message],
        tone: ToneProfile,
        content: ContentProfile,
        sentiment_scores: &[f64],
    ) -> Self {
        let regular: Vec<&Message> = messages.iter().filter(|m| !m.is_system).collect();
        let total_messages = regular.len();

        let duration_days = duration_days(&regular);
        let participant_count = regular
            .iter()
            .map(|m| m.sender.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        let night = regular.iter().filter(|m| m.is_night()).count();

        Self {
            total_messages,
            duration_days,
            messages_per_day: total_messages as f64 / duration_days as f64,
            participant_count,
            night_percentage: percentage(night, total_messages),
            average_sentiment: sentiment::average(sentiment_scores),
            tone,
            content,
        }
    }

    /// No non-system messages at all
    pub fn is_empty(&self) -> bool {
        self.total_messages == 0
    }

    /// More than two people talking
    pub fn is_group(&self) -> bool {
        self.participant_count > 2
    }
}

/// Whole days spanned by the messages, at least 1
fn duration_days(messages: &[&Message]) -> u64 {
    let first = messages.iter().map(|m| m.timestamp).min();
    let last = messages.iter().map(|m| m.timestamp).max();

    match (first, last) {
        (Some(first), Some(last)) => {
            let days = (last - first).num_days();
            u64::try_from(days).unwrap_or(0).max(1)
        }
        _ => 1,
    }
}
