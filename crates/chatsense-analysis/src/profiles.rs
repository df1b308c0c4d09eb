//! Per-participant behaviour profiles
//!
//! These are inputs for the report layer's personality blurbs; they do not
//! feed the classifier.

use chatsense_core::Message;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Replies slower than this are not counted as responses
const MAX_RESPONSE_MINUTES: f64 = 24.0 * 60.0;

/// Silence after which the next message opens a new conversation
const CONVERSATION_GAP_HOURS: f64 = 6.0;

/// How quickly someone answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStyle {
    /// Mean response under 30 minutes
    Quick,
    /// Mean response under 2 hours
    Prompt,
    Relaxed,
    /// Never answered anyone
    Unknown,
}

impl ResponseStyle {
    pub fn from_mean_minutes(mean: Option<f64>) -> Self {
        match mean {
            Some(m) if m < 30.0 => Self::Quick,
            Some(m) if m < 120.0 => Self::Prompt,
            Some(_) => Self::Relaxed,
            None => Self::Unknown,
        }
    }
}

/// How often someone opens a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitiationStyle {
    /// Opens more than 60% of conversations
    Proactive,
    /// Opens 40-60%
    Balanced,
    Reactive,
    Unknown,
}

impl InitiationStyle {
    pub fn from_ratio(ratio: Option<f64>) -> Self {
        match ratio {
            Some(r) if r > 0.6 => Self::Proactive,
            Some(r) if r > 0.4 => Self::Balanced,
            Some(_) => Self::Reactive,
            None => Self::Unknown,
        }
    }
}

/// Behaviour summary for one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantProfile {
    pub message_count: usize,
    pub average_words: f64,
    pub emoji_per_message: f64,
    pub media_messages: usize,
    pub mean_response_minutes: Option<f64>,
    pub conversation_starts: usize,
    pub response_style: ResponseStyle,
    pub initiation_style: InitiationStyle,
}

#[derive(Default)]
struct Volume {
    messages: usize,
    words: usize,
    emoji: usize,
    media: usize,
}

/// Build a profile for every non-system sender, keyed by name.
pub fn participant_profiles(messages: &[Message]) -> BTreeMap<String, ParticipantProfile> {
    let mut counts: BTreeMap<&str, Volume> = BTreeMap::new();
    for message in messages.iter().filter(|m| !m.is_system) {
        let volume = counts.entry(message.sender.as_str()).or_default();
        volume.messages += 1;
        volume.words += message.word_count();
        volume.emoji += message.emoji_count();
        volume.media += usize::from(message.is_media());
    }

    // Adjacent pairs in export order; a notice on either side breaks the pair
    let mut responses: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for pair in messages.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);
        if prev.is_system || current.is_system || prev.sender == current.sender {
            continue;
        }
        let minutes = (current.timestamp - prev.timestamp).num_seconds() as f64 / 60.0;
        if minutes < MAX_RESPONSE_MINUTES {
            responses
                .entry(current.sender.as_str())
                .or_default()
                .push(minutes);
        }
    }

    let mut ordered: Vec<&Message> = messages.iter().filter(|m| !m.is_system).collect();
    ordered.sort_by_key(|m| m.timestamp);

    let mut starts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut previous: Option<NaiveDateTime> = None;
    for message in ordered {
        let opens = match previous {
            None => true,
            Some(prev) => {
                let gap_hours = (message.timestamp - prev).num_seconds() as f64 / 3600.0;
                gap_hours > CONVERSATION_GAP_HOURS
            }
        };
        if opens {
            *starts.entry(message.sender.as_str()).or_default() += 1;
        }
        previous = Some(message.timestamp);
    }
    let total_starts: usize = starts.values().sum();

    counts
        .into_iter()
        .map(|(sender, volume)| {
            let mean_response_minutes = responses
                .get(sender)
                .filter(|times| !times.is_empty())
                .map(|times| times.iter().sum::<f64>() / times.len() as f64);
            let conversation_starts = starts.get(sender).copied().unwrap_or(0);
            let ratio = (total_starts > 0)
                .then(|| conversation_starts as f64 / total_starts as f64);

            let per_message = |n: usize| n as f64 / volume.messages as f64;
            let profile = ParticipantProfile {
                message_count: volume.messages,
                average_words: per_message(volume.words),
                emoji_per_message: per_message(volume.emoji),
                media_messages: volume.media,
                mean_response_minutes,
                conversation_starts,
                response_style: ResponseStyle::from_mean_minutes(mean_response_minutes),
                initiation_style: InitiationStyle::from_ratio(ratio),
            };
            (sender.to_string(), profile)
        })
        .collect()
}
