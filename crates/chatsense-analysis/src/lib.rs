//! ChatSense Analysis
//!
//! Relationship classification for exported chat transcripts.
//!
//! The analysis runs in stages:
//! - Parsing: raw export text into [`Message`](chatsense_core::Message)s, with
//!   multi-line bodies and system notices resolved
//! - Signals: tone and content keyword profiles plus per-message sentiment
//! - Aggregation: one [`AggregateFeatures`] value per conversation
//! - Classification: a weighted indicator table over twelve relationship types
//!
//! Everything after loading is total; malformed input degrades to fewer
//! messages or neutral scores rather than errors.

pub mod batch;
pub mod classifier;
pub mod config;
pub mod content;
pub mod features;
pub mod parser;
pub mod patterns;
pub mod pipeline;
pub mod profiles;
pub mod sentiment;
pub mod tone;

pub use batch::{BatchAnalyzer, ChatSource};
pub use classifier::{classify, ClassificationResult, Indicator, ScoreBoard, INDICATORS};
pub use config::{AnalyzerConfig, BatchConfig};
pub use content::{ContentAnalyzer, ContentProfile};
pub use features::AggregateFeatures;
pub use parser::{ChatParser, DateOrder, ParserConfig};
pub use pipeline::{ConversationAnalyzer, ConversationReport};
pub use profiles::{participant_profiles, InitiationStyle, ParticipantProfile, ResponseStyle};
pub use sentiment::{LexiconSentiment, SentimentOptions, SentimentScorer};
pub use tone::{ToneDetector, ToneProfile};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::batch::{BatchAnalyzer, ChatSource};
    pub use crate::classifier::{classify, ClassificationResult};
    pub use crate::config::AnalyzerConfig;
    pub use crate::features::AggregateFeatures;
    pub use crate::parser::ChatParser;
    pub use crate::pipeline::{ConversationAnalyzer, ConversationReport};
    pub use crate::sentiment::{LexiconSentiment, SentimentScorer};
    pub use chatsense_core::prelude::*;
}
