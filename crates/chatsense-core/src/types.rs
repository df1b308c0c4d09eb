//! Core types for ChatSense

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sender assigned to administrative notices
pub const SYSTEM_SENDER: &str = "System";

/// Placeholders a chat export writes instead of attached media
const MEDIA_PLACEHOLDERS: &[&str] = &[
    "<Media omitted>",
    "image omitted",
    "video omitted",
    "audio omitted",
    "document omitted",
    "sticker omitted",
    "GIF omitted",
];

/// A single parsed chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// When the message was sent (local time of the export)
    pub timestamp: NaiveDateTime,

    /// Display name of the sender, or [`SYSTEM_SENDER`] for notices
    pub sender: String,

    /// Message body; continuation lines are joined with `\n`
    pub text: String,

    /// Administrative notice (membership change, encryption banner, ...)
    pub is_system: bool,
}

impl Message {
    /// Create a regular participant message
    pub fn new(timestamp: NaiveDateTime, sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            sender: sender.into(),
            text: text.into(),
            is_system: false,
        }
    }

    /// Create a system notice
    pub fn system(timestamp: NaiveDateTime, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            sender: SYSTEM_SENDER.to_string(),
            text: text.into(),
            is_system: true,
        }
    }

    /// Number of whitespace-separated words in the body
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Number of emoji code points in the body
    pub fn emoji_count(&self) -> usize {
        self.text.chars().filter(|c| is_emoji(*c)).count()
    }

    /// Whether the body is a media placeholder
    pub fn is_media(&self) -> bool {
        MEDIA_PLACEHOLDERS.iter().any(|p| self.text.contains(p))
    }

    /// Hour of day (0-23)
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Sent between 23:00 and 05:59
    pub fn is_night(&self) -> bool {
        let hour = self.hour();
        hour >= 23 || hour < 6
    }
}

/// Whether a code point falls in the pictographic emoji ranges
pub fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F300..=0x1F5FF   // symbols & pictographs
            | 0x1F600..=0x1F64F // emoticons
            | 0x1F680..=0x1F6FF // transport & map
            | 0x1F900..=0x1F9FF // supplemental symbols
            | 0x1FA70..=0x1FAFF // symbols & pictographs extended-A
            | 0x1F1E6..=0x1F1FF // regional indicators
            | 0x2600..=0x26FF   // misc symbols
            | 0x2700..=0x27BF   // dingbats
            | 0x231A..=0x231B
            | 0x23E9..=0x23F3
            | 0x2B50
            | 0x2B55
    )
}

/// Relationship category. Declaration order is the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    RomanticDating,
    RomanticEstablished,
    CloseFriends,
    CasualFriends,
    FamilySibling,
    FamilyParent,
    Colleagues,
    WorkProfessional,
    BossSubordinate,
    Acquaintances,
    EnemyConflict,
    NewAcquaintance,
}

impl RelationshipType {
    /// Number of categories
    pub const COUNT: usize = 12;

    /// All categories in declaration order
    pub const ALL: [RelationshipType; Self::COUNT] = [
        Self::RomanticDating,
        Self::RomanticEstablished,
        Self::CloseFriends,
        Self::CasualFriends,
        Self::FamilySibling,
        Self::FamilyParent,
        Self::Colleagues,
        Self::WorkProfessional,
        Self::BossSubordinate,
        Self::Acquaintances,
        Self::EnemyConflict,
        Self::NewAcquaintance,
    ];

    /// Position in [`RelationshipType::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable machine-readable key
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RomanticDating => "romantic_dating",
            Self::RomanticEstablished => "romantic_established",
            Self::CloseFriends => "close_friends",
            Self::CasualFriends => "casual_friends",
            Self::FamilySibling => "family_sibling",
            Self::FamilyParent => "family_parent",
            Self::Colleagues => "colleagues",
            Self::WorkProfessional => "work_professional",
            Self::BossSubordinate => "boss_subordinate",
            Self::Acquaintances => "acquaintances",
            Self::EnemyConflict => "enemy_conflict",
            Self::NewAcquaintance => "new_acquaintance",
        }
    }

    /// Human-readable label for reports
    pub fn label(self) -> &'static str {
        match self {
            Self::RomanticDating => "Romantic/Dating (New)",
            Self::RomanticEstablished => "Romantic/Dating (Established)",
            Self::CloseFriends => "Close Friends",
            Self::CasualFriends => "Casual Friends",
            Self::FamilySibling => "Family - Siblings",
            Self::FamilyParent => "Family - Parent/Child",
            Self::Colleagues => "Colleagues",
            Self::WorkProfessional => "Professional/Work Relationship",
            Self::BossSubordinate => "Boss/Subordinate",
            Self::Acquaintances => "Acquaintances",
            Self::EnemyConflict => "Conflicted/Adversarial",
            Self::NewAcquaintance => "New Acquaintance",
        }
    }

    /// Whether this is one of the romantic categories
    pub fn is_romantic(self) -> bool {
        matches!(self, Self::RomanticDating | Self::RomanticEstablished)
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("unknown relationship type: {s}"))
    }
}

/// Coarse confidence bucket for the winning score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl ConfidenceLevel {
    /// Bucket a winning score: >120 very high, >80 high, >50 moderate
    pub fn from_score(score: i32) -> Self {
        if score > 120 {
            Self::VeryHigh
        } else if score > 80 {
            Self::High
        } else if score > 50 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
