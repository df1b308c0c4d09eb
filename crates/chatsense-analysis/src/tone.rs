//! Conversational tone detection
//!
//! Five keyword categories, each reported as the share of non-system
//! messages that contain at least one keyword of the category. Categories
//! overlap, so the percentages do not sum to 100.

use crate::patterns::KeywordSet;
use chatsense_core::{Message, Result};
use serde::{Deserialize, Serialize};

const CASUAL: &[&str] = &[
    "bro", "dude", "bruh", "man", "lol", "lmao", "lmfao", "haha", "buddy", "mate", "homie", "dawg",
    "fam", "yo", "sup", "wassup", "yeet", "lit", "sick", "dope", "fire", "based", "cringe",
];

const FORMAL: &[&str] = &[
    "please",
    "thank you",
    "thanks",
    "sir",
    "madam",
    "appreciate",
    "regards",
    "kindly",
    "could you",
    "would you",
    "excuse me",
];

const PLAYFUL: &[&str] = &["loser", "idiot", "dummy", "nerd", "weirdo", "crazy", "insane"];

const INSULT: &[&str] = &[
    "stupid", "dumb", "idiot", "moron", "fool", "shut up", "stfu", "fuck you", "fuck off",
    "piss off", "asshole", "bastard", "bitch", "wtf", "tf", "hell", "damn", "shit", "crap", "sucks",
    "loser", "pathetic", "useless", "waste", "trash",
];

const ROASTING: &[&str] = &[
    "you suck",
    "ur dumb",
    "youre dumb",
    "you're dumb",
    "ur stupid",
    "youre stupid",
    "you're stupid",
    "shut up",
    "stfu",
    "get lost",
    "gtfo",
    "ur trash",
    "youre trash",
    "you're trash",
    "kys",
    "kill yourself",
    "die",
    "ded",
];

/// Per-category keyword presence, each in [0, 100]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ToneProfile {
    pub casual: f64,
    pub formal: f64,
    pub playful: f64,
    pub insult: f64,
    pub roasting: f64,
}

/// Keyword-presence tone detector
#[derive(Debug, Clone)]
pub struct ToneDetector {
    casual: KeywordSet,
    formal: KeywordSet,
    playful: KeywordSet,
    insult: KeywordSet,
    roasting: KeywordSet,
}

impl ToneDetector {
    /// Create a detector with the built-in keyword lists
    pub fn new() -> Result<Self> {
        Ok(Self {
            casual: KeywordSet::new("casual", CASUAL)?,
            formal: KeywordSet::new("formal", FORMAL)?,
            playful: KeywordSet::new("playful", PLAYFUL)?,
            insult: KeywordSet::new("insult", INSULT)?,
            roasting: KeywordSet::new("roasting", ROASTING)?,
        })
    }

    /// Compute the tone profile. System messages are ignored; an empty
    /// conversation yields all zeros.
    pub fn detect(&self, messages: &[Message]) -> ToneProfile {
        ToneProfile {
            casual: self.casual.presence_percentage(messages),
            formal: self.formal.presence_percentage(messages),
            playful: self.playful.presence_percentage(messages),
            insult: self.insult.presence_percentage(messages),
            roasting: self.roasting.presence_percentage(messages),
        }
    }
}

impl Default for ToneDetector {
    fn default() -> Self {
        Self::new().expect("Failed to create tone detector")
    }
}
