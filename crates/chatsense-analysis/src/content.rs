//! Content signals: life planning, shared parents, work density and the
//! report-only planning/affection signals.

use crate::patterns::KeywordSet;
use chatsense_core::{Error, Message, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

const LIFE_PLANNING: &[&str] = &[
    "marry",
    "marriage",
    "wedding",
    "engaged",
    "engagement",
    "kids",
    "children",
    "baby",
    "pregnant",
    "family planning",
    "our future",
    "grow old",
    "forever",
    "rest of my life",
    "spend life",
    "life together",
    "till death",
];

const SHARED_PARENT: &[&str] = &[
    "our mom",
    "our dad",
    "our mother",
    "our father",
    "our parents",
    "mom said",
    "dad said",
    "mom told",
    "dad told",
    "mom wants",
    "dad wants",
    "mom is",
    "dad is",
    "home",
    "at home",
    "back home",
];

const WORK: &[&str] = &[
    "meeting",
    "project",
    "deadline",
    "office",
    "work",
    "client",
    "presentation",
    "report",
];

const LIVING_TOGETHER: &[&str] = &[
    "move in",
    "live together",
    "our place",
    "our apartment",
    "our house",
    "buy house",
    "rent apartment",
    "moving in",
    "roommate",
    "flatmate",
    "place together",
];

const BUSINESS: &[&str] = &[
    "startup",
    "our company",
    "business plan",
    "co-founder",
    "partnership",
    "business together",
    "our business",
    "investment",
    "funding",
    "venture",
    "entrepreneur",
];

const TRAVEL: &[&str] = &[
    "travel together",
    "trip together",
    "vacation together",
    "visit",
    "go to",
    "let's go",
    "lets go",
    "plan trip",
    "honeymoon",
    "backpack",
    "travel plan",
];

/// Whole-word greetings, so "gm" alone counts but "pgm" does not
const GREETINGS: &str = r"(?i)\b(?:good\s*morning|good\s*night|gm|gn)\b";

const AFFECTION: &[&str] = &["miss", "love", "beautiful", "cute", "babe", "baby", "dear"];

/// Content signals for one conversation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentProfile {
    /// Messages mentioning marriage, kids, a shared future (%)
    pub life_planning: f64,

    /// Messages referring to parents the participants share (%)
    pub shared_parent: f64,

    /// Raw count of work keyword occurrences, not a percentage
    pub work_keywords: usize,

    /// Messages about moving in or living together (%)
    #[serde(default)]
    pub living_together: f64,

    /// Messages about a shared business venture (%)
    #[serde(default)]
    pub business_planning: f64,

    /// Messages about travelling together (%)
    #[serde(default)]
    pub travel_planning: f64,

    /// Messages containing a morning/night greeting
    #[serde(default)]
    pub greetings: usize,

    /// Messages containing affectionate language
    #[serde(default)]
    pub affection: usize,
}

/// Keyword-based content analyzer
#[derive(Debug, Clone)]
pub struct ContentAnalyzer {
    life_planning: KeywordSet,
    shared_parent: KeywordSet,
    work: KeywordSet,
    living_together: KeywordSet,
    business: KeywordSet,
    travel: KeywordSet,
    greetings: Regex,
    affection: KeywordSet,
}

impl ContentAnalyzer {
    /// Create an analyzer with the built-in keyword lists
    pub fn new() -> Result<Self> {
        Ok(Self {
            life_planning: KeywordSet::new("life_planning", LIFE_PLANNING)?,
            shared_parent: KeywordSet::new("shared_parent", SHARED_PARENT)?,
            work: KeywordSet::new("work", WORK)?,
            living_together: KeywordSet::new("living_together", LIVING_TOGETHER)?,
            business: KeywordSet::new("business", BUSINESS)?,
            travel: KeywordSet::new("travel", TRAVEL)?,
            greetings: Regex::new(GREETINGS).map_err(|e| {
                Error::internal(format!("Failed to compile greeting pattern: {e}"))
            })?,
            affection: KeywordSet::new("affection", AFFECTION)?,
        })
    }

    /// Compute the content profile over non-system messages.
    ///
    /// Percentages count a message at most once; the work signal counts every
    /// keyword occurrence so it scales with density rather than message count.
    pub fn analyze(&self, messages: &[Message]) -> ContentProfile {
        ContentProfile {
            life_planning: self.life_planning.presence_percentage(messages),
            shared_parent: self.shared_parent.presence_percentage(messages),
            work_keywords: self.work.total_occurrences(messages),
            living_together: self.living_together.presence_percentage(messages),
            business_planning: self.business.presence_percentage(messages),
            travel_planning: self.travel.presence_percentage(messages),
            greetings: messages
                .iter()
                .filter(|m| !m.is_system && self.greetings.is_match(&m.text))
                .count(),
            affection: self.affection.matching_messages(messages),
        }
    }
}

impl Default for ContentAnalyzer {
    fn default() -> Self {
        Self::new().expect("Failed to create content analyzer")
    }
}
