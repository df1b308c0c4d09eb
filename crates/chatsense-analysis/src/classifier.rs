//! Weighted relationship classifier
//!
//! An ordered table of [`Indicator`]s is applied to an
//! [`AggregateFeatures`] value. Every indicator whose condition holds adds
//! its signed weights to the per-category scores; scores are never clamped,
//! so a later penalty can push a category below zero. The highest score wins,
//! ties going to the category declared first in [`RelationshipType`].

use crate::features::AggregateFeatures;
use chatsense_core::{ConfidenceLevel, RelationshipType};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::ops::Index;

use RelationshipType::*;

/// One conditional scoring rule
pub struct Indicator {
    /// Stable identifier, reported in [`ClassificationResult::fired`]
    pub name: &'static str,
    pub condition: fn(&AggregateFeatures) -> bool,
    pub effects: &'static [(RelationshipType, i32)],
}

impl Indicator {
    pub fn applies(&self, features: &AggregateFeatures) -> bool {
        (self.condition)(features)
    }
}

impl std::fmt::Debug for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Indicator")
            .field("name", &self.name)
            .field("effects", &self.effects)
            .finish()
    }
}

/// The rule table, in application order
pub static INDICATORS: &[Indicator] = &[
    Indicator {
        name: "frequency_very_high",
        condition: |f| f.messages_per_day > 100.0,
        effects: &[(RomanticDating, 30), (CloseFriends, 20)],
    },
    Indicator {
        name: "frequency_high",
        condition: |f| f.messages_per_day > 50.0 && f.messages_per_day <= 100.0,
        effects: &[(RomanticDating, 20), (CloseFriends, 25)],
    },
    Indicator {
        name: "frequency_moderate",
        condition: |f| f.messages_per_day > 20.0 && f.messages_per_day <= 50.0,
        effects: &[(CloseFriends, 20), (CasualFriends, 15)],
    },
    Indicator {
        name: "frequency_low",
        condition: |f| f.messages_per_day > 5.0 && f.messages_per_day <= 20.0,
        effects: &[(CasualFriends, 20), (Colleagues, 15)],
    },
    Indicator {
        name: "frequency_sparse",
        condition: |f| f.messages_per_day <= 5.0,
        effects: &[(Acquaintances, 20)],
    },
    Indicator {
        name: "short_and_intense",
        condition: |f| f.duration_days < 30 && f.messages_per_day > 50.0,
        effects: &[(RomanticDating, 20)],
    },
    Indicator {
        name: "long_lived",
        condition: |f| f.duration_days > 365,
        effects: &[(CloseFriends, 15), (FamilySibling, 10)],
    },
    Indicator {
        name: "casual_tone",
        condition: |f| f.tone.casual > 25.0,
        effects: &[(CloseFriends, 25), (RomanticDating, -10)],
    },
    Indicator {
        name: "formal_tone",
        condition: |f| f.tone.formal > 15.0,
        effects: &[(Colleagues, 25), (WorkProfessional, 20), (RomanticDating, -15)],
    },
    Indicator {
        name: "roasting",
        condition: |f| f.tone.roasting > 2.0,
        effects: &[(CloseFriends, 20), (RomanticDating, -15)],
    },
    Indicator {
        name: "insults",
        condition: |f| f.tone.insult > 5.0,
        effects: &[(EnemyConflict, 40), (RomanticDating, -30)],
    },
    Indicator {
        name: "positive_sentiment",
        condition: |f| f.average_sentiment > 0.3,
        effects: &[(RomanticDating, 15), (CloseFriends, 10)],
    },
    Indicator {
        name: "negative_sentiment",
        condition: |f| f.average_sentiment < -0.2,
        effects: &[(EnemyConflict, 25)],
    },
    Indicator {
        name: "life_planning",
        condition: |f| f.content.life_planning > 1.0,
        effects: &[(RomanticDating, 30), (RomanticEstablished, 25)],
    },
    Indicator {
        name: "shared_parents",
        condition: |f| f.content.shared_parent > 2.0,
        effects: &[(FamilySibling, 40), (RomanticDating, -30)],
    },
    Indicator {
        name: "work_density",
        condition: |f| f.content.work_keywords > 20,
        effects: &[(Colleagues, 20), (WorkProfessional, 15)],
    },
    Indicator {
        name: "group_chat",
        condition: |f| f.participant_count > 2,
        effects: &[(CloseFriends, 30), (RomanticDating, -50), (RomanticEstablished, -50)],
    },
    Indicator {
        name: "one_on_one",
        condition: |f| f.participant_count <= 2,
        effects: &[(RomanticDating, 10), (CloseFriends, 10)],
    },
    Indicator {
        name: "night_messaging",
        condition: |f| f.night_percentage > 20.0,
        effects: &[(RomanticDating, 15), (CloseFriends, 10)],
    },
];

/// Fixed-size score map with one slot per [`RelationshipType`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    scores: [i32; RelationshipType::COUNT],
}

impl ScoreBoard {
    /// All twelve categories at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, relationship: RelationshipType, delta: i32) {
        self.scores[relationship.index()] += delta;
    }

    pub fn get(&self, relationship: RelationshipType) -> i32 {
        self.scores[relationship.index()]
    }

    /// Always twelve
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Categories with their scores, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (RelationshipType, i32)> + '_ {
        RelationshipType::ALL
            .iter()
            .map(move |ty| (*ty, self.scores[ty.index()]))
    }

    /// Highest score; the first declared category wins a tie
    pub fn winner(&self) -> (RelationshipType, i32) {
        let mut best = (RelationshipType::ALL[0], self.scores[0]);
        for (ty, score) in self.iter().skip(1) {
            if score > best.1 {
                best = (ty, score);
            }
        }
        best
    }

    /// All categories sorted by descending score, ties in declaration order
    pub fn ranked(&self) -> Vec<(RelationshipType, i32)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

impl Index<RelationshipType> for ScoreBoard {
    type Output = i32;

    fn index(&self, relationship: RelationshipType) -> &i32 {
        &self.scores[relationship.index()]
    }
}

impl Serialize for ScoreBoard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (ty, score) in self.iter() {
            map.serialize_entry(ty.as_str(), &score)?;
        }
        map.end()
    }
}

/// Outcome of classifying one conversation
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ClassificationResult {
    pub relationship: RelationshipType,

    /// Winning score
    pub score: i32,

    pub confidence: ConfidenceLevel,

    /// Every category's final score
    pub scores: ScoreBoard,

    /// Names of the indicators that applied, in order
    pub fired: Vec<&'static str>,
}

impl ClassificationResult {
    /// Result for a conversation with no usable messages
    pub fn degenerate() -> Self {
        Self {
            relationship: RelationshipType::Acquaintances,
            score: 0,
            confidence: ConfidenceLevel::Low,
            scores: ScoreBoard::new(),
            fired: Vec::new(),
        }
    }

    /// The `n` best categories
    pub fn top(&self, n: usize) -> Vec<(RelationshipType, i32)> {
        let mut ranked = self.scores.ranked();
        ranked.truncate(n);
        ranked
    }

    /// Gap between the winner and the runner-up
    pub fn margin(&self) -> i32 {
        match self.top(2).as_slice() {
            [first, second] => first.1 - second.1,
            _ => 0,
        }
    }
}

/// Apply the indicator table to a feature set.
///
/// Pure and total: no I/O, and a conversation without non-system messages
/// yields [`ClassificationResult::degenerate`].
pub fn classify(features: &AggregateFeatures) -> ClassificationResult {
    classify_with(INDICATORS, features)
}

/// Apply a custom indicator table
pub fn classify_with(indicators: &[Indicator], features: &AggregateFeatures) -> ClassificationResult {
    if features.is_empty() {
        return ClassificationResult::degenerate();
    }

    let mut scores = ScoreBoard::new();
    let mut fired = Vec::new();
    for indicator in indicators {
        if !indicator.applies(features) {
            continue;
        }
        for (relationship, weight) in indicator.effects {
            scores.add(*relationship, *weight);
        }
        fired.push(indicator.name);
    }

    let (relationship, score) = scores.winner();
    ClassificationResult {
        relationship,
        score,
        confidence: ConfidenceLevel::from_score(score),
        scores,
        fired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentProfile;
    use crate::tone::ToneProfile;

    fn features(messages_per_day: f64, duration_days: u64, participants: usize) -> AggregateFeatures {
        AggregateFeatures {
            total_messages: (messages_per_day * duration_days as f64).round().max(1.0) as usize,
            duration_days,
            messages_per_day,
            participant_count: participants,
            night_percentage: 0.0,
            average_sentiment: 0.0,
            tone: ToneProfile::default(),
            content: ContentProfile::default(),
        }
    }

    #[test]
    fn test_empty_is_degenerate() {
        let result = classify(&AggregateFeatures::default());
        assert_eq!(result.relationship, RelationshipType::Acquaintances);
        assert_eq!(result.score, 0);
        assert_eq!(result.confidence, ConfidenceLevel::Low);
        assert_eq!(result.scores, ScoreBoard::new());
        assert!(result.fired.is_empty());
    }

    #[test]
    fn test_score_board_always_twelve() {
        let result = classify(&features(10.0, 20, 2));
        assert_eq!(result.scores.len(), 12);
        assert_eq!(result.scores.iter().count(), 12);
    }

    #[test]
    fn test_tie_break_prefers_declaration_order() {
        let mut board = ScoreBoard::new();
        board.add(Colleagues, 40);
        board.add(CloseFriends, 40);
        assert_eq!(board.winner(), (CloseFriends, 40));

        // all zero: first category
        assert_eq!(ScoreBoard::new().winner(), (RomanticDating, 0));
    }

    #[test]
    fn test_scores_can_go_negative() {
        let mut f = features(10.0, 20, 3);
        f.tone.insult = 10.0;
        let result = classify(&f);
        assert_eq!(result.scores[RomanticDating], -80);
        assert_eq!(result.scores[RomanticEstablished], -50);
    }

    #[test]
    fn test_frequency_tiers_are_exclusive() {
        for rate in [0.5, 5.0, 5.1, 20.0, 20.5, 50.0, 50.5, 100.0, 100.5, 400.0] {
            let result = classify(&features(rate, 40, 2));
            let tiers = result
                .fired
                .iter()
                .filter(|name| name.starts_with("frequency_"))
                .count();
            assert_eq!(tiers, 1, "rate {rate} fired {:?}", result.fired);
        }
    }

    #[test]
    fn test_short_and_intense() {
        let result = classify(&features(60.0, 10, 2));
        assert!(result.fired.contains(&"short_and_intense"));
        // tier 2 (20) + short/intense (20) + dyad (10)
        assert_eq!(result.scores[RomanticDating], 50);

        let result = classify(&features(60.0, 30, 2));
        assert!(!result.fired.contains(&"short_and_intense"));
    }

    #[test]
    fn test_long_lived() {
        let result = classify(&features(3.0, 400, 2));
        assert_eq!(result.scores[FamilySibling], 10);
        assert!(result.fired.contains(&"long_lived"));
    }

    #[test]
    fn test_work_density_uses_raw_count() {
        let mut f = features(10.0, 20, 2);
        f.content.work_keywords = 21;
        f.tone.formal = 20.0;
        let result = classify(&f);
        // tier 4 (15) + formal (25) + work (20)
        assert_eq!(result.scores[Colleagues], 60);
        assert_eq!(result.scores[WorkProfessional], 35);
        assert_eq!(result.relationship, Colleagues);
        assert_eq!(result.confidence, ConfidenceLevel::Moderate);
    }

    #[test]
    fn test_life_planning_boosts_both_romantic_types() {
        let mut f = features(30.0, 100, 2);
        f.content.life_planning = 1.5;
        let result = classify(&f);
        assert_eq!(result.scores[RomanticDating], 40);
        assert_eq!(result.scores[RomanticEstablished], 25);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let mut f = features(10.0, 20, 2);
        f.tone.casual = 25.0;
        f.tone.formal = 15.0;
        f.tone.roasting = 2.0;
        f.tone.insult = 5.0;
        f.average_sentiment = 0.3;
        f.content.life_planning = 1.0;
        f.content.shared_parent = 2.0;
        f.content.work_keywords = 20;
        f.night_percentage = 20.0;
        let result = classify(&f);
        assert_eq!(result.fired, vec!["frequency_low", "one_on_one"]);
    }

    #[test]
    fn test_confidence_follows_winning_score() {
        let mut f = features(150.0, 10, 2);
        f.tone.casual = 30.0;
        f.average_sentiment = 0.5;
        f.night_percentage = 40.0;
        let result = classify(&f);
        // 20 + 25 + 10 + 10 + 10 = 75 close friends; 30 + 20 - 10 + 15 + 10 + 15 = 80 dating
        assert_eq!(result.scores[CloseFriends], 75);
        assert_eq!(result.scores[RomanticDating], 80);
        assert_eq!(result.relationship, RomanticDating);
        assert_eq!(result.confidence, ConfidenceLevel::Moderate);
        assert_eq!(result.margin(), 5);
    }

    #[test]
    fn test_top_n() {
        let result = classify(&features(10.0, 20, 3));
        let top = result.top(3);
        assert_eq!(top[0], (CloseFriends, 30));
        assert_eq!(top[1], (CasualFriends, 20));
        assert_eq!(top[2], (Colleagues, 15));
    }

    #[test]
    fn test_score_board_serializes_as_map() {
        let mut board = ScoreBoard::new();
        board.add(EnemyConflict, 65);
        let json = serde_json::to_value(board).unwrap();
        assert_eq!(json["enemy_conflict"], 65);
        assert_eq!(json.as_object().unwrap().len(), 12);
    }

    #[test]
    fn test_custom_indicator_table() {
        static ONLY_GROUPS: &[Indicator] = &[Indicator {
            name: "group",
            condition: |f| f.participant_count > 2,
            effects: &[(Colleagues, 5)],
        }];
        let result = classify_with(ONLY_GROUPS, &features(10.0, 20, 4));
        assert_eq!(result.relationship, Colleagues);
        assert_eq!(result.score, 5);
    }
}
