//! Property tests for parsing and signal extraction

use chatsense_analysis::parser::{ChatParser, DateOrder, ParserConfig};
use chatsense_analysis::{classify, AggregateFeatures, ContentAnalyzer, ToneDetector};
use chatsense_core::{RelationshipType, SYSTEM_SENDER};
use proptest::prelude::*;

fn parser(order: DateOrder) -> ChatParser {
    ChatParser::new(ParserConfig {
        ambiguous_date_order: order,
    })
    .unwrap()
}

fn date_order() -> impl Strategy<Value = DateOrder> {
    prop_oneof![Just(DateOrder::MonthFirst), Just(DateOrder::DayFirst)]
}

/// Lines that look like export lines often enough to exercise every grammar
fn export_line() -> impl Strategy<Value = String> {
    let body = "[a-zA-Z !?:,.']{0,40}";
    prop_oneof![
        (1u32..=31, 1u32..=31, 0u32..=24, 0u32..=59, "[A-Z][a-z]{1,8}", body).prop_map(
            |(a, b, h, m, sender, body)| format!("{a}/{b}/24, {h:02}:{m:02} - {sender}: {body}")
        ),
        (1u32..=12, 1u32..=28, 1u32..=12, 0u32..=59, "[A-Z][a-z]{1,8}", body).prop_map(
            |(a, b, h, m, sender, body)| {
                format!("[{a}/{b}/2024, {h}:{m:02}:00 PM] {sender}: {body}")
            }
        ),
        (1u32..=12, 1u32..=28, body)
            .prop_map(|(a, b, body)| format!("{a}/{b}/24, 09:00 - {body} joined")),
        body.prop_map(String::from),
        any::<String>(),
    ]
}

proptest! {
    #[test]
    fn parse_is_total(raw in any::<String>(), order in date_order()) {
        let messages = parser(order).parse(&raw);
        prop_assert!(messages.len() <= raw.lines().count());
    }

    #[test]
    fn parsed_messages_are_well_formed(
        lines in prop::collection::vec(export_line(), 0..40),
        order in date_order(),
    ) {
        let raw = lines.join("\n");
        let messages = parser(order).parse(&raw);

        prop_assert!(messages.len() <= lines.len());
        for message in &messages {
            prop_assert!(!message.sender.is_empty() || message.is_system);
            if message.is_system {
                prop_assert_eq!(message.sender.as_str(), SYSTEM_SENDER);
            }
        }
    }

    #[test]
    fn tone_and_content_percentages_bounded(
        lines in prop::collection::vec(export_line(), 0..40),
    ) {
        let messages = parser(DateOrder::MonthFirst).parse(&lines.join("\n"));
        let tone = ToneDetector::new().unwrap().detect(&messages);
        let content = ContentAnalyzer::new().unwrap().analyze(&messages);

        for value in [
            tone.casual,
            tone.formal,
            tone.playful,
            tone.insult,
            tone.roasting,
            content.life_planning,
            content.shared_parent,
        ] {
            prop_assert!((0.0..=100.0).contains(&value), "out of range: {}", value);
        }
    }

    #[test]
    fn classification_total_and_deterministic(
        lines in prop::collection::vec(export_line(), 0..40),
        sentiment in -1.0f64..=1.0,
    ) {
        let messages = parser(DateOrder::MonthFirst).parse(&lines.join("\n"));
        let tone = ToneDetector::new().unwrap().detect(&messages);
        let content = ContentAnalyzer::new().unwrap().analyze(&messages);
        let scores = vec![sentiment; messages.iter().filter(|m| !m.is_system).count()];

        let features = AggregateFeatures::aggregate(&messages, tone, content, &scores);
        let first = classify(&features);
        let second = classify(&features);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.scores.len(), RelationshipType::COUNT);
        prop_assert_eq!(first.score, first.scores[first.relationship]);
        if features.is_empty() {
            prop_assert_eq!(first.relationship, RelationshipType::Acquaintances);
        }
    }
}
