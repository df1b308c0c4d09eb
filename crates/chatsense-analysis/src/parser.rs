//! Chat export line parser
//!
//! Turns the raw text of a chat export into an ordered list of [`Message`]s.
//! Each line either starts a new message (it matches one of the recognized
//! line grammars), continues the pending one, or is dropped when nothing is
//! pending yet.
//!
//! Two of the grammars are token-for-token identical:
//!
//! ```text
//! D1/D2/YY(YY), HH:MM - SENDER: BODY
//! ```
//!
//! One is the month-first convention, the other day-first. A line cannot tell
//! them apart, so whichever variant comes first in the grammar order always
//! wins. [`ParserConfig::ambiguous_date_order`] lets the caller pick that
//! order; the other variant is unreachable for the same line.

use aho_corasick::AhoCorasick;
use chatsense_core::{Message, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Strings that mark a message as an administrative notice
const SYSTEM_KEYWORDS: &[&str] = &[
    "Messages and calls are end-to-end encrypted",
    "created group",
    "added",
    "removed",
    "left",
    "joined",
    "changed the subject",
    "changed this group",
    "changed the group description",
    "security code changed",
    "You're now an admin",
    "You deleted this message",
    "This message was deleted",
    "Missed voice call",
    "Missed video call",
];

const BRACKETED_MERIDIEM: &str = r"^\[(?P<date>\d{1,2}/\d{1,2}/(?:\d{4}|\d{2})),?\s+(?P<time>\d{1,2}:\d{2}:\d{2})\s+(?P<meridiem>AM|PM)\]\s*(?P<sender>[^:]+):\s*(?P<body>.*)$";
const DASHED: &str = r"^(?P<date>\d{1,2}/\d{1,2}/(?:\d{4}|\d{2})),?\s+(?P<time>\d{1,2}:\d{2}(?::\d{2})?)\s*(?P<meridiem>AM|PM)?\s*-\s*(?P<sender>[^:]+):\s*(?P<body>.*)$";
const BRACKETED: &str = r"^\[(?P<date>\d{1,2}/\d{1,2}/(?:\d{4}|\d{2})),?\s+(?P<time>\d{1,2}:\d{2}:\d{2})\]\s*(?P<sender>[^:]+):\s*(?P<body>.*)$";
const NOTICE: &str = r"^(?P<date>\d{1,2}/\d{1,2}/(?:\d{4}|\d{2})),?\s+(?P<time>\d{1,2}:\d{2}(?::\d{2})?)\s*(?P<meridiem>AM|PM)?\s*-\s*(?P<body>.*(?:joined|left|added|removed|changed).*)$";

/// How to read the `D1/D2` part of a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `MM/DD/YY`
    #[default]
    MonthFirst,
    /// `DD/MM/YY`
    DayFirst,
}

impl DateOrder {
    fn other(self) -> Self {
        match self {
            Self::MonthFirst => Self::DayFirst,
            Self::DayFirst => Self::MonthFirst,
        }
    }
}

impl FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "month-first" | "mdy" | "us" => Ok(Self::MonthFirst),
            "day-first" | "dmy" | "eu" => Ok(Self::DayFirst),
            other => Err(format!(
                "unknown date order '{other}' (expected month-first or day-first)"
            )),
        }
    }
}

impl fmt::Display for DateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MonthFirst => f.write_str("month-first"),
            Self::DayFirst => f.write_str("day-first"),
        }
    }
}

/// Parser configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Which of the two identical dash grammars is tried first. Also the
    /// preferred reading for the bracketed grammars.
    #[serde(default)]
    pub ambiguous_date_order: DateOrder,
}

/// A recognized message-start grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    /// `[D1/D2/YY, HH:MM:SS AM|PM] SENDER: BODY`
    BracketedMeridiem,
    /// `D1/D2/YY, HH:MM - SENDER: BODY`, read month-first
    DashedMonthFirst,
    /// `D1/D2/YY, HH:MM - SENDER: BODY`, read day-first
    DashedDayFirst,
    /// `[D1/D2/YY, HH:MM:SS] SENDER: BODY`
    Bracketed,
    /// `D1/D2/YY, HH:MM - <someone joined/left/...>` with no sender part
    Notice,
}

impl LineFormat {
    /// Grammar order for a given ambiguity resolution. The notice grammar is
    /// always tried last so it never shadows a real message.
    pub fn ordered(order: DateOrder) -> [LineFormat; 5] {
        let (first, second) = match order {
            DateOrder::MonthFirst => (Self::DashedMonthFirst, Self::DashedDayFirst),
            DateOrder::DayFirst => (Self::DashedDayFirst, Self::DashedMonthFirst),
        };
        [Self::BracketedMeridiem, first, second, Self::Bracketed, Self::Notice]
    }

    fn pattern(self) -> &'static str {
        match self {
            Self::BracketedMeridiem => BRACKETED_MERIDIEM,
            Self::DashedMonthFirst | Self::DashedDayFirst => DASHED,
            Self::Bracketed => BRACKETED,
            Self::Notice => NOTICE,
        }
    }

    fn date_order(self, default: DateOrder) -> DateOrder {
        match self {
            Self::DashedMonthFirst => DateOrder::MonthFirst,
            Self::DashedDayFirst => DateOrder::DayFirst,
            _ => default,
        }
    }
}

/// Line-oriented chat export parser
pub struct ChatParser {
    config: ParserConfig,
    grammars: Vec<(LineFormat, Regex)>,
    system_keywords: AhoCorasick,
}

impl ChatParser {
    /// Create a parser for the given configuration
    pub fn new(config: ParserConfig) -> Result<Self> {
        let grammars = LineFormat::ordered(config.ambiguous_date_order)
            .into_iter()
            .map(|format| {
                Regex::new(format.pattern())
                    .map(|re| (format, re))
                    .map_err(|e| {
                        chatsense_core::Error::internal(format!(
                            "Failed to compile {format:?} grammar: {e}"
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let system_keywords = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(SYSTEM_KEYWORDS)
            .map_err(|e| {
                chatsense_core::Error::internal(format!(
                    "Failed to build system keyword matcher: {e}"
                ))
            })?;

        Ok(Self {
            config,
            grammars,
            system_keywords,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a whole export. Never fails: lines that cannot be attributed to
    /// a message are dropped.
    pub fn parse(&self, raw: &str) -> Vec<Message> {
        let mut messages = Vec::new();
        let mut pending: Option<Message> = None;
        let mut dropped = 0usize;

        for line in raw.split('\n') {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(started) = self.parse_line(line) {
                if let Some(done) = pending.take() {
                    messages.push(self.finalize(done));
                }
                pending = Some(started);
            } else if let Some(current) = pending.as_mut() {
                current.text.push('\n');
                current.text.push_str(line);
            } else {
                dropped += 1;
            }
        }

        if let Some(done) = pending.take() {
            messages.push(self.finalize(done));
        }

        if dropped > 0 {
            trace!(dropped, "Dropped leading lines before first message");
        }

        messages
    }

    /// Try every grammar in order against a single trimmed line
    pub fn parse_line(&self, line: &str) -> Option<Message> {
        self.grammars.iter().find_map(|(format, re)| {
            let caps = re.captures(line)?;
            self.build_message(*format, &caps)
        })
    }

    fn build_message(&self, format: LineFormat, caps: &Captures<'_>) -> Option<Message> {
        let order = format.date_order(self.config.ambiguous_date_order);
        let timestamp = parse_timestamp(
            caps.name("date")?.as_str(),
            caps.name("time")?.as_str(),
            caps.name("meridiem").map(|m| m.as_str()),
            order,
        )?;
        let body = caps.name("body").map_or("", |m| m.as_str()).trim();

        match caps.name("sender") {
            Some(sender) if format != LineFormat::Notice => {
                let sender = sender.as_str().trim();
                if sender.is_empty() {
                    return None;
                }
                Some(Message::new(timestamp, sender, body))
            }
            _ => Some(Message::system(timestamp, body)),
        }
    }

    /// Tag a completed message as a system notice when sender or text
    /// mention one of the notice keywords
    fn finalize(&self, mut message: Message) -> Message {
        if message.is_system {
            return message;
        }

        let haystack = format!("{} {}", message.sender, message.text);
        if self.system_keywords.is_match(&haystack) {
            message.sender = chatsense_core::SYSTEM_SENDER.to_string();
            message.is_system = true;
        }
        message
    }
}

/// Build a timestamp from the captured tokens.
///
/// The preferred date order is tried first; the other order is used only when
/// the preferred reading is not a calendar date (e.g. `25/12/23` month-first).
/// Two-digit years are taken as 20YY; other lengths besides four are
/// rejected. Returns `None` when no reading is valid.
pub fn parse_timestamp(
    date: &str,
    time: &str,
    meridiem: Option<&str>,
    order: DateOrder,
) -> Option<NaiveDateTime> {
    let date = parse_date(date, order).or_else(|| parse_date(date, order.other()))?;
    let time = parse_time(time, meridiem)?;
    Some(date.and_time(time))
}

fn parse_date(token: &str, order: DateOrder) -> Option<NaiveDate> {
    let mut parts = token.split('/');
    let first: u32 = parts.next()?.parse().ok()?;
    let second: u32 = parts.next()?.parse().ok()?;
    let year_token = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let year: i32 = match year_token.len() {
        2 => 2000 + year_token.parse::<i32>().ok()?,
        4 => year_token.parse().ok()?,
        _ => return None,
    };

    let (month, day) = match order {
        DateOrder::MonthFirst => (first, second),
        DateOrder::DayFirst => (second, first),
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_time(token: &str, meridiem: Option<&str>) -> Option<NaiveTime> {
    let mut parts = token.split(':');
    let mut hour: u32 = parts.next()?.parse().ok()?;
    let minute: u32 = parts.next()?.parse().ok()?;
    let second: u32 = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => 0,
    };

    if let Some(meridiem) = meridiem {
        if !(1..=12).contains(&hour) {
            return None;
        }
        hour = match (meridiem, hour) {
            ("AM", 12) => 0,
            ("PM", 12) => 12,
            ("PM", h) => h + 12,
            (_, h) => h,
        };
    }

    NaiveTime::from_hms_opt(hour, minute, second)
}
