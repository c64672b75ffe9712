//! Best-effort date parsing for event metadata lines.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Turns free text into a calendar date when it can
pub trait DateParser: Send + Sync {
    fn parse(&self, text: &str) -> Option<NaiveDate>;
}

/// Accepts the common human spellings: "Saturday 20th January 2024",
/// "January 20, 2024", "Jan 20 2024", "2024-01-20", "01/20/2024".
#[derive(Debug, Default, Clone, Copy)]
pub struct LenientDateParser;

const FORMATS: [&str; 4] = ["%d %B %Y", "%B %d %Y", "%Y-%m-%d", "%m/%d/%Y"];

fn weekday_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(mon|tue|tues|wed|thu|thur|thurs|fri|sat|sun)(day|nesday|rsday|urday|sday)?\b\.?")
            .expect("weekday pattern")
    })
}

fn ordinal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("ordinal pattern"))
}

fn normalize(text: &str) -> String {
    let text = weekday_re().replace_all(text, " ");
    let text = ordinal_re().replace_all(&text, "$1");
    text.replace([',', '.'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl DateParser for LenientDateParser {
    fn parse(&self, text: &str) -> Option<NaiveDate> {
        let cleaned = normalize(text);
        if cleaned.is_empty() {
            return None;
        }
        FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
    }
}
