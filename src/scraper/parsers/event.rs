//! Event page parser.
//!
//! Page layout: `<h1>` event title, `<h2>` "<location>; <date>", then one
//! `table[cellspacing="5"]` per bout.

use scraper::{Html, Selector};
use std::sync::OnceLock;
use tracing::{debug, warn};

use super::date::DateParser;
use super::element_text;
use super::fight::FightRowParser;
use crate::types::{EventMeta, FightRecord};

fn selector(cell: &'static OnceLock<Selector>, css: &str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).expect("event page selector"))
}

fn row_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, r#"table[cellspacing="5"]"#)
}

fn title_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "h1")
}

fn meta_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "h2")
}

/// Result of parsing one event page
#[derive(Debug, Clone)]
pub struct ParsedEvent {
    pub meta: EventMeta,
    pub records: Vec<FightRecord>,
    /// Rows dropped as draws or malformed
    pub skipped_rows: usize,
}

/// Parser for event pages
pub struct EventPageParser;

impl EventPageParser {
    /// Parse an event page. `fallback_name` (the index link text) is used
    /// when the page has no title.
    pub fn parse(html: &str, fallback_name: &str, date_parser: &dyn DateParser) -> ParsedEvent {
        let document = Html::parse_document(html);
        let meta = Self::parse_meta(&document, fallback_name, date_parser);

        let mut records = Vec::new();
        let mut skipped_rows = 0;

        for row in document.select(row_selector()) {
            match FightRowParser::parse(&row) {
                Ok(bout) => records.push(FightRecord::from_bout(&meta, bout)),
                Err(reason) if reason.is_suspicious() => {
                    warn!("{}: skipping row: {}", meta.name, reason);
                    skipped_rows += 1;
                }
                Err(reason) => {
                    debug!("{}: skipping row: {}", meta.name, reason);
                    skipped_rows += 1;
                }
            }
        }

        ParsedEvent {
            meta,
            records,
            skipped_rows,
        }
    }

    fn parse_meta(document: &Html, fallback_name: &str, date_parser: &dyn DateParser) -> EventMeta {
        let name = document
            .select(title_selector())
            .next()
            .map(|e| element_text(&e))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| {
                warn!("no event title, using index name '{}'", fallback_name);
                fallback_name.to_string()
            });

        let line = document.select(meta_selector()).next().map(|e| element_text(&e));
        let (location, date) = match line {
            Some(line) => Self::split_meta_line(&line, date_parser),
            None => (None, None),
        };

        EventMeta {
            name,
            location,
            date,
        }
    }

    fn split_meta_line(
        line: &str,
        date_parser: &dyn DateParser,
    ) -> (Option<String>, Option<chrono::NaiveDate>) {
        let (location, date_text) = match line.split_once(';') {
            Some((loc, date)) => (loc.trim(), Some(date.trim())),
            None => (line.trim(), None),
        };

        let location = (!location.is_empty()).then(|| location.to_string());
        let date = date_text.and_then(|text| {
            let parsed = date_parser.parse(text);
            if parsed.is_none() && !text.is_empty() {
                warn!("unparsable event date '{}'", text);
            }
            parsed
        });

        (location, date)
    }
}
