//! HTML parsers for betmma.tips pages.

pub mod date;
pub mod event;
pub mod fight;
pub mod index;

pub use date::{DateParser, LenientDateParser};
pub use event::{EventPageParser, ParsedEvent};
pub use fight::{FightRowParser, SkipReason};
pub use index::IndexPageParser;

use scraper::ElementRef;

/// Text content of an element with whitespace collapsed
pub(crate) fn element_text(elem: &ElementRef) -> String {
    elem.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
