//! Domain types for scraped fight data.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Text of one outcome cell on a bout row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerResult {
    Won,
    Lost,
    /// Draw, no contest, or anything else outside the WON/LOST vocabulary
    Other,
}

impl CornerResult {
    pub fn from_cell(text: &str) -> Self {
        match text.trim() {
            "WON" => CornerResult::Won,
            "LOST" => CornerResult::Lost,
            _ => CornerResult::Other,
        }
    }
}

/// Whether the bout went to the betting favorite or the underdog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutcomeLabel {
    Favorite,
    Underdog,
}

impl OutcomeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeLabel::Favorite => "Favorite",
            OutcomeLabel::Underdog => "Underdog",
        }
    }
}

impl fmt::Display for OutcomeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OutcomeLabel {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "favorite" => Ok(OutcomeLabel::Favorite),
            "underdog" => Ok(OutcomeLabel::Underdog),
            other => Err(format!("unknown outcome label '{}'", other)),
        }
    }
}

/// One link from the listings index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Display name as shown on the index; used as the dedup key
    pub name: String,
    /// Absolute event page URL
    pub url: String,
}

/// Page-level metadata of one event card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMeta {
    pub name: String,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
}

/// A decided bout with odds already converted and labelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bout {
    pub red_fighter: String,
    pub blue_fighter: String,
    pub winner: String,
    /// American odds
    pub red_odds: i64,
    /// American odds
    pub blue_odds: i64,
    pub favorite: String,
    pub outcome_label: OutcomeLabel,
}

/// One row of the dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FightRecord {
    pub event_name: String,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
    pub red_fighter: String,
    pub blue_fighter: String,
    pub winner: String,
    pub red_odds: i64,
    pub blue_odds: i64,
    pub favorite: String,
    pub outcome_label: OutcomeLabel,
}

impl FightRecord {
    /// Attach event metadata to a parsed bout
    pub fn from_bout(meta: &EventMeta, bout: Bout) -> Self {
        Self {
            event_name: meta.name.clone(),
            location: meta.location.clone(),
            date: meta.date,
            red_fighter: bout.red_fighter,
            blue_fighter: bout.blue_fighter,
            winner: bout.winner,
            red_odds: bout.red_odds,
            blue_odds: bout.blue_odds,
            favorite: bout.favorite,
            outcome_label: bout.outcome_label,
        }
    }
}
