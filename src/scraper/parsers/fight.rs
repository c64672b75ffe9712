//! Parser for a single bout row.
//!
//! A bout row is a `table[cellspacing="5"]` holding two outcome cells,
//! two "@ 1.50"-style decimal odds cells, and three fighter profile links
//! in the order red corner, blue corner, winner.

use scraper::{ElementRef, Selector};
use std::fmt;
use std::sync::OnceLock;

use super::element_text;
use crate::error::OddsError;
use crate::odds::decimal_to_american;
use crate::types::{Bout, CornerResult, OutcomeLabel};

/// Why a row produced no bout. Expected during normal parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Fewer than four centered outcome/odds cells
    MissingCells(usize),
    /// Draw, no contest, or an inconsistent WON/LOST pair
    Undecided,
    UnparsableOdds(String),
    NonFiniteOdds,
    InvalidOdds(OddsError),
    MissingFighters(usize),
    /// Winner link names neither corner's WON side
    WinnerMismatch(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingCells(n) => write!(f, "expected 4 outcome/odds cells, found {}", n),
            SkipReason::Undecided => f.write_str("no WON/LOST decision"),
            SkipReason::UnparsableOdds(text) => write!(f, "unparsable odds '{}'", text),
            SkipReason::NonFiniteOdds => f.write_str("non-finite odds"),
            SkipReason::InvalidOdds(e) => write!(f, "{}", e),
            SkipReason::MissingFighters(n) => write!(f, "expected 3 fighter links, found {}", n),
            SkipReason::WinnerMismatch(name) => write!(f, "winner '{}' did not win this row", name),
        }
    }
}

fn cell_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse(r#"td[align="center"][valign="middle"]"#).expect("cell selector"))
}

fn fighter_link_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse(r#"a[href*="fighter_profile.php"]"#).expect("fighter link selector"))
}

/// Parser for bout rows
pub struct FightRowParser;

impl FightRowParser {
    /// Parse one bout row into a labelled bout
    pub fn parse(row: &ElementRef) -> Result<Bout, SkipReason> {
        let cells: Vec<String> = row.select(cell_selector()).map(|c| element_text(&c)).collect();
        if cells.len() < 4 {
            return Err(SkipReason::MissingCells(cells.len()));
        }

        let red_won = match (CornerResult::from_cell(&cells[0]), CornerResult::from_cell(&cells[1])) {
            (CornerResult::Won, CornerResult::Lost) => true,
            (CornerResult::Lost, CornerResult::Won) => false,
            _ => return Err(SkipReason::Undecided),
        };

        let red_decimal = parse_decimal_odds(&cells[2])?;
        let blue_decimal = parse_decimal_odds(&cells[3])?;

        let fighters: Vec<String> = row
            .select(fighter_link_selector())
            .map(|a| element_text(&a))
            .filter(|name| !name.is_empty())
            .collect();
        if fighters.len() < 3 {
            return Err(SkipReason::MissingFighters(fighters.len()));
        }

        let red_odds = decimal_to_american(red_decimal).map_err(SkipReason::InvalidOdds)?;
        let blue_odds = decimal_to_american(blue_decimal).map_err(SkipReason::InvalidOdds)?;

        let (red_fighter, blue_fighter, winner) =
            (fighters[0].clone(), fighters[1].clone(), fighters[2].clone());

        let (winning_side, won_odds, lost_odds) = if red_won {
            (&red_fighter, red_odds, blue_odds)
        } else {
            (&blue_fighter, blue_odds, red_odds)
        };
        if *winning_side != winner {
            return Err(SkipReason::WinnerMismatch(winner));
        }

        // Compared on American values; raw decimals order the other way round
        let outcome_label = if won_odds > lost_odds {
            OutcomeLabel::Underdog
        } else {
            OutcomeLabel::Favorite
        };

        let favorite = if red_odds <= blue_odds {
            red_fighter.clone()
        } else {
            blue_fighter.clone()
        };

        Ok(Bout {
            red_fighter,
            blue_fighter,
            winner,
            red_odds,
            blue_odds,
            favorite,
            outcome_label,
        })
    }
}

impl SkipReason {
    /// A well-formed decided row never does this; the page layout may have changed
    pub fn is_suspicious(&self) -> bool {
        matches!(self, SkipReason::WinnerMismatch(_))
    }
}

/// Strip the "@" marker and whitespace, then parse
fn parse_decimal_odds(text: &str) -> Result<f64, SkipReason> {
    let cleaned = text.trim_matches(|c: char| c == '@' || c.is_whitespace());
    let value: f64 = cleaned
        .parse()
        .map_err(|_| SkipReason::UnparsableOdds(text.to_string()))?;
    if !value.is_finite() {
        return Err(SkipReason::NonFiniteOdds);
    }
    Ok(value)
}
