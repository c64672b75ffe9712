//! Column layout of the persisted dataset
//!
//! One row per decided bout; `Location` and `Date` may be empty.

pub const EVENTS: &str = "Events";
pub const LOCATION: &str = "Location";
pub const DATE: &str = "Date";
pub const RED_FIGHTER: &str = "R_fighter";
pub const BLUE_FIGHTER: &str = "B_fighter";
pub const WINNER: &str = "Winner";
pub const RED_ODDS: &str = "R_odds";
pub const BLUE_ODDS: &str = "B_odds";
pub const FAVORITE: &str = "Favorite";
pub const WHO_WON: &str = "Who_won";

/// Header order as written to disk
pub const COLUMNS: [&str; 10] = [
    EVENTS,
    LOCATION,
    DATE,
    RED_FIGHTER,
    BLUE_FIGHTER,
    WINNER,
    RED_ODDS,
    BLUE_ODDS,
    FAVORITE,
    WHO_WON,
];

/// Serialized date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";
