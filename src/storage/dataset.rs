//! Dataset load, merge, and persist.

use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use super::schema::{self, COLUMNS, DATE_FORMAT};
use crate::error::StoreError;
use crate::types::{FightRecord, OutcomeLabel};

/// In-memory dataset for one run
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<FightRecord>,
    /// The file on disk could not be read; it is backed up before being replaced
    recovered_from_corruption: bool,
}

impl Dataset {
    pub fn new(records: Vec<FightRecord>) -> Self {
        Self {
            records,
            recovered_from_corruption: false,
        }
    }

    pub fn records(&self) -> &[FightRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct event names already ingested
    pub fn known_events(&self) -> HashSet<String> {
        self.records.iter().map(|r| r.event_name.clone()).collect()
    }

    /// Append new rows after the existing ones
    pub fn append(&mut self, records: Vec<FightRecord>) {
        self.records.extend(records);
    }

    pub fn recovered_from_corruption(&self) -> bool {
        self.recovered_from_corruption
    }
}

/// CSV file holding the dataset
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the dataset, starting empty when the file is missing or unreadable
    pub fn load(&self) -> Dataset {
        match self.read() {
            Ok(Some(records)) => {
                info!("Loaded {} rows from {}", records.len(), self.path.display());
                Dataset::new(records)
            }
            Ok(None) => {
                info!("No dataset at {}, starting fresh", self.path.display());
                Dataset::default()
            }
            Err(e) => {
                error!(
                    "Dataset {} is unreadable ({}); starting from an empty dataset. \
                     Known events are lost and may be scraped again",
                    self.path.display(),
                    e
                );
                Dataset {
                    records: Vec::new(),
                    recovered_from_corruption: true,
                }
            }
        }
    }

    /// Read the file; `None` when it does not exist or is empty
    pub fn read(&self) -> Result<Option<Vec<FightRecord>>, StoreError> {
        let metadata = match fs::metadata(&self.path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if metadata.len() == 0 {
            return Ok(None);
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(self.path.clone()))?
            .finish()?;

        from_frame(&df).map(Some)
    }

    /// Replace the file with the full dataset
    pub fn save(&self, dataset: &Dataset) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }

        if dataset.recovered_from_corruption() && self.path.exists() {
            let backup = sibling(&self.path, ".corrupt");
            fs::copy(&self.path, &backup).map_err(io_error(&backup))?;
            warn!("Kept unreadable dataset as {}", backup.display());
        }

        let mut df = to_frame(dataset.records())?;
        let tmp = sibling(&self.path, ".tmp");
        {
            let mut file = fs::File::create(&tmp).map_err(io_error(&tmp))?;
            CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
            file.sync_all().map_err(io_error(&tmp))?;
        }
        fs::rename(&tmp, &self.path).map_err(io_error(&self.path))?;

        info!("Wrote {} rows to {}", dataset.len(), self.path.display());
        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

fn to_frame(records: &[FightRecord]) -> PolarsResult<DataFrame> {
    df!(
        schema::EVENTS => records.iter().map(|r| r.event_name.clone()).collect::<Vec<_>>(),
        schema::LOCATION => records.iter().map(|r| r.location.clone()).collect::<Vec<_>>(),
        schema::DATE => records
            .iter()
            .map(|r| r.date.map(|d| d.format(DATE_FORMAT).to_string()))
            .collect::<Vec<_>>(),
        schema::RED_FIGHTER => records.iter().map(|r| r.red_fighter.clone()).collect::<Vec<_>>(),
        schema::BLUE_FIGHTER => records.iter().map(|r| r.blue_fighter.clone()).collect::<Vec<_>>(),
        schema::WINNER => records.iter().map(|r| r.winner.clone()).collect::<Vec<_>>(),
        schema::RED_ODDS => records.iter().map(|r| r.red_odds).collect::<Vec<_>>(),
        schema::BLUE_ODDS => records.iter().map(|r| r.blue_odds).collect::<Vec<_>>(),
        schema::FAVORITE => records.iter().map(|r| r.favorite.clone()).collect::<Vec<_>>(),
        schema::WHO_WON => records
            .iter()
            .map(|r| r.outcome_label.as_str().to_string())
            .collect::<Vec<_>>()
    )
}

fn string_column(df: &DataFrame, name: &'static str) -> Result<StringChunked, StoreError> {
    let column = df.column(name).map_err(|_| StoreError::MissingColumn(name))?;
    Ok(column.cast(&DataType::String)?.str()?.clone())
}

fn int_column(df: &DataFrame, name: &'static str) -> Result<Int64Chunked, StoreError> {
    let column = df.column(name).map_err(|_| StoreError::MissingColumn(name))?;
    Ok(column.cast(&DataType::Int64)?.i64()?.clone())
}

fn from_frame(df: &DataFrame) -> Result<Vec<FightRecord>, StoreError> {
    for name in COLUMNS {
        if df.column(name).is_err() {
            return Err(StoreError::MissingColumn(name));
        }
    }

    let events = string_column(df, schema::EVENTS)?;
    let locations = string_column(df, schema::LOCATION)?;
    let dates = string_column(df, schema::DATE)?;
    let reds = string_column(df, schema::RED_FIGHTER)?;
    let blues = string_column(df, schema::BLUE_FIGHTER)?;
    let winners = string_column(df, schema::WINNER)?;
    let red_odds = int_column(df, schema::RED_ODDS)?;
    let blue_odds = int_column(df, schema::BLUE_ODDS)?;
    let favorites = string_column(df, schema::FAVORITE)?;
    let labels = string_column(df, schema::WHO_WON)?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let row = i + 1;
        let required = |value: Option<&str>, column: &str| {
            value
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| StoreError::InvalidRow {
                    row,
                    reason: format!("missing {}", column),
                })
        };
        let odds = |value: Option<i64>, column: &str| {
            value.ok_or_else(|| StoreError::InvalidRow {
                row,
                reason: format!("missing or non-integer {}", column),
            })
        };

        let date = match dates.get(i) {
            Some(text) => Some(NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| {
                StoreError::InvalidRow {
                    row,
                    reason: format!("bad date '{}'", text),
                }
            })?),
            None => None,
        };

        let outcome_label = required(labels.get(i), schema::WHO_WON)?
            .parse::<OutcomeLabel>()
            .map_err(|reason| StoreError::InvalidRow { row, reason })?;

        records.push(FightRecord {
            event_name: required(events.get(i), schema::EVENTS)?,
            location: locations.get(i).map(str::to_string),
            date,
            red_fighter: required(reds.get(i), schema::RED_FIGHTER)?,
            blue_fighter: required(blues.get(i), schema::BLUE_FIGHTER)?,
            winner: required(winners.get(i), schema::WINNER)?,
            red_odds: odds(red_odds.get(i), schema::RED_ODDS)?,
            blue_odds: odds(blue_odds.get(i), schema::BLUE_ODDS)?,
            favorite: required(favorites.get(i), schema::FAVORITE)?,
            outcome_label,
        });
    }

    Ok(records)
}
