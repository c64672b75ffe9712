//! Persistent storage for scraped fight data
//!
//! A single CSV file, loaded whole at the start of a run and rewritten
//! whole when the run found something new.

pub mod dataset;
pub mod schema;

pub use dataset::{Dataset, DatasetStore};
