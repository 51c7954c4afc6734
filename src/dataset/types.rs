//! Core data types for the meal dataset
//!
//! - `MealRecord`: one (date, dish, calories) observation
//! - `MealTable`: the parsed file, in file order
//! - `LoadOutcome`: what a load attempt produced

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// A single meal observation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealRecord {
    /// Serving date
    pub date: NaiveDate,
    /// Dish label, not unique per date
    pub dish_name: String,
    /// Kilocalories; `None` when the cell was not numeric
    pub calories: Option<f64>,
}

impl MealRecord {
    pub fn new(date: NaiveDate, dish_name: impl Into<String>, calories: Option<f64>) -> Self {
        Self {
            date,
            dish_name: dish_name.into(),
            calories,
        }
    }
}

/// Parsed meal dataset
///
/// Records keep the order they had in the source file. Nothing here sorts
/// by date.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MealTable {
    /// File the table was read from
    pub source: PathBuf,
    /// Name of the encoding that decoded the file
    pub encoding: &'static str,
    /// Rows in file order
    pub records: Vec<MealRecord>,
}

impl MealTable {
    pub fn new(source: impl Into<PathBuf>, encoding: &'static str, records: Vec<MealRecord>) -> Self {
        Self {
            source: source.into(),
            encoding,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct dish names in order of first appearance
    pub fn distinct_dishes(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.dish_name.as_str()))
            .map(|r| r.dish_name.clone())
            .collect()
    }

    /// Earliest and latest serving date
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date;
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.date), hi.max(r.date))
        }))
    }
}

/// Result of asking for the dataset
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// File was read and parsed
    Loaded(Arc<MealTable>),
    /// File does not exist
    Missing { path: PathBuf },
    /// File exists but could not be decoded or parsed
    Failed { path: PathBuf, reason: String },
}

impl LoadOutcome {
    /// The table, if one was produced
    pub fn table(&self) -> Option<&Arc<MealTable>> {
        match self {
            LoadOutcome::Loaded(table) => Some(table),
            _ => None,
        }
    }

    /// True only for a successfully loaded, non-empty table
    pub fn is_loaded(&self) -> bool {
        self.table().map(|t| !t.is_empty()).unwrap_or(false)
    }

    /// The records, or an empty slice when nothing was loaded
    pub fn records(&self) -> &[MealRecord] {
        self.table().map(|t| t.records.as_slice()).unwrap_or(&[])
    }
}
