//! Meal CSV Loader
//!
//! Decodes the file with the primary encoding, retrying once with the
//! regional fallback (CP949 by default) when the bytes are not valid in the
//! primary one, then reads the date, dish and calorie columns by header name.

use chrono::{NaiveDate, NaiveDateTime};
use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;
use std::path::Path;

use super::error::{DatasetError, DatasetResult};
use super::types::{MealRecord, MealTable};
use crate::config::DatasetConfig;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Date layouts accepted in the date column, tried in order
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%Y%m%d", "%Y.%m.%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y",
];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// CSV loader with configurable encodings and column names
#[derive(Debug, Clone)]
pub struct MealLoader {
    primary: &'static Encoding,
    fallback: &'static Encoding,
    date_column: String,
    dish_column: String,
    calories_column: String,
}

impl Default for MealLoader {
    fn default() -> Self {
        let config = DatasetConfig::default();
        Self {
            primary: UTF_8,
            fallback: encoding_rs::EUC_KR,
            date_column: config.date_column,
            dish_column: config.dish_column,
            calories_column: config.calories_column,
        }
    }
}

impl MealLoader {
    /// Build a loader from the dataset section of the config
    pub fn from_config(config: &DatasetConfig) -> DatasetResult<Self> {
        Ok(Self {
            primary: resolve_encoding(&config.primary_encoding)?,
            fallback: resolve_encoding(&config.fallback_encoding)?,
            date_column: config.date_column.clone(),
            dish_column: config.dish_column.clone(),
            calories_column: config.calories_column.clone(),
        })
    }

    /// Override the column headers
    pub fn with_columns(mut self, date: &str, dish: &str, calories: &str) -> Self {
        self.date_column = date.to_string();
        self.dish_column = dish.to_string();
        self.calories_column = calories.to_string();
        self
    }

    /// Read and parse a file
    ///
    /// A missing file surfaces as `DatasetError::Io` with `NotFound`.
    pub async fn load(&self, path: &Path) -> DatasetResult<MealTable> {
        let bytes = tokio::fs::read(path).await?;
        self.load_bytes(path, &bytes)
    }

    /// Parse already-read file contents
    pub fn load_bytes(&self, path: &Path, bytes: &[u8]) -> DatasetResult<MealTable> {
        let (text, encoding) = self.decode(path, bytes)?;
        let records = self.parse_str(&text)?;

        tracing::info!(
            path = %path.display(),
            encoding = encoding,
            rows = records.len(),
            "Loaded meal dataset"
        );

        Ok(MealTable::new(path, encoding, records))
    }

    /// Decode bytes, retrying with the fallback encoding on failure
    pub fn decode<'a>(
        &self,
        path: &Path,
        bytes: &'a [u8],
    ) -> DatasetResult<(Cow<'a, str>, &'static str)> {
        if let Some(text) = decode_strict(self.primary, bytes) {
            return Ok((text, self.primary.name()));
        }

        tracing::debug!(
            path = %path.display(),
            primary = self.primary.name(),
            fallback = self.fallback.name(),
            "Primary decoding failed, retrying with fallback encoding"
        );

        decode_strict(self.fallback, bytes)
            .map(|text| (text, self.fallback.name()))
            .ok_or_else(|| DatasetError::Decode {
                path: path.to_path_buf(),
                primary: self.primary.name(),
                fallback: self.fallback.name(),
            })
    }

    /// Parse decoded CSV text into records
    pub fn parse_str(&self, text: &str) -> DatasetResult<Vec<MealRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let date_idx = column_index(&headers, &self.date_column)?;
        let dish_idx = column_index(&headers, &self.dish_column)?;
        let calories_idx = column_index(&headers, &self.calories_column)?;

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let actual_line = record.position().map_or(0, |p| p.line() as usize);

            let date_str = record.get(date_idx).unwrap_or("").trim();
            let date = parse_date(date_str).ok_or_else(|| DatasetError::InvalidDate {
                line: actual_line,
                value: date_str.to_string(),
            })?;

            let dish_name = record.get(dish_idx).unwrap_or("").to_string();
            let calories = record.get(calories_idx).and_then(parse_calories);

            records.push(MealRecord {
                date,
                dish_name,
                calories,
            });
        }

        Ok(records)
    }
}

/// Resolve an encoding label, accepting the Windows code page aliases
/// used for Korean text.
pub fn resolve_encoding(label: &str) -> DatasetResult<&'static Encoding> {
    let normalized = label.trim().to_ascii_lowercase();
    let label = match normalized.as_str() {
        "cp949" | "ms949" | "uhc" => "windows-949",
        "utf8" => "utf-8",
        other => other,
    };

    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| DatasetError::UnknownEncoding(normalized.clone()))
}

fn decode_strict<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
    let bytes = if encoding == UTF_8 {
        bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
    } else {
        bytes
    };

    encoding.decode_without_bom_handling_and_without_replacement(bytes)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> DatasetResult<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
}

/// Parse a date cell in any of the accepted layouts
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim().trim_end_matches('.');
    if value.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Parse a calorie cell, tolerating a trailing "kcal" unit and thousands
/// separators. Non-numeric cells are gaps.
pub fn parse_calories(value: &str) -> Option<f64> {
    let value = value.trim();
    let value = match value.len().checked_sub(4) {
        Some(cut) if value.is_char_boundary(cut) && value[cut..].eq_ignore_ascii_case("kcal") => {
            value[..cut].trim_end()
        }
        _ => value,
    };

    value
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
