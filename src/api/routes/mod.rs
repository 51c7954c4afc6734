//! API Routes
//!
//! Route handlers organized by functionality.

pub mod charts;
pub mod dashboard;
pub mod health;
pub mod meals;
pub mod votes;

use crate::api::error::ApiError;
use crate::dataset::{LoadOutcome, MealTable};
use std::sync::Arc;

/// The loaded table, or the reason there is none
pub(crate) fn require_table(outcome: &LoadOutcome) -> Result<&Arc<MealTable>, ApiError> {
    match outcome {
        LoadOutcome::Loaded(table) if !table.is_empty() => Ok(table),
        LoadOutcome::Loaded(table) => Err(ApiError::DatasetUnavailable(format!(
            "{} has no rows",
            table.source.display()
        ))),
        LoadOutcome::Missing { path } => Err(ApiError::DatasetUnavailable(format!(
            "{} not found",
            path.display()
        ))),
        LoadOutcome::Failed { reason, .. } => Err(ApiError::DatasetUnavailable(reason.clone())),
    }
}
