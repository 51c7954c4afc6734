//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

use crate::dataset::MealRecord;
use crate::tally::TallyEntry;

// ============================================
// VOTE DTOs
// ============================================

/// Vote request, as JSON or as the page's form body
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// Dish to vote for
    pub dish: String,
}

/// Vote response
#[derive(Debug, Serialize)]
pub struct VoteResponse {
    /// Dish that received the vote
    pub dish: String,
    /// Its count after the vote
    pub count: u64,
    /// Acknowledgment shown to the user
    pub message: String,
    /// Full tally, highest count first
    pub tally: Vec<TallyEntry>,
}

/// Current tally for the session
#[derive(Debug, Serialize)]
pub struct TallyResponse {
    /// Sum of all counts
    pub total_votes: u64,
    /// Entries, highest count first
    pub entries: Vec<TallyEntry>,
}

// ============================================
// DATASET DTOs
// ============================================

/// Loaded meal records
#[derive(Debug, Serialize)]
pub struct MealsResponse {
    /// Source file
    pub source: String,
    /// Encoding that decoded the file
    pub encoding: String,
    /// Number of records
    pub total: usize,
    /// Records in file order
    pub records: Vec<MealRecord>,
}

/// Distinct dish names
#[derive(Debug, Serialize)]
pub struct DishesResponse {
    /// Names in first-appearance order
    pub dishes: Vec<String>,
}

// ============================================
// CHART DTOs
// ============================================

/// Chart query parameters
#[derive(Debug, Deserialize)]
pub struct ChartParams {
    /// Output format: json or svg
    #[serde(default = "default_chart_format")]
    pub format: String,
}

fn default_chart_format() -> String {
    "json".to_string()
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Dataset status: loaded, missing, failed, empty
    pub dataset: String,
    /// Live sessions
    pub sessions: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
