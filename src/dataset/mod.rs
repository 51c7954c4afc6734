//! Meal Dataset
//!
//! Loading and caching of the school meal CSV:
//!
//! - **types**: `MealRecord`, `MealTable`, `LoadOutcome`
//! - **loader**: decoding with encoding fallback and column parsing
//! - **cache**: memoized loads keyed by path and modification time
//! - **error**: error types
//!
//! # Example
//!
//! ```rust,no_run
//! use meal_poll::dataset::{DatasetCache, MealLoader};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache = DatasetCache::new(MealLoader::default());
//!     let outcome = cache.get(Path::new("meals_data.csv")).await;
//!
//!     if let Some(table) = outcome.table() {
//!         println!("{} rows, dishes: {:?}", table.len(), table.distinct_dishes());
//!     }
//! }
//! ```

pub mod cache;
pub mod error;
pub mod loader;
pub mod types;

pub use cache::{CacheStats, DatasetCache};
pub use error::{DatasetError, DatasetResult};
pub use loader::{parse_calories, parse_date, resolve_encoding, MealLoader};
pub use types::{LoadOutcome, MealRecord, MealTable};
